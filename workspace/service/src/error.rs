use common::FieldErrors;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

/// Error types for the service layer
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or missing input, reported per field
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// Identifier does not resolve to an entity
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// Missing, unknown or revoked credentials
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Acting user does not own the resource
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Uniqueness violation in the store
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Hashing a password failed
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl ServiceError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        ServiceError::Validation(errors)
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => ServiceError::Conflict(detail),
            _ => {
                error!(?err, "Database error");
                ServiceError::Database(err)
            }
        }
    }
}

/// Type alias for Result with ServiceError
pub type Result<T> = std::result::Result<T, ServiceError>;
