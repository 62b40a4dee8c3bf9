use axum::{
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{ErrorResponse, FieldErrors};
use service::ServiceError;
use tracing::{debug, error};

/// Error returned by every handler; rendered as an [`ErrorResponse`].
#[derive(Debug, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub errors: Option<FieldErrors>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            errors: None,
        }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        let message = errors
            .values()
            .flatten()
            .next()
            .cloned()
            .unwrap_or_else(|| "The given data was invalid.".to_string());
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            code: "VALIDATION_FAILED",
            message,
            errors: Some(errors),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => ApiError::validation(errors),
            ServiceError::NotFound { entity, id } => ApiError::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} with id {} not found", entity, id),
            ),
            ServiceError::Unauthenticated(message) => ApiError::unauthenticated(message),
            ServiceError::Unauthorized(message) => {
                ApiError::new(StatusCode::FORBIDDEN, "UNAUTHORIZED", message)
            }
            ServiceError::Conflict(message) => {
                ApiError::new(StatusCode::CONFLICT, "CONFLICT", message)
            }
            ServiceError::PasswordHash(message) => {
                error!("Password hashing failed: {}", message);
                ApiError::internal()
            }
            ServiceError::Database(db_error) => {
                error!("Database error: {}", db_error);
                ApiError::internal()
            }
        }
    }
}

impl ApiError {
    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error",
        )
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        let status = match &rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            JsonRejection::JsonSyntaxError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::new(status, "INVALID_BODY", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!("Rejected path parameters: {}", rejection.body_text());
        Self::new(StatusCode::BAD_REQUEST, "INVALID_PATH", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: self.message,
            code: self.code.to_string(),
            errors: self.errors,
            success: false,
        };
        (self.status, Json(body)).into_response()
    }
}

/// `Json` extractor whose rejections use the API error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path` extractor whose rejections use the API error shape.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::validation("title", "required"), StatusCode::UNPROCESSABLE_ENTITY),
            (
                ServiceError::NotFound {
                    entity: "Listing",
                    id: 1,
                },
                StatusCode::NOT_FOUND,
            ),
            (ServiceError::Unauthenticated("no".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Unauthorized("no".into()), StatusCode::FORBIDDEN),
            (ServiceError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ServiceError::PasswordHash("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_validation_error_carries_field_messages() {
        let err = ApiError::from(ServiceError::validation("email", "The email has already been taken."));
        assert_eq!(err.message, "The email has already been taken.");
        assert_eq!(
            err.errors.unwrap()["email"],
            vec!["The email has already been taken.".to_string()]
        );
    }
}
