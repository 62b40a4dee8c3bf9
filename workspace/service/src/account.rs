use chrono::Utc;
use common::validation::push_field_error;
use common::{LoginRequest, RegisterRequest, UpdateProfileRequest, UserDto};
use model::entities::prelude::{AccessToken, User};
use model::entities::{access_token, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::{debug, info, instrument, warn};

use crate::credentials::{generate_token, hash_password, hash_token, verify_password};
use crate::error::{Result, ServiceError};

pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";
pub const EMAIL_TAKEN: &str = "The email has already been taken.";
const TOKEN_NAME: &str = "auth_token";

/// A user resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: user::Model,
    pub token_id: i32,
}

/// Registration, login/logout and profile maintenance.
#[derive(Debug, Clone)]
pub struct AccountService {
    db: DatabaseConnection,
    token_bytes: usize,
}

impl AccountService {
    pub fn new(db: DatabaseConnection, token_bytes: usize) -> Self {
        Self { db, token_bytes }
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<user::Model> {
        request
            .validate_registration()
            .map_err(ServiceError::Validation)?;

        let email = normalize_email(&request.email);
        if self.find_by_email(&email).await?.is_some() {
            debug!("Email already registered");
            return Err(ServiceError::validation("email", EMAIL_TAKEN));
        }

        let active = user::ActiveModel {
            name: Set(request.name.trim().to_string()),
            email: Set(email),
            password_hash: Set(hash_password(&request.password)?),
            ..Default::default()
        };
        match active.insert(&self.db).await.map_err(ServiceError::from) {
            Ok(created) => {
                info!(user_id = created.id, "User registered");
                Ok(created)
            }
            Err(ServiceError::Conflict(_)) => Err(ServiceError::validation("email", EMAIL_TAKEN)),
            Err(e) => Err(e),
        }
    }

    /// Checks credentials, revokes every earlier token of the user and
    /// issues a new one. Returns the clear token with the user.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<(String, user::Model)> {
        let email = normalize_email(&request.email);
        let user = match self.find_by_email(&email).await? {
            Some(user) if verify_password(&request.password, &user.password_hash) => user,
            _ => {
                warn!("Rejected login attempt");
                return Err(ServiceError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
            }
        };

        let revoked = AccessToken::delete_many()
            .filter(access_token::Column::UserId.eq(user.id))
            .exec(&self.db)
            .await?;

        let token = generate_token(self.token_bytes);
        access_token::ActiveModel {
            user_id: Set(user.id),
            name: Set(TOKEN_NAME.to_string()),
            token_hash: Set(token.hash),
            created_at: Set(Utc::now()),
            last_used_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(
            user_id = user.id,
            revoked = revoked.rows_affected,
            "User logged in"
        );
        Ok((token.plain, user))
    }

    /// Resolves a bearer token to its user and records the use.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, bearer: &str) -> Result<Authenticated> {
        let found = AccessToken::find()
            .filter(access_token::Column::TokenHash.eq(hash_token(bearer)))
            .find_also_related(User)
            .one(&self.db)
            .await?;

        let Some((token, Some(user))) = found else {
            debug!("Unknown bearer token");
            return Err(ServiceError::Unauthenticated("Unauthenticated.".to_string()));
        };

        let token_id = token.id;
        let mut active: access_token::ActiveModel = token.into();
        active.last_used_at = Set(Some(Utc::now()));
        active.update(&self.db).await?;

        Ok(Authenticated { user, token_id })
    }

    /// Owner of a bearer token without recording the use; `None` for
    /// unknown tokens.
    #[instrument(skip_all)]
    pub async fn token_owner(&self, bearer: &str) -> Result<Option<i32>> {
        let token = AccessToken::find()
            .filter(access_token::Column::TokenHash.eq(hash_token(bearer)))
            .one(&self.db)
            .await?;
        Ok(token.map(|t| t.user_id))
    }

    /// Revokes a single token.
    #[instrument(skip(self))]
    pub async fn logout(&self, token_id: i32) -> Result<()> {
        let res = AccessToken::delete_by_id(token_id).exec(&self.db).await?;
        info!(removed = res.rows_affected, "Token revoked");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn current_user(&self, user_id: i32) -> Result<user::Model> {
        User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "User",
                id: user_id,
            })
    }

    /// Partial profile update. Every rule is checked before anything is
    /// written; a single failure leaves the row untouched.
    #[instrument(skip(self, user, request), fields(user_id = user.id))]
    pub async fn update_profile(
        &self,
        user: user::Model,
        request: UpdateProfileRequest,
    ) -> Result<user::Model> {
        let mut errors = request.validate_profile().err().unwrap_or_default();

        let email = request.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            if !errors.contains_key("email") {
                if let Some(other) = self.find_by_email(email).await? {
                    if other.id != user.id {
                        push_field_error(&mut errors, "email", EMAIL_TAKEN);
                    }
                }
            }
        }

        if request.password.is_some() && !errors.contains_key("current_password") {
            let current = request.current_password.as_deref().unwrap_or_default();
            if !verify_password(current, &user.password_hash) {
                push_field_error(
                    &mut errors,
                    "current_password",
                    "The provided password does not match your current password.",
                );
            }
        }

        if !errors.is_empty() {
            debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Profile update rejected");
            return Err(ServiceError::Validation(errors));
        }

        let password_hash = match &request.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let mut active: user::ActiveModel = user.into();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(hash) = password_hash {
            active.password_hash = Set(hash);
        }

        match active.update(&self.db).await.map_err(ServiceError::from) {
            Ok(updated) => {
                info!(user_id = updated.id, "Profile updated");
                Ok(updated)
            }
            Err(ServiceError::Conflict(_)) => Err(ServiceError::validation("email", EMAIL_TAKEN)),
            Err(e) => Err(e),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        Ok(User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Transport shape of a user. The password hash is dropped here.
pub fn to_user_dto(model: user::Model) -> UserDto {
    UserDto {
        id: model.id,
        name: model.name,
        email: model.email,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::setup_db;
    use sea_orm::PaginatorTrait;

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Anna Kovács".into(),
            email: email.into(),
            password: "correct horse".into(),
            password_confirmation: "correct horse".into(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_normalizes_email() {
        let db = setup_db().await;
        let accounts = AccountService::new(db, 32);

        let user = accounts
            .register(register_request("Anna@Example.com"))
            .await
            .unwrap();
        assert_eq!(user.email, "anna@example.com");
        assert_ne!(user.password_hash, "correct horse");
        assert!(verify_password("correct horse", &user.password_hash));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_validation_error_on_email() {
        let db = setup_db().await;
        let accounts = AccountService::new(db, 32);
        accounts
            .register(register_request("anna@example.com"))
            .await
            .unwrap();

        let err = accounts
            .register(register_request("ANNA@example.com"))
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(errors) => {
                assert_eq!(errors["email"], vec![EMAIL_TAKEN.to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_failures_share_one_message() {
        let db = setup_db().await;
        let accounts = AccountService::new(db, 32);
        accounts
            .register(register_request("anna@example.com"))
            .await
            .unwrap();

        let wrong_password = accounts
            .login(login_request("anna@example.com", "wrong password"))
            .await
            .unwrap_err();
        let unknown_email = accounts
            .login(login_request("nobody@example.com", "correct horse"))
            .await
            .unwrap_err();

        for err in [wrong_password, unknown_email] {
            match err {
                ServiceError::Unauthenticated(message) => assert_eq!(message, INVALID_CREDENTIALS),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_login_revokes_previous_tokens() {
        let db = setup_db().await;
        let accounts = AccountService::new(db.clone(), 32);
        accounts
            .register(register_request("anna@example.com"))
            .await
            .unwrap();

        let (first, _) = accounts
            .login(login_request("anna@example.com", "correct horse"))
            .await
            .unwrap();
        let (second, user) = accounts
            .login(login_request("anna@example.com", "correct horse"))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert!(matches!(
            accounts.authenticate(&first).await.unwrap_err(),
            ServiceError::Unauthenticated(_)
        ));
        let auth = accounts.authenticate(&second).await.unwrap();
        assert_eq!(auth.user.id, user.id);
        assert_eq!(AccessToken::find().count(&db).await.unwrap(), 1);

        let stored = AccessToken::find_by_id(auth.token_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.last_used_at.is_some());
        assert_ne!(stored.token_hash, second);
    }

    #[tokio::test]
    async fn test_logout_invalidates_token() {
        let db = setup_db().await;
        let accounts = AccountService::new(db, 32);
        accounts
            .register(register_request("anna@example.com"))
            .await
            .unwrap();
        let (token, _) = accounts
            .login(login_request("anna@example.com", "correct horse"))
            .await
            .unwrap();

        let auth = accounts.authenticate(&token).await.unwrap();
        accounts.logout(auth.token_id).await.unwrap();
        assert!(accounts.authenticate(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_token_owner_resolves_only_live_tokens() {
        let db = setup_db().await;
        let accounts = AccountService::new(db, 32);
        let user = accounts
            .register(register_request("anna@example.com"))
            .await
            .unwrap();
        let (token, _) = accounts
            .login(login_request("anna@example.com", "correct horse"))
            .await
            .unwrap();

        assert_eq!(accounts.token_owner(&token).await.unwrap(), Some(user.id));
        assert_eq!(accounts.token_owner("made-up").await.unwrap(), None);

        let auth = accounts.authenticate(&token).await.unwrap();
        accounts.logout(auth.token_id).await.unwrap();
        assert_eq!(accounts.token_owner(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_profile_partial_fields() {
        let db = setup_db().await;
        let accounts = AccountService::new(db, 32);
        let user = accounts
            .register(register_request("anna@example.com"))
            .await
            .unwrap();

        let updated = accounts
            .update_profile(
                user.clone(),
                UpdateProfileRequest {
                    name: Some("Anna K.".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Anna K.");
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.password_hash, user.password_hash);

        // Keeping one's own email is not a conflict.
        let same_email = accounts
            .update_profile(
                updated.clone(),
                UpdateProfileRequest {
                    email: Some("anna@example.com".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(same_email.is_ok());
    }

    #[tokio::test]
    async fn test_update_profile_password_change_requires_current_password() {
        let db = setup_db().await;
        let accounts = AccountService::new(db, 32);
        let user = accounts
            .register(register_request("anna@example.com"))
            .await
            .unwrap();

        let err = accounts
            .update_profile(
                user.clone(),
                UpdateProfileRequest {
                    name: Some("Should not stick".into()),
                    password: Some("brand new password".into()),
                    password_confirmation: Some("brand new password".into()),
                    current_password: Some("not my password".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.contains_key("current_password")));
        let unchanged = accounts.current_user(user.id).await.unwrap();
        assert_eq!(unchanged.name, user.name);

        let updated = accounts
            .update_profile(
                user,
                UpdateProfileRequest {
                    password: Some("brand new password".into()),
                    password_confirmation: Some("brand new password".into()),
                    current_password: Some("correct horse".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(verify_password("brand new password", &updated.password_hash));
        assert!(
            accounts
                .login(login_request("anna@example.com", "brand new password"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_update_profile_rejects_taken_email() {
        let db = setup_db().await;
        let accounts = AccountService::new(db, 32);
        accounts
            .register(register_request("anna@example.com"))
            .await
            .unwrap();
        let bela = accounts
            .register(register_request("bela@example.com"))
            .await
            .unwrap();

        let err = accounts
            .update_profile(
                bela,
                UpdateProfileRequest {
                    email: Some("anna@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e["email"] == vec![EMAIL_TAKEN.to_string()]));
    }
}
