use axum::{extract::State, response::Json};
use common::{ErrorResponse, ProfileUpdatedResponse, UpdateProfileRequest, UserDto};
use service::{AccountService, to_user_dto};
use tracing::{debug, info, instrument};

use crate::auth::AuthUser;
use crate::error::{ApiJson, ApiResult};
use crate::schemas::AppState;

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    )
)]
#[instrument(skip(auth), fields(user_id = auth.user.id))]
pub async fn get_current_user(auth: AuthUser) -> Json<UserDto> {
    debug!("Returning current user");
    Json(to_user_dto(auth.user))
}

/// Update name, email and/or password of the authenticated user
///
/// Changing the password requires `password_confirmation` and the
/// `current_password`.
#[utoipa::path(
    put,
    path = "/api/user",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileUpdatedResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request), fields(user_id = auth.user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileUpdatedResponse>> {
    let accounts = AccountService::new(state.db.clone(), state.config.token_bytes);
    let user = accounts.update_profile(auth.user, request).await?;
    info!("Profile of user {} updated", user.id);
    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated successfully".to_string(),
        user: to_user_dto(user),
    }))
}
