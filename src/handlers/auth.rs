use axum::{extract::State, http::StatusCode, response::Json};
use common::{ErrorResponse, LoginRequest, LoginResponse, RegisterRequest, UserDto};
use service::{AccountService, to_user_dto};
use tracing::{debug, info, instrument, trace};

use crate::auth::AuthUser;
use crate::error::{ApiJson, ApiResult};
use crate::schemas::AppState;

fn accounts(state: &AppState) -> AccountService {
    AccountService::new(state.db.clone(), state.config.token_bytes)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserDto),
        (status = 422, description = "Validation failed, e.g. email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserDto>)> {
    trace!("Entering register function");
    let user = accounts(&state).register(request).await?;
    info!("User registered with ID: {}", user.id);
    Ok((StatusCode::CREATED, Json(to_user_dto(user))))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid login credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    trace!("Entering login function");
    let (token, user) = accounts(&state).login(request).await?;
    debug!("Issued token for user ID: {}", user.id);
    Ok(Json(LoginResponse {
        token,
        user: to_user_dto(user),
    }))
}

/// Revoke the presented token
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user.id))]
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> ApiResult<StatusCode> {
    accounts(&state).logout(auth.token_id).await?;
    info!("User {} logged out", auth.user.id);
    Ok(StatusCode::NO_CONTENT)
}
