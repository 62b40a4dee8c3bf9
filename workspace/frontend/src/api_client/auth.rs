use common::{LoginRequest, LoginResponse, RegisterRequest, UserDto};

use crate::api_client::{self, ApiResult};
use crate::session::Session;

/// Create an account. The caller still has to log in afterwards.
pub async fn register(request: &RegisterRequest) -> ApiResult<UserDto> {
    log::debug!("Registering user: {}", request.email);
    let result: ApiResult<UserDto> = api_client::post("/register", None, request).await;
    match &result {
        Ok(user) => log::info!("Registered user {} (ID: {})", user.email, user.id),
        Err(e) => log::error!("Registration failed for '{}': {}", request.email, e),
    }
    result
}

/// Exchange credentials for a session
pub async fn login(email: &str, password: &str) -> ApiResult<Session> {
    log::debug!("Logging in: {}", email);
    let request = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };
    let response: LoginResponse = api_client::post("/login", None, &request).await?;
    Ok(Session::from(response))
}

/// Revoke the session's token on the server
pub async fn logout(session: &Session) -> ApiResult<()> {
    log::debug!("Logging out user {}", session.user.id);
    api_client::post_no_content("/logout", session).await
}
