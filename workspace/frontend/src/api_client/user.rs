use common::{ProfileUpdatedResponse, UpdateProfileRequest, UserDto};

use crate::api_client::{self, ApiResult};
use crate::session::Session;

/// Fetch the signed-in user
pub async fn current_user(session: &Session) -> ApiResult<UserDto> {
    log::trace!("Fetching current user");
    api_client::get("/user", Some(session)).await
}

/// Partial profile update; only the fields that are set are sent
pub async fn update_profile(
    session: &Session,
    request: &UpdateProfileRequest,
) -> ApiResult<ProfileUpdatedResponse> {
    log::debug!("Updating profile of user {}", session.user.id);
    let result = api_client::patch("/user", session, request).await;
    if let Err(e) = &result {
        log::error!("Profile update failed: {}", e);
    }
    result
}
