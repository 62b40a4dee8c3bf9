use common::{LikesCountResponse, ListingDto, ToggleLikeResponse};

use crate::api_client::{self, ApiResult};
use crate::session::Session;

/// Flip the like of the signed-in user
pub async fn toggle_like(session: &Session, listing_id: i32) -> ApiResult<ToggleLikeResponse> {
    log::debug!("Toggling like on listing {}", listing_id);
    let result: ApiResult<ToggleLikeResponse> =
        api_client::post_empty(&format!("/listings/{}/like", listing_id), session).await;
    if let Ok(response) = &result {
        log::info!("{} (listing {})", response.message, response.listing_id);
    }
    result
}

pub async fn liked_listings(session: &Session) -> ApiResult<Vec<ListingDto>> {
    log::trace!("Fetching liked listings");
    api_client::get("/users/liked-listings", Some(session)).await
}

pub async fn likes_count(session: &Session, listing_id: i32) -> ApiResult<u64> {
    let response: LikesCountResponse =
        api_client::get(&format!("/listings/{}/likes-count", listing_id), Some(session)).await?;
    Ok(response.likes)
}
