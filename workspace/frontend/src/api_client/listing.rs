use common::{ListingDto, ListingRequest};

use crate::api_client::{self, ApiResult};
use crate::session::Session;

/// Get all listings
pub async fn get_listings() -> ApiResult<Vec<ListingDto>> {
    log::trace!("Fetching all listings");
    let result: ApiResult<Vec<ListingDto>> = api_client::get("/listings", None).await;
    match &result {
        Ok(listings) => log::info!("Fetched {} listings", listings.len()),
        Err(e) => log::error!("Failed to fetch listings: {}", e),
    }
    result
}

/// Get a specific listing by ID
pub async fn get_listing(listing_id: i32) -> ApiResult<ListingDto> {
    log::trace!("Fetching listing with ID: {}", listing_id);
    let result: ApiResult<ListingDto> = api_client::get(&format!("/listings/{}", listing_id), None).await;
    match &result {
        Ok(listing) => log::info!("Fetched listing: {} (ID: {})", listing.title, listing.id),
        Err(e) => log::error!("Failed to fetch listing {}: {}", listing_id, e),
    }
    result
}

/// Create a listing owned by the signed-in user
pub async fn create_listing(session: &Session, request: &ListingRequest) -> ApiResult<ListingDto> {
    log::debug!("Creating listing: {:?}", request.title);
    let result: ApiResult<ListingDto> = api_client::post("/listings", Some(session), request).await;
    match &result {
        Ok(listing) => log::info!("Created listing: {} (ID: {})", listing.title, listing.id),
        Err(e) => log::error!("Failed to create listing: {}", e),
    }
    result
}

/// Replace every field of a listing
pub async fn update_listing(
    session: &Session,
    listing_id: i32,
    request: &ListingRequest,
) -> ApiResult<ListingDto> {
    log::debug!("Updating listing {}", listing_id);
    api_client::put(&format!("/listings/{}", listing_id), session, request).await
}

pub async fn delete_listing(session: &Session, listing_id: i32) -> ApiResult<()> {
    log::debug!("Deleting listing {}", listing_id);
    api_client::delete(&format!("/listings/{}", listing_id), session).await
}
