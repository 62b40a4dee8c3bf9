use axum::{
    extract::State,
    response::Json,
};
use common::{ErrorResponse, LikesCountResponse, ListingDto, ToggleLikeResponse};
use service::{LikeService, to_listing_dto};
use tracing::{debug, instrument};

use crate::auth::AuthUser;
use crate::error::{ApiPath, ApiResult};
use crate::schemas::AppState;

/// Like or unlike a listing
///
/// Flips the caller's like and reports the resulting state.
#[utoipa::path(
    post,
    path = "/api/listings/{listing_id}/like",
    tag = "likes",
    security(("bearer_auth" = [])),
    params(
        ("listing_id" = i32, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Like toggled", body = ToggleLikeResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 404, description = "Listing not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user.id))]
pub async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(listing_id): ApiPath<i32>,
) -> ApiResult<Json<ToggleLikeResponse>> {
    let liked = LikeService::new(state.db.clone())
        .toggle(auth.user.id, listing_id)
        .await?;
    let message = if liked { "Listing liked" } else { "Listing unliked" };
    Ok(Json(ToggleLikeResponse {
        message: message.to_string(),
        listing_id,
        liked,
    }))
}

/// Listings liked by the caller
#[utoipa::path(
    get,
    path = "/api/users/liked-listings",
    tag = "likes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Liked listings, oldest like first", body = Vec<ListingDto>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user.id))]
pub async fn get_liked_listings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ListingDto>>> {
    let listings = LikeService::new(state.db.clone())
        .liked_listings(auth.user.id)
        .await?;
    debug!("User {} likes {} listings", auth.user.id, listings.len());
    Ok(Json(listings.into_iter().map(to_listing_dto).collect()))
}

/// Number of likes of a listing
#[utoipa::path(
    get,
    path = "/api/listings/{listing_id}/likes-count",
    tag = "likes",
    security(("bearer_auth" = [])),
    params(
        ("listing_id" = i32, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Like count", body = LikesCountResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 404, description = "Listing not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _auth))]
pub async fn get_likes_count(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(listing_id): ApiPath<i32>,
) -> ApiResult<Json<LikesCountResponse>> {
    let likes = LikeService::new(state.db.clone()).count(listing_id).await?;
    Ok(Json(LikesCountResponse { listing_id, likes }))
}
