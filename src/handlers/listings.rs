use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use common::{ErrorResponse, ListingDto, ListingRequest};
use service::{ListingService, to_listing_dto};
use tracing::{debug, info, instrument, trace};

use crate::auth::AuthUser;
use crate::error::{ApiJson, ApiPath, ApiResult};
use crate::schemas::AppState;

/// Get all listings
#[utoipa::path(
    get,
    path = "/api/listings",
    tag = "listings",
    responses(
        (status = 200, description = "All listings in creation order", body = Vec<ListingDto>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_listings(State(state): State<AppState>) -> ApiResult<Json<Vec<ListingDto>>> {
    trace!("Entering get_listings function");
    let listings = ListingService::new(state.db.clone()).list().await?;
    debug!("Returning {} listings", listings.len());
    Ok(Json(listings.into_iter().map(to_listing_dto).collect()))
}

/// Get a listing by ID
#[utoipa::path(
    get,
    path = "/api/listings/{listing_id}",
    tag = "listings",
    params(
        ("listing_id" = i32, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Listing found", body = ListingDto),
        (status = 404, description = "Listing not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_listing(
    State(state): State<AppState>,
    ApiPath(listing_id): ApiPath<i32>,
) -> ApiResult<Json<ListingDto>> {
    let listing = ListingService::new(state.db.clone()).get(listing_id).await?;
    Ok(Json(to_listing_dto(listing)))
}

/// Create a listing owned by the caller
#[utoipa::path(
    post,
    path = "/api/listings",
    tag = "listings",
    security(("bearer_auth" = [])),
    request_body = ListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ListingDto),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request), fields(user_id = auth.user.id))]
pub async fn create_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<ListingRequest>,
) -> ApiResult<(StatusCode, Json<ListingDto>)> {
    let listing = ListingService::new(state.db.clone())
        .create(auth.user.id, request)
        .await?;
    info!("Listing created with ID: {}", listing.id);
    Ok((StatusCode::CREATED, Json(to_listing_dto(listing))))
}

/// Replace every field of a listing owned by the caller
#[utoipa::path(
    put,
    path = "/api/listings/{listing_id}",
    tag = "listings",
    security(("bearer_auth" = [])),
    params(
        ("listing_id" = i32, Path, description = "Listing ID")
    ),
    request_body = ListingRequest,
    responses(
        (status = 200, description = "Listing updated", body = ListingDto),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Listing belongs to another user", body = ErrorResponse),
        (status = 404, description = "Listing not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request), fields(user_id = auth.user.id))]
pub async fn update_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(listing_id): ApiPath<i32>,
    ApiJson(request): ApiJson<ListingRequest>,
) -> ApiResult<Json<ListingDto>> {
    let listing = ListingService::new(state.db.clone())
        .update(auth.user.id, listing_id, request)
        .await?;
    info!("Listing {} updated", listing.id);
    Ok(Json(to_listing_dto(listing)))
}

/// Delete a listing owned by the caller
///
/// Deleting an unknown ID succeeds without effect.
#[utoipa::path(
    delete,
    path = "/api/listings/{listing_id}",
    tag = "listings",
    security(("bearer_auth" = [])),
    params(
        ("listing_id" = i32, Path, description = "Listing ID")
    ),
    responses(
        (status = 204, description = "Listing deleted or already absent"),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Listing belongs to another user", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user.id))]
pub async fn delete_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(listing_id): ApiPath<i32>,
) -> ApiResult<StatusCode> {
    let deleted = ListingService::new(state.db.clone())
        .delete(auth.user.id, listing_id)
        .await?;
    if deleted {
        info!("Listing {} deleted", listing_id);
    } else {
        debug!("Listing {} did not exist", listing_id);
    }
    Ok(StatusCode::NO_CONTENT)
}
