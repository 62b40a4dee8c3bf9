use common::{
    ErrorResponse, LikesCountResponse, ListingDto, ListingRequest, LoginRequest, LoginResponse,
    ProfileUpdatedResponse, PropertyType, RegisterRequest, ToggleLikeResponse,
    UpdateProfileRequest, UserDto,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::config::AppConfig;
use crate::rate_limit::RateLimiter;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    /// Per-caller request windows
    pub rate_limiter: RateLimiter,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::users::get_current_user,
        crate::handlers::users::update_profile,
        crate::handlers::listings::get_listings,
        crate::handlers::listings::get_listing,
        crate::handlers::listings::create_listing,
        crate::handlers::listings::update_listing,
        crate::handlers::listings::delete_listing,
        crate::handlers::likes::toggle_like,
        crate::handlers::likes::get_liked_listings,
        crate::handlers::likes::get_likes_count,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            UserDto,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UpdateProfileRequest,
            ProfileUpdatedResponse,
            PropertyType,
            ListingDto,
            ListingRequest,
            ToggleLikeResponse,
            LikesCountResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and logout"),
        (name = "users", description = "Current user profile"),
        (name = "listings", description = "Property listing endpoints"),
        (name = "likes", description = "Listing likes"),
    ),
    info(
        title = "EstateHub API",
        description = "Real-estate listing marketplace: listings with locations and images, likes and user accounts",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
