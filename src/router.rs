use crate::handlers::{
    auth::{login, logout, register},
    health::health_check,
    likes::{get_liked_listings, get_likes_count, toggle_like},
    listings::{create_listing, delete_listing, get_listing, get_listings, update_listing},
    users::{get_current_user, update_profile},
};
use crate::rate_limit::rate_limit;
use crate::schemas::{ApiDoc, AppState};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Routes under `/api`, all behind the rate limiter.
fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/user", get(get_current_user).put(update_profile).patch(update_profile))
        // Listings
        .route("/listings", get(get_listings).post(create_listing))
        .route(
            "/listings/:listing_id",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
        // Likes
        .route("/listings/:listing_id/like", post(toggle_like))
        .route("/listings/:listing_id/likes-count", get(get_likes_count))
        .route("/users/liked-listings", get(get_liked_listings))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    match state.config.cors_allowed_origin.as_deref() {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(origin) => CorsLayer::very_permissive().allow_origin(origin),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                CorsLayer::permissive()
            }
        },
        None => CorsLayer::permissive(),
    }
}

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest("/api", api_routes(&state))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // The Prometheus recorder is process-global, so it is only installed
    // outside of tests where many routers are built.
    #[cfg(not(test))]
    let router = {
        let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();
        router
            .route("/metrics", get(move || async move { metric_handle.render() }))
            .layer(prometheus_layer)
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout))
                .layer(cors_layer(&state)),
        )
        .with_state(state)
}
