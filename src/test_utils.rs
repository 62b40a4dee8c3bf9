use crate::config::AppConfig;
use crate::router::create_router;
use crate::schemas::AppState;
use axum::Router;
use axum::http::StatusCode;
use axum_test::TestServer;
use common::{LoginResponse, RegisterRequest};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use serde_json::{Value, json};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Create an in-memory SQLite database for testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    // Run migrations
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create AppState for testing
pub async fn setup_test_app_state() -> AppState {
    setup_test_app_state_with_config(AppConfig::default()).await
}

pub async fn setup_test_app_state_with_config(config: AppConfig) -> AppState {
    let db = setup_test_db().await;
    AppState::new(db, config)
}

/// Initialize tracing for tests with output to STDERR.
///
/// The log level is taken from RUST_LOG, defaulting to WARN.
fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Create axum app for testing
pub async fn setup_test_app() -> Router {
    let _guard = init_test_tracing();
    create_router(setup_test_app_state().await)
}

pub async fn setup_test_server() -> TestServer {
    TestServer::new(setup_test_app().await).unwrap()
}

pub fn register_request(name: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        password_confirmation: "password123".to_string(),
    }
}

/// Registers and logs in a user, returning the bearer token and user ID.
pub async fn register_and_login(server: &TestServer, name: &str, email: &str) -> (String, i64) {
    server
        .post("/api/register")
        .json(&register_request(name, email))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/login")
        .json(&json!({ "email": email, "password": "password123" }))
        .await;
    response.assert_status_ok();
    let body: LoginResponse = response.json();
    (body.token, body.user.id as i64)
}

/// A complete, valid listing body in wire format.
pub fn listing_body(title: &str, property_type: &str, price: i64, area: i64) -> Value {
    json!({
        "title": title,
        "description": "Close to the city centre.",
        "type": property_type,
        "price": price.to_string(),
        "area": area.to_string(),
        "bedrooms": 2,
        "bathrooms": 1,
        "address": "Kossuth Lajos utca 12",
        "city": "Nyíregyháza",
        "lat": 47.956967,
        "lng": 21.7157,
        "phoneNumber": "+36301234567",
        "email": "owner@example.com",
        "images": ["https://images.example.com/front.jpg"]
    })
}
