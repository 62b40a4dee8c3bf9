//! Shared fixtures for the service tests.

use common::{ListingRequest, PropertyType};
use migration::{Migrator, MigratorTrait};
use model::entities::user;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};

/// Fresh in-memory database with every migration applied.
pub async fn setup_db() -> DatabaseConnection {
    init_test_tracing();
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");
    Migrator::up(&db, None).await.expect("Migrations failed");
    db
}

/// Logs to stderr when `RUST_LOG` is set; repeated calls are no-ops.
pub fn init_test_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }
}

pub async fn create_user(db: &DatabaseConnection, name: &str) -> user::Model {
    user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(format!("{}@example.com", name)),
        password_hash: Set("unused".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert user")
}

pub fn listing_request(title: &str) -> ListingRequest {
    ListingRequest {
        title: Some(title.to_string()),
        description: Some("Bright, recently renovated.".to_string()),
        property_type: Some(PropertyType::Condo),
        price: Some(Decimal::new(750_000, 0)),
        area: Some(Decimal::new(1200, 0)),
        bedrooms: Some(2),
        bathrooms: Some(1),
        address: Some("Kossuth Lajos utca 12".to_string()),
        city: Some("Nyíregyháza".to_string()),
        lat: Some(47.956967),
        lng: Some(21.7157),
        phone_number: Some("+36301234567".to_string()),
        email: Some("owner@example.com".to_string()),
        images: vec![
            "https://images.example.com/front.jpg".to_string(),
            "https://images.example.com/kitchen.jpg".to_string(),
        ],
    }
}
