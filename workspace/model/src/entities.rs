//! Root of the SeaORM entity modules.
//!
//! Users own listings, and the many-to-many "like" relation between users and
//! listings lives in its own join table. Bearer tokens issued at login are
//! stored (hashed) next to the users they belong to.

pub mod access_token;
pub mod listing;
pub mod listing_like;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::access_token::Entity as AccessToken;
    pub use super::listing::Entity as Listing;
    pub use super::listing_like::Entity as ListingLike;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn insert_user(db: &DatabaseConnection, name: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            name: Set(name.to_string()),
            email: Set(format!("{}@example.com", name.to_lowercase())),
            password_hash: Set("not-a-real-hash".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    async fn insert_listing(
        db: &DatabaseConnection,
        owner: &user::Model,
        title: &str,
    ) -> Result<listing::Model, DbErr> {
        listing::ActiveModel {
            user_id: Set(owner.id),
            title: Set(title.to_string()),
            description: Set(Some("Bright and quiet".to_string())),
            property_type: Set(listing::PropertyType::Condo),
            price: Set(Decimal::new(750_000, 0)),
            area: Set(Decimal::new(1200, 0)),
            bedrooms: Set(Some(2)),
            bathrooms: Set(Some(1)),
            address: Set("12 Main Street".to_string()),
            city: Set("Nyiregyhaza".to_string()),
            lat: Set(Some(47.956967)),
            lng: Set(Some(21.7157)),
            phone_number: Set(Some("+36201234567".to_string())),
            email: Set(None),
            images: Set(listing::ImageList(vec![
                "https://img.example.com/1.jpg".to_string(),
                "https://img.example.com/2.jpg".to_string(),
            ])),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let alice = insert_user(&db, "Alice").await?;
        let bob = insert_user(&db, "Bob").await?;

        let condo = insert_listing(&db, &alice, "Modern Downtown Condo").await?;
        assert!(condo.id > 0);
        assert_eq!(condo.user_id, alice.id);
        assert_eq!(condo.images.0.len(), 2);
        assert_eq!(condo.created_at, condo.updated_at);

        // Read back the listing and check the stored values survive the round trip
        let stored = Listing::find_by_id(condo.id).one(&db).await?.unwrap();
        assert_eq!(stored.title, "Modern Downtown Condo");
        assert_eq!(stored.property_type, listing::PropertyType::Condo);
        assert_eq!(stored.price, Decimal::new(750_000, 0));
        assert_eq!(stored.images.0[0], "https://img.example.com/1.jpg");

        // Bob likes Alice's condo
        listing_like::ActiveModel {
            user_id: Set(bob.id),
            listing_id: Set(condo.id),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&db)
        .await?;

        let likes = condo.find_related(ListingLike).count(&db).await?;
        assert_eq!(likes, 1);

        let owner = stored.find_related(User).one(&db).await?.unwrap();
        assert_eq!(owner.id, alice.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_like_pair_is_unique() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let alice = insert_user(&db, "Alice").await?;
        let condo = insert_listing(&db, &alice, "Modern Downtown Condo").await?;

        let like = listing_like::ActiveModel {
            user_id: Set(alice.id),
            listing_id: Set(condo.id),
            created_at: Set(chrono::Utc::now()),
        };
        like.clone().insert(&db).await?;

        // The same pair cannot be inserted twice
        let duplicate = listing_like::Entity::insert(like).exec(&db).await;
        assert!(duplicate.is_err());

        let count = ListingLike::find()
            .filter(listing_like::Column::ListingId.eq(condo.id))
            .count(&db)
            .await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let alice = insert_user(&db, "Alice").await?;
        let bob = insert_user(&db, "Bob").await?;
        let condo = insert_listing(&db, &alice, "Modern Downtown Condo").await?;

        listing_like::ActiveModel {
            user_id: Set(bob.id),
            listing_id: Set(condo.id),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&db)
        .await?;

        access_token::ActiveModel {
            user_id: Set(alice.id),
            name: Set("api-token".to_string()),
            token_hash: Set("digest".to_string()),
            created_at: Set(chrono::Utc::now()),
            last_used_at: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        User::delete_by_id(alice.id).exec(&db).await?;

        assert_eq!(Listing::find().count(&db).await?, 0);
        assert_eq!(ListingLike::find().count(&db).await?, 0);
        assert_eq!(AccessToken::find().count(&db).await?, 0);
        assert_eq!(User::find().count(&db).await?, 1);

        Ok(())
    }
}
