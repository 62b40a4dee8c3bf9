use common::{ListingDto, ListingRequest, PropertyType};
use model::entities::listing::{self, ImageList};
use model::entities::listing_like;
use model::entities::prelude::{Listing, ListingLike};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError};

/// CRUD over listings, with the owner check on every mutation.
#[derive(Debug, Clone)]
pub struct ListingService {
    db: DatabaseConnection,
}

impl ListingService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All listings in creation order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<listing::Model>> {
        let listings = Listing::find()
            .order_by_asc(listing::Column::Id)
            .all(&self.db)
            .await?;
        debug!("Fetched {} listings", listings.len());
        Ok(listings)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<listing::Model> {
        Listing::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "Listing",
                id,
            })
    }

    /// Creates a listing owned by `owner_id`. The owner always comes from the
    /// authenticated caller, never from the request body.
    #[instrument(skip(self, request), fields(title = ?request.title))]
    pub async fn create(&self, owner_id: i32, request: ListingRequest) -> Result<listing::Model> {
        request.validate_listing().map_err(ServiceError::Validation)?;

        let mut active = listing::ActiveModel {
            user_id: Set(owner_id),
            ..Default::default()
        };
        apply_request(&mut active, request)?;

        let created = active.insert(&self.db).await?;
        info!(listing_id = created.id, owner_id, "Listing created");
        Ok(created)
    }

    /// Full replacement of a listing's fields. Ownership is checked before the
    /// body, and nothing is written unless both pass.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        acting_user_id: i32,
        id: i32,
        request: ListingRequest,
    ) -> Result<listing::Model> {
        let existing = self.get(id).await?;
        ensure_owner(&existing, acting_user_id)?;

        request.validate_listing().map_err(ServiceError::Validation)?;

        let mut active: listing::ActiveModel = existing.into();
        apply_request(&mut active, request)?;

        let updated = active.update(&self.db).await?;
        info!(listing_id = id, "Listing updated");
        Ok(updated)
    }

    /// Deletes a listing and its likes. Returns `false` when there was
    /// nothing to delete.
    #[instrument(skip(self))]
    pub async fn delete(&self, acting_user_id: i32, id: i32) -> Result<bool> {
        let Some(existing) = Listing::find_by_id(id).one(&self.db).await? else {
            debug!(listing_id = id, "Listing already absent, nothing to delete");
            return Ok(false);
        };
        ensure_owner(&existing, acting_user_id)?;

        let txn = self.db.begin().await?;
        let likes = ListingLike::delete_many()
            .filter(listing_like::Column::ListingId.eq(id))
            .exec(&txn)
            .await?;
        Listing::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(
            listing_id = id,
            removed_likes = likes.rows_affected,
            "Listing deleted"
        );
        Ok(true)
    }
}

fn ensure_owner(listing: &listing::Model, acting_user_id: i32) -> Result<()> {
    if listing.user_id != acting_user_id {
        warn!(
            listing_id = listing.id,
            owner_id = listing.user_id,
            acting_user_id,
            "Rejected change to a listing owned by another user"
        );
        return Err(ServiceError::Unauthorized(
            "You do not own this listing.".to_string(),
        ));
    }
    Ok(())
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| ServiceError::validation(field, format!("The {} field is required.", field)))
}

/// Copies a validated request onto the active model.
fn apply_request(active: &mut listing::ActiveModel, request: ListingRequest) -> Result<()> {
    active.title = Set(required(request.title, "title")?);
    active.description = Set(request.description);
    active.property_type = Set(to_model_type(required(request.property_type, "type")?));
    active.price = Set(required(request.price, "price")?);
    active.area = Set(required(request.area, "area")?);
    active.bedrooms = Set(request.bedrooms);
    active.bathrooms = Set(request.bathrooms);
    active.address = Set(required(request.address, "address")?);
    active.city = Set(required(request.city, "city")?);
    active.lat = Set(request.lat);
    active.lng = Set(request.lng);
    active.phone_number = Set(request.phone_number);
    active.email = Set(request.email);
    active.images = Set(ImageList(request.images));
    Ok(())
}

fn to_model_type(property_type: PropertyType) -> listing::PropertyType {
    match property_type {
        PropertyType::House => listing::PropertyType::House,
        PropertyType::Condo => listing::PropertyType::Condo,
        PropertyType::Apartment => listing::PropertyType::Apartment,
        PropertyType::Townhouse => listing::PropertyType::Townhouse,
        PropertyType::Studio => listing::PropertyType::Studio,
    }
}

fn from_model_type(property_type: listing::PropertyType) -> PropertyType {
    match property_type {
        listing::PropertyType::House => PropertyType::House,
        listing::PropertyType::Condo => PropertyType::Condo,
        listing::PropertyType::Apartment => PropertyType::Apartment,
        listing::PropertyType::Townhouse => PropertyType::Townhouse,
        listing::PropertyType::Studio => PropertyType::Studio,
    }
}

/// Transport shape of a stored listing.
pub fn to_listing_dto(model: listing::Model) -> ListingDto {
    ListingDto {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        description: model.description,
        property_type: from_model_type(model.property_type),
        price: model.price,
        area: model.area,
        bedrooms: model.bedrooms,
        bathrooms: model.bathrooms,
        address: model.address,
        city: model.city,
        lat: model.lat,
        lng: model.lng,
        phone_number: model.phone_number,
        email: model.email,
        images: model.images.0,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{create_user, listing_request, setup_db};
    use rust_decimal::Decimal;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_create_then_get_round_trips_fields() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner").await;
        let service = ListingService::new(db.clone());

        let request = listing_request("Modern Downtown Condo");
        let created = service.create(owner.id, request.clone()).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.user_id, owner.id);
        assert_eq!(ListingRequest::from(&to_listing_dto(fetched)), request);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let db = setup_db().await;
        let service = ListingService::new(db);
        let err = service.get(42).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { id: 42, .. }));
    }

    #[tokio::test]
    async fn test_list_is_in_creation_order() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner").await;
        let service = ListingService::new(db);

        for title in ["First", "Second", "Third"] {
            service.create(owner.id, listing_request(title)).await.unwrap();
        }
        let titles: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_without_writing() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner").await;
        let service = ListingService::new(db.clone());

        let mut request = listing_request("Too many pictures");
        request.images = (0..11).map(|i| format!("{i}.jpg")).collect();
        let err = service.create(owner.id, request).await.unwrap_err();
        match err {
            ServiceError::Validation(errors) => assert!(errors.contains_key("images")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(Listing::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_title_leaves_row_unchanged() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner").await;
        let service = ListingService::new(db);
        let created = service
            .create(owner.id, listing_request("Original"))
            .await
            .unwrap();

        let mut request = listing_request("ignored");
        request.title = None;
        request.price = Some(Decimal::new(1, 0));
        let err = service.update(owner.id, created.id, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.contains_key("title")));

        let stored = service.get(created.id).await.unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_update_replaces_fields_for_owner() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner").await;
        let service = ListingService::new(db);
        let created = service
            .create(owner.id, listing_request("Original"))
            .await
            .unwrap();

        let mut request = listing_request("Renamed");
        request.description = None;
        request.lat = None;
        request.lng = None;
        let updated = service.update(owner.id, created.id, request).await.unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.description, None);
        assert_eq!(updated.lat, None);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_require_ownership() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner").await;
        let intruder = create_user(&db, "intruder").await;
        let service = ListingService::new(db);
        let created = service
            .create(owner.id, listing_request("Mine"))
            .await
            .unwrap();

        let err = service
            .update(intruder.id, created.id, listing_request("Theirs"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let invalid = ListingRequest {
            title: None,
            ..listing_request("Theirs")
        };
        let err = service
            .update(intruder.id, created.id, invalid)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let err = service.delete(intruder.id, created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        assert_eq!(service.get(created.id).await.unwrap().title, "Mine");
    }

    #[tokio::test]
    async fn test_update_missing_listing_is_not_found() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner").await;
        let service = ListingService::new(db);
        let err = service
            .update(owner.id, 99, listing_request("Ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { id: 99, .. }));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_removes_likes() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner").await;
        let fan = create_user(&db, "fan").await;
        let service = ListingService::new(db.clone());
        let likes = crate::like::LikeService::new(db.clone());

        let created = service
            .create(owner.id, listing_request("Short lived"))
            .await
            .unwrap();
        assert!(likes.toggle(fan.id, created.id).await.unwrap());

        assert!(service.delete(owner.id, created.id).await.unwrap());
        assert_eq!(ListingLike::find().count(&db).await.unwrap(), 0);
        assert!(!service.delete(owner.id, created.id).await.unwrap());
        assert!(!service.delete(owner.id, 12345).await.unwrap());
    }
}
