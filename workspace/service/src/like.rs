use chrono::Utc;
use model::entities::prelude::{Listing, ListingLike};
use model::entities::{listing, listing_like};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError};

const MAX_TOGGLE_ATTEMPTS: u32 = 3;

/// The user ↔ listing "like" set.
#[derive(Debug, Clone)]
pub struct LikeService {
    db: DatabaseConnection,
}

impl LikeService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Flips the like between `user_id` and `listing_id` and returns the new
    /// membership (`true` = now liked).
    ///
    /// The branch is decided by the write itself: a delete that removes the
    /// row means "unliked", otherwise an `ON CONFLICT DO NOTHING` insert that
    /// adds it means "liked". When a concurrent toggle wins in between, the
    /// two steps are retried, so every call performs exactly one mutation.
    #[instrument(skip(self))]
    pub async fn toggle(&self, user_id: i32, listing_id: i32) -> Result<bool> {
        self.ensure_listing(listing_id).await?;

        for attempt in 1..=MAX_TOGGLE_ATTEMPTS {
            if self.unlike(user_id, listing_id).await? {
                info!(user_id, listing_id, "Listing unliked");
                return Ok(false);
            }
            if self.like(user_id, listing_id).await? {
                info!(user_id, listing_id, "Listing liked");
                return Ok(true);
            }
            warn!(user_id, listing_id, attempt, "Toggle raced with another toggle, retrying");
        }

        Err(ServiceError::Conflict(format!(
            "like of listing {} by user {} kept changing",
            listing_id, user_id
        )))
    }

    /// Listings liked by `user_id`, oldest like first.
    #[instrument(skip(self))]
    pub async fn liked_listings(&self, user_id: i32) -> Result<Vec<listing::Model>> {
        let listings = Listing::find()
            .join(JoinType::InnerJoin, listing::Relation::ListingLike.def())
            .filter(listing_like::Column::UserId.eq(user_id))
            .order_by_asc(listing_like::Column::CreatedAt)
            .order_by_asc(listing::Column::Id)
            .all(&self.db)
            .await?;
        debug!("User {} likes {} listings", user_id, listings.len());
        Ok(listings)
    }

    #[instrument(skip(self))]
    pub async fn count(&self, listing_id: i32) -> Result<u64> {
        self.ensure_listing(listing_id).await?;
        let likes = ListingLike::find()
            .filter(listing_like::Column::ListingId.eq(listing_id))
            .count(&self.db)
            .await?;
        Ok(likes)
    }

    async fn ensure_listing(&self, listing_id: i32) -> Result<()> {
        match Listing::find_by_id(listing_id).one(&self.db).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound {
                entity: "Listing",
                id: listing_id,
            }),
        }
    }

    /// Removes the like; `true` when this call deleted the row.
    async fn unlike(&self, user_id: i32, listing_id: i32) -> Result<bool> {
        let res = ListingLike::delete_by_id((user_id, listing_id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected == 1)
    }

    /// Adds the like; `true` when this call inserted the row.
    async fn like(&self, user_id: i32, listing_id: i32) -> Result<bool> {
        let like = listing_like::ActiveModel {
            user_id: Set(user_id),
            listing_id: Set(listing_id),
            created_at: Set(Utc::now()),
        };
        let inserted = ListingLike::insert(like)
            .on_conflict(
                OnConflict::columns([
                    listing_like::Column::UserId,
                    listing_like::Column::ListingId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        match inserted {
            Ok(rows) => Ok(rows > 0),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }
}
