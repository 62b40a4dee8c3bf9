use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250604_000001_create_users_table::Users;
use crate::m20250604_000002_create_listings_table::Listings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Join table; the composite primary key keeps (user, listing) unique
        manager
            .create_table(
                Table::create()
                    .table(ListingLikes::Table)
                    .if_not_exists()
                    .col(integer(ListingLikes::UserId))
                    .col(integer(ListingLikes::ListingId))
                    .col(timestamp_with_time_zone(ListingLikes::CreatedAt))
                    .primary_key(
                        Index::create()
                            .name("pk_listing_likes")
                            .col(ListingLikes::UserId)
                            .col(ListingLikes::ListingId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_likes_user")
                            .from(ListingLikes::Table, ListingLikes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_likes_listing")
                            .from(ListingLikes::Table, ListingLikes::ListingId)
                            .to(Listings::Table, Listings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listing_likes_listing_id")
                    .table(ListingLikes::Table)
                    .col(ListingLikes::ListingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListingLikes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ListingLikes {
    Table,
    UserId,
    ListingId,
    CreatedAt,
}
