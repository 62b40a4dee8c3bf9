use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250604_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(pk_auto(Listings::Id))
                    .col(integer(Listings::UserId))
                    .col(string_len(Listings::Title, 255))
                    .col(text_null(Listings::Description))
                    .col(string_len(Listings::PropertyType, 20))
                    .col(decimal_len(Listings::Price, 14, 2))
                    .col(decimal_len(Listings::Area, 10, 2))
                    .col(integer_null(Listings::Bedrooms))
                    .col(integer_null(Listings::Bathrooms))
                    .col(string_len(Listings::Address, 255))
                    .col(string_len(Listings::City, 255))
                    .col(double_null(Listings::Lat))
                    .col(double_null(Listings::Lng))
                    .col(string_len_null(Listings::PhoneNumber, 20))
                    .col(string_len_null(Listings::Email, 255))
                    .col(json(Listings::Images))
                    .col(timestamp_with_time_zone(Listings::CreatedAt))
                    .col(timestamp_with_time_zone(Listings::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listings_user")
                            .from(Listings::Table, Listings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listings_user_id")
                    .table(Listings::Table)
                    .col(Listings::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Listings {
    Table,
    Id,
    UserId,
    Title,
    Description,
    PropertyType,
    Price,
    Area,
    Bedrooms,
    Bathrooms,
    Address,
    City,
    Lat,
    Lng,
    PhoneNumber,
    Email,
    Images,
    CreatedAt,
    UpdatedAt,
}
