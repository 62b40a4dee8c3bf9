use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, FromJsonQueryResult, Set};
use serde::{Deserialize, Serialize};

/// Kind of property offered by a listing.
///
/// The "all types" choice of the browse filter is not a property type and is
/// never stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PropertyType {
    #[sea_orm(string_value = "house")]
    House,
    #[sea_orm(string_value = "condo")]
    Condo,
    #[sea_orm(string_value = "apartment")]
    Apartment,
    #[sea_orm(string_value = "townhouse")]
    Townhouse,
    #[sea_orm(string_value = "studio")]
    Studio,
}

/// Ordered image references of a listing, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ImageList(pub Vec<String>);

/// A property offered for sale or rent.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The user who created the listing. Only this user may change it.
    pub user_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub property_type: PropertyType,
    /// Raw currency units. Display code converts to millions.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub area: Decimal,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub address: String,
    pub city: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub images: ImageList,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A listing belongs to exactly one owner.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::listing_like::Entity")]
    ListingLike,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::listing_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ListingLike.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
