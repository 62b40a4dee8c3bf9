//! Browse-view filter engine.
//!
//! Pure and synchronous: the client re-runs [`filter_listings`] over the full
//! in-memory listing set whenever any criteria field changes.

use rust_decimal::Decimal;

use crate::{ListingDto, PropertyTypeFilter};

/// Constraints narrowing the visible listing set. Unset bounds are unbounded.
/// Price bounds are raw currency units, like [`ListingDto::price`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub query: String,
    pub property_type: PropertyTypeFilter,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_bedrooms: u32,
    pub min_bathrooms: u32,
    pub min_area: Option<Decimal>,
    pub max_area: Option<Decimal>,
}

impl FilterCriteria {
    /// True when every predicate accepts the listing.
    pub fn matches(&self, listing: &ListingDto) -> bool {
        self.matches_query(listing)
            && self.property_type.matches(listing.property_type)
            && within(listing.price, self.min_price, self.max_price)
            && count_at_least(listing.bedrooms, self.min_bedrooms)
            && count_at_least(listing.bathrooms, self.min_bathrooms)
            && within(listing.area, self.min_area, self.max_area)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn matches_query(&self, listing: &ListingDto) -> bool {
        let query = self.query.trim();
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        listing.title.to_lowercase().contains(&needle)
            || listing.address.to_lowercase().contains(&needle)
    }
}

fn within(value: Decimal, min: Option<Decimal>, max: Option<Decimal>) -> bool {
    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

// Missing counts count as zero.
fn count_at_least(value: Option<i32>, min: u32) -> bool {
    i64::from(value.unwrap_or(0)) >= i64::from(min)
}

/// Listings accepted by `criteria`, in source order.
pub fn filter_listings(listings: &[ListingDto], criteria: &FilterCriteria) -> Vec<ListingDto> {
    listings
        .iter()
        .filter(|listing| criteria.matches(listing))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropertyType;
    use chrono::Utc;

    fn listing(
        id: i32,
        title: &str,
        property_type: PropertyType,
        price: i64,
        bedrooms: Option<i32>,
        area: i64,
    ) -> ListingDto {
        let now = Utc::now();
        ListingDto {
            id,
            user_id: 1,
            title: title.to_string(),
            description: None,
            property_type,
            price: Decimal::new(price, 0),
            area: Decimal::new(area, 0),
            bedrooms,
            bathrooms: None,
            address: format!("{} Main Street", id),
            city: "Nyíregyháza".to_string(),
            lat: None,
            lng: None,
            phone_number: None,
            email: None,
            images: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn sample() -> Vec<ListingDto> {
        vec![
            listing(1, "Modern Downtown Condo", PropertyType::Condo, 750_000, Some(2), 1200),
            listing(2, "Luxury Family House", PropertyType::House, 1_200_000, Some(4), 2500),
        ]
    }

    fn ids(listings: &[ListingDto]) -> Vec<i32> {
        listings.iter().map(|l| l.id).collect()
    }

    #[test]
    fn default_criteria_pass_everything() {
        let listings = sample();
        assert_eq!(filter_listings(&listings, &FilterCriteria::default()), listings);
    }

    #[test]
    fn filters_by_property_type() {
        let criteria = FilterCriteria {
            property_type: "Condo".parse().unwrap(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_listings(&sample(), &criteria)), vec![1]);
    }

    #[test]
    fn filters_by_min_price() {
        let criteria = FilterCriteria {
            min_price: Some(Decimal::new(800_000, 0)),
            ..Default::default()
        };
        assert_eq!(ids(&filter_listings(&sample(), &criteria)), vec![2]);
    }

    #[test]
    fn price_and_area_bounds_are_inclusive() {
        let criteria = FilterCriteria {
            min_price: Some(Decimal::new(750_000, 0)),
            max_price: Some(Decimal::new(1_200_000, 0)),
            min_area: Some(Decimal::new(1200, 0)),
            max_area: Some(Decimal::new(2500, 0)),
            ..Default::default()
        };
        assert_eq!(ids(&filter_listings(&sample(), &criteria)), vec![1, 2]);

        let criteria = FilterCriteria {
            max_area: Some(Decimal::new(1199, 0)),
            ..Default::default()
        };
        assert!(filter_listings(&sample(), &criteria).is_empty());
    }

    #[test]
    fn query_matches_title_or_address_case_insensitively() {
        let by_title = FilterCriteria {
            query: "downtown".into(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_listings(&sample(), &by_title)), vec![1]);

        let by_address = FilterCriteria {
            query: "2 MAIN".into(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_listings(&sample(), &by_address)), vec![2]);
    }

    #[test]
    fn missing_room_counts_are_zero() {
        let mut listings = sample();
        listings.push(listing(3, "Tiny Studio", PropertyType::Studio, 90_000, None, 25));

        let any = FilterCriteria::default();
        assert_eq!(ids(&filter_listings(&listings, &any)), vec![1, 2, 3]);

        let one_bedroom = FilterCriteria {
            min_bedrooms: 1,
            ..Default::default()
        };
        assert_eq!(ids(&filter_listings(&listings, &one_bedroom)), vec![1, 2]);

        let one_bathroom = FilterCriteria {
            min_bathrooms: 1,
            ..Default::default()
        };
        assert!(filter_listings(&listings, &one_bathroom).is_empty());
    }

    #[test]
    fn filtering_is_idempotent_and_stable() {
        let mut listings = sample();
        listings.push(listing(3, "Downtown Loft", PropertyType::Apartment, 500_000, Some(1), 60));
        listings.push(listing(4, "Quiet Condo", PropertyType::Condo, 650_000, Some(2), 80));

        let criteria = FilterCriteria {
            max_price: Some(Decimal::new(800_000, 0)),
            ..Default::default()
        };
        let once = filter_listings(&listings, &criteria);
        let twice = filter_listings(&once, &criteria);
        assert_eq!(ids(&once), vec![1, 3, 4]);
        assert_eq!(once, twice);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut criteria = FilterCriteria {
            query: "condo".into(),
            min_bedrooms: 3,
            ..Default::default()
        };
        assert!(!criteria.is_empty());
        criteria.reset();
        assert!(criteria.is_empty());
    }
}
