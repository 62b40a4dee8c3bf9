use serde::{Deserialize, Serialize};

use crate::ListingDto;
use crate::price::format_marker_label;

/// Map pin for a listing with a known location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub listing_id: i32,
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    /// Price in millions, e.g. `"1.2M"`
    pub label: String,
}

/// One marker per listing that has both coordinates, in source order.
pub fn map_markers(listings: &[ListingDto]) -> Vec<MapMarker> {
    listings
        .iter()
        .filter_map(|listing| {
            let (lat, lng) = (listing.lat?, listing.lng?);
            Some(MapMarker {
                listing_id: listing.id,
                lat,
                lng,
                title: listing.title.clone(),
                label: format_marker_label(listing.price),
            })
        })
        .collect()
}
