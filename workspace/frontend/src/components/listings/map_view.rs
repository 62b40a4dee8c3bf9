use common::{ListingDto, MapMarker, map_markers};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;
use crate::settings;

/// A marker placed in the map box, offsets in percent from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlacedMarker {
    pub marker: MapMarker,
    pub left: f64,
    pub top: f64,
}

const PADDING: f64 = 8.0;

/// Fits the markers' bounding box into the map box. A single marker, or
/// markers sharing a coordinate, sit in the middle.
pub(crate) fn place_markers(markers: Vec<MapMarker>) -> Vec<PlacedMarker> {
    let (mut min_lat, mut max_lat) = (f64::MAX, f64::MIN);
    let (mut min_lng, mut max_lng) = (f64::MAX, f64::MIN);
    for m in &markers {
        min_lat = min_lat.min(m.lat);
        max_lat = max_lat.max(m.lat);
        min_lng = min_lng.min(m.lng);
        max_lng = max_lng.max(m.lng);
    }

    let scale = |value: f64, min: f64, max: f64| {
        if max - min < f64::EPSILON {
            50.0
        } else {
            PADDING + (value - min) / (max - min) * (100.0 - 2.0 * PADDING)
        }
    };

    markers
        .into_iter()
        .map(|marker| PlacedMarker {
            left: scale(marker.lng, min_lng, max_lng),
            // north is up
            top: 100.0 - scale(marker.lat, min_lat, max_lat),
            marker,
        })
        .collect()
}

fn osm_url(lat: f64, lng: f64, zoom: u8) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map={zoom}/{lat}/{lng}"
    )
}

#[derive(Properties, PartialEq)]
pub struct MapViewProps {
    pub listings: Vec<ListingDto>,
}

#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let app_settings = settings::get_settings();
    let placed = place_markers(map_markers(&props.listings));
    let missing = props.listings.len() - placed.len();

    let (center_lat, center_lng) = app_settings.map_center;

    html! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <div class="relative w-full h-96 rounded-box bg-base-200 overflow-hidden border border-base-300">
                    {if placed.is_empty() {
                        html! {
                            <div class="absolute inset-0 flex flex-col items-center justify-center gap-2 text-gray-500">
                                <i class="fas fa-map text-4xl"></i>
                                <span>{"No listing with a location matches the filters."}</span>
                            </div>
                        }
                    } else {
                        html! {}
                    }}
                    {for placed.iter().map(|p| html! {
                        <div
                            key={p.marker.listing_id}
                            class="absolute -translate-x-1/2 -translate-y-full tooltip"
                            data-tip={p.marker.title.clone()}
                            style={format!("left: {:.2}%; top: {:.2}%;", p.left, p.top)}
                        >
                            <Link<Route> to={Route::ListingDetail { id: p.marker.listing_id }} classes={classes!("badge", "badge-primary", "shadow")}>
                                { &p.marker.label }
                            </Link<Route>>
                        </div>
                    })}
                </div>
                <div class="flex justify-between text-sm text-gray-500">
                    <span>
                        {if missing > 0 { format!("{} listing(s) without coordinates are not shown", missing) } else { String::new() }}
                    </span>
                    <a class="link" target="_blank" rel="noopener"
                        href={osm_url(center_lat, center_lng, app_settings.map_zoom)}>
                        {"Open area in OpenStreetMap"}
                    </a>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LocationLinkProps {
    pub lat: f64,
    pub lng: f64,
}

#[function_component(LocationLink)]
pub fn location_link(props: &LocationLinkProps) -> Html {
    html! {
        <a class="link link-primary" target="_blank" rel="noopener" href={osm_url(props.lat, props.lng, 16)}>
            <i class="fas fa-map-marked-alt mr-1"></i>
            {format!("{:.5}, {:.5}", props.lat, props.lng)}
        </a>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(id: i32, lat: f64, lng: f64) -> MapMarker {
        MapMarker {
            listing_id: id,
            lat,
            lng,
            title: format!("Listing {id}"),
            label: "1.0M".to_string(),
        }
    }

    #[test]
    fn test_single_marker_is_centred() {
        let placed = place_markers(vec![marker(1, 47.95, 21.71)]);
        assert_eq!(placed[0].left, 50.0);
        assert_eq!(placed[0].top, 50.0);
    }

    #[test]
    fn test_north_west_marker_is_top_left() {
        let placed = place_markers(vec![marker(1, 48.0, 21.0), marker(2, 47.0, 22.0)]);
        assert_eq!(placed[0].left, PADDING);
        assert_eq!(placed[0].top, PADDING);
        assert_eq!(placed[1].left, 100.0 - PADDING);
        assert_eq!(placed[1].top, 100.0 - PADDING);
    }
}
