mod filter_panel;
mod listing_card;
mod listing_form;
mod map_view;
mod view;

pub use listing_card::{LikeButton, ListingCard};
pub use listing_form::ListingForm;
pub use map_view::{LocationLink, MapView};
pub use view::Listings;
