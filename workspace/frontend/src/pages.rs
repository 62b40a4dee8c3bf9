pub mod edit_listing;
pub mod liked;
pub mod listing_detail;
pub mod login;
pub mod new_listing;
pub mod profile;
pub mod register;
