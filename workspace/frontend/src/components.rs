pub mod layout;
pub mod listings;
