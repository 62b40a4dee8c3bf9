//! Listing, like and account services on top of the SeaORM entities.
//!
//! Handlers stay thin: they extract the acting user and the request body and
//! hand both to one of the services below.

pub mod account;
pub mod credentials;
pub mod error;
pub mod like;
pub mod listing;

#[cfg(test)]
mod testing;

pub use account::{AccountService, Authenticated, to_user_dto};
pub use error::{Result, ServiceError};
pub use like::LikeService;
pub use listing::{ListingService, to_listing_dto};
