pub mod auth;
pub mod health;
pub mod likes;
pub mod listings;
pub mod users;
