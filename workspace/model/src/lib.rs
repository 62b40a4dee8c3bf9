//! SeaORM entities for the listing marketplace.

pub mod entities;
