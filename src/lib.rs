//! EstateHub API server: routing, authentication, rate limiting and the CLI.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod router;
pub mod schemas;

#[cfg(test)]
mod test_utils;
