use anyhow::Result;
use sea_orm::Database;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::rate_limit::RateLimiter;
use crate::schemas::AppState;

/// Tunables read from `estatehub.{yaml,toml}` and `ESTATEHUB_*` variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Requests per key per one-minute window
    pub rate_limit_per_minute: u32,
    pub request_timeout_secs: u64,
    /// Random bytes in an issued bearer token
    pub token_bytes: usize,
    /// Largest accepted request body; listing images may be inline data URLs
    pub max_body_bytes: usize,
    /// Allowed CORS origin; any origin when unset
    #[serde(default)]
    pub cors_allowed_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: 60,
            request_timeout_secs: 30,
            token_bytes: 32,
            max_body_bytes: 16 * 1024 * 1024,
            cors_allowed_origin: None,
        }
    }
}

impl AppConfig {
    /// Defaults, then the optional config file, then the environment.
    pub fn load() -> Result<Self> {
        let defaults = AppConfig::default();
        let settings = ::config::Config::builder()
            .set_default("rate_limit_per_minute", i64::from(defaults.rate_limit_per_minute))?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("token_bytes", defaults.token_bytes as i64)?
            .set_default("max_body_bytes", defaults.max_body_bytes as i64)?
            .add_source(::config::File::with_name("estatehub").required(false))
            .add_source(::config::Environment::with_prefix("ESTATEHUB").try_parsing(true))
            .build()?;
        let app_config: AppConfig = settings.try_deserialize()?;
        debug!(?app_config, "Configuration loaded");
        Ok(app_config)
    }
}

/// Connect to the database and build the shared state.
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    dotenvy::dotenv().ok();
    let app_config = AppConfig::load()?;

    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    Ok(AppState::new(db, app_config))
}

impl AppState {
    pub fn new(db: sea_orm::DatabaseConnection, config: AppConfig) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit_per_minute);
        Self {
            db,
            config: Arc::new(config),
            rate_limiter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.rate_limit_per_minute, 60);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.token_bytes, 32);
        assert_eq!(config.max_body_bytes, 16 * 1024 * 1024);
        assert!(config.cors_allowed_origin.is_none());
    }
}
