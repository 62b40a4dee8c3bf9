use log::Level;
use wasm_bindgen::JsValue;
use web_sys::window;

/// Global application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Backend API host (e.g., "localhost" or "api.example.com")
    pub api_host: String,

    /// Backend API port (e.g., 8000)
    pub api_port: u16,

    /// API path prefix (e.g., "/api")
    pub api_path: String,

    /// Use HTTPS for API requests
    pub api_use_https: bool,

    /// Default log level for the application
    pub log_level: Level,

    /// Enable debug mode
    pub debug_mode: bool,

    /// Toast notification duration in milliseconds
    pub toast_duration_ms: u32,

    /// Where the map opens when no listing has coordinates
    pub map_center: (f64, f64),

    pub map_zoom: u8,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_host: "localhost".to_string(),
            api_port: 8000,
            api_path: "/api".to_string(),
            api_use_https: false,
            log_level: Level::Info,
            debug_mode: false,
            toast_duration_ms: 5000,
            map_center: (47.956967, 21.715700),
            map_zoom: 13,
        }
    }
}

impl AppSettings {
    /// Create settings from environment/window location
    pub fn from_environment() -> Self {
        let mut settings = Self::default();

        let Some(window) = window() else {
            return settings;
        };

        if let Ok(hostname) = window.location().hostname() {
            settings.debug_mode = hostname == "localhost" || hostname == "127.0.0.1";
            if settings.debug_mode {
                settings.log_level = Level::Debug;
            }
        }

        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(api_host)) = storage.get_item("estatehub_api_host") {
                settings.api_host = api_host;
            }

            if let Ok(Some(api_port)) = storage.get_item("estatehub_api_port") {
                if let Ok(port_val) = api_port.parse::<u16>() {
                    settings.api_port = port_val;
                }
            }

            if let Ok(Some(api_path)) = storage.get_item("estatehub_api_path") {
                settings.api_path = api_path;
            }

            if let Ok(Some(use_https)) = storage.get_item("estatehub_api_use_https") {
                settings.api_use_https = use_https.eq_ignore_ascii_case("true");
            }

            if let Ok(Some(log_level)) = storage.get_item("estatehub_log_level") {
                settings.log_level = log_level.parse().unwrap_or(settings.log_level);
            }

            if let Ok(Some(duration)) = storage.get_item("estatehub_toast_duration_ms") {
                if let Ok(duration) = duration.parse::<u32>() {
                    settings.toast_duration_ms = duration;
                }
            }
        }

        settings
    }

    /// Save settings to localStorage
    pub fn save_to_storage(&self) -> Result<(), JsValue> {
        if let Some(window) = window() {
            if let Some(storage) = window.local_storage()? {
                storage.set_item("estatehub_api_host", &self.api_host)?;
                storage.set_item("estatehub_api_port", &self.api_port.to_string())?;
                storage.set_item("estatehub_api_path", &self.api_path)?;
                storage.set_item("estatehub_api_use_https", &self.api_use_https.to_string())?;
                storage.set_item("estatehub_log_level", &self.log_level.as_str().to_lowercase())?;
                storage.set_item("estatehub_toast_duration_ms", &self.toast_duration_ms.to_string())?;
            }
        }
        Ok(())
    }

    /// Get the base API URL (protocol + host + port + path)
    pub fn api_base_url(&self) -> String {
        let protocol = if self.api_use_https { "https" } else { "http" };
        format!("{}://{}:{}{}", protocol, self.api_host, self.api_port, self.api_path)
    }

    /// Get the full API URL for an endpoint
    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base_url(), endpoint)
    }
}

// Global settings instance using thread_local
use std::cell::RefCell;

thread_local! {
    static SETTINGS: RefCell<AppSettings> = RefCell::new(AppSettings::default());
}

/// Get a copy of the current settings
pub fn get_settings() -> AppSettings {
    SETTINGS.with(|s| s.borrow().clone())
}

/// Initialize settings (call this at app startup)
pub fn init_settings() {
    SETTINGS.with(|s| {
        *s.borrow_mut() = AppSettings::from_environment();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_url_targets_local_server() {
        let settings = AppSettings::default();
        assert_eq!(settings.api_base_url(), "http://localhost:8000/api");
        assert_eq!(settings.api_url("/listings"), "http://localhost:8000/api/listings");
    }

    #[test]
    fn test_https_switches_protocol() {
        let settings = AppSettings {
            api_use_https: true,
            api_host: "estatehub.example.com".to_string(),
            api_port: 443,
            ..AppSettings::default()
        };
        assert_eq!(settings.api_base_url(), "https://estatehub.example.com:443/api");
    }
}
