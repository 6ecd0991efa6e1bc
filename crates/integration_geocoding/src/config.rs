//! Nominatim client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum spacing between requests in milliseconds (0 to disable)
    ///
    /// The public Nominatim instance allows at most one request per second.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Comma-separated ISO country codes to restrict results to (empty = worldwide)
    #[serde(default)]
    pub country_filter: String,

    /// Preferred result language (`accept-language` parameter)
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// User agent sent with every request, required by the Nominatim usage policy
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    5
}

const fn default_min_request_interval_ms() -> u64 {
    1100
}

fn default_accept_language() -> String {
    "en".to_string()
}

fn default_user_agent() -> String {
    format!("TruckScout/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            min_request_interval_ms: default_min_request_interval_ms(),
            country_filter: String::new(),
            accept_language: default_accept_language(),
            user_agent: default_user_agent(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing (no request pacing)
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            min_request_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Check if request pacing is enabled
    #[must_use]
    pub const fn pacing_enabled(&self) -> bool {
        self.min_request_interval_ms > 0
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        Ok(())
    }
}
