//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `location`: position source and proximity search
//!
//! Provider sections reuse the configuration types of their client crates.
//!
//! Sources are layered: serde defaults, then an optional `config.toml`, then
//! `TRUCKSCOUT_*` environment variables with `__` separating nested keys
//! (e.g. `TRUCKSCOUT_GEOCODING__COUNTRY_FILTER=in`).

mod location;
mod server;

use std::path::Path;

use application::SuggestionConfig;
use integration_geocoding::NominatimConfig;
use integration_marketplace::MarketplaceConfig;
use serde::{Deserialize, Serialize};

use crate::telemetry::TelemetryConfig;

pub use location::{FixedPositionConfig, GeolocationConfig, GeolocationMode, ProximityConfig};
pub use server::ServerConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TRUCKSCOUT";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Nominatim geocoding configuration
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Position source configuration
    #[serde(default)]
    pub geolocation: GeolocationConfig,

    /// Marketplace backend configuration
    #[serde(default)]
    pub marketplace: MarketplaceConfig,

    /// Address suggestion tuning
    #[serde(default)]
    pub suggestions: SuggestionConfig,

    /// Proximity search configuration
    #[serde(default)]
    pub proximity: ProximityConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config").required(false))
    }

    /// Load configuration from an explicit file and the environment
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns all validation failures, one per line.
    pub fn validate(&self) -> Result<(), String> {
        let errors: Vec<String> = [
            self.server.validate(),
            self.geocoding.validate(),
            self.geolocation.validate(),
            self.marketplace.validate(),
            self.suggestions.validate(),
            self.proximity.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }
}
