//! Position source and proximity search configuration.

use std::fmt;

use domain::{Coordinates, GeolocationOptions};
use serde::{Deserialize, Serialize};

/// Which position source answers "use my location"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeolocationMode {
    /// No position source; every request answers `Unsupported`
    #[default]
    None,
    /// A configured, fixed device position
    Fixed,
    /// IP-based lookup against an ip-api compatible service
    Ip,
}

impl fmt::Display for GeolocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Fixed => write!(f, "fixed"),
            Self::Ip => write!(f, "ip"),
        }
    }
}

/// A fixed device position, e.g. for a kiosk
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FixedPositionConfig {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl FixedPositionConfig {
    /// Validated coordinates of this position
    ///
    /// # Errors
    ///
    /// Returns an error if the position is out of range.
    pub fn coordinates(&self) -> Result<Coordinates, String> {
        Coordinates::new(self.latitude, self.longitude).map_err(|e| e.to_string())
    }
}

/// Geolocation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// Active position source (default: none)
    #[serde(default)]
    pub mode: GeolocationMode,

    /// Position used by the `fixed` mode
    #[serde(default)]
    pub fixed: Option<FixedPositionConfig>,

    /// Base URL of the IP lookup service (default: <http://ip-api.com>)
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,

    /// Options applied to every position request
    #[serde(default)]
    pub options: GeolocationOptions,
}

fn default_ip_lookup_url() -> String {
    "http://ip-api.com".to_string()
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            mode: GeolocationMode::default(),
            fixed: None,
            ip_lookup_url: default_ip_lookup_url(),
            options: GeolocationOptions::default(),
        }
    }
}

impl GeolocationConfig {
    /// A fixed position source, as used in tests
    #[must_use]
    pub fn for_testing(latitude: f64, longitude: f64) -> Self {
        Self {
            mode: GeolocationMode::Fixed,
            fixed: Some(FixedPositionConfig {
                latitude,
                longitude,
            }),
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        match self.mode {
            GeolocationMode::Fixed => {
                let fixed = self.fixed.as_ref().ok_or_else(|| {
                    "geolocation.fixed is required when geolocation.mode = \"fixed\"".to_string()
                })?;
                fixed.coordinates().map(|_| ())
            },
            GeolocationMode::Ip if self.ip_lookup_url.trim().is_empty() => {
                Err("geolocation.ip_lookup_url must not be empty".to_string())
            },
            GeolocationMode::Ip | GeolocationMode::None => Ok(()),
        }?;

        if self.options.timeout_ms == 0 {
            return Err("geolocation.options.timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Proximity search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// Radius used when a request does not specify one (default: 10 km)
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
}

const fn default_radius_km() -> f64 {
    application::DEFAULT_RADIUS_KM
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
        }
    }
}

impl ProximityConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.default_radius_km.is_finite() || self.default_radius_km < 0.0 {
            return Err("proximity.default_radius_km must be a non-negative number".to_string());
        }
        Ok(())
    }
}
