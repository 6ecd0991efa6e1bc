//! Nominatim data models
//!
//! Typed place results plus the raw wire shapes they are parsed from.

use serde::{Deserialize, Serialize};

use crate::error::NominatimError;

/// A place returned by Nominatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPlace {
    /// Full display name of the place
    pub display_name: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// A coordinate field that Nominatim may send as a string or a number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    pub(crate) fn parse(&self, field: &str) -> Result<f64, NominatimError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| NominatimError::ParseError(format!("Invalid {field}: {s}"))),
        }
    }
}

/// Raw `/search` result entry
#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchResult {
    pub lat: RawNumber,
    pub lon: RawNumber,
    pub display_name: Option<String>,
}

impl RawSearchResult {
    /// Convert to a typed place, using `fallback_name` when the display name is missing
    pub(crate) fn into_place(self, fallback_name: &str) -> Result<GeoPlace, NominatimError> {
        let latitude = self.lat.parse("latitude")?;
        let longitude = self.lon.parse("longitude")?;
        Ok(GeoPlace {
            display_name: self
                .display_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| fallback_name.to_string()),
            latitude,
            longitude,
        })
    }
}

/// Raw `/reverse` response
///
/// Nominatim answers HTTP 200 with an `error` field when nothing is found.
#[derive(Debug, Deserialize)]
pub(crate) struct RawReverseResult {
    pub display_name: Option<String>,
    pub error: Option<String>,
}
