//! Geographic coordinates value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the globe in decimal degrees
///
/// Always within range: latitude in [-90, 90], longitude in [-180, 180].
/// Deserialization goes through the same validation as [`Coordinates::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

/// Error type for out-of-range or non-finite coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCoordinates;

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180"
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = InvalidCoordinates;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinates {
    /// Create validated coordinates
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90],
    /// longitude is not in [-180, 180], or either value is NaN.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create coordinates from a GeoJSON position (`[longitude, latitude]`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` when the position has fewer than two
    /// elements or is out of range.
    pub fn from_geojson_position(position: &[f64]) -> Result<Self, InvalidCoordinates> {
        match position {
            [longitude, latitude, ..] => Self::new(*latitude, *longitude),
            _ => Err(InvalidCoordinates),
        }
    }

    /// Create coordinates without validation, for compile-time constants
    #[must_use]
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another point in kilometers (full precision)
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        crate::proximity::distance_km(*self, *other)
    }
}

/// Renders as `"{lat:.6}, {lng:.6}"`, the display fallback when no address is known
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Well-known reference points
impl Coordinates {
    /// Bhubaneswar city center, India
    #[must_use]
    pub const fn bhubaneswar() -> Self {
        Self::new_unchecked(20.2961, 85.8245)
    }

    /// Berlin, Germany
    #[must_use]
    pub const fn berlin() -> Self {
        Self::new_unchecked(52.52, 13.405)
    }
}
