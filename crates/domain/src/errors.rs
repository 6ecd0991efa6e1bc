//! Domain-level errors
//!
//! The two failure families of location resolution are closed enums so that
//! callers can match every case exhaustively.

use thiserror::Error;

use crate::value_objects::InvalidCoordinates;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinates out of range
    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Failures of forward geocoding and candidate search
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodingError {
    /// The provider returned no match for the address
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// Transport, HTTP or response-format failure (includes timeouts)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The provider signalled throttling
    #[error("Geocoding rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying (if provided by the provider)
        retry_after_secs: Option<u64>,
    },
}

/// Failures of a device position request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    /// The user or platform refused access to the position
    #[error("Location permission denied")]
    PermissionDenied,

    /// A position could not be determined
    #[error("Position unavailable")]
    PositionUnavailable,

    /// No position within the configured timeout
    #[error("Location request timed out")]
    Timeout,

    /// No position source exists on this platform
    #[error("Geolocation is not supported")]
    Unsupported,
}

impl GeolocationError {
    /// Recovery guidance shown to the user
    #[must_use]
    pub const fn user_hint(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Enable location access in your settings, or enter an address",
            Self::PositionUnavailable => "Your location could not be determined, try again or enter an address",
            Self::Timeout => "Locating took too long, try again",
            Self::Unsupported => "Location is not available on this device, enter an address instead",
        }
    }
}

/// Result of a device position request
pub type GeolocationOutcome = Result<crate::Coordinates, GeolocationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_not_found_message() {
        let err = GeocodingError::AddressNotFound("Atlantis".to_string());
        assert_eq!(err.to_string(), "Address not found: Atlantis");
    }

    #[test]
    fn rate_limited_message_includes_delay() {
        let err = GeocodingError::RateLimited {
            retry_after_secs: Some(30),
        };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn geolocation_errors_are_distinguishable() {
        let hints = [
            GeolocationError::PermissionDenied.user_hint(),
            GeolocationError::PositionUnavailable.user_hint(),
            GeolocationError::Timeout.user_hint(),
            GeolocationError::Unsupported.user_hint(),
        ];
        for (i, a) in hints.iter().enumerate() {
            for b in &hints[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn invalid_coordinates_converts() {
        let err: DomainError = InvalidCoordinates.into();
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("radius_km must not be negative".to_string());
        assert_eq!(
            err.to_string(),
            "Validation failed: radius_km must not be negative"
        );
    }
}
