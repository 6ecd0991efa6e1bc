//! Application-level errors

use domain::{DomainError, GeocodingError, GeolocationError};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Forward geocoding or candidate search failed
    #[error(transparent)]
    Geocoding(#[from] GeocodingError),

    /// Device position could not be obtained
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Domain(DomainError::ValidationError(message.into()))
    }

    /// Check if the caller supplied bad input
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Domain(DomainError::ValidationError(_) | DomainError::InvalidCoordinates(_))
        )
    }
}
