//! Nominatim error types

use thiserror::Error;

/// Errors that can occur while talking to Nominatim
#[derive(Debug, Error)]
pub enum NominatimError {
    /// Connection to the geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// The service answered with a non-success status
    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the geocoding response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// Address could not be resolved
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// The service signalled throttling (HTTP 429)
    #[error("Geocoding rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by the service)
        retry_after_secs: Option<u64>,
    },

    /// Request timeout
    #[error("Geocoding request timed out")]
    Timeout,
}

impl NominatimError {
    /// Returns true if the failure happened below the application protocol
    /// (transport, HTTP status, malformed body)
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::RequestFailed(_) | Self::ParseError(_) | Self::Timeout
        )
    }
}

impl From<reqwest::Error> for NominatimError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::ConnectionFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors() {
        assert!(NominatimError::ConnectionFailed("x".to_string()).is_transport());
        assert!(NominatimError::RequestFailed("x".to_string()).is_transport());
        assert!(NominatimError::ParseError("x".to_string()).is_transport());
        assert!(NominatimError::Timeout.is_transport());
    }

    #[test]
    fn test_non_transport_errors() {
        assert!(!NominatimError::AddressNotFound("x".to_string()).is_transport());
        assert!(
            !NominatimError::RateLimitExceeded {
                retry_after_secs: None
            }
            .is_transport()
        );
    }

    #[test]
    fn test_error_display() {
        let err = NominatimError::AddressNotFound("Janpath".to_string());
        assert!(err.to_string().contains("Janpath"));

        let err = NominatimError::Timeout;
        assert!(err.to_string().contains("timed out"));

        let err = NominatimError::RateLimitExceeded {
            retry_after_secs: Some(60),
        };
        assert!(err.to_string().contains("60"));
    }
}
