//! API error handling
//!
//! Maps the geocoding and geolocation taxonomies to HTTP statuses with a
//! stable machine-readable `code`. Internal details are only exposed while
//! [`set_expose_internal_errors`] is enabled.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use domain::{GeocodingError, GeolocationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether internal error details are included in responses
///
/// Production deployments should disable this.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Address not found: {0}")]
    AddressNotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error(transparent)]
    Geolocation(GeolocationError),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::AddressNotFound(_) => StatusCode::NOT_FOUND,
            Self::Network(_) => StatusCode::BAD_GATEWAY,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Geolocation(e) => match e {
                GeolocationError::PermissionDenied => StatusCode::FORBIDDEN,
                GeolocationError::PositionUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                GeolocationError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                GeolocationError::Unsupported => StatusCode::NOT_IMPLEMENTED,
            },
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::AddressNotFound(_) => "address_not_found",
            Self::Network(_) => "network_error",
            Self::RateLimited { .. } => "rate_limited",
            Self::Geolocation(e) => match e {
                GeolocationError::PermissionDenied => "permission_denied",
                GeolocationError::PositionUnavailable => "position_unavailable",
                GeolocationError::Timeout => "timeout",
                GeolocationError::Unsupported => "unsupported",
            },
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::Internal(_) => "internal_error",
        }
    }

    fn body(&self) -> ErrorResponse {
        let (error, details) = match self {
            Self::BadRequest(msg) | Self::AddressNotFound(msg) => (msg.clone(), None),
            Self::Network(msg) => {
                if should_expose_details() {
                    ("Geocoding provider unreachable".to_string(), Some(msg.clone()))
                } else {
                    ("Geocoding provider unreachable".to_string(), None)
                }
            },
            Self::RateLimited { retry_after_secs } => (
                "Too many requests to the geocoding provider".to_string(),
                retry_after_secs.map(|s| format!("retry after {s} seconds")),
            ),
            Self::Geolocation(e) => (e.to_string(), Some(e.user_hint().to_string())),
            Self::ServiceUnavailable(msg) => {
                let sanitized = if should_expose_details() {
                    msg.clone()
                } else {
                    "Service temporarily unavailable".to_string()
                };
                (sanitized, None)
            },
            Self::Internal(msg) => (
                "An internal error occurred".to_string(),
                should_expose_details().then(|| msg.clone()),
            ),
        };

        ErrorResponse {
            error,
            code: self.code().to_string(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal(_)) {
            tracing::error!(error = %self, "Request failed");
        }

        let mut response = (self.status(), Json(self.body())).into_response();
        if let Self::RateLimited {
            retry_after_secs: Some(secs),
        } = self
        {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<GeocodingError> for ApiError {
    fn from(err: GeocodingError) -> Self {
        match err {
            GeocodingError::AddressNotFound(msg) => Self::AddressNotFound(msg),
            GeocodingError::NetworkError(msg) => Self::Network(msg),
            GeocodingError::RateLimited { retry_after_secs } => {
                Self::RateLimited { retry_after_secs }
            },
        }
    }
}

impl From<GeolocationError> for ApiError {
    fn from(err: GeolocationError) -> Self {
        Self::Geolocation(err)
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::Geocoding(e) => e.into(),
            ApplicationError::Geolocation(e) => e.into(),
            ApplicationError::ExternalService(msg) => Self::ServiceUnavailable(msg),
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
        }
    }
}
