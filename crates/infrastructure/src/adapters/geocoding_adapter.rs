//! Geocoding adapter - Implements GeocodingPort using integration_geocoding
//!
//! Adds the request policy on top of the raw provider client: input trimming,
//! the minimum suggestion query length, the coordinate fallback for reverse
//! geocoding, and the mapping of provider errors to the domain taxonomy.

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::{Coordinates, GeocodingError, ResolvedLocation, SuggestionCandidate};
use integration_geocoding::{
    GeoPlace, GeocodingClient, NominatimConfig, NominatimError, NominatimGeocodingClient,
};
use tracing::{debug, instrument, warn};

/// Minimum trimmed query length before the provider is asked for suggestions
pub const DEFAULT_MIN_QUERY_CHARS: usize = 3;

/// Adapter for forward/reverse geocoding and address search
pub struct GeocodingAdapter {
    client: Arc<dyn GeocodingClient>,
    min_query_chars: usize,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("client", &"dyn GeocodingClient")
            .field("min_query_chars", &self.min_query_chars)
            .finish()
    }
}

impl GeocodingAdapter {
    /// Create an adapter backed by a Nominatim client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &NominatimConfig) -> Result<Self, ApplicationError> {
        let client = NominatimGeocodingClient::new(config).map_err(|e| {
            ApplicationError::Configuration(format!("Failed to create geocoding client: {e}"))
        })?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create an adapter around an existing client
    #[must_use]
    pub fn with_client(client: Arc<dyn GeocodingClient>) -> Self {
        Self {
            client,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
        }
    }

    /// Override the minimum suggestion query length
    #[must_use]
    pub const fn with_min_query_chars(mut self, min_query_chars: usize) -> Self {
        self.min_query_chars = min_query_chars;
        self
    }

    /// Map a provider error to the geocoding taxonomy
    fn map_error(error: NominatimError) -> GeocodingError {
        match error {
            NominatimError::AddressNotFound(address) => GeocodingError::AddressNotFound(address),
            NominatimError::RateLimitExceeded { retry_after_secs } => {
                GeocodingError::RateLimited { retry_after_secs }
            },
            NominatimError::Timeout => GeocodingError::NetworkError("request timed out".to_string()),
            NominatimError::ConnectionFailed(msg)
            | NominatimError::RequestFailed(msg)
            | NominatimError::ParseError(msg) => GeocodingError::NetworkError(msg),
        }
    }

    fn to_coordinates(place: &GeoPlace) -> Result<Coordinates, GeocodingError> {
        Coordinates::new(place.latitude, place.longitude).map_err(|e| {
            GeocodingError::NetworkError(format!("provider returned invalid coordinates: {e}"))
        })
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn forward_geocode(&self, address: &str) -> Result<ResolvedLocation, GeocodingError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodingError::AddressNotFound(
                "Address must not be empty".to_string(),
            ));
        }

        let place = self
            .client
            .geocode(address)
            .await
            .map_err(Self::map_error)?;
        let coordinates = Self::to_coordinates(&place)?;

        debug!(%address, resolved = %place.display_name, "Address resolved");
        Ok(ResolvedLocation::new(place.display_name, coordinates))
    }

    #[instrument(skip(self))]
    async fn reverse_geocode(&self, coordinates: Coordinates) -> String {
        match self
            .client
            .reverse_geocode(coordinates.latitude(), coordinates.longitude())
            .await
        {
            Ok(address) => address,
            Err(e) => {
                warn!(error = %e, %coordinates, "Reverse geocoding failed, using coordinates");
                coordinates.to_string()
            },
        }
    }

    #[instrument(skip(self))]
    async fn search_candidates(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SuggestionCandidate>, GeocodingError> {
        let query = query.trim();
        if query.chars().count() < self.min_query_chars || limit == 0 {
            return Ok(Vec::new());
        }

        let provider_limit = u8::try_from(limit).unwrap_or(u8::MAX);
        let places = self
            .client
            .search(query, provider_limit)
            .await
            .map_err(Self::map_error)?;

        let candidates: Vec<SuggestionCandidate> = places
            .into_iter()
            .filter_map(|place| {
                Self::to_coordinates(&place)
                    .ok()
                    .map(|coordinates| SuggestionCandidate::new(place.display_name, coordinates))
            })
            .take(limit)
            .collect();

        debug!(%query, count = candidates.len(), "Suggestions found");
        Ok(candidates)
    }

    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}
