//! Geocoding port
//!
//! Policy-level interface over a geocoding provider: address to coordinates,
//! coordinates to address, and partial-address search for suggestions.

use async_trait::async_trait;
use domain::{Coordinates, GeocodingError, ResolvedLocation, SuggestionCandidate};
#[cfg(test)]
use mockall::automock;

/// Port for geocoding operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve free-form address text to the provider's best match
    ///
    /// Empty or whitespace-only input fails with `AddressNotFound`.
    async fn forward_geocode(&self, address: &str) -> Result<ResolvedLocation, GeocodingError>;

    /// Convert coordinates to a human-readable address
    ///
    /// Never fails: when the provider cannot answer, the formatted
    /// coordinates (`"{lat:.6}, {lng:.6}"`) are returned instead.
    async fn reverse_geocode(&self, coordinates: Coordinates) -> String;

    /// Search up to `limit` candidates for a partial address, in provider order
    ///
    /// Queries below the minimum length resolve to an empty list without
    /// contacting the provider.
    async fn search_candidates(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SuggestionCandidate>, GeocodingError>;

    /// Check if the provider is reachable
    async fn is_available(&self) -> bool;
}
