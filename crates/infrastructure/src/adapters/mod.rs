//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod catalog_adapter;
mod geocoding_adapter;
mod geolocation_adapter;

pub use catalog_adapter::MarketplaceCatalogAdapter;
pub use geocoding_adapter::{DEFAULT_MIN_QUERY_CHARS, GeocodingAdapter};
pub use geolocation_adapter::{
    CachedGeolocation, FixedGeolocationAdapter, IpGeolocationAdapter, build_geolocation,
};
