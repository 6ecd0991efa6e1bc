//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod catalog_port;
mod geocoding_port;
mod geolocation_port;

#[cfg(test)]
pub use catalog_port::MockCatalogPort;
pub use catalog_port::CatalogPort;
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::GeocodingPort;
#[cfg(test)]
pub use geolocation_port::MockGeolocationPort;
pub use geolocation_port::GeolocationPort;
