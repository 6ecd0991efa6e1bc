//! Geocoding integration for TruckScout
//!
//! Provides forward geocoding, reverse geocoding and multi-result address
//! search via [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org).
//!
//! # Architecture
//!
//! [`GeocodingClient`] defines the provider-level interface, implemented by
//! [`NominatimGeocodingClient`]. Errors are reported with provider detail
//! ([`NominatimError`]); mapping them onto the application's geocoding
//! taxonomy happens in the infrastructure adapter.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geocoding::{GeocodingClient, NominatimConfig, NominatimGeocodingClient};
//!
//! let client = NominatimGeocodingClient::new(&NominatimConfig::default())?;
//! let places = client.search("Janpath, Bhubaneswar", 5).await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{GeocodingClient, NominatimGeocodingClient};
pub use config::NominatimConfig;
pub use error::NominatimError;
pub use models::GeoPlace;
