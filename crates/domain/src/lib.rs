//! Domain layer for TruckScout
//!
//! Contains the location vocabulary (coordinates, resolved locations,
//! suggestions), marketplace listings, the typed failure taxonomies and the
//! proximity engine. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod proximity;
pub mod value_objects;

pub use entities::*;
pub use errors::{DomainError, GeocodingError, GeolocationError, GeolocationOutcome};
pub use proximity::{Located, TruckWithDistance, WithDistance};
pub use value_objects::*;
