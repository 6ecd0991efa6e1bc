//! Value Objects - Immutable, identity-less domain primitives

mod coordinates;
mod geolocation_options;
mod search_query;

pub use coordinates::{Coordinates, InvalidCoordinates};
pub use geolocation_options::GeolocationOptions;
pub use search_query::SearchQuery;
