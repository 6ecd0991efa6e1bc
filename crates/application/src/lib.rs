//! Application layer - Use cases and orchestration
//!
//! Defines the ports through which location resolution reaches the outside
//! world (geocoding provider, position source, marketplace catalog) and the
//! services built on top of them: the debounced [`SuggestionSession`] and the
//! consumer-facing [`LocationService`].

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
