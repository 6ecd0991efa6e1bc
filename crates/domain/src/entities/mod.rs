//! Domain entities

mod event;
mod location;
mod truck;

pub use event::Event;
pub use location::{ResolvedLocation, SuggestionCandidate};
pub use truck::Truck;
