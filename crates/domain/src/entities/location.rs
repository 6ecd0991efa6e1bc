//! Resolved locations and address suggestions

use serde::{Deserialize, Serialize};

use crate::value_objects::Coordinates;

/// An address paired with its coordinates
///
/// Produced by geocoding, reverse geocoding or selecting a suggestion.
/// Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Human-readable address
    pub address: String,
    /// Authoritative position
    pub coordinates: Coordinates,
}

impl ResolvedLocation {
    /// Create a resolved location
    #[must_use]
    pub fn new(address: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            address: address.into(),
            coordinates,
        }
    }
}

/// One result of a partial-address search, in provider relevance order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionCandidate {
    /// Display string for the suggestion list
    pub address: String,
    /// Position of the suggested place
    pub coordinates: Coordinates,
}

impl SuggestionCandidate {
    /// Create a candidate
    #[must_use]
    pub fn new(address: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            address: address.into(),
            coordinates,
        }
    }

    /// Turn the chosen candidate into a resolved location
    #[must_use]
    pub fn into_resolved(self) -> ResolvedLocation {
        ResolvedLocation {
            address: self.address,
            coordinates: self.coordinates,
        }
    }
}

impl From<SuggestionCandidate> for ResolvedLocation {
    fn from(candidate: SuggestionCandidate) -> Self {
        candidate.into_resolved()
    }
}
