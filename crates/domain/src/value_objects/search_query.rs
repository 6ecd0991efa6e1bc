//! Search query value object

use serde::{Deserialize, Serialize};

/// A single address-search query issued by a suggestion session
///
/// `generation` is assigned by the owning session and increases with every
/// input change. A response is only relevant while its query's generation is
/// still the session's current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The text typed so far
    pub text: String,
    /// Session-local sequence number
    pub generation: u64,
}

impl SearchQuery {
    /// Create a new query for the given generation
    #[must_use]
    pub fn new(text: impl Into<String>, generation: u64) -> Self {
        Self {
            text: text.into(),
            generation,
        }
    }

    /// Length of the trimmed text in characters
    #[must_use]
    pub fn trimmed_len(&self) -> usize {
        self.text.trim().chars().count()
    }

    /// Whether this query was superseded by a newer generation
    #[must_use]
    pub const fn is_superseded_by(&self, current_generation: u64) -> bool {
        self.generation != current_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_len_counts_chars() {
        assert_eq!(SearchQuery::new("  pi ", 1).trimmed_len(), 2);
        assert_eq!(SearchQuery::new("Café", 1).trimmed_len(), 4);
        assert_eq!(SearchQuery::new("", 1).trimmed_len(), 0);
    }

    #[test]
    fn superseded_compares_generation_not_text() {
        let query = SearchQuery::new("pizza", 3);
        assert!(!query.is_superseded_by(3));
        assert!(query.is_superseded_by(4));
    }
}
