//! Food event listing (markets, festivals, truck meetups)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::proximity::Located;
use crate::value_objects::Coordinates;

/// An event as listed by the marketplace backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Backend identifier
    pub id: String,
    /// Event title
    pub title: String,
    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Venue address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Start time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    /// End time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    /// Venue position
    pub coordinates: Coordinates,
}

impl Event {
    /// Create an event with only the required fields set
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            address: None,
            starts_at: None,
            ends_at: None,
            coordinates,
        }
    }

    /// Whether the event has already finished at `now`
    #[must_use]
    pub fn is_over(&self, now: DateTime<Utc>) -> bool {
        self.ends_at.is_some_and(|end| end < now)
    }
}

impl Located for Event {
    fn coordinates(&self) -> Coordinates {
        self.coordinates
    }
}
