//! Food truck listing

use serde::{Deserialize, Serialize};

use crate::proximity::Located;
use crate::value_objects::Coordinates;

/// A food truck as listed by the marketplace backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    /// Backend identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Kind of food served
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Street address the truck is parked at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Current position
    pub coordinates: Coordinates,
}

impl Truck {
    /// Create a truck with only the required fields set
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cuisine: None,
            description: None,
            address: None,
            coordinates,
        }
    }

    /// Set the cuisine
    #[must_use]
    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    /// Set the address
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl Located for Truck {
    fn coordinates(&self) -> Coordinates {
        self.coordinates
    }
}
