//! Options for a device position request

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Parameters for a single position request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeolocationOptions {
    /// Ask the position source for its most precise fix
    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: bool,

    /// Give up after this many milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Accept a previously obtained fix up to this old (0 = always fresh)
    #[serde(default = "default_max_cache_age_ms")]
    pub max_cache_age_ms: u64,
}

const fn default_high_accuracy() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_max_cache_age_ms() -> u64 {
    300_000
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: default_high_accuracy(),
            timeout_ms: default_timeout_ms(),
            max_cache_age_ms: default_max_cache_age_ms(),
        }
    }
}

impl GeolocationOptions {
    /// Request timeout as a `Duration`
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Maximum accepted fix age as a `Duration`
    #[must_use]
    pub const fn max_cache_age(&self) -> Duration {
        Duration::from_millis(self.max_cache_age_ms)
    }
}
