//! Logging and tracing setup
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a fmt
//! layer that writes either human-readable text or JSON lines.

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level filter (e.g. "info", "application=debug,tower_http=info")
    ///
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit JSON lines instead of text
    #[serde(default)]
    pub json_output: bool,

    /// Include source file and line in text output
    #[serde(default)]
    pub with_file_location: bool,
}

fn default_log_filter() -> String {
    "info,tower_http=info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json_output: false,
            with_file_location: false,
        }
    }
}

/// Error type for telemetry initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The log filter could not be parsed
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// Failed to install the global subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_filter)
            .map_err(|e| TelemetryError::Filter(e.to_string())),
    }
}

/// Install the global tracing subscriber
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber is
/// already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json_output {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(config.with_file_location)
                    .with_line_number(config.with_file_location),
            )
            .try_init()
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(json = config.json_output, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_filter, "info,tower_http=info");
        assert!(!config.json_output);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: TelemetryConfig = serde_json::from_str(r#"{"json_output": true}"#).unwrap();
        assert!(config.json_output);
        assert_eq!(config.log_filter, "info,tower_http=info");
    }

    #[test]
    fn invalid_filter_is_rejected() {
        let config = TelemetryConfig {
            log_filter: "truckscout=loud".to_string(),
            ..Default::default()
        };
        // RUST_LOG may be set in the environment running the tests
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(matches!(env_filter(&config), Err(TelemetryError::Filter(_))));
        }
    }
}
