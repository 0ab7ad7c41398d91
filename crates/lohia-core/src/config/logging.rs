//! Logging configuration and tracing initialization.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Log format: `"json"` or `"pretty"`.
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` takes precedence over the configured level when set.
    pub fn init(&self) -> Result<(), AppError> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| AppError::configuration(format!("Invalid log filter: {e}")))?;

        let builder = tracing_subscriber::fmt().with_env_filter(filter);

        let result = if self.format == "json" {
            builder.json().try_init()
        } else {
            builder.pretty().try_init()
        };

        result.map_err(|e| AppError::configuration(format!("Failed to init tracing: {e}")))
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "json".to_string()
}
