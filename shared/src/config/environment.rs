//! Logging configuration

use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
        }
    }
}

impl LoggingConfig {
    /// Filter string handed to the process logger.
    ///
    /// `debug` wins over `verbose`; both override the configured level.
    pub fn filter(&self, debug: bool, verbose: bool) -> String {
        if debug {
            String::from("debug")
        } else if verbose {
            String::from("info")
        } else {
            self.level.to_lowercase()
        }
    }
}
