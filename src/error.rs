//! Unified error handling for the hausmeister crate
//!
//! Most admin API failures are deliberately *not* errors: validation and
//! lookup problems are logged and surfaced to the caller as structured
//! `{result: "error"}` payloads or `None` values. The [`Error`] enum covers
//! the remaining hard faults (I/O, malformed documents, server startup).

use std::io;
use thiserror::Error;

/// Unified error type for the hausmeister crate
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors (logging document file access)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML document errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors (geocoding lookup)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// A log level name that is not in the level table
    #[error("unknown log level '{0}'")]
    UnknownLevel(String),

    /// A logger id that is not present in the registry or document
    #[error("logger '{0}' not found")]
    LoggerNotFound(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_level_display() {
        let err = Error::UnknownLevel("CHATTY".to_string());
        assert_eq!(err.to_string(), "unknown log level 'CHATTY'");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
