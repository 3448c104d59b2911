//! Engine-level error types.
//!
//! Configuration problems fail fast. Navigation misses are `Option`s and
//! transport failures become scenario outcomes, so neither lives here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or configuring the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl EngineError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { field, reason: reason.into() }
    }

    /// Returns true if the caller cannot continue with this engine instance.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_configuration_is_fatal() {
        let err = EngineError::invalid("max_requests_per_minute", "must be > 0");
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Invalid configuration for max_requests_per_minute: must be > 0"
        );
    }

    #[test]
    fn read_errors_are_not_fatal() {
        let err = EngineError::ConfigRead {
            path: PathBuf::from("missing.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("missing.toml"));
    }
}
