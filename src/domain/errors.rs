//! Domain error types
//!
//! This module defines the error hierarchy for the collector.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main collector error type
///
/// Transient request failures never surface as this type past the day
/// collector; they are carried as [`crate::adapters::comunica::PageResult`]
/// values instead. What reaches the caller here is configuration trouble,
/// checkpoint I/O, or something the run could not model.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Comunica API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkpoint could not be read or written
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Unclassified failure that terminates the run
    #[error("Fatal error: {0}")]
    Fatal(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Comunica API errors
///
/// Errors that occur while building or issuing requests against the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, DNS or other transport failure
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Request exceeded the configured timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Non-200 response
    #[error("Unexpected status: {status} - {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// HTTP client could not be constructed
    #[error("Client setup failed: {0}")]
    ClientSetup(String),
}

impl CollectorError {
    /// Whether this error maps to the configuration exit code
    pub fn is_configuration(&self) -> bool {
        matches!(self, CollectorError::Configuration(_))
    }
}

impl From<std::io::Error> for CollectorError {
    fn from(err: std::io::Error) -> Self {
        CollectorError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CollectorError {
    fn from(err: serde_json::Error) -> Self {
        CollectorError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CollectorError {
    fn from(err: toml::de::Error) -> Self {
        CollectorError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<chrono::ParseError> for CollectorError {
    fn from(err: chrono::ParseError) -> Self {
        CollectorError::Configuration(format!("Invalid date: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_error_display() {
        let err = CollectorError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_api_error_conversion() {
        let api_err = ApiError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        let err: CollectorError = api_err.into();
        assert!(matches!(err, CollectorError::Api(_)));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: CollectorError = io_err.into();
        assert!(matches!(err, CollectorError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: CollectorError = json_err.into();
        assert!(matches!(err, CollectorError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: CollectorError = toml_err.into();
        assert!(matches!(err, CollectorError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_chrono_error_conversion() {
        let parse_err = chrono::NaiveDate::parse_from_str("2025-13-01", "%Y-%m-%d").unwrap_err();
        let err: CollectorError = parse_err.into();
        assert!(matches!(err, CollectorError::Configuration(_)));
    }

    #[test]
    fn test_is_configuration() {
        assert!(CollectorError::Configuration("bad".to_string()).is_configuration());
        assert!(!CollectorError::Checkpoint("disk full".to_string()).is_configuration());
    }

    #[test]
    fn test_collector_error_implements_std_error() {
        let err = CollectorError::Fatal("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
