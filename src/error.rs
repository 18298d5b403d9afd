//! Error handling for Studio
//!
//! This module defines the error types used throughout the application,
//! providing clear error messages and proper error propagation.

use std::io;
use thiserror::Error;

/// Result type alias for Studio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Studio operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Regex compilation or execution failed
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The content service answered with a non-success status
    #[error("Backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// Home directory could not be determined
    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// Invalid command line arguments
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Tool input rejected before any request was made
    #[error("{field} is required: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Storage key contains characters the stores cannot handle
    #[error("Invalid storage key: {key}")]
    InvalidStorageKey { key: String },

    /// No record with this id in the collection
    #[error("Record {id} not found in {key}")]
    RecordNotFound { key: String, id: String },

    /// Value does not fit into the key-value surface
    #[error("Storage quota exceeded for {key}: {size} bytes > {limit} bytes")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    /// No signed-in principal
    #[error("Not signed in. Run `studio login` first")]
    NotSignedIn,

    /// Configuration validation failed
    #[error("Configuration validation failed: {field} - {reason}")]
    ConfigValidation { field: String, reason: String },

    /// Generic error with custom message
    #[error("{message}")]
    Custom { message: String },
}

impl Error {
    /// Create a custom error with a message
    pub fn custom<S: Into<String>>(message: S) -> Self {
        Error::Custom {
            message: message.into(),
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments<S: Into<String>>(message: S) -> Self {
        Error::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(field: S, reason: S) -> Self {
        Error::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a config validation error
    pub fn config_validation<S: Into<String>>(field: S, reason: S) -> Self {
        Error::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a backend error from a status code and message
    pub fn backend<S: Into<String>>(status: u16, message: S) -> Self {
        Error::Backend {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Http(_) | Error::Backend { .. } => true,
            Error::QuotaExceeded { .. } => true,
            Error::RecordNotFound { .. } => true,
            Error::InvalidArguments { .. } => false,
            Error::InvalidStorageKey { .. } => false,
            Error::NotSignedIn => false,
            Error::HomeDirectoryNotFound => false,
            _ => true,
        }
    }

    /// Get the error category for logging purposes
    pub fn category(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Regex(_) => "regex",
            Error::Json(_) => "json",
            Error::Database(_) => "database",
            Error::Http(_) | Error::Backend { .. } => "backend",
            Error::ConfigValidation { .. } => "config",
            Error::HomeDirectoryNotFound => "system",
            Error::InvalidArguments { .. } => "arguments",
            Error::InvalidInput { .. } => "input",
            Error::InvalidStorageKey { .. } | Error::QuotaExceeded { .. } => "storage",
            Error::RecordNotFound { .. } => "history",
            Error::NotSignedIn => "auth",
            Error::Custom { .. } => "custom",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_error() {
        let err = Error::custom("test message");
        assert_eq!(err.to_string(), "test message");
        assert_eq!(err.category(), "custom");
    }

    #[test]
    fn test_invalid_arguments_error() {
        let err = Error::invalid_arguments("missing required argument");
        assert_eq!(
            err.to_string(),
            "Invalid arguments: missing required argument"
        );
        assert_eq!(err.category(), "arguments");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_invalid_input_error() {
        let err = Error::invalid_input("text", "must not be empty");
        assert_eq!(err.to_string(), "text is required: must not be empty");
        assert_eq!(err.category(), "input");
    }

    #[test]
    fn test_backend_error() {
        let err = Error::backend(502, "bad gateway");
        assert_eq!(err.to_string(), "Backend returned 502: bad gateway");
        assert_eq!(err.category(), "backend");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_quota_exceeded() {
        let err = Error::QuotaExceeded {
            key: "ai-chatbot-history".to_string(),
            size: 20,
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "Storage quota exceeded for ai-chatbot-history: 20 bytes > 10 bytes"
        );
        assert_eq!(err.category(), "storage");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_config_validation_error() {
        let err = Error::config_validation("history.summarizer", "must be positive");
        assert_eq!(
            err.to_string(),
            "Configuration validation failed: history.summarizer - must be positive"
        );
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_error_recovery() {
        let recoverable = Error::RecordNotFound {
            key: "k".to_string(),
            id: "1".to_string(),
        };
        assert!(recoverable.is_recoverable());

        assert!(!Error::NotSignedIn.is_recoverable());
        assert!(!Error::HomeDirectoryNotFound.is_recoverable());
    }
}
