//! Data set error types
//!
//! Errors raised while loading the record collections or the layer descriptor
//! from disk or from the embedded resources.
//!
//! # Examples
//!
//! ```rust
//! use labtrace::errors::DataSetError;
//!
//! let err = DataSetError::UnsupportedFormat("xlsx".to_string());
//! assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
//! ```

use thiserror::Error;

/// Data set loading errors
#[derive(Error, Debug)]
pub enum DataSetError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Embedded resource missing from the binary
    #[error("Embedded resource missing: {0}")]
    ResourceMissing(String),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl DataSetError {
    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DataSetError::UnsupportedFormat(_)
                | DataSetError::JsonError(_)
                | DataSetError::YamlError(_)
        )
    }

    /// Check if this is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataSetError::FileNotFound(_))
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            DataSetError::FileNotFound(_) => "NOT_FOUND",
            DataSetError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            DataSetError::JsonError(_) | DataSetError::YamlError(_) => "INVALID_FORMAT",
            DataSetError::ResourceMissing(_) | DataSetError::Io(_) => "INTERNAL_ERROR",
        }
    }
}
