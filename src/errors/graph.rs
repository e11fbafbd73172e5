//! Graph-related error types
//!
//! Covers trace lookups and the layer descriptor. Dangling foreign keys are not
//! errors: the builder emits those edges as-is.
//!
//! # Examples
//!
//! ```rust
//! use labtrace::errors::GraphError;
//!
//! let err = GraphError::NodeNotFound("M999".to_string());
//! assert_eq!(err.error_code(), "NOT_FOUND");
//!
//! let err = GraphError::LayerNotFound("testPiece".to_string());
//! assert!(err.is_client_error());
//! ```

use thiserror::Error;

/// Graph-related errors
#[derive(Error, Debug)]
pub enum GraphError {
    /// No record collection contains the requested id
    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    /// Layer key outside the five pipeline layers
    #[error("Invalid layer: {0}")]
    InvalidLayer(String),

    /// Layer descriptor is missing one of the pipeline layers
    #[error("Layer '{0}' not found")]
    LayerNotFound(String),

    /// Layer descriptor disagrees with the fixed layer ordering
    #[error("Layer '{layer}' must have level {expected}, found {found}")]
    LayerLevelMismatch {
        /// Layer key
        layer: String,
        /// Level implied by the pipeline ordering
        expected: u8,
        /// Level given in the descriptor
        found: u8,
    },

    /// Validation failed
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl GraphError {
    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GraphError::InvalidLayer(_)
                | GraphError::LayerNotFound(_)
                | GraphError::LayerLevelMismatch { .. }
                | GraphError::Validation(_)
        )
    }

    /// Check if this is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, GraphError::NodeNotFound(_))
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            GraphError::NodeNotFound(_) => "NOT_FOUND",
            GraphError::InvalidLayer(_)
            | GraphError::LayerNotFound(_)
            | GraphError::LayerLevelMismatch { .. } => "INVALID_LAYER",
            GraphError::Validation(_) => "VALIDATION_FAILED",
        }
    }
}
