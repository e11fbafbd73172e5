//! Domain-specific error types for labtrace
//!
//! # Error Categories
//!
//! - **GraphError**: graph building, layer configuration and trace lookups
//! - **DataSetError**: loading record collections from files or embedded resources
//!
//! Both enums expose `error_code()` plus category helpers so the HTTP layer can
//! map them to a status without matching on individual variants.
//!
//! # Examples
//!
//! ```rust
//! use labtrace::errors::{DataSetError, GraphError};
//!
//! let err = GraphError::NodeNotFound("NOPE".to_string());
//! assert!(err.is_not_found());
//!
//! let err = DataSetError::UnsupportedFormat("csv".to_string());
//! assert!(err.is_client_error());
//! ```

pub mod data_set;
pub mod graph;

pub use data_set::DataSetError;
pub use graph::GraphError;

/// Result type alias for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type alias for data set operations
pub type DataSetResult<T> = Result<T, DataSetError>;
