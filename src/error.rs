//! Error types for Drover
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Drover
#[derive(Debug, Error)]
pub enum DroverError {
    /// Run preconditions not met; no iteration was started
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Agent subprocess could not be launched
    #[error("Invocation error: {0}")]
    Invocation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Drover operations
pub type Result<T> = std::result::Result<T, DroverError>;
