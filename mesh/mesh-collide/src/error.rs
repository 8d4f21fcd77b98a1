//! Error types for collision queries.

use thiserror::Error;

/// Result type for collision queries.
pub type CollideResult<T> = Result<T, CollideError>;

/// Errors that can occur when configuring collision queries.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CollideError {
    /// Invalid configuration parameter.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },
}
