//! Error types for overhang analysis.

use mesh_index::IndexError;
use thiserror::Error;

/// Result type for overhang analysis.
pub type OverhangResult<T> = Result<T, OverhangError>;

/// Errors that can occur during overhang analysis.
///
/// Finding nothing is not an error: pipelines return `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum OverhangError {
    /// The input mesh is structurally invalid.
    #[error("invalid mesh: {0}")]
    InvalidMesh(#[from] IndexError),

    /// Invalid configuration parameter.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },
}

impl OverhangError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
