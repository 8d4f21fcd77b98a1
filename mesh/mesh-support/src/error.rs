//! Error types for support placement and export.

use mesh_collide::CollideError;
use thiserror::Error;

/// Result type for support placement.
pub type PlacementResult<T> = Result<T, PlacementError>;

/// Why a support could not be placed for a region.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlacementError {
    /// The region has no faces.
    #[error("region has no faces")]
    EmptyRegion,

    /// Every candidate shape hit the mesh.
    #[error("support collides with face {face}")]
    Collision {
        /// Last face the support collided with.
        face: usize,
    },

    /// No vertical span fit between the surrounding geometry.
    #[error("no valid support extent after {attempts} attempts")]
    NoValidExtent {
        /// Number of footprints tried.
        attempts: usize,
    },

    /// The support would have no volume.
    #[error("degenerate support: {reason}")]
    Degenerate {
        /// What made the shape degenerate.
        reason: String,
    },

    /// Invalid configuration parameter.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },
}

impl From<CollideError> for PlacementError {
    fn from(err: CollideError) -> Self {
        match err {
            CollideError::InvalidConfig { message } => Self::InvalidConfig { message },
        }
    }
}

pub(crate) fn config(message: impl Into<String>) -> PlacementError {
    PlacementError::InvalidConfig {
        message: message.into(),
    }
}

pub(crate) fn degenerate(reason: impl Into<String>) -> PlacementError {
    PlacementError::Degenerate {
        reason: reason.into(),
    }
}

/// Result type for debug export.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur when exporting meshes.
#[derive(Debug, Error)]
pub enum ExportError {
    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A selected face does not exist.
    #[error("face {face} out of range (mesh has {count} faces)")]
    FaceOutOfRange {
        /// Requested face.
        face: usize,
        /// Number of faces in the mesh.
        count: usize,
    },

    /// Binary STL stores the face count as a u32.
    #[error("too many faces for binary STL: {count}")]
    TooManyFaces {
        /// Number of faces requested.
        count: usize,
    },
}
