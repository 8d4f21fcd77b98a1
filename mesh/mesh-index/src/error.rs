//! Error types for mesh indexing.

use thiserror::Error;

/// Result type for indexing operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Structural problems that make a mesh unusable for analysis.
///
/// Every variant is fatal: analysis fails fast instead of producing partial
/// results from malformed input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Mesh has no vertices.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Mesh has vertices but no triangles.
    #[error("mesh has no faces")]
    NoFaces,

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index} (mesh has {vertex_count} vertices)")]
    InvalidIndex {
        /// Offending face.
        face: usize,
        /// The out-of-range index.
        index: u32,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A face uses the same vertex more than once.
    #[error("face {face} repeats a vertex index")]
    RepeatedIndex {
        /// Offending face.
        face: usize,
    },

    /// Input exceeds the welding bound.
    #[error("mesh has {vertex_count} vertices, limit is {limit}")]
    TooLarge {
        /// Number of input vertices.
        vertex_count: usize,
        /// Configured maximum.
        limit: usize,
    },
}
