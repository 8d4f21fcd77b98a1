//! Canonical indexing of triangle meshes for support analysis.
//!
//! This crate turns raw vertex/triangle data into a [`MeshIndex`]:
//! - Structural validation (empty meshes, bad indices) that fails fast
//! - Re-welding of triangle soups onto a tolerance grid
//! - Edge, face and vertex adjacency built from one edge multimap
//! - Cached per-face normals and centroids
//! - An [`IndexCache`] that shares indices across analyses of the same mesh
//!
//! # Example
//!
//! ```
//! use mesh_index::{MeshIndex, WeldParams};
//! use mesh_types::Point3;
//!
//! // A quad exported as two unshared triangles.
//! let soup = [
//!     Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 1.0), Point3::new(0.0, 0.0, 1.0),
//! ];
//! let index = MeshIndex::from_positions(&soup, None, &WeldParams::default()).unwrap();
//!
//! assert_eq!(index.vertex_count(), 4);
//! assert!(index.face_adjacency().are_adjacent(0, 1));
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod adjacency;
mod cache;
mod error;
mod index;
mod normals;
mod validate;
mod weld;

pub use adjacency::{EdgeMap, FaceAdjacency, VertexAdjacency, normalize_edge};
pub use cache::{IndexCache, MeshId};
pub use error::{IndexError, IndexResult};
pub use index::MeshIndex;
pub use normals::{face_centroids, face_normals};
pub use validate::validate;
pub use weld::{WeldOutcome, WeldParams, is_triangle_soup, weld};
