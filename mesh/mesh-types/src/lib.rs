//! Core mesh types for support-geometry analysis.
//!
//! This crate provides the data model shared by every stage of the
//! support pipeline:
//!
//! - [`Vertex`] - A point in 3D space
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`UpAxis`] - The world-vertical axis used by height-based analysis
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//! Default tolerances elsewhere in the workspace assume millimeters.
//!
//! # Coordinate System
//!
//! Right-handed. The default vertical axis is **+Y** (build plate in the
//! XZ plane), which matches slicer host applications. Use [`UpAxis::Z`]
//! for Z-up data.
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//! Normals point outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, MeshTopology, Point3, UpAxis, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 2.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 2.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 2.0, 1.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!((UpAxis::Y.height(&mesh.vertices[0].position) - 2.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod axis;
mod bounds;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use axis::UpAxis;
pub use bounds::Aabb;
pub use mesh::{IndexedMesh, unit_cube};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::{DEGENERATE_NORMAL_LENGTH, Triangle};
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Rotation3, Vector3};
