//! Support shapes and their placement under overhang regions.
//!
//! Given regions found by `mesh-overhang`, this crate sizes and places
//! printable supports: world-aligned boxes under dangling volumes, tapered
//! columns, thin rails along straight region edges, and notched wing
//! plates. Every candidate is tested against the part with the
//! separating-axis checks from `mesh-collide` and shrunk until it fits or
//! the attempts run out.
//!
//! # Overview
//!
//! - [`solve_placement`] places one support under one region.
//! - [`solve_placements`] runs a whole batch in parallel, drops supports
//!   that overlap earlier ones, and honors a [`PassControl`] cancel flag.
//! - [`cuboid`], [`tapered_column`], [`edge_rail`] and [`wing_plate`] build
//!   the shapes directly.
//! - [`write_stl_binary`] and [`MeshDump`] export results for inspection.
//!
//! # Example
//!
//! ```
//! use mesh_index::MeshIndex;
//! use mesh_overhang::{FaceRegion, RegionOrigin};
//! use mesh_support::{PlacementKind, PlacementParams, PlacementShape, solve_placement};
//! use mesh_types::{IndexedMesh, Point3, Vector3};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.push_quad(
//!     Point3::new(0.0, 4.0, 0.0),
//!     Point3::new(6.0, 4.0, 0.0),
//!     Point3::new(6.0, 4.0, 1.0),
//!     Point3::new(0.0, 4.0, 1.0),
//! );
//! let index = MeshIndex::new(mesh).unwrap();
//! let region = FaceRegion::new(vec![0, 1], RegionOrigin::Overhang, Vector3::y());
//!
//! let rails = solve_placement(&region, &index, PlacementKind::Rail, &PlacementParams::default())
//!     .unwrap();
//! let PlacementShape::Rail { segments, .. } = rails.shape else { unreachable!() };
//! // the two long sides
//! assert_eq!(segments.len(), 2);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod batch;
mod edges;
mod error;
mod export;
mod params;
mod placement;
mod shapes;

pub use batch::{
    PassControl, PlacementBatch, ProgressFn, SkipReason, SkippedRegion, solve_placements,
};
pub use edges::{Segment, boundary_runs, merge_nearby_edges, region_boundary_edges};
pub use error::{ExportError, ExportResult, PlacementError, PlacementResult};
pub use export::{DumpBounds, MeshDump, save_stl_binary, write_stl_binary};
pub use params::{BoxParams, ColumnParams, NotchParams, PlacementParams, RailParams, WingParams};
pub use placement::{Placement, PlacementKind, PlacementShape, attached_faces, solve_placement};
pub use shapes::{cuboid, edge_rail, place, tapered_column, upright_frame, wing_plate};
