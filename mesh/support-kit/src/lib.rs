//! Overhang detection and support placement for 3D printing.
//!
//! This umbrella crate re-exports the support pipeline so that callers can
//! depend on one crate:
//!
//! 1. Index the part with [`index::MeshIndex`] (welding triangle soups).
//! 2. Find regions with [`overhang::analyze_overhangs`] or
//!    [`overhang::analyze_dangling`].
//! 3. Place supports with [`support::solve_placement`] or
//!    [`support::solve_placements`].
//! 4. Optionally export the results with [`support::write_stl_binary`].
//!
//! # Quick Start
//!
//! ```
//! use support_kit::prelude::*;
//!
//! // a block floating above the build plate
//! let mut part = unit_cube();
//! part.translate(Vector3::new(0.0, 3.0, 0.0));
//! let index = MeshIndex::new(part).unwrap();
//!
//! let params = OverhangParams::new().with_filter(RegionFilter::disabled());
//! let regions = analyze_overhangs(&index, &params).unwrap();
//! assert_eq!(regions.len(), 1);
//!
//! let batch = solve_placements(
//!     &regions,
//!     &index,
//!     PlacementKind::Column,
//!     &PlacementParams::default(),
//!     &PassControl::new(),
//! );
//! assert_eq!(batch.placements.len(), 1);
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - `IndexedMesh`, `Triangle`, `Aabb` and the build axis
//! - [`index`] - welding, adjacency and cached normals
//! - [`overhang`] - overhang and dangling-feature regions
//! - [`collide`] - oriented boxes, separating axes and ray casts
//! - [`support`] - support shapes, placement and export

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `IndexedMesh`, `Vertex`, `Triangle`, `Aabb`, `UpAxis`.
pub use mesh_types as types;

/// Welding, adjacency and cached per-face data.
pub use mesh_index as index;

/// Overhang classification, region growing and dangling features.
pub use mesh_overhang as overhang;

/// Bounding boxes, collision tests and ray casting.
pub use mesh_collide as collide;

/// Support shapes, placement and debug export.
pub use mesh_support as support;

use mesh_collide::{RaycastParams, height_below};
use mesh_types::{IndexedMesh, UpAxis};

/// Highest surface under a plane point, below `ceiling`, with default
/// [`RaycastParams`]. Zero means the build plate.
///
/// ```
/// use support_kit::ray_height_below;
/// use support_kit::types::{UpAxis, unit_cube};
///
/// let h = ray_height_below(&unit_cube(), [0.5, 0.5], 5.0, UpAxis::Z);
/// assert!((h - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn ray_height_below(
    mesh: &IndexedMesh,
    plane_point: [f64; 2],
    ceiling: f64,
    axis: UpAxis,
) -> f64 {
    height_below(mesh, plane_point, ceiling, axis, &RaycastParams::default())
}

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for support generation.
///
/// ```
/// use support_kit::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mesh_types::{
        Aabb, IndexedMesh, MeshBounds, MeshTopology, Point3, Triangle, UpAxis, Vector3, unit_cube,
    };

    // Indexing
    pub use mesh_index::{MeshIndex, WeldParams};

    // Analysis
    pub use mesh_overhang::{
        DanglingParams, FaceRegion, OverhangParams, RegionFilter, RegionOrigin, analyze_dangling,
        analyze_overhangs,
    };

    // Collision
    pub use mesh_collide::{OrientedBoundingBox, RaycastParams, obb_from_points};

    // Placement
    pub use mesh_support::{
        PassControl, Placement, PlacementError, PlacementKind, PlacementParams, PlacementShape,
        solve_placement, solve_placements,
    };

    pub use crate::ray_height_below;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prelude_imports() {
        use prelude::*;

        let mesh = IndexedMesh::new();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(PlacementKind::ALL.len(), 4);
    }

    #[test]
    fn module_reexports() {
        let _ = types::IndexedMesh::new();
        let _ = index::WeldParams::default();
        let _ = overhang::OverhangParams::default();
        let _ = collide::RaycastParams::default();
        let _ = support::PlacementParams::default();
    }

    #[test]
    fn ray_misses_report_the_plate() {
        let h = ray_height_below(&types::unit_cube(), [5.0, 5.0], 5.0, UpAxis::Z);
        assert!(h.abs() < f64::EPSILON);
    }
}
