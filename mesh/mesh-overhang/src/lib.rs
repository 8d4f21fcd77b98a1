//! Overhang and dangling-feature detection for support generation.
//!
//! Two independent analyses find the parts of a mesh that need support:
//!
//! - **Overhangs**: faces that lean past the printable angle, grouped into
//!   connected regions ([`analyze_overhangs`]).
//! - **Dangling features**: material hanging below its surroundings, found
//!   from vertex heights ([`analyze_dangling`]).
//!
//! Both pipelines run a [`RegionFilter`] that rejects slopes and pockets so
//! that only real features reach support placement.
//!
//! # Angles
//!
//! The support angle is measured from vertical. A face is an overhang when
//! the angle between its normal and the build direction exceeds
//! `90° + support_angle`. Reported overhang angles are measured from
//! straight down: 0° hangs flat, 90° is a wall.
//!
//! # Example
//!
//! ```
//! use mesh_index::MeshIndex;
//! use mesh_overhang::{FaceMask, classify, grow_all};
//! use mesh_types::unit_cube;
//! use nalgebra::Vector3;
//!
//! let index = MeshIndex::new(unit_cube()).unwrap();
//! let mask: FaceMask = classify(index.face_normals(), &Vector3::z(), 45.0);
//! let regions = grow_all(&mask, index.face_adjacency());
//!
//! assert_eq!(regions, vec![vec![0, 1]]);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod analysis;
mod classify;
mod dangling;
mod error;
mod filter;
mod grow;
mod params;
mod region;

pub use analysis::{DanglingFeature, analyze_dangling, analyze_dangling_detailed, analyze_overhangs};
pub use classify::{FaceMask, angle_from_up, classify, overhang_angle};
pub use dangling::{
    expand_upward, find_dangling_vertex_regions, merge_small_regions, tip_faces, to_face_regions,
};
pub use error::{OverhangError, OverhangResult};
pub use filter::{FilterVerdict, RegionFilter, convexity_score, lower_neighbor_fraction};
pub use grow::{grow, grow_all, grow_relaxed};
pub use params::{DanglingParams, OverhangParams};
pub use region::{
    FaceRegion, OverhangType, RegionOrigin, RegionStats, VertexRegion, classify_overhang_type,
    suggested_support_angle,
};
