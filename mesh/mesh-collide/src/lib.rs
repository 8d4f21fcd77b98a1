//! Bounding volumes and collision queries for support placement.
//!
//! - [`obb_from_points`] fits an [`OrientedBoundingBox`] by principal
//!   component analysis.
//! - [`obb_triangle_overlap`], [`collides`] and [`find_collision`] test a box
//!   against mesh triangles with the separating-axis theorem.
//! - [`obb_intersects_obb`] tests two boxes.
//! - [`height_below`] finds the surface under a point so that supports can
//!   rest on the part instead of passing through it.
//!
//! # Example
//!
//! ```
//! use hashbrown::HashSet;
//! use mesh_collide::{collides, obb_from_points};
//! use mesh_types::{Point3, unit_cube};
//!
//! let column = obb_from_points(&[
//!     Point3::new(0.4, 0.4, -3.0),
//!     Point3::new(0.6, 0.6, -1.0),
//! ]);
//! assert!(!collides(&column, &unit_cube(), &HashSet::new()));
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod obb;
mod raycast;
mod sat;

pub use error::{CollideError, CollideResult};
pub use obb::{OrientedBoundingBox, obb_from_points, obb_intersects_obb};
pub use raycast::{RaycastParams, height_below};
pub use sat::{collides, find_collision, obb_triangle_overlap};
