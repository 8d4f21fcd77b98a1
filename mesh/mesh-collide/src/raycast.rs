//! Vertical ray casting for obstruction heights.
//!
//! A support resting under a point needs to know what the mesh itself puts
//! in the way. [`height_below`] drops a ray from a ceiling and reports the
//! highest surface it meets, or the build plate at height zero.

use mesh_types::{IndexedMesh, MeshTopology, Triangle, UpAxis};
use rayon::prelude::*;

use crate::error::{CollideError, CollideResult};

/// Parameters for [`height_below`].
///
/// # Example
///
/// ```
/// use mesh_collide::RaycastParams;
///
/// let params = RaycastParams::default().with_clearance(1.0);
/// assert!(params.validate().is_ok());
/// assert!((params.barycentric_slack - 0.1).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastParams {
    /// Horizontal margin added to each triangle's footprint before testing.
    pub bounds_margin: f64,

    /// How far outside a triangle, in barycentric units, still counts as a hit.
    pub barycentric_slack: f64,

    /// Hits must lie at least this far below the ceiling.
    pub clearance: f64,

    /// Meshes with more faces than this are scanned in parallel.
    pub parallel_threshold: usize,
}

impl Default for RaycastParams {
    fn default() -> Self {
        Self::new()
    }
}

impl RaycastParams {
    /// Default parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bounds_margin: 0.5,
            barycentric_slack: 0.1,
            clearance: 0.5,
            parallel_threshold: 4096,
        }
    }

    /// Exact hits only: no footprint margin and no barycentric slack.
    #[must_use]
    pub const fn exact() -> Self {
        Self {
            bounds_margin: 0.0,
            barycentric_slack: 0.0,
            ..Self::new()
        }
    }

    /// Set the footprint margin.
    #[must_use]
    pub const fn with_bounds_margin(mut self, margin: f64) -> Self {
        self.bounds_margin = margin;
        self
    }

    /// Set the barycentric slack.
    #[must_use]
    pub const fn with_barycentric_slack(mut self, slack: f64) -> Self {
        self.barycentric_slack = slack;
        self
    }

    /// Set the clearance under the ceiling.
    #[must_use]
    pub const fn with_clearance(mut self, clearance: f64) -> Self {
        self.clearance = clearance;
        self
    }

    /// Set the face count above which the scan runs in parallel.
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Check that every distance is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`CollideError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> CollideResult<()> {
        let fields = [
            ("bounds_margin", self.bounds_margin),
            ("barycentric_slack", self.barycentric_slack),
            ("clearance", self.clearance),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CollideError::InvalidConfig {
                    message: format!("{name} must be finite and non-negative, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Highest mesh surface under a point, below `ceiling`.
///
/// Every triangle whose footprint (grown by `bounds_margin`) contains the
/// point is projected onto the horizontal plane. A hit needs all three
/// barycentric weights above `-barycentric_slack` and a height below
/// `ceiling - clearance`. Hits below the build plate are clamped to zero and
/// a miss reports zero.
///
/// # Example
///
/// ```
/// use mesh_collide::{RaycastParams, height_below};
/// use mesh_types::{UpAxis, unit_cube};
///
/// let cube = unit_cube();
/// // the cube's top at z = 1 sits under a ceiling at z = 5
/// let h = height_below(&cube, [0.5, 0.5], 5.0, UpAxis::Z, &RaycastParams::default());
/// assert!((h - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn height_below(
    mesh: &IndexedMesh,
    plane_point: [f64; 2],
    ceiling: f64,
    axis: UpAxis,
    params: &RaycastParams,
) -> f64 {
    let limit = ceiling - params.clearance;
    let hit = |face: usize| {
        mesh.triangle(face)
            .and_then(|tri| surface_height(&tri, plane_point, axis, params))
            .filter(|&h| h < limit)
    };

    let n = mesh.face_count();
    let highest = if n > params.parallel_threshold {
        (0..n)
            .into_par_iter()
            .filter_map(hit)
            .reduce(|| 0.0, f64::max)
    } else {
        (0..n).filter_map(hit).fold(0.0, f64::max)
    };
    highest.max(0.0)
}

/// Height of a triangle above a plane point, if the vertical line through
/// the point meets it within the slack.
fn surface_height(
    tri: &Triangle,
    p: [f64; 2],
    axis: UpAxis,
    params: &RaycastParams,
) -> Option<f64> {
    if !tri.bounds().plane_contains(axis, p, params.bounds_margin) {
        return None;
    }

    let [a, b, c] = tri.vertices().map(|v| axis.plane(&v));
    let cross = |u: [f64; 2], v: [f64; 2], w: [f64; 2]| {
        (v[0] - u[0]) * (w[1] - u[1]) - (v[1] - u[1]) * (w[0] - u[0])
    };

    let det = cross(a, b, c);
    if det.abs() < 1e-12 {
        return None;
    }
    let wa = cross(p, b, c) / det;
    let wb = cross(p, c, a) / det;
    let wc = 1.0 - wa - wb;

    let slack = -params.barycentric_slack;
    if wa < slack || wb < slack || wc < slack {
        return None;
    }

    Some(wa * axis.height(&tri.v0) + wb * axis.height(&tri.v1) + wc * axis.height(&tri.v2))
}
