//! Shape filters that reject noise regions.
//!
//! Two scores decide whether a candidate region is a real feature:
//!
//! - **Lower-neighbor fraction**: how often a face has a neighbor sitting
//!   clearly below it. Slopes and stair-steps score high, tips score low.
//! - **Convexity**: the share of face/neighbor pairs that bend outward.
//!   Pockets and creases score low, bumps and tips score high.

use mesh_index::MeshIndex;
use nalgebra::Vector3;
use rayon::prelude::*;

use crate::error::{OverhangError, OverhangResult};

/// Pairs whose bend measure is smaller than this are treated as flat.
const CONVEXITY_EPSILON: f64 = 1e-9;

/// Thresholds applied to candidate regions.
///
/// # Example
///
/// ```
/// use mesh_overhang::RegionFilter;
///
/// let filter = RegionFilter::dangling().with_min_faces(3);
/// assert_eq!(filter.min_faces, 3);
/// assert_eq!(filter.min_convexity, Some(0.6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionFilter {
    /// A neighbor counts as lower when its centroid is more than this far below.
    pub min_delta_height: f64,

    /// Reject regions whose average lower-neighbor fraction exceeds this.
    pub max_lower_fraction: Option<f64>,

    /// Reject regions whose convexity score falls below this.
    pub min_convexity: Option<f64>,

    /// Reject regions with fewer faces than this.
    pub min_faces: usize,
}

impl Default for RegionFilter {
    fn default() -> Self {
        Self::overhang()
    }
}

impl RegionFilter {
    /// Preset for angle-based overhang regions.
    ///
    /// Overhangs are often concave (the underside of a table top meets its
    /// legs in a crease), so there is no convexity floor.
    #[must_use]
    pub const fn overhang() -> Self {
        Self {
            min_delta_height: 0.05,
            max_lower_fraction: Some(0.45),
            min_convexity: None,
            min_faces: 10,
        }
    }

    /// Preset for dangling-feature tips.
    #[must_use]
    pub const fn dangling() -> Self {
        Self {
            min_delta_height: 0.05,
            max_lower_fraction: Some(0.35),
            min_convexity: Some(0.6),
            min_faces: 6,
        }
    }

    /// A filter that keeps every non-empty region.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            min_delta_height: 0.05,
            max_lower_fraction: None,
            min_convexity: None,
            min_faces: 1,
        }
    }

    /// Set the lower-neighbor height delta.
    #[must_use]
    pub const fn with_min_delta_height(mut self, delta: f64) -> Self {
        self.min_delta_height = delta;
        self
    }

    /// Set or clear the lower-neighbor fraction ceiling.
    #[must_use]
    pub const fn with_max_lower_fraction(mut self, fraction: Option<f64>) -> Self {
        self.max_lower_fraction = fraction;
        self
    }

    /// Set or clear the convexity floor.
    #[must_use]
    pub const fn with_min_convexity(mut self, convexity: Option<f64>) -> Self {
        self.min_convexity = convexity;
        self
    }

    /// Set the minimum face count.
    #[must_use]
    pub const fn with_min_faces(mut self, min_faces: usize) -> Self {
        self.min_faces = min_faces;
        self
    }

    /// Check that thresholds are finite and in range.
    ///
    /// # Errors
    ///
    /// Returns [`OverhangError::InvalidConfig`] for a negative height delta or
    /// a fraction outside `[0, 1]`.
    pub fn validate(&self) -> OverhangResult<()> {
        if !self.min_delta_height.is_finite() || self.min_delta_height < 0.0 {
            return Err(OverhangError::config(format!(
                "min_delta_height must be a non-negative number, got {}",
                self.min_delta_height
            )));
        }
        for (name, value) in [
            ("max_lower_fraction", self.max_lower_fraction),
            ("min_convexity", self.min_convexity),
        ] {
            if let Some(v) = value
                && !(0.0..=1.0).contains(&v)
            {
                return Err(OverhangError::config(format!(
                    "{name} must lie in [0, 1], got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Apply every threshold to one set of faces.
    ///
    /// Heights are measured along `up`, which need not be normalized.
    #[must_use]
    pub fn evaluate(&self, faces: &[usize], index: &MeshIndex, up: &Vector3<f64>) -> FilterVerdict {
        match self.check_size(faces) {
            FilterVerdict::Keep { .. } => self.evaluate_shape(faces, index, up),
            rejected => rejected,
        }
    }

    /// Apply only the face-count threshold.
    #[must_use]
    pub fn check_size(&self, faces: &[usize]) -> FilterVerdict {
        if faces.is_empty() || faces.len() < self.min_faces {
            FilterVerdict::TooSmall { faces: faces.len() }
        } else {
            FilterVerdict::Keep {
                lower_fraction: None,
                convexity: None,
            }
        }
    }

    /// Apply only the shape thresholds.
    ///
    /// Scores that are not thresholded are not computed.
    #[must_use]
    pub fn evaluate_shape(
        &self,
        faces: &[usize],
        index: &MeshIndex,
        up: &Vector3<f64>,
    ) -> FilterVerdict {
        let mut lower = None;
        if let Some(ceiling) = self.max_lower_fraction {
            let fraction = lower_neighbor_fraction(faces, index, up, self.min_delta_height);
            if fraction > ceiling {
                return FilterVerdict::Slope { fraction };
            }
            lower = Some(fraction);
        }

        let mut convexity = None;
        if let Some(floor) = self.min_convexity
            && let Some(score) = convexity_score(faces, index)
        {
            if score < floor {
                return FilterVerdict::Concave { score };
            }
            convexity = Some(score);
        }

        FilterVerdict::Keep {
            lower_fraction: lower,
            convexity,
        }
    }
}

/// Outcome of filtering one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterVerdict {
    /// The region passed. Scores that were evaluated are attached.
    Keep {
        /// Average lower-neighbor fraction, if evaluated.
        lower_fraction: Option<f64>,
        /// Convexity score, if evaluated and defined.
        convexity: Option<f64>,
    },
    /// Too few faces.
    TooSmall {
        /// Face count of the region.
        faces: usize,
    },
    /// Too many faces sit above a lower neighbor.
    Slope {
        /// Average lower-neighbor fraction.
        fraction: f64,
    },
    /// The region bends inward too often.
    Concave {
        /// Convexity score.
        score: f64,
    },
}

impl FilterVerdict {
    /// Whether the region passed.
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep { .. })
    }
}

/// Average share of each face's neighbors that sit more than `min_delta`
/// below it along `up`.
///
/// Neighbors outside `faces` count. A face without neighbors scores 0, and
/// an empty set scores 0.
#[must_use]
pub fn lower_neighbor_fraction(
    faces: &[usize],
    index: &MeshIndex,
    up: &Vector3<f64>,
    min_delta: f64,
) -> f64 {
    let Some(up) = up.try_normalize(f64::EPSILON) else {
        return 0.0;
    };
    if faces.is_empty() {
        return 0.0;
    }
    let adjacency = index.face_adjacency();
    let centroids = index.face_centroids();
    let height = |f: usize| centroids[f].coords.dot(&up);

    let total: f64 = faces
        .par_iter()
        .filter(|&&f| f < centroids.len())
        .map(|&f| {
            let neighbors = adjacency.neighbors(f);
            if neighbors.is_empty() {
                return 0.0;
            }
            let own = height(f);
            let lower = neighbors
                .iter()
                .filter(|&&n| height(n) < own - min_delta)
                .count();
            #[allow(clippy::cast_precision_loss)]
            // Precision: neighbor counts are tiny
            let fraction = lower as f64 / neighbors.len() as f64;
            fraction
        })
        .sum();

    #[allow(clippy::cast_precision_loss)]
    // Precision: face counts stay far below 2^52
    let mean = total / faces.len() as f64;
    mean
}

/// Share of outward bends among face/neighbor pairs.
///
/// For a face with normal `n1` and centroid `c1` and a neighbor with `n2`,
/// `c2`, the pair bends outward when `(n2 - n1) · (c2 - c1) > 0`. Pairs with
/// a measure within `1e-9` of zero are coplanar and not counted, nor are
/// pairs involving a degenerate face. Neighbors outside `faces` count.
///
/// Returns `None` when no pair was counted.
#[must_use]
pub fn convexity_score(faces: &[usize], index: &MeshIndex) -> Option<f64> {
    let adjacency = index.face_adjacency();
    let normals = index.face_normals();
    let centroids = index.face_centroids();

    let (convex, counted) = faces
        .par_iter()
        .filter(|&&f| f < normals.len())
        .map(|&f| {
            let mut convex = 0usize;
            let mut counted = 0usize;
            let Some(n1) = normals[f] else {
                return (0, 0);
            };
            for &g in adjacency.neighbors(f) {
                let Some(n2) = normals[g] else { continue };
                let s = (n2 - n1).dot(&(centroids[g] - centroids[f]));
                if s.abs() > CONVEXITY_EPSILON {
                    counted += 1;
                    if s > 0.0 {
                        convex += 1;
                    }
                }
            }
            (convex, counted)
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

    #[allow(clippy::cast_precision_loss)]
    // Precision: pair counts stay far below 2^52
    (counted > 0).then(|| convex as f64 / counted as f64)
}
