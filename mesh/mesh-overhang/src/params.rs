//! Parameters for overhang and dangling-feature analysis.

use mesh_types::UpAxis;
use nalgebra::Vector3;

use crate::error::{OverhangError, OverhangResult};
use crate::filter::RegionFilter;

/// Parameters for angle-based overhang analysis.
///
/// `support_angle` is the steepest angle from vertical, in degrees, that the
/// process prints without support. A face is an overhang when it leans
/// further than that.
///
/// # Example
///
/// ```
/// use mesh_overhang::OverhangParams;
///
/// let params = OverhangParams::for_resin().with_angle_margin(5.0);
/// assert!((params.support_angle - 30.0).abs() < 1e-10);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverhangParams {
    /// Build direction. Need not be normalized.
    pub up: Vector3<f64>,

    /// Self-supporting angle from vertical, in degrees.
    pub support_angle: f64,

    /// Faces within this many degrees of the threshold may join a region
    /// that already contains a true overhang.
    pub angle_margin: f64,

    /// Region filter.
    pub filter: RegionFilter,

    /// Maximum number of regions to return, largest first.
    pub max_regions: usize,
}

impl Default for OverhangParams {
    fn default() -> Self {
        Self::new()
    }
}

impl OverhangParams {
    /// Y-up, 45 degrees, no margin, overhang filter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            up: Vector3::new(0.0, 1.0, 0.0),
            support_angle: 45.0,
            angle_margin: 0.0,
            filter: RegionFilter::overhang(),
            max_regions: 20,
        }
    }

    /// Filament printing: 45 degrees.
    #[must_use]
    pub const fn for_fdm() -> Self {
        Self::new()
    }

    /// Resin printing: 30 degrees, with a small margin so peeling
    /// forces on shallow faces next to an overhang are covered.
    #[must_use]
    pub const fn for_resin() -> Self {
        Self {
            support_angle: 30.0,
            angle_margin: 2.0,
            ..Self::new()
        }
    }

    /// Set the build direction.
    #[must_use]
    pub const fn with_up(mut self, up: Vector3<f64>) -> Self {
        self.up = up;
        self
    }

    /// Set the build direction from a world axis.
    #[must_use]
    pub fn with_axis(self, axis: UpAxis) -> Self {
        self.with_up(axis.unit())
    }

    /// Set the self-supporting angle.
    #[must_use]
    pub const fn with_support_angle(mut self, degrees: f64) -> Self {
        self.support_angle = degrees;
        self
    }

    /// Set the relaxed-growth margin.
    #[must_use]
    pub const fn with_angle_margin(mut self, degrees: f64) -> Self {
        self.angle_margin = degrees;
        self
    }

    /// Set the region filter.
    #[must_use]
    pub const fn with_filter(mut self, filter: RegionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the region cap.
    #[must_use]
    pub const fn with_max_regions(mut self, count: usize) -> Self {
        self.max_regions = count;
        self
    }

    /// Check the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`OverhangError::InvalidConfig`] if `up` has no direction, the
    /// angle lies outside `[0, 90)`, the margin is negative or larger than
    /// the angle, the region cap is zero, or the filter is invalid.
    pub fn validate(&self) -> OverhangResult<()> {
        if !self.up.iter().all(|c| c.is_finite()) || self.up.norm() <= f64::EPSILON {
            return Err(OverhangError::config("up must be a finite non-zero vector"));
        }
        if !(0.0..90.0).contains(&self.support_angle) {
            return Err(OverhangError::config(format!(
                "support_angle must lie in [0, 90), got {}",
                self.support_angle
            )));
        }
        if !(0.0..=self.support_angle).contains(&self.angle_margin) {
            return Err(OverhangError::config(format!(
                "angle_margin must lie in [0, support_angle], got {}",
                self.angle_margin
            )));
        }
        if self.max_regions == 0 {
            return Err(OverhangError::config("max_regions must be at least 1"));
        }
        self.filter.validate()
    }
}

/// Parameters for dangling-feature analysis.
///
/// # Example
///
/// ```
/// use mesh_overhang::DanglingParams;
/// use mesh_types::UpAxis;
///
/// let params = DanglingParams::new(0.1, 1.0).with_axis(UpAxis::Z);
/// assert_eq!(params.axis, UpAxis::Z);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DanglingParams {
    /// World vertical axis.
    pub axis: UpAxis,

    /// A neighbor this much lower disqualifies a vertex from being lowest.
    pub min_drop: f64,

    /// Vertices at or below this height rest on the build plate.
    pub min_height: f64,

    /// Support angle used to pick candidate faces. At 0 every face that
    /// looks downward at all is a candidate.
    pub candidate_angle: f64,

    /// Seed regions smaller than this are merged into a neighbor.
    pub min_region_vertices: usize,

    /// Region filter. Size applies to the whole feature, shape to its tip.
    pub filter: RegionFilter,

    /// Maximum number of features to return, largest first.
    pub max_regions: usize,
}

impl Default for DanglingParams {
    fn default() -> Self {
        Self::new(0.05, 0.2)
    }
}

impl DanglingParams {
    /// Y-up parameters with the given drop and height thresholds.
    #[must_use]
    pub const fn new(min_drop: f64, min_height: f64) -> Self {
        Self {
            axis: UpAxis::Y,
            min_drop,
            min_height,
            candidate_angle: 0.0,
            min_region_vertices: 3,
            filter: RegionFilter::dangling(),
            max_regions: 20,
        }
    }

    /// Set the vertical axis.
    #[must_use]
    pub const fn with_axis(mut self, axis: UpAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Set the candidate-face angle.
    #[must_use]
    pub const fn with_candidate_angle(mut self, degrees: f64) -> Self {
        self.candidate_angle = degrees;
        self
    }

    /// Set the seed-region size floor.
    #[must_use]
    pub const fn with_min_region_vertices(mut self, count: usize) -> Self {
        self.min_region_vertices = count;
        self
    }

    /// Set the region filter.
    #[must_use]
    pub const fn with_filter(mut self, filter: RegionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the region cap.
    #[must_use]
    pub const fn with_max_regions(mut self, count: usize) -> Self {
        self.max_regions = count;
        self
    }

    /// Check the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`OverhangError::InvalidConfig`] if `min_drop` is not positive,
    /// `min_height` is not finite, the candidate angle lies outside
    /// `[0, 90)`, the region cap is zero, or the filter is invalid.
    pub fn validate(&self) -> OverhangResult<()> {
        if !self.min_drop.is_finite() || self.min_drop <= 0.0 {
            return Err(OverhangError::config(format!(
                "min_drop must be positive, got {}",
                self.min_drop
            )));
        }
        if !self.min_height.is_finite() {
            return Err(OverhangError::config("min_height must be finite"));
        }
        if !(0.0..90.0).contains(&self.candidate_angle) {
            return Err(OverhangError::config(format!(
                "candidate_angle must lie in [0, 90), got {}",
                self.candidate_angle
            )));
        }
        if self.max_regions == 0 {
            return Err(OverhangError::config("max_regions must be at least 1"));
        }
        self.filter.validate()
    }
}
