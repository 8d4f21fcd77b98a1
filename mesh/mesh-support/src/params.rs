//! Shape and placement parameters.

use mesh_collide::RaycastParams;
use mesh_types::UpAxis;

use crate::error::{PlacementResult, config};

fn positive(name: &str, value: f64) -> PlacementResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(config(format!("{name} must be positive, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> PlacementResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(config(format!("{name} must be non-negative, got {value}")))
    }
}

/// Tapered column: a polygonal frustum from the obstruction up to the tip.
///
/// # Example
///
/// ```
/// use mesh_support::ColumnParams;
///
/// let params = ColumnParams::default().with_sides(6);
/// assert!((params.radius - 2.0).abs() < 1e-12);
/// assert!(params.validate().is_ok());
/// assert!(params.with_taper(0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnParams {
    /// Radius of the base ring.
    pub radius: f64,
    /// Top radius as a fraction of the base radius, in `(0, 1]`.
    pub taper: f64,
    /// Number of polygon sides.
    pub sides: usize,
    /// Shrinking stops below this radius.
    pub min_radius: f64,
}

impl Default for ColumnParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnParams {
    /// Radius 2, taper 0.6, eight sides.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            radius: 2.0,
            taper: 0.6,
            sides: 8,
            min_radius: 0.5,
        }
    }

    /// Set the base radius.
    #[must_use]
    pub const fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the taper.
    #[must_use]
    pub const fn with_taper(mut self, taper: f64) -> Self {
        self.taper = taper;
        self
    }

    /// Set the side count.
    #[must_use]
    pub const fn with_sides(mut self, sides: usize) -> Self {
        self.sides = sides;
        self
    }

    /// Set the smallest radius the shrink loop may try.
    #[must_use]
    pub const fn with_min_radius(mut self, radius: f64) -> Self {
        self.min_radius = radius;
        self
    }

    /// Check the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidConfig`](crate::PlacementError) if
    /// the radius is not positive, the taper lies outside `(0, 1]`, there
    /// are fewer than three sides, or `min_radius` exceeds `radius`.
    pub fn validate(&self) -> PlacementResult<()> {
        positive("radius", self.radius)?;
        if !(self.taper > 0.0 && self.taper <= 1.0) {
            return Err(config(format!("taper must lie in (0, 1], got {}", self.taper)));
        }
        if self.sides < 3 {
            return Err(config(format!("sides must be at least 3, got {}", self.sides)));
        }
        positive("min_radius", self.min_radius)?;
        if self.min_radius > self.radius {
            return Err(config("min_radius must not exceed radius"));
        }
        Ok(())
    }
}

/// Edge rails: thin walls under the boundary of a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RailParams {
    /// Wall thickness across the edge.
    pub width: f64,
    /// Edges shorter than this horizontally get no rail.
    pub min_edge_length: f64,
    /// Boundary edges with endpoints this close are chained.
    pub merge_distance: f64,
    /// Chains shorter than this after merging are dropped.
    pub min_length: f64,
    /// A run of boundary edges is cut where it turns further than this, in
    /// degrees.
    pub max_turn: f64,
}

impl Default for RailParams {
    fn default() -> Self {
        Self::new()
    }
}

impl RailParams {
    /// Width 1, merge distance 1, minimum chain length 2.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            width: 1.0,
            min_edge_length: 0.1,
            merge_distance: 1.0,
            min_length: 2.0,
            max_turn: 30.0,
        }
    }

    /// Set the wall thickness.
    #[must_use]
    pub const fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Set the chaining distance.
    #[must_use]
    pub const fn with_merge_distance(mut self, distance: f64) -> Self {
        self.merge_distance = distance;
        self
    }

    /// Set the shortest chain kept.
    #[must_use]
    pub const fn with_min_length(mut self, length: f64) -> Self {
        self.min_length = length;
        self
    }

    /// Set the turn that splits a boundary run.
    #[must_use]
    pub const fn with_max_turn(mut self, degrees: f64) -> Self {
        self.max_turn = degrees;
        self
    }

    /// Check the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidConfig`](crate::PlacementError) for
    /// a non-positive width or a negative length, distance or turn.
    pub fn validate(&self) -> PlacementResult<()> {
        positive("width", self.width)?;
        non_negative("min_edge_length", self.min_edge_length)?;
        non_negative("merge_distance", self.merge_distance)?;
        non_negative("min_length", self.min_length)?;
        if !(0.0..=180.0).contains(&self.max_turn) {
            return Err(config(format!("max_turn must lie in [0, 180], got {}", self.max_turn)));
        }
        Ok(())
    }
}

/// A thinned band near the top of a wing plate that makes it easy to snap
/// off after printing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotchParams {
    /// Fraction of the plate thickness removed in the band, in `[0, 1)`.
    pub depth: f64,
    /// Distance from the plate top to the top of the band.
    pub offset_from_top: f64,
    /// Height of the band.
    pub band_height: f64,
}

impl Default for NotchParams {
    fn default() -> Self {
        Self::new()
    }
}

impl NotchParams {
    /// Half depth, 2 below the top, 0.8 tall.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            depth: 0.5,
            offset_from_top: 2.0,
            band_height: 0.8,
        }
    }

    /// Set the depth.
    #[must_use]
    pub const fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    /// Set the offset from the top.
    #[must_use]
    pub const fn with_offset_from_top(mut self, offset: f64) -> Self {
        self.offset_from_top = offset;
        self
    }

    /// Set the band height.
    #[must_use]
    pub const fn with_band_height(mut self, height: f64) -> Self {
        self.band_height = height;
        self
    }

    /// Check the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidConfig`](crate::PlacementError) if
    /// the depth lies outside `[0, 1)` or a distance is not positive.
    pub fn validate(&self) -> PlacementResult<()> {
        if !(0.0..1.0).contains(&self.depth) {
            return Err(config(format!("notch depth must lie in [0, 1), got {}", self.depth)));
        }
        positive("offset_from_top", self.offset_from_top)?;
        positive("band_height", self.band_height)
    }
}

/// A thin plate standing under a region.
///
/// The plate is built in a local frame: width along X centered on the
/// origin, thickness along Z centered on the origin, height from 0 to
/// `height` along +Y.
///
/// # Example
///
/// ```
/// use mesh_support::{NotchParams, WingParams};
///
/// let wing = WingParams::new(4.0, 1.0, 10.0).with_notch(Some(NotchParams::default()));
/// assert!(wing.validate().is_ok());
/// assert!(wing.with_thickness(-1.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WingParams {
    /// Plate width, and the smallest width the solver starts from.
    pub width: f64,
    /// Plate thickness.
    pub thickness: f64,
    /// Plate height. The solver replaces it with the measured span.
    pub height: f64,
    /// Optional break-off notch.
    pub notch: Option<NotchParams>,
}

impl Default for WingParams {
    fn default() -> Self {
        Self::notched()
    }
}

impl WingParams {
    /// A plate without a notch.
    #[must_use]
    pub const fn new(width: f64, thickness: f64, height: f64) -> Self {
        Self {
            width,
            thickness,
            height,
            notch: None,
        }
    }

    /// Width 2, thickness 0.8, with the default notch.
    #[must_use]
    pub const fn notched() -> Self {
        Self::new(2.0, 0.8, 10.0).with_notch(Some(NotchParams::new()))
    }

    /// Set the width.
    #[must_use]
    pub const fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Set the thickness.
    #[must_use]
    pub const fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    /// Set the height.
    #[must_use]
    pub const fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Set or clear the notch.
    #[must_use]
    pub const fn with_notch(mut self, notch: Option<NotchParams>) -> Self {
        self.notch = notch;
        self
    }

    /// Check the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidConfig`](crate::PlacementError) if a
    /// dimension is not positive or the notch is invalid.
    pub fn validate(&self) -> PlacementResult<()> {
        positive("width", self.width)?;
        positive("thickness", self.thickness)?;
        positive("height", self.height)?;
        self.notch.as_ref().map_or(Ok(()), NotchParams::validate)
    }
}

/// Vertical-extent fitting for box supports under dangling volumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxParams {
    /// Scale applied to the region's horizontal half-size.
    pub footprint_scale: f64,
    /// Added to each side of the scaled footprint.
    pub footprint_padding: f64,
    /// Faces within this many degrees of horizontal block vertically.
    pub blocking_angle: f64,
    /// The box must reach at least this far above the region's lowest point.
    pub min_overlap: f64,
    /// How far the box may reach below the lowest point.
    pub depth_below: f64,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxParams {
    /// Scale 1.2, padding 1, blocking at 45 degrees, overlap 0.5, depth 2.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            footprint_scale: 1.2,
            footprint_padding: 1.0,
            blocking_angle: 45.0,
            min_overlap: 0.5,
            depth_below: 2.0,
        }
    }

    /// Set the footprint scale.
    #[must_use]
    pub const fn with_footprint_scale(mut self, scale: f64) -> Self {
        self.footprint_scale = scale;
        self
    }

    /// Set the footprint padding.
    #[must_use]
    pub const fn with_footprint_padding(mut self, padding: f64) -> Self {
        self.footprint_padding = padding;
        self
    }

    /// Set the minimum overlap with the region.
    #[must_use]
    pub const fn with_min_overlap(mut self, overlap: f64) -> Self {
        self.min_overlap = overlap;
        self
    }

    /// Set the reach below the lowest point.
    #[must_use]
    pub const fn with_depth_below(mut self, depth: f64) -> Self {
        self.depth_below = depth;
        self
    }

    /// Check the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidConfig`](crate::PlacementError) for
    /// a non-positive scale, a negative distance, or a blocking angle
    /// outside `[0, 90]`.
    pub fn validate(&self) -> PlacementResult<()> {
        positive("footprint_scale", self.footprint_scale)?;
        non_negative("footprint_padding", self.footprint_padding)?;
        positive("min_overlap", self.min_overlap)?;
        non_negative("depth_below", self.depth_below)?;
        if !(0.0..=90.0).contains(&self.blocking_angle) {
            return Err(config(format!(
                "blocking_angle must lie in [0, 90], got {}",
                self.blocking_angle
            )));
        }
        Ok(())
    }
}

/// Parameters for [`solve_placement`](crate::solve_placement).
///
/// Each kind reads its own shape parameters. The shrink loop settings and
/// the clearance are shared.
///
/// # Example
///
/// ```
/// use mesh_support::{ColumnParams, PlacementParams};
/// use mesh_types::UpAxis;
///
/// let params = PlacementParams::new()
///     .with_axis(UpAxis::Z)
///     .with_column(ColumnParams::default().with_radius(1.0).with_min_radius(0.2));
/// assert!(params.validate().is_ok());
/// assert_eq!(params.max_attempts, 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementParams {
    /// World vertical axis.
    pub axis: UpAxis,
    /// Gap kept between a support and the surfaces above and below it.
    pub clearance: f64,
    /// Factor applied to the footprint, radius or width after a failed try.
    pub shrink_ratio: f64,
    /// Maximum number of tries per region.
    pub max_attempts: usize,
    /// Box fitting.
    pub boxes: BoxParams,
    /// Columns.
    pub column: ColumnParams,
    /// Rails.
    pub rail: RailParams,
    /// Wings.
    pub wing: WingParams,
    /// Obstruction lookup under the support.
    pub raycast: RaycastParams,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementParams {
    /// Y-up defaults: clearance 0.2, shrink by 0.8, six attempts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            axis: UpAxis::Y,
            clearance: 0.2,
            shrink_ratio: 0.8,
            max_attempts: 6,
            boxes: BoxParams::new(),
            column: ColumnParams::new(),
            rail: RailParams::new(),
            wing: WingParams::notched(),
            raycast: RaycastParams::new(),
        }
    }

    /// Set the vertical axis.
    #[must_use]
    pub const fn with_axis(mut self, axis: UpAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Set the clearance.
    #[must_use]
    pub const fn with_clearance(mut self, clearance: f64) -> Self {
        self.clearance = clearance;
        self
    }

    /// Set the shrink factor.
    #[must_use]
    pub const fn with_shrink_ratio(mut self, ratio: f64) -> Self {
        self.shrink_ratio = ratio;
        self
    }

    /// Set the attempt limit.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the box parameters.
    #[must_use]
    pub const fn with_boxes(mut self, boxes: BoxParams) -> Self {
        self.boxes = boxes;
        self
    }

    /// Set the column parameters.
    #[must_use]
    pub const fn with_column(mut self, column: ColumnParams) -> Self {
        self.column = column;
        self
    }

    /// Set the rail parameters.
    #[must_use]
    pub const fn with_rail(mut self, rail: RailParams) -> Self {
        self.rail = rail;
        self
    }

    /// Set the wing parameters.
    #[must_use]
    pub const fn with_wing(mut self, wing: WingParams) -> Self {
        self.wing = wing;
        self
    }

    /// Set the obstruction lookup.
    #[must_use]
    pub const fn with_raycast(mut self, raycast: RaycastParams) -> Self {
        self.raycast = raycast;
        self
    }

    /// Check every nested parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidConfig`](crate::PlacementError) for
    /// the first invalid value found.
    pub fn validate(&self) -> PlacementResult<()> {
        non_negative("clearance", self.clearance)?;
        if !(self.shrink_ratio > 0.0 && self.shrink_ratio < 1.0) {
            return Err(config(format!(
                "shrink_ratio must lie in (0, 1), got {}",
                self.shrink_ratio
            )));
        }
        if self.max_attempts == 0 {
            return Err(config("max_attempts must be at least 1"));
        }
        self.boxes.validate()?;
        self.column.validate()?;
        self.rail.validate()?;
        self.wing.validate()?;
        self.raycast.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlacementError;

    #[test]
    fn defaults_are_valid() {
        assert!(PlacementParams::default().validate().is_ok());
        assert!(WingParams::default().notch.is_some());
        assert!((BoxParams::default().footprint_scale - 1.2).abs() < 1e-12);
        assert!((RailParams::default().min_edge_length - 0.1).abs() < 1e-12);
    }

    #[test]
    fn column_bounds() {
        let column = ColumnParams::default();
        assert!(column.with_taper(1.0).validate().is_ok());
        assert!(column.with_taper(1.1).validate().is_err());
        assert!(column.with_sides(2).validate().is_err());
        assert!(column.with_min_radius(3.0).validate().is_err());
    }

    #[test]
    fn notch_depth_is_half_open() {
        assert!(NotchParams::default().with_depth(0.0).validate().is_ok());
        assert!(NotchParams::default().with_depth(1.0).validate().is_err());
    }

    #[test]
    fn nested_errors_surface() {
        let params = PlacementParams::new().with_rail(RailParams::new().with_width(0.0));
        assert!(matches!(params.validate(), Err(PlacementError::InvalidConfig { .. })));

        let params = PlacementParams::new().with_raycast(RaycastParams::new().with_clearance(-1.0));
        assert!(matches!(params.validate(), Err(PlacementError::InvalidConfig { .. })));

        assert!(PlacementParams::new().with_shrink_ratio(1.0).validate().is_err());
        assert!(PlacementParams::new().with_max_attempts(0).validate().is_err());
    }
}
