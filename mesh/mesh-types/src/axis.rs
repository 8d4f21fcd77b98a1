//! World-vertical axis selection.

use nalgebra::{Point3, Rotation3, Vector3};

/// The world axis that points "up", away from the build plate.
///
/// Height-based analysis (dangling detection, ray casting, support
/// placement) splits every point into a height along this axis and a pair
/// of horizontal plane coordinates.
///
/// | Axis | height | plane  |
/// |------|--------|--------|
/// | `X`  | x      | (y, z) |
/// | `Y`  | y      | (x, z) |
/// | `Z`  | z      | (x, y) |
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, UpAxis};
///
/// let p = Point3::new(1.0, 5.0, 3.0);
/// assert_eq!(UpAxis::Y.plane(&p), [1.0, 3.0]);
/// assert_eq!(UpAxis::Y.compose([1.0, 3.0], 5.0), p);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpAxis {
    /// +X is up.
    X,
    /// +Y is up.
    #[default]
    Y,
    /// +Z is up.
    Z,
}

impl UpAxis {
    /// Coordinate index of the vertical axis.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Coordinate indices of the two horizontal axes, in ascending order.
    #[inline]
    #[must_use]
    pub const fn plane_indices(self) -> [usize; 2] {
        match self {
            Self::X => [1, 2],
            Self::Y => [0, 2],
            Self::Z => [0, 1],
        }
    }

    /// Unit vector along the axis.
    #[must_use]
    pub fn unit(self) -> Vector3<f64> {
        let mut v = Vector3::zeros();
        v[self.index()] = 1.0;
        v
    }

    /// Height of a point along the axis.
    #[inline]
    #[must_use]
    pub fn height(self, p: &Point3<f64>) -> f64 {
        p[self.index()]
    }

    /// Vertical component of a direction.
    #[inline]
    #[must_use]
    pub fn vertical(self, v: &Vector3<f64>) -> f64 {
        v[self.index()]
    }

    /// Horizontal plane coordinates of a point.
    #[inline]
    #[must_use]
    pub fn plane(self, p: &Point3<f64>) -> [f64; 2] {
        let [a, b] = self.plane_indices();
        [p[a], p[b]]
    }

    /// Build a point from plane coordinates and a height.
    #[must_use]
    pub fn compose(self, plane: [f64; 2], height: f64) -> Point3<f64> {
        let [a, b] = self.plane_indices();
        let mut p = Point3::origin();
        p[a] = plane[0];
        p[b] = plane[1];
        p[self.index()] = height;
        p
    }

    /// Project a direction onto the horizontal plane.
    #[must_use]
    pub fn flatten(self, v: &Vector3<f64>) -> Vector3<f64> {
        let mut out = *v;
        out[self.index()] = 0.0;
        out
    }

    /// Proper rotation taking `+Y` onto this axis.
    ///
    /// Shapes built in a Y-up local frame keep their winding when posed
    /// with it.
    #[must_use]
    pub fn frame(self) -> Rotation3<f64> {
        match self {
            Self::X => Rotation3::from_axis_angle(&Vector3::z_axis(), -std::f64::consts::FRAC_PI_2),
            Self::Y => Rotation3::identity(),
            Self::Z => Rotation3::from_axis_angle(&Vector3::x_axis(), std::f64::consts::FRAC_PI_2),
        }
    }

    /// Replace the height of a point.
    #[must_use]
    pub fn with_height(self, p: &Point3<f64>, height: f64) -> Point3<f64> {
        let mut out = *p;
        out[self.index()] = height;
        out
    }
}
