//! Axis-aligned bounding box.

use crate::UpAxis;
use nalgebra::{Point3, Vector3};

/// An axis-aligned bounding box (AABB).
///
/// Besides the usual 3D queries it answers "plane" questions relative to an
/// [`UpAxis`]: whether a footprint overlaps another, or which height span a
/// triangle occupies.
///
/// # Example
///
/// ```
/// use mesh_types::{Aabb, Point3, UpAxis};
///
/// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 2.0, 4.0));
/// assert!(aabb.contains(&Point3::new(1.0, 1.0, 1.0)));
/// assert!(aabb.plane_contains(UpAxis::Y, [3.9, 0.1], 0.0));
/// assert_eq!(aabb.height_span(UpAxis::Y), (0.0, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create an AABB from two corners, sorting each axis.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Create an empty AABB (min > max) for accumulation.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create an AABB from an iterator of points.
    ///
    /// Returns an empty AABB if the iterator is empty.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand_to_include(point);
        }
        aabb
    }

    /// Whether the box holds no points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Extent along each axis.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Center point.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Whether the point lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }

    /// Whether two boxes overlap. Touching boxes overlap.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] && self.max[i] >= other.min[i])
    }

    /// Smallest box enclosing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Grow the box to include a point.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Box grown by `margin` on every side. Negative margins shrink it.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        let m = Vector3::repeat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// The eight corner points.
    #[must_use]
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Lowest and highest height covered along `axis`.
    #[inline]
    #[must_use]
    pub fn height_span(&self, axis: UpAxis) -> (f64, f64) {
        (axis.height(&self.min), axis.height(&self.max))
    }

    /// Whether the footprint, grown by `margin`, contains a plane point.
    #[must_use]
    pub fn plane_contains(&self, axis: UpAxis, plane: [f64; 2], margin: f64) -> bool {
        let lo = axis.plane(&self.min);
        let hi = axis.plane(&self.max);
        (0..2).all(|i| plane[i] >= lo[i] - margin && plane[i] <= hi[i] + margin)
    }

    /// Whether the two footprints overlap, ignoring height.
    #[must_use]
    pub fn plane_intersects(&self, axis: UpAxis, other: &Self) -> bool {
        axis.plane_indices()
            .iter()
            .all(|&i| self.min[i] <= other.max[i] && self.max[i] >= other.min[i])
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
