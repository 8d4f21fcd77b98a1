//! Oriented bounding boxes fit by principal component analysis.

// Point counts stay far below 2^52
#![allow(clippy::cast_precision_loss)]

use mesh_types::{Aabb, Point3, Vector3};
use nalgebra::{Matrix3, Rotation3};

/// Cross products shorter than this are not used as separating axes.
pub(crate) const AXIS_EPSILON: f64 = 1e-6;

/// A box with its own orthonormal frame.
///
/// Columns of `rotation` are the local axes in world coordinates. Boxes fit
/// by [`obb_from_points`] order them by decreasing spread of the input.
///
/// # Example
///
/// ```
/// use mesh_collide::OrientedBoundingBox;
/// use nalgebra::{Point3, Rotation3, Vector3};
///
/// let obb = OrientedBoundingBox::new(
///     Point3::new(0.0, 1.0, 0.0),
///     Vector3::new(2.0, 1.0, 0.5),
///     Rotation3::identity(),
/// );
/// assert!(obb.contains(&Point3::new(1.5, 1.5, 0.0)));
/// assert!((obb.volume() - 8.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBoundingBox {
    /// Center in world coordinates.
    pub center: Point3<f64>,
    /// Half-extents along each local axis, all non-negative.
    pub half_extents: Vector3<f64>,
    /// Local frame.
    pub rotation: Rotation3<f64>,
}

impl Default for OrientedBoundingBox {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            half_extents: Vector3::zeros(),
            rotation: Rotation3::identity(),
        }
    }
}

impl OrientedBoundingBox {
    /// Create a box. Negative half-extents are made positive.
    #[must_use]
    pub fn new(center: Point3<f64>, half_extents: Vector3<f64>, rotation: Rotation3<f64>) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
            rotation,
        }
    }

    /// World-aligned box covering an AABB. An empty AABB gives the default.
    #[must_use]
    pub fn from_aabb(aabb: &Aabb) -> Self {
        if aabb.is_empty() {
            return Self::default();
        }
        Self::new(aabb.center(), aabb.size() / 2.0, Rotation3::identity())
    }

    /// Local axis `i` (0, 1 or 2) in world coordinates.
    #[must_use]
    pub fn axis(&self, i: usize) -> Vector3<f64> {
        self.rotation.matrix().column(i).into_owned()
    }

    /// All three local axes.
    #[must_use]
    pub fn axes(&self) -> [Vector3<f64>; 3] {
        [self.axis(0), self.axis(1), self.axis(2)]
    }

    /// Full extents along each local axis.
    #[must_use]
    pub fn extents(&self) -> Vector3<f64> {
        self.half_extents * 2.0
    }

    /// Volume.
    #[must_use]
    pub fn volume(&self) -> f64 {
        let e = self.extents();
        e.x * e.y * e.z
    }

    /// Point in local coordinates.
    #[must_use]
    pub fn to_local(&self, point: &Point3<f64>) -> Vector3<f64> {
        self.rotation.inverse() * (point - self.center)
    }

    /// Whether a point lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        let local = self.to_local(point);
        (0..3).all(|i| local[i].abs() <= self.half_extents[i])
    }

    /// Half-width of the box's shadow on an axis.
    ///
    /// The axis need not be normalized; the result scales with it.
    #[inline]
    #[must_use]
    pub fn radius_along(&self, axis: &Vector3<f64>) -> f64 {
        (0..3)
            .map(|i| self.half_extents[i] * axis.dot(&self.axis(i)).abs())
            .sum()
    }

    /// The eight corners in world coordinates.
    #[must_use]
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let h = self.half_extents;
        let signs = [
            (-1.0, -1.0, -1.0),
            (1.0, -1.0, -1.0),
            (1.0, 1.0, -1.0),
            (-1.0, 1.0, -1.0),
            (-1.0, -1.0, 1.0),
            (1.0, -1.0, 1.0),
            (1.0, 1.0, 1.0),
            (-1.0, 1.0, 1.0),
        ];
        signs.map(|(sx, sy, sz)| {
            self.center + self.rotation * Vector3::new(sx * h.x, sy * h.y, sz * h.z)
        })
    }

    /// Smallest world-aligned box containing this one.
    #[must_use]
    pub fn world_aabb(&self) -> Aabb {
        let r = Vector3::new(
            self.radius_along(&Vector3::x()),
            self.radius_along(&Vector3::y()),
            self.radius_along(&Vector3::z()),
        );
        Aabb::new(self.center - r, self.center + r)
    }

    /// Same box with half-extents scaled by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.center, self.half_extents * factor, self.rotation)
    }

    /// Same box moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        Self::new(self.center + offset, self.half_extents, self.rotation)
    }
}

/// Fit an oriented box to a point set by principal component analysis.
///
/// Axes are the eigenvectors of the population covariance, sorted by
/// decreasing eigenvalue and forced right-handed. The box is the tightest
/// one in that frame. An empty input gives a zero-size box at the origin.
///
/// # Example
///
/// ```
/// use mesh_collide::obb_from_points;
/// use nalgebra::Point3;
///
/// let points = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(4.0, 0.0, 0.0),
///     Point3::new(4.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let obb = obb_from_points(&points);
/// assert!((obb.half_extents.x - 2.0).abs() < 1e-9);
/// assert!((obb.half_extents.y - 0.5).abs() < 1e-9);
/// assert!(obb.half_extents.z.abs() < 1e-9);
/// ```
#[must_use]
pub fn obb_from_points(points: &[Point3<f64>]) -> OrientedBoundingBox {
    if points.is_empty() {
        return OrientedBoundingBox::default();
    }

    let n = points.len() as f64;
    let mean = points.iter().map(|p| p.coords).sum::<Vector3<f64>>() / n;

    let mut cov = Matrix3::zeros();
    for p in points {
        let d = p.coords - mean;
        cov += d * d.transpose();
    }
    cov /= n;

    let rotation = principal_frame(&cov);
    let inverse = rotation.inverse();

    let mut lo = Vector3::repeat(f64::INFINITY);
    let mut hi = Vector3::repeat(f64::NEG_INFINITY);
    for p in points {
        let local = inverse * (p.coords - mean);
        lo = lo.inf(&local);
        hi = hi.sup(&local);
    }

    let mid = (lo + hi) / 2.0;
    OrientedBoundingBox {
        center: Point3::from(mean + rotation * mid),
        half_extents: (hi - lo) / 2.0,
        rotation,
    }
}

fn principal_frame(cov: &Matrix3<f64>) -> Rotation3<f64> {
    let eigen = cov.symmetric_eigen();
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let mut frame = Matrix3::from_columns(&[
        eigen.eigenvectors.column(order[0]).into_owned(),
        eigen.eigenvectors.column(order[1]).into_owned(),
        eigen.eigenvectors.column(order[2]).into_owned(),
    ]);
    if frame.determinant() < 0.0 {
        let flipped = -frame.column(2);
        frame.set_column(2, &flipped);
    }
    Rotation3::from_matrix_unchecked(frame)
}

/// Whether two oriented boxes overlap. Touching counts as overlap.
///
/// Separating-axis test over the six face axes and the nine edge-pair
/// axes, skipping edge pairs that are nearly parallel.
#[must_use]
pub fn obb_intersects_obb(a: &OrientedBoundingBox, b: &OrientedBoundingBox) -> bool {
    let t = b.center - a.center;
    let (axes_a, axes_b) = (a.axes(), b.axes());

    let separated = |axis: &Vector3<f64>| {
        t.dot(axis).abs() > a.radius_along(axis) + b.radius_along(axis)
    };

    if axes_a.iter().chain(axes_b.iter()).any(separated) {
        return false;
    }
    for u in &axes_a {
        for v in &axes_b {
            let axis = u.cross(v);
            if axis.norm() > AXIS_EPSILON && separated(&axis) {
                return false;
            }
        }
    }
    true
}
