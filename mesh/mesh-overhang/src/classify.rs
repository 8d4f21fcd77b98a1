//! Per-face overhang classification.

use nalgebra::Vector3;
use rayon::prelude::*;

/// Faces this close to the threshold angle count as printable.
const ANGLE_TOLERANCE_DEG: f64 = 1e-9;

/// A per-face boolean mask.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FaceMask {
    bits: Vec<bool>,
}

impl FaceMask {
    /// All-false mask over `len` faces.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    /// Mask with the given faces set. Out-of-range faces are ignored.
    #[must_use]
    pub fn from_faces(len: usize, faces: &[usize]) -> Self {
        let mut mask = Self::new(len);
        for &f in faces {
            mask.set(f, true);
        }
        mask
    }

    /// Number of faces covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the mask covers no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Whether a face is set. Out-of-range faces are not.
    #[inline]
    #[must_use]
    pub fn contains(&self, face: usize) -> bool {
        self.bits.get(face).copied().unwrap_or(false)
    }

    /// Set or clear a face. Out-of-range faces are ignored.
    pub fn set(&mut self, face: usize, value: bool) {
        if let Some(bit) = self.bits.get_mut(face) {
            *bit = value;
        }
    }

    /// Number of set faces.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Set faces in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(f, &b)| b.then_some(f))
    }

    /// Faces set in either mask.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let len = self.len().max(other.len());
        Self {
            bits: (0..len).map(|f| self.contains(f) || other.contains(f)).collect(),
        }
    }
}

impl From<Vec<bool>> for FaceMask {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

/// Angle between a unit normal and the up direction, in degrees.
///
/// Returns `None` if `up` has no direction.
#[must_use]
pub fn angle_from_up(normal: &Vector3<f64>, up: &Vector3<f64>) -> Option<f64> {
    let up = up.try_normalize(f64::EPSILON)?;
    Some(normal.dot(&up).clamp(-1.0, 1.0).acos().to_degrees())
}

/// Overhang angle of a unit normal: its angle from straight down, in degrees.
///
/// A face looking straight down has angle 0; a vertical wall has 90.
/// This equals `180° - angle_from_up`.
///
/// ```
/// use mesh_overhang::overhang_angle;
/// use nalgebra::Vector3;
///
/// let angle = overhang_angle(&-Vector3::y(), &Vector3::y()).unwrap();
/// assert!(angle.abs() < 1e-9);
/// ```
#[must_use]
pub fn overhang_angle(normal: &Vector3<f64>, up: &Vector3<f64>) -> Option<f64> {
    let up = up.try_normalize(f64::EPSILON)?;
    Some((-normal.dot(&up)).clamp(-1.0, 1.0).acos().to_degrees())
}

/// Classify faces as overhangs.
///
/// A face is an overhang iff the angle between its normal and `up` exceeds
/// `90° + support_angle_deg`, i.e. it leans further from vertical than the
/// process can print unsupported. Faces without a normal are never
/// overhangs, and a zero `up` classifies nothing.
///
/// `up` need not be normalized. Normals and `up` must be in the same space.
///
/// # Example
///
/// ```
/// use mesh_overhang::classify;
/// use nalgebra::Vector3;
///
/// let normals = [Some(-Vector3::y()), Some(Vector3::y()), None];
/// let mask = classify(&normals, &Vector3::y(), 45.0);
/// assert_eq!(mask.iter().collect::<Vec<_>>(), vec![0]);
/// ```
#[must_use]
pub fn classify(
    normals: &[Option<Vector3<f64>>],
    up: &Vector3<f64>,
    support_angle_deg: f64,
) -> FaceMask {
    let Some(up) = up.try_normalize(f64::EPSILON) else {
        return FaceMask::new(normals.len());
    };
    let threshold = 90.0 + support_angle_deg;

    let bits: Vec<bool> = normals
        .par_iter()
        .map(|normal| {
            normal.is_some_and(|n| {
                let angle = n.dot(&up).clamp(-1.0, 1.0).acos().to_degrees();
                angle - threshold > ANGLE_TOLERANCE_DEG
            })
        })
        .collect();

    FaceMask::from(bits)
}
