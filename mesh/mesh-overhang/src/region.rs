//! Face and vertex regions with derived statistics.

use std::sync::OnceLock;

use hashbrown::HashSet;
use mesh_index::MeshIndex;
use mesh_types::{Aabb, Point3, UpAxis};
use nalgebra::Vector3;

use crate::classify::overhang_angle;
use crate::filter::{convexity_score, lower_neighbor_fraction};

/// Which analysis produced a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionOrigin {
    /// Angle-based overhang classification.
    Overhang,
    /// Dangling-feature detection.
    Dangling,
}

/// A set of faces found by one analysis pass.
///
/// Statistics are computed on first request against the index the region
/// was found on, then cached.
///
/// # Example
///
/// ```
/// use mesh_index::MeshIndex;
/// use mesh_overhang::{FaceRegion, RegionOrigin};
/// use mesh_types::unit_cube;
/// use nalgebra::Vector3;
///
/// let index = MeshIndex::new(unit_cube()).unwrap();
/// let region = FaceRegion::new(vec![1, 0], RegionOrigin::Overhang, Vector3::z());
/// let stats = region.stats(&index);
/// assert_eq!(region.faces(), &[0, 1]);
/// assert_eq!(stats.vertex_count, 4);
/// assert!((stats.area - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct FaceRegion {
    faces: Vec<usize>,
    origin: RegionOrigin,
    up: Vector3<f64>,
    min_delta_height: f64,
    stats: OnceLock<RegionStats>,
}

impl FaceRegion {
    /// Create a region. Faces are sorted and deduplicated.
    #[must_use]
    pub fn new(mut faces: Vec<usize>, origin: RegionOrigin, up: Vector3<f64>) -> Self {
        faces.sort_unstable();
        faces.dedup();
        Self {
            faces,
            origin,
            up,
            min_delta_height: 0.05,
            stats: OnceLock::new(),
        }
    }

    /// Set the height delta used for the lower-neighbor statistic.
    #[must_use]
    pub fn with_min_delta_height(mut self, delta: f64) -> Self {
        self.min_delta_height = delta;
        self.stats = OnceLock::new();
        self
    }

    /// Face ids, ascending.
    #[must_use]
    pub fn faces(&self) -> &[usize] {
        &self.faces
    }

    /// Number of faces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether the region has no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Whether the region contains a face.
    #[must_use]
    pub fn contains(&self, face: usize) -> bool {
        self.faces.binary_search(&face).is_ok()
    }

    /// Analysis that produced the region.
    #[must_use]
    pub const fn origin(&self) -> RegionOrigin {
        self.origin
    }

    /// Build direction the region was classified against.
    #[must_use]
    pub const fn up(&self) -> &Vector3<f64> {
        &self.up
    }

    /// Distinct vertex ids of the region's faces, ascending.
    ///
    /// Faces outside the index are skipped.
    #[must_use]
    pub fn vertices(&self, index: &MeshIndex) -> Vec<u32> {
        let faces = &index.mesh().faces;
        let mut vertices: Vec<u32> = self
            .faces
            .iter()
            .filter_map(|&f| faces.get(f))
            .flatten()
            .copied()
            .collect();
        vertices.sort_unstable();
        vertices.dedup();
        vertices
    }

    /// Statistics, computed once.
    pub fn stats(&self, index: &MeshIndex) -> &RegionStats {
        self.stats
            .get_or_init(|| {
                RegionStats::compute(&self.faces, index, &self.up, self.min_delta_height)
            })
    }
}

/// Derived statistics of a face region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionStats {
    /// Number of faces.
    pub face_count: usize,
    /// Number of distinct vertices.
    pub vertex_count: usize,
    /// Total area.
    pub area: f64,
    /// Axis-aligned bounds of the region's vertices.
    pub bounds: Aabb,
    /// Area-weighted centroid.
    pub centroid: Point3<f64>,
    /// Lowest vertex along the build direction.
    pub lowest_point: Point3<f64>,
    /// Average lower-neighbor fraction.
    pub lower_fraction: f64,
    /// Convexity score, if any pair bends.
    pub convexity: Option<f64>,
    /// Smallest overhang angle (from straight down), in degrees.
    pub min_angle: f64,
    /// Largest overhang angle (from straight down), in degrees.
    pub max_angle: f64,
    /// Mean overhang angle, in degrees.
    pub mean_angle: f64,
}

impl RegionStats {
    fn compute(faces: &[usize], index: &MeshIndex, up: &Vector3<f64>, min_delta: f64) -> Self {
        let mesh = index.mesh();
        let normals = index.face_normals();
        let faces: Vec<usize> = faces.iter().copied().filter(|&f| f < mesh.faces.len()).collect();
        let up_dir = up.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::y);

        let mut vertices = HashSet::new();
        let mut bounds = Aabb::empty();
        let mut area = 0.0;
        let mut weighted = Vector3::zeros();
        let mut plain = Vector3::zeros();
        let mut angles = Vec::with_capacity(faces.len());

        for &f in &faces {
            let tri = mesh.face_triangle(f);
            let a = tri.area();
            let c = tri.centroid();
            area += a;
            weighted += c.coords * a;
            plain += c.coords;
            for v in mesh.faces[f] {
                if vertices.insert(v) {
                    bounds.expand_to_include(mesh.position(v));
                }
            }
            if let Some(n) = normals[f]
                && let Some(angle) = overhang_angle(&n, &up_dir)
            {
                angles.push(angle);
            }
        }

        #[allow(clippy::cast_precision_loss)]
        // Precision: face counts stay far below 2^52
        let centroid = if area > 0.0 {
            Point3::from(weighted / area)
        } else if faces.is_empty() {
            Point3::origin()
        } else {
            Point3::from(plain / faces.len() as f64)
        };

        let lowest_point = vertices
            .iter()
            .map(|&v| *mesh.position(v))
            .min_by(|a, b| a.coords.dot(&up_dir).total_cmp(&b.coords.dot(&up_dir)))
            .unwrap_or(centroid);

        let (min_angle, max_angle, mean_angle) = if angles.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let min = angles.iter().copied().fold(f64::INFINITY, f64::min);
            let max = angles.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            #[allow(clippy::cast_precision_loss)]
            // Precision: face counts stay far below 2^52
            let mean = angles.iter().sum::<f64>() / angles.len() as f64;
            (min, max, mean)
        };

        Self {
            face_count: faces.len(),
            vertex_count: vertices.len(),
            area,
            bounds,
            centroid,
            lowest_point,
            lower_fraction: lower_neighbor_fraction(&faces, index, &up_dir, min_delta),
            convexity: convexity_score(&faces, index),
            min_angle,
            max_angle,
            mean_angle,
        }
    }
}

/// A set of vertex ids, kept sorted and unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexRegion {
    vertices: Vec<u32>,
}

impl VertexRegion {
    /// Create a region. Vertices are sorted and deduplicated.
    #[must_use]
    pub fn new(mut vertices: Vec<u32>) -> Self {
        vertices.sort_unstable();
        vertices.dedup();
        Self { vertices }
    }

    /// Vertex ids, ascending.
    #[must_use]
    pub fn vertices(&self) -> &[u32] {
        &self.vertices
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the region is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether the region contains a vertex.
    #[must_use]
    pub fn contains(&self, vertex: u32) -> bool {
        self.vertices.binary_search(&vertex).is_ok()
    }

    /// Iterate over vertex ids.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.vertices.iter().copied()
    }
}

/// Where an overhang sits relative to the rest of the part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverhangType {
    /// The region reaches down to the part's lowest level.
    Tip,
    /// The region hangs above other material.
    Boundary,
}

/// Classify a region as a tip or a boundary overhang.
///
/// A region is a tip when its lowest vertex lies within `tolerance` of the
/// lowest vertex of the whole mesh.
#[must_use]
pub fn classify_overhang_type(
    region: &FaceRegion,
    index: &MeshIndex,
    axis: UpAxis,
    tolerance: f64,
) -> OverhangType {
    let mesh = index.mesh();
    let region_low = region
        .vertices(index)
        .into_iter()
        .map(|v| axis.height(mesh.position(v)))
        .fold(f64::INFINITY, f64::min);
    let (mesh_low, _) = index.bounds().height_span(axis);

    if (region_low - mesh_low).abs() < tolerance {
        OverhangType::Tip
    } else {
        OverhangType::Boundary
    }
}

/// Steepest support angle at which every face of the region still
/// classifies as an overhang, in degrees.
///
/// ```
/// use mesh_overhang::{RegionStats, suggested_support_angle};
/// # use mesh_types::{Aabb, Point3};
/// # let stats = RegionStats {
/// #     face_count: 1, vertex_count: 3, area: 1.0, bounds: Aabb::empty(),
/// #     centroid: Point3::origin(), lowest_point: Point3::origin(),
/// #     lower_fraction: 0.0, convexity: None,
/// #     min_angle: 10.0, max_angle: 30.0, mean_angle: 20.0,
/// # };
/// assert!((suggested_support_angle(&stats) - 60.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn suggested_support_angle(stats: &RegionStats) -> f64 {
    (90.0 - stats.max_angle).clamp(0.0, 90.0)
}
