//! Per-face normals and centroids.

use mesh_types::{IndexedMesh, MeshTopology, Point3, Vector3};
use rayon::prelude::*;

/// Unit normal of every face.
///
/// Faces whose cross product is shorter than
/// [`mesh_types::DEGENERATE_NORMAL_LENGTH`], or that reference missing
/// vertices, get `None` and are left out of normal-dependent analysis.
///
/// ```
/// use mesh_index::face_normals;
/// use mesh_types::unit_cube;
///
/// let normals = face_normals(&unit_cube());
/// assert!(normals.iter().all(Option::is_some));
/// ```
#[must_use]
pub fn face_normals(mesh: &IndexedMesh) -> Vec<Option<Vector3<f64>>> {
    (0..mesh.faces.len())
        .into_par_iter()
        .map(|f| mesh.triangle(f).and_then(|t| t.normal()))
        .collect()
}

/// Centroid of every face. Faces that reference missing vertices map to the origin.
#[must_use]
pub fn face_centroids(mesh: &IndexedMesh) -> Vec<Point3<f64>> {
    (0..mesh.faces.len())
        .into_par_iter()
        .map(|f| mesh.triangle(f).map_or_else(Point3::origin, |t| t.centroid()))
        .collect()
}
