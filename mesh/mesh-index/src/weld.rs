//! Vertex welding for triangle soups.
//!
//! Exported meshes often arrive non-indexed, with every triangle owning its
//! three corners. Adjacency needs shared vertices, so such input is snapped
//! to a tolerance grid and deduplicated before anything else runs.

use crate::error::{IndexError, IndexResult};
use crate::validate::check_faces;
use hashbrown::HashMap;
use mesh_types::{IndexedMesh, Point3, Vertex};
use tracing::{debug, warn};

/// Parameters for vertex welding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeldParams {
    /// Grid cell size used to quantize positions. Must be positive.
    ///
    /// Default: 1e-4 (model units)
    pub tolerance: f64,

    /// Upper bound on input vertex count.
    ///
    /// Default: 50,000,000
    pub max_vertices: usize,
}

impl Default for WeldParams {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_vertices: 50_000_000,
        }
    }
}

impl WeldParams {
    /// Default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Coarse grid for scanned or low-precision exports.
    #[must_use]
    pub fn coarse() -> Self {
        Self {
            tolerance: 1e-2,
            ..Self::default()
        }
    }

    /// Set the quantization tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the vertex bound.
    #[must_use]
    pub const fn with_max_vertices(mut self, max_vertices: usize) -> Self {
        self.max_vertices = max_vertices;
        self
    }

    fn effective_tolerance(&self) -> f64 {
        if self.tolerance.is_finite() && self.tolerance > 0.0 {
            self.tolerance
        } else {
            warn!(tolerance = self.tolerance, "non-positive weld tolerance, using default");
            Self::default().tolerance
        }
    }
}

/// Output of [`weld`].
#[derive(Debug, Clone)]
pub struct WeldOutcome {
    /// The canonical indexed mesh.
    pub mesh: IndexedMesh,
    /// Whether vertices were merged and indices rewritten.
    pub rebuilt: bool,
}

/// Whether every vertex is referenced by at most one triangle.
///
/// This is the signature of a non-indexed export. An empty face list is not
/// a soup.
///
/// ```
/// use mesh_index::is_triangle_soup;
///
/// assert!(is_triangle_soup(&[[0, 1, 2], [3, 4, 5]], 6));
/// assert!(!is_triangle_soup(&[[0, 1, 2], [2, 1, 3]], 4));
/// ```
#[must_use]
pub fn is_triangle_soup(faces: &[[u32; 3]], vertex_count: usize) -> bool {
    if faces.is_empty() {
        return false;
    }
    let mut uses = vec![0u8; vertex_count];
    for face in faces {
        for &v in face {
            let Some(slot) = uses.get_mut(v as usize) else {
                continue;
            };
            if *slot > 0 {
                return false;
            }
            *slot = 1;
        }
    }
    true
}

/// Weld a raw vertex array into an indexed mesh.
///
/// When `faces` is `None`, consecutive vertex triples form the triangles and
/// trailing vertices that do not complete a triangle are ignored. The mesh
/// is rebuilt when `faces` is absent or when the faces show the soup
/// signature; otherwise it is returned unchanged with `rebuilt == false`.
///
/// Rebuilding snaps each corner to a grid of `params.tolerance`, keeps the
/// first position seen in each cell, and drops triangles that collapse onto
/// fewer than three vertices. Output vertices are numbered in the order
/// their faces reference them, so welding an already-welded soup is a no-op.
///
/// # Errors
///
/// - [`IndexError::EmptyMesh`] if there are no vertices
/// - [`IndexError::TooLarge`] above `params.max_vertices`
/// - [`IndexError::InvalidIndex`] / [`IndexError::RepeatedIndex`] for bad faces
/// - [`IndexError::NoFaces`] if no triangle survives
///
/// # Example
///
/// ```
/// use mesh_index::{WeldParams, weld};
/// use mesh_types::Point3;
///
/// // Two triangles sharing an edge, exported as soup.
/// let soup = [
///     Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0),
///     Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 1.0), Point3::new(0.0, 0.0, 1.0),
/// ];
/// let out = weld(&soup, None, &WeldParams::default()).unwrap();
/// assert!(out.rebuilt);
/// assert_eq!(out.mesh.vertices.len(), 4);
/// ```
pub fn weld(
    positions: &[Point3<f64>],
    faces: Option<&[[u32; 3]]>,
    params: &WeldParams,
) -> IndexResult<WeldOutcome> {
    if positions.is_empty() {
        return Err(IndexError::EmptyMesh);
    }
    if positions.len() > params.max_vertices {
        return Err(IndexError::TooLarge {
            vertex_count: positions.len(),
            limit: params.max_vertices,
        });
    }

    let implicit;
    let faces = if let Some(faces) = faces {
        if faces.is_empty() {
            return Err(IndexError::NoFaces);
        }
        check_faces(faces, positions.len())?;
        if !is_triangle_soup(faces, positions.len()) {
            let vertices = positions.iter().copied().map(Vertex::new).collect();
            return Ok(WeldOutcome {
                mesh: IndexedMesh::from_parts(vertices, faces.to_vec()),
                rebuilt: false,
            });
        }
        faces
    } else {
        let leftover = positions.len() % 3;
        if leftover != 0 {
            warn!(leftover, "ignoring vertices that do not complete a triangle");
        }
        implicit = implicit_faces(positions.len() / 3);
        if implicit.is_empty() {
            return Err(IndexError::NoFaces);
        }
        &implicit[..]
    };

    let mesh = rebuild(positions, faces, params.effective_tolerance());
    if mesh.faces.is_empty() {
        return Err(IndexError::NoFaces);
    }

    debug!(
        input_vertices = positions.len(),
        output_vertices = mesh.vertices.len(),
        input_faces = faces.len(),
        output_faces = mesh.faces.len(),
        "welded triangle soup"
    );

    Ok(WeldOutcome {
        mesh,
        rebuilt: true,
    })
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: mesh indices are u32, so vertex counts > 4B are unsupported
fn implicit_faces(triangles: usize) -> Vec<[u32; 3]> {
    (0..triangles)
        .map(|t| {
            let base = (t * 3) as u32;
            [base, base + 1, base + 2]
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: quantized cells and u32 indices cover any realistic model extent
fn quantize(p: &Point3<f64>, tolerance: f64) -> (i64, i64, i64) {
    (
        (p.x / tolerance).round() as i64,
        (p.y / tolerance).round() as i64,
        (p.z / tolerance).round() as i64,
    )
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: mesh indices are u32, so vertex counts > 4B are unsupported
fn rebuild(positions: &[Point3<f64>], faces: &[[u32; 3]], tolerance: f64) -> IndexedMesh {
    let mut cells: HashMap<(i64, i64, i64), u32> = HashMap::with_capacity(positions.len() / 2);
    let mut mesh = IndexedMesh::with_capacity(positions.len() / 2, faces.len());

    for face in faces {
        let mut welded = [0u32; 3];
        for (slot, &v) in welded.iter_mut().zip(face) {
            let p = positions[v as usize];
            *slot = *cells.entry(quantize(&p, tolerance)).or_insert_with(|| {
                mesh.vertices.push(Vertex::new(p));
                (mesh.vertices.len() - 1) as u32
            });
        }
        let [a, b, c] = welded;
        if a != b && b != c && a != c {
            mesh.faces.push(welded);
        }
    }

    mesh
}
