//! Structural validation.

use crate::error::{IndexError, IndexResult};
use mesh_types::IndexedMesh;

/// Check that a mesh is structurally usable.
///
/// # Errors
///
/// - [`IndexError::EmptyMesh`] if there are no vertices
/// - [`IndexError::NoFaces`] if there are no triangles
/// - [`IndexError::InvalidIndex`] for the first out-of-range index
/// - [`IndexError::RepeatedIndex`] for the first face that repeats a vertex
///
/// # Example
///
/// ```
/// use mesh_index::{IndexError, validate};
/// use mesh_types::{IndexedMesh, Vertex};
///
/// let mesh = IndexedMesh::from_parts(vec![Vertex::from_coords(0.0, 0.0, 0.0)], vec![[0, 1, 2]]);
/// assert!(matches!(validate(&mesh), Err(IndexError::InvalidIndex { index: 1, .. })));
/// ```
pub fn validate(mesh: &IndexedMesh) -> IndexResult<()> {
    if mesh.vertices.is_empty() {
        return Err(IndexError::EmptyMesh);
    }
    if mesh.faces.is_empty() {
        return Err(IndexError::NoFaces);
    }
    check_faces(&mesh.faces, mesh.vertices.len())
}

pub(crate) fn check_faces(faces: &[[u32; 3]], vertex_count: usize) -> IndexResult<()> {
    for (face, &[a, b, c]) in faces.iter().enumerate() {
        for index in [a, b, c] {
            if index as usize >= vertex_count {
                return Err(IndexError::InvalidIndex {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        if a == b || b == c || a == c {
            return Err(IndexError::RepeatedIndex { face });
        }
    }
    Ok(())
}
