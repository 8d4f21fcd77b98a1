//! Traits for mesh types.

use crate::{Aabb, Triangle};

/// Minimal topology interface shared by mesh representations.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of faces (triangles).
    fn face_count(&self) -> usize;

    /// Whether the mesh has no vertices or no faces.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Face by index, or `None` if out of range.
    fn face(&self, index: usize) -> Option<[u32; 3]>;

    /// Triangle with resolved positions, or `None` if any index is out of range.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;

    /// Iterate over all resolvable triangles.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;
}

/// Types that can compute a bounding box.
pub trait MeshBounds {
    /// Axis-aligned bounds; empty if there are no vertices.
    fn bounds(&self) -> Aabb;

    /// Bounds, or `None` if empty.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }
}
