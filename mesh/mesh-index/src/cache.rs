//! Shared index cache keyed by mesh identity.

use crate::error::IndexResult;
use crate::index::MeshIndex;
use crate::weld::WeldParams;
use hashbrown::HashMap;
use mesh_types::IndexedMesh;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Caller-chosen identity of a mesh (e.g. a scene node id).
pub type MeshId = u64;

/// Cache of [`MeshIndex`] values shared across analyses.
///
/// An entry is reused while the mesh with the same id keeps the same vertex
/// count, and rebuilt otherwise. Different meshes can be indexed and read
/// concurrently.
///
/// # Example
///
/// ```
/// use mesh_index::IndexCache;
/// use mesh_types::unit_cube;
/// use std::sync::Arc;
///
/// let cache = IndexCache::new();
/// let a = cache.get_or_build(7, &unit_cube()).unwrap();
/// let b = cache.get_or_build(7, &unit_cube()).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Default)]
pub struct IndexCache {
    entries: RwLock<HashMap<MeshId, Arc<MeshIndex>>>,
    params: WeldParams,
}

impl IndexCache {
    /// Empty cache with default weld parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty cache using the given weld parameters.
    #[must_use]
    pub fn with_params(params: WeldParams) -> Self {
        Self {
            entries: RwLock::default(),
            params,
        }
    }

    /// Cached index for `id`, building it when absent or stale.
    ///
    /// # Errors
    ///
    /// Returns an [`IndexError`](crate::IndexError) if the mesh cannot be
    /// indexed. Nothing is cached in that case.
    pub fn get_or_build(&self, id: MeshId, mesh: &IndexedMesh) -> IndexResult<Arc<MeshIndex>> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(index) = entries.get(&id)
                && index.source_vertex_count() == mesh.vertices.len()
            {
                return Ok(Arc::clone(index));
            }
        }

        debug!(id, vertices = mesh.vertices.len(), "building mesh index");
        let index = Arc::new(MeshIndex::with_params(mesh.clone(), &self.params)?);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&index));
        Ok(index)
    }

    /// Drop the entry for `id`.
    pub fn invalidate(&self, id: MeshId) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    /// Number of cached meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{Vertex, unit_cube};

    #[test]
    fn vertex_count_change_rebuilds() {
        let cache = IndexCache::new();
        let first = cache.get_or_build(1, &unit_cube()).unwrap();

        let mut grown = unit_cube();
        grown.vertices.push(Vertex::from_coords(5.0, 5.0, 5.0));
        let second = cache.get_or_build(1, &grown).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.source_vertex_count(), 9);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn ids_are_independent() {
        let cache = IndexCache::new();
        cache.get_or_build(1, &unit_cube()).unwrap();
        cache.get_or_build(2, &unit_cube()).unwrap();
        assert_eq!(cache.len(), 2);
        cache.invalidate(1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = IndexCache::new();
        assert!(cache.get_or_build(3, &IndexedMesh::new()).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_builds_share_entries() {
        let cache = IndexCache::new();
        std::thread::scope(|s| {
            for id in 0..4 {
                let cache = &cache;
                s.spawn(move || {
                    let index = cache.get_or_build(id, &unit_cube()).unwrap();
                    assert_eq!(index.face_adjacency().face_count(), 12);
                });
            }
        });
        assert_eq!(cache.len(), 4);
    }
}
