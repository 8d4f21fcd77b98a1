//! Canonical mesh plus lazily derived topology.

use crate::adjacency::{EdgeMap, FaceAdjacency, VertexAdjacency};
use crate::error::IndexResult;
use crate::normals::{face_centroids, face_normals};
use crate::validate::validate;
use crate::weld::{WeldParams, is_triangle_soup, weld};
use mesh_types::{Aabb, IndexedMesh, MeshBounds, Point3, Vector3};
use std::sync::OnceLock;
use tracing::info;

/// A validated, welded mesh with cached adjacency and per-face data.
///
/// Caches are built on first use and never change afterwards, so a
/// `MeshIndex` can be shared across threads and reused by any number of
/// analyses of the same mesh.
///
/// # Example
///
/// ```
/// use mesh_index::MeshIndex;
/// use mesh_types::unit_cube;
///
/// let index = MeshIndex::new(unit_cube()).unwrap();
/// assert_eq!(index.face_adjacency().neighbors(0).len(), 3);
/// assert!(!index.was_rebuilt());
/// ```
#[derive(Debug)]
pub struct MeshIndex {
    mesh: IndexedMesh,
    source_vertex_count: usize,
    rebuilt: bool,
    edges: OnceLock<EdgeMap>,
    face_adjacency: OnceLock<FaceAdjacency>,
    vertex_adjacency: OnceLock<VertexAdjacency>,
    vertex_faces: OnceLock<Vec<Vec<usize>>>,
    normals: OnceLock<Vec<Option<Vector3<f64>>>>,
    centroids: OnceLock<Vec<Point3<f64>>>,
    bounds: OnceLock<Aabb>,
}

impl MeshIndex {
    /// Index a mesh with default welding parameters.
    ///
    /// # Errors
    ///
    /// Returns an [`IndexError`](crate::IndexError) if the mesh is empty or
    /// has invalid faces.
    pub fn new(mesh: IndexedMesh) -> IndexResult<Self> {
        Self::with_params(mesh, &WeldParams::default())
    }

    /// Index a mesh, welding it first if it is a triangle soup.
    ///
    /// # Errors
    ///
    /// Returns an [`IndexError`](crate::IndexError) if the mesh is empty,
    /// has invalid faces, or exceeds the welding bound.
    pub fn with_params(mesh: IndexedMesh, params: &WeldParams) -> IndexResult<Self> {
        validate(&mesh)?;
        let source_vertex_count = mesh.vertices.len();
        if is_triangle_soup(&mesh.faces, mesh.vertices.len()) {
            let positions: Vec<Point3<f64>> = mesh.positions().copied().collect();
            let outcome = weld(&positions, Some(&mesh.faces), params)?;
            return Ok(Self::assemble(outcome.mesh, source_vertex_count, outcome.rebuilt));
        }
        Ok(Self::assemble(mesh, source_vertex_count, false))
    }

    /// Index raw positions, with or without triangle indices.
    ///
    /// # Errors
    ///
    /// Returns an [`IndexError`](crate::IndexError) if the data is empty,
    /// has invalid faces, or exceeds the welding bound.
    pub fn from_positions(
        positions: &[Point3<f64>],
        faces: Option<&[[u32; 3]]>,
        params: &WeldParams,
    ) -> IndexResult<Self> {
        let outcome = weld(positions, faces, params)?;
        Ok(Self::assemble(outcome.mesh, positions.len(), outcome.rebuilt))
    }

    fn assemble(mesh: IndexedMesh, source_vertex_count: usize, rebuilt: bool) -> Self {
        info!(
            vertices = mesh.vertices.len(),
            faces = mesh.faces.len(),
            rebuilt,
            "indexed mesh"
        );
        Self {
            mesh,
            source_vertex_count,
            rebuilt,
            edges: OnceLock::new(),
            face_adjacency: OnceLock::new(),
            vertex_adjacency: OnceLock::new(),
            vertex_faces: OnceLock::new(),
            normals: OnceLock::new(),
            centroids: OnceLock::new(),
            bounds: OnceLock::new(),
        }
    }

    /// The canonical (welded) mesh.
    #[must_use]
    pub const fn mesh(&self) -> &IndexedMesh {
        &self.mesh
    }

    /// Vertex count of the input before welding.
    #[must_use]
    pub const fn source_vertex_count(&self) -> usize {
        self.source_vertex_count
    }

    /// Whether the input was re-welded.
    #[must_use]
    pub const fn was_rebuilt(&self) -> bool {
        self.rebuilt
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.mesh.faces.len()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len()
    }

    /// Edge multimap.
    pub fn edge_map(&self) -> &EdgeMap {
        self.edges.get_or_init(|| EdgeMap::build(&self.mesh))
    }

    /// Face adjacency across manifold edges.
    pub fn face_adjacency(&self) -> &FaceAdjacency {
        self.face_adjacency
            .get_or_init(|| FaceAdjacency::build(self.edge_map(), self.face_count()))
    }

    /// Vertex adjacency along edges.
    pub fn vertex_adjacency(&self) -> &VertexAdjacency {
        self.vertex_adjacency
            .get_or_init(|| VertexAdjacency::build(self.edge_map(), self.vertex_count()))
    }

    /// Faces incident to a vertex, ascending.
    #[must_use]
    pub fn faces_around(&self, vertex: u32) -> &[usize] {
        self.vertex_faces
            .get_or_init(|| {
                let mut lists = vec![Vec::new(); self.vertex_count()];
                for (f, face) in self.mesh.faces.iter().enumerate() {
                    for &v in face {
                        lists[v as usize].push(f);
                    }
                }
                lists
            })
            .get(vertex as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Unit normals per face (`None` for degenerate faces).
    pub fn face_normals(&self) -> &[Option<Vector3<f64>>] {
        self.normals.get_or_init(|| face_normals(&self.mesh))
    }

    /// Centroids per face.
    pub fn face_centroids(&self) -> &[Point3<f64>] {
        self.centroids.get_or_init(|| face_centroids(&self.mesh))
    }

    /// Bounds of the whole mesh.
    pub fn bounds(&self) -> Aabb {
        *self.bounds.get_or_init(|| self.mesh.bounds())
    }
}
