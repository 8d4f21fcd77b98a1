//! Edge, face and vertex adjacency.
//!
//! Everything is derived from one edge multimap: each triangle contributes
//! its three undirected edges keyed by sorted endpoint pair.

use hashbrown::HashMap;
use mesh_types::IndexedMesh;

/// Normalize an edge so the smaller index comes first.
#[inline]
#[must_use]
pub const fn normalize_edge(v0: u32, v1: u32) -> (u32, u32) {
    if v0 < v1 { (v0, v1) } else { (v1, v0) }
}

/// Map from undirected edge to the faces that use it.
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    edge_to_faces: HashMap<(u32, u32), Vec<usize>>,
}

impl EdgeMap {
    /// Build the edge multimap for a mesh.
    ///
    /// ```
    /// use mesh_index::EdgeMap;
    /// use mesh_types::unit_cube;
    ///
    /// let edges = EdgeMap::build(&unit_cube());
    /// assert_eq!(edges.edge_count(), 18);
    /// assert!(edges.is_closed_manifold());
    /// ```
    #[must_use]
    pub fn build(mesh: &IndexedMesh) -> Self {
        let mut edge_to_faces: HashMap<(u32, u32), Vec<usize>> =
            HashMap::with_capacity(mesh.faces.len() * 3 / 2);

        for (face_idx, face) in mesh.faces.iter().enumerate() {
            for i in 0..3 {
                let edge = normalize_edge(face[i], face[(i + 1) % 3]);
                edge_to_faces.entry(edge).or_default().push(face_idx);
            }
        }

        Self { edge_to_faces }
    }

    /// Faces using an edge, in face order. Empty if the edge does not exist.
    #[must_use]
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> &[usize] {
        self.edge_to_faces
            .get(&normalize_edge(v0, v1))
            .map_or(&[], Vec::as_slice)
    }

    /// Iterate over `(edge, faces)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&(u32, u32), &Vec<usize>)> {
        self.edge_to_faces.iter()
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }

    /// Edges used by exactly one face.
    pub fn boundary_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .map(|(&edge, _)| edge)
    }

    /// Number of edges used by more than two faces.
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces.values().filter(|f| f.len() > 2).count()
    }

    /// Whether every edge is used by exactly two faces.
    #[must_use]
    pub fn is_closed_manifold(&self) -> bool {
        self.edge_to_faces.values().all(|f| f.len() == 2)
    }
}

/// Face-to-face adjacency across manifold edges.
///
/// Two faces are neighbors iff they share an edge used by exactly two
/// faces. Non-manifold edges contribute no links.
#[derive(Debug, Clone)]
pub struct FaceAdjacency {
    adjacent: Vec<Vec<usize>>,
}

impl FaceAdjacency {
    /// Build face adjacency from an edge map.
    ///
    /// ```
    /// use mesh_index::{EdgeMap, FaceAdjacency};
    /// use mesh_types::{IndexedMesh, Vertex};
    ///
    /// let mesh = IndexedMesh::from_parts(
    ///     vec![
    ///         Vertex::from_coords(0.0, 0.0, 0.0),
    ///         Vertex::from_coords(1.0, 0.0, 0.0),
    ///         Vertex::from_coords(0.0, 0.0, 1.0),
    ///         Vertex::from_coords(1.0, 0.0, 1.0),
    ///     ],
    ///     vec![[0, 1, 2], [1, 3, 2]],
    /// );
    /// let adj = FaceAdjacency::build(&EdgeMap::build(&mesh), mesh.faces.len());
    /// assert_eq!(adj.neighbors(0), &[1]);
    /// ```
    #[must_use]
    pub fn build(edges: &EdgeMap, face_count: usize) -> Self {
        let mut adjacent: Vec<Vec<usize>> = vec![Vec::new(); face_count];

        for faces in edges.edge_to_faces.values() {
            if let [f0, f1] = faces[..]
                && f0 != f1
            {
                adjacent[f0].push(f1);
                adjacent[f1].push(f0);
            }
        }

        // Duplicate faces can share more than one edge
        for list in &mut adjacent {
            list.sort_unstable();
            list.dedup();
        }

        Self { adjacent }
    }

    /// Build directly from a mesh.
    #[must_use]
    pub fn from_mesh(mesh: &IndexedMesh) -> Self {
        Self::build(&EdgeMap::build(mesh), mesh.faces.len())
    }

    /// Sorted neighbors of a face. Empty if out of range.
    #[must_use]
    pub fn neighbors(&self, face: usize) -> &[usize] {
        self.adjacent.get(face).map_or(&[], Vec::as_slice)
    }

    /// Number of faces covered.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.adjacent.len()
    }

    /// Whether two faces are neighbors.
    #[must_use]
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }
}

/// Vertex-to-vertex adjacency along triangle edges.
#[derive(Debug, Clone)]
pub struct VertexAdjacency {
    adjacent: Vec<Vec<u32>>,
}

impl VertexAdjacency {
    /// Build vertex adjacency from an edge map.
    #[must_use]
    pub fn build(edges: &EdgeMap, vertex_count: usize) -> Self {
        let mut adjacent: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
        for &(a, b) in edges.edge_to_faces.keys() {
            adjacent[a as usize].push(b);
            adjacent[b as usize].push(a);
        }
        for list in &mut adjacent {
            list.sort_unstable();
        }
        Self { adjacent }
    }

    /// Build directly from a mesh.
    #[must_use]
    pub fn from_mesh(mesh: &IndexedMesh) -> Self {
        Self::build(&EdgeMap::build(mesh), mesh.vertices.len())
    }

    /// Sorted neighbors of a vertex. Empty if out of range or isolated.
    #[must_use]
    pub fn neighbors(&self, vertex: u32) -> &[u32] {
        self.adjacent
            .get(vertex as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Number of vertices covered.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacent.len()
    }
}
