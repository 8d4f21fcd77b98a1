//! Property-based tests for welding and adjacency.
//!
//! Run with: cargo test -p mesh-index --test proptest_index

#![allow(clippy::unwrap_used)]

use mesh_index::{FaceAdjacency, MeshIndex, VertexAdjacency, WeldParams, weld};
use mesh_types::{IndexedMesh, Point3, Vertex};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Grid point with coarse spacing so soups share corners often.
fn arb_grid_point() -> impl Strategy<Value = Point3<f64>> {
    (0i32..4, 0i32..3, 0i32..4)
        .prop_map(|(x, y, z)| {
            Point3::new(f64::from(x) * 0.5, f64::from(y) * 0.5, f64::from(z) * 0.5)
        })
}

/// Non-indexed triangle soup.
fn arb_soup(max_triangles: usize) -> impl Strategy<Value = Vec<Point3<f64>>> {
    prop::collection::vec((arb_grid_point(), arb_grid_point(), arb_grid_point()), 1..max_triangles)
        .prop_map(|tris| tris.into_iter().flat_map(|(a, b, c)| [a, b, c]).collect())
}

/// Indexed mesh with distinct indices per face; may be non-manifold.
fn arb_indexed(vertex_count: u32, max_faces: usize) -> impl Strategy<Value = IndexedMesh> {
    prop::collection::vec((0..vertex_count, 0..vertex_count, 0..vertex_count), 1..max_faces)
        .prop_map(move |faces| {
            let vertices = (0..vertex_count)
                .map(|i| Vertex::from_coords(f64::from(i), f64::from(i % 3), f64::from(i % 5)))
                .collect();
            let faces = faces
                .into_iter()
                .filter(|&(a, b, c)| a != b && b != c && a != c)
                .map(|(a, b, c)| [a, b, c])
                .collect();
            IndexedMesh::from_parts(vertices, faces)
        })
}

// =============================================================================
// Welding
// =============================================================================

proptest! {
    /// Welding a welded mesh changes nothing.
    #[test]
    fn weld_is_idempotent(soup in arb_soup(40)) {
        let Ok(first) = weld(&soup, None, &WeldParams::default()) else {
            // every triangle collapsed
            return Ok(());
        };
        let positions: Vec<_> = first.mesh.positions().copied().collect();
        let second = weld(&positions, Some(&first.mesh.faces), &WeldParams::default()).unwrap();

        prop_assert_eq!(second.mesh.vertices.len(), first.mesh.vertices.len());
        prop_assert_eq!(&second.mesh.faces, &first.mesh.faces);
    }

    /// Welding never creates vertices and every index stays in range.
    #[test]
    fn weld_output_is_valid(soup in arb_soup(40)) {
        if let Ok(out) = weld(&soup, None, &WeldParams::default()) {
            prop_assert!(out.mesh.vertices.len() <= soup.len());
            let n = u32::try_from(out.mesh.vertices.len()).unwrap();
            for face in &out.mesh.faces {
                prop_assert!(face.iter().all(|&v| v < n));
                prop_assert!(face[0] != face[1] && face[1] != face[2] && face[0] != face[2]);
            }
        }
    }
}

// =============================================================================
// Adjacency
// =============================================================================

proptest! {
    /// Face adjacency is symmetric, even with non-manifold edges.
    #[test]
    fn face_adjacency_is_symmetric(mesh in arb_indexed(8, 30)) {
        let adj = FaceAdjacency::from_mesh(&mesh);
        for a in 0..mesh.faces.len() {
            for &b in adj.neighbors(a) {
                prop_assert!(adj.neighbors(b).contains(&a), "{} -> {} not mirrored", a, b);
                prop_assert_ne!(a, b);
            }
        }
    }

    /// Vertex adjacency is symmetric and irreflexive.
    #[test]
    fn vertex_adjacency_is_symmetric(mesh in arb_indexed(8, 30)) {
        let adj = VertexAdjacency::from_mesh(&mesh);
        for a in 0..8u32 {
            for &b in adj.neighbors(a) {
                prop_assert!(adj.neighbors(b).contains(&a));
                prop_assert_ne!(a, b);
            }
        }
    }

    /// Indexing never panics on arbitrary face lists.
    #[test]
    fn indexing_never_panics(mesh in arb_indexed(6, 20)) {
        if let Ok(index) = MeshIndex::new(mesh) {
            let _ = index.face_adjacency();
            let _ = index.vertex_adjacency();
            prop_assert_eq!(index.face_normals().len(), index.face_count());
        }
    }
}
