//! Shared mesh fixtures for integration tests.

#![allow(dead_code)]

use mesh_types::{IndexedMesh, Point3, Vertex};

/// Revolve a profile of `(radius, height)` points around the Y axis using
/// square rings, producing a closed mesh with outward normals.
///
/// A point with zero radius becomes a single pole vertex. Ring corners go
/// `(+r, +r)`, `(-r, +r)`, `(-r, -r)`, `(+r, -r)` in `(x, z)`, and each ring
/// occupies consecutive vertex ids. Faces are emitted segment by segment:
/// 8 per ring-to-ring segment and 4 per pole segment.
pub fn square_lathe(profile: &[(f64, f64)]) -> IndexedMesh {
    let corners = [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)];
    let mut mesh = IndexedMesh::new();
    let mut rings: Vec<[u32; 4]> = Vec::new();

    for &(r, y) in profile {
        let base = u32::try_from(mesh.vertices.len()).unwrap();
        if r == 0.0 {
            mesh.vertices.push(Vertex::new(Point3::new(0.0, y, 0.0)));
            rings.push([base; 4]);
        } else {
            for (sx, sz) in corners {
                mesh.vertices.push(Vertex::new(Point3::new(sx * r, y, sz * r)));
            }
            rings.push([base, base + 1, base + 2, base + 3]);
        }
    }

    for pair in rings.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        for j in 0..4 {
            let k = (j + 1) % 4;
            for tri in [[a[j], b[k], a[k]], [a[j], b[j], b[k]]] {
                if tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2] {
                    mesh.faces.push(tri);
                }
            }
        }
    }

    mesh
}

/// A wide base, a thin neck, and a cup-shaped head whose rim hangs below
/// the head's underside.
///
/// Face ids by segment:
///
/// | faces  | part                         |
/// |--------|------------------------------|
/// | 0..4   | base bottom (y = 0)          |
/// | 4..12  | base side                    |
/// | 12..20 | base top                     |
/// | 20..28 | neck                         |
/// | 28..36 | head underside (y = 8)       |
/// | 36..44 | rim inner wall               |
/// | 44..52 | rim bottom (y = 6)           |
/// | 52..60 | head outer wall              |
/// | 60..64 | head top (y = 9)             |
///
/// Vertex ids: 21..25 and 25..29 are the rim bottom rings.
pub fn mushroom() -> IndexedMesh {
    square_lathe(&[
        (0.0, 0.0),
        (5.0, 0.0),
        (5.0, 1.0),
        (0.5, 1.0),
        (0.5, 8.0),
        (3.0, 8.0),
        (3.0, 6.0),
        (4.0, 6.0),
        (4.0, 9.0),
        (0.0, 9.0),
    ])
}

/// A closed box from two corners, built from shared corners.
pub fn block(min: Point3<f64>, max: Point3<f64>) -> IndexedMesh {
    let mut cube = mesh_types::unit_cube();
    let size = max - min;
    for v in &mut cube.vertices {
        let p = v.position;
        v.position = Point3::new(
            min.x + p.x * size.x,
            min.y + p.y * size.y,
            min.z + p.z * size.z,
        );
    }
    cube
}

/// A regular grid of `n × n` quads in the XZ plane at height `y`, facing
/// down, with `(n + 1)^2` shared vertices.
pub fn grid(n: u32, y: f64) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();
    for i in 0..=n {
        for j in 0..=n {
            mesh.vertices
                .push(Vertex::new(Point3::new(f64::from(i), y, f64::from(j))));
        }
    }
    let id = |i: u32, j: u32| i * (n + 1) + j;
    for i in 0..n {
        for j in 0..n {
            let (a, b, c, d) = (id(i, j), id(i + 1, j), id(i + 1, j + 1), id(i, j + 1));
            mesh.faces.push([a, b, c]);
            mesh.faces.push([a, c, d]);
        }
    }
    mesh
}
