//! Box against triangle separating-axis tests.

use hashbrown::HashSet;
use mesh_types::{IndexedMesh, MeshTopology, Triangle, Vector3};
use rayon::prelude::*;
use tracing::debug;

use crate::obb::{AXIS_EPSILON, OrientedBoundingBox};

/// Whether an oriented box and a triangle overlap. Touching counts as
/// overlap.
///
/// Tests the three box axes, the triangle normal and the nine cross
/// products of box axes with triangle edges. Degenerate axes are skipped,
/// so a degenerate triangle is tested on the box axes only.
///
/// # Example
///
/// ```
/// use mesh_collide::{OrientedBoundingBox, obb_triangle_overlap};
/// use mesh_types::Triangle;
/// use nalgebra::{Point3, Rotation3, Vector3};
///
/// let obb =
///     OrientedBoundingBox::new(Point3::origin(), Vector3::repeat(1.0), Rotation3::identity());
/// let inside = Triangle::new(
///     Point3::new(-0.5, 0.0, 0.0),
///     Point3::new(0.5, 0.0, 0.0),
///     Point3::new(0.0, 0.5, 0.0),
/// );
/// assert!(obb_triangle_overlap(&obb, &inside));
/// ```
#[must_use]
pub fn obb_triangle_overlap(obb: &OrientedBoundingBox, tri: &Triangle) -> bool {
    let v = tri.vertices().map(|p| p - obb.center);
    let edges = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];
    let axes = obb.axes();

    let separated = |axis: &Vector3<f64>| {
        let p = [axis.dot(&v[0]), axis.dot(&v[1]), axis.dot(&v[2])];
        let lo = p[0].min(p[1]).min(p[2]);
        let hi = p[0].max(p[1]).max(p[2]);
        let r = obb.radius_along(axis);
        lo > r || hi < -r
    };

    if axes.iter().any(separated) {
        return false;
    }

    let normal = edges[0].cross(&edges[1]);
    if normal.norm() > AXIS_EPSILON && separated(&normal) {
        return false;
    }

    for a in &axes {
        for e in &edges {
            let axis = a.cross(e);
            if axis.norm() > AXIS_EPSILON && separated(&axis) {
                return false;
            }
        }
    }
    true
}

/// First face, in index order, that the box overlaps.
///
/// Faces in `excluded` are ignored. An AABB check rejects far faces before
/// the full test.
#[must_use]
pub fn find_collision(
    obb: &OrientedBoundingBox,
    mesh: &IndexedMesh,
    excluded: &HashSet<usize>,
) -> Option<usize> {
    let reach = obb.world_aabb();
    let hit = (0..mesh.face_count()).into_par_iter().find_first(|&face| {
        if excluded.contains(&face) {
            return false;
        }
        mesh.triangle(face)
            .is_some_and(|tri| tri.bounds().intersects(&reach) && obb_triangle_overlap(obb, &tri))
    });
    if let Some(face) = hit {
        debug!(face, center = ?obb.center, "box collides with mesh");
    }
    hit
}

/// Whether the box overlaps any face of the mesh outside `excluded`.
#[must_use]
pub fn collides(obb: &OrientedBoundingBox, mesh: &IndexedMesh, excluded: &HashSet<usize>) -> bool {
    find_collision(obb, mesh, excluded).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{Point3, Rotation3, unit_cube};

    fn unit_box(center: Point3<f64>) -> OrientedBoundingBox {
        OrientedBoundingBox::new(center, Vector3::repeat(0.5), Rotation3::identity())
    }

    fn tri(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Triangle {
        Triangle::new(a.into(), b.into(), c.into())
    }

    #[test]
    fn triangle_far_away() {
        let t = tri([5.0, 0.0, 0.0], [6.0, 0.0, 0.0], [5.0, 1.0, 0.0]);
        assert!(!obb_triangle_overlap(&unit_box(Point3::origin()), &t));
    }

    #[test]
    fn triangle_piercing_without_vertices_inside() {
        // large triangle through the box center, all vertices outside
        let t = tri([-10.0, -10.0, 0.0], [10.0, -10.0, 0.0], [0.0, 10.0, 0.0]);
        assert!(obb_triangle_overlap(&unit_box(Point3::origin()), &t));
    }

    #[test]
    fn triangle_touching_face() {
        let t = tri([0.5, -0.2, -0.2], [0.5, 0.2, -0.2], [0.5, 0.0, 0.2]);
        assert!(obb_triangle_overlap(&unit_box(Point3::origin()), &t));
    }

    #[test]
    fn edge_axis_separates_diagonal_triangle() {
        // near the box corner but beyond the diagonal plane x + y = 1.2
        let t = tri([1.2, 0.0, -1.0], [0.0, 1.2, -1.0], [0.6, 0.6, 1.0]);
        assert!(!obb_triangle_overlap(&unit_box(Point3::origin()), &t));
        let closer = tri([0.9, 0.0, -1.0], [0.0, 0.9, -1.0], [0.45, 0.45, 1.0]);
        assert!(obb_triangle_overlap(&unit_box(Point3::origin()), &closer));
    }

    #[test]
    fn rotated_box() {
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_4);
        let obb = OrientedBoundingBox::new(Point3::origin(), Vector3::new(1.0, 0.1, 1.0), rotation);
        // the long axis points along (1, 1, 0)
        let on_diagonal = tri([0.6, 0.6, -0.1], [0.7, 0.6, 0.1], [0.6, 0.7, 0.1]);
        let off_diagonal = tri([0.6, -0.6, -0.1], [0.7, -0.6, 0.1], [0.6, -0.7, 0.1]);
        assert!(obb_triangle_overlap(&obb, &on_diagonal));
        assert!(!obb_triangle_overlap(&obb, &off_diagonal));
    }

    #[test]
    fn collision_against_cube() {
        let mesh = unit_cube();
        let none = HashSet::new();

        let below = unit_box(Point3::new(0.5, 0.5, -0.6));
        assert!(!collides(&below, &mesh, &none));

        // grazing the bottom face
        let grazing = unit_box(Point3::new(0.5, 0.5, -0.4));
        assert_eq!(find_collision(&grazing, &mesh, &none), Some(0));

        let excluded: HashSet<usize> = [0, 1].into_iter().collect();
        let hit = find_collision(&grazing, &mesh, &excluded);
        // the sides reach down to z = 0
        assert!(hit.is_some_and(|f| f >= 4));
    }

    #[test]
    fn empty_mesh_never_collides() {
        let obb = unit_box(Point3::origin());
        assert!(!collides(&obb, &IndexedMesh::new(), &HashSet::new()));
    }
}
