//! Procedural support shapes.
//!
//! Every builder gives each quad its own four vertices and each cap
//! triangle its own three, so shapes can be merged and exported without
//! smoothing across hard edges. Welding the output yields a closed mesh
//! with outward normals.
//!
//! Shapes are built in a local frame with +Y up and then posed with
//! [`place`]. [`UpAxis::frame`] carries that frame onto other build axes.

// Allow numeric casts inherent to geometry (segment counts)
#![allow(clippy::cast_precision_loss)]

use mesh_types::{IndexedMesh, Point3, Rotation3, UpAxis, Vector3};
use nalgebra::Matrix3;

use crate::edges::Segment;
use crate::params::{ColumnParams, RailParams, WingParams};

/// Rotate a mesh about the origin, then move it to `position`.
#[must_use]
pub fn place(
    mut mesh: IndexedMesh,
    position: &Point3<f64>,
    rotation: &Rotation3<f64>,
) -> IndexedMesh {
    mesh.rotate(rotation);
    mesh.translate(position.coords);
    mesh
}

/// Right-handed frame with local X along `direction`, local Y up and
/// local Z across.
///
/// `direction` must be horizontal and non-zero.
#[must_use]
pub fn upright_frame(direction: &Vector3<f64>, axis: UpAxis) -> Rotation3<f64> {
    let x = direction.normalize();
    let y = axis.unit();
    let z = x.cross(&y);
    Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z]))
}

fn local_box(mesh: &mut IndexedMesh, min: Vector3<f64>, max: Vector3<f64>) {
    let corner = |x: bool, y: bool, z: bool| {
        Point3::new(
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        )
    };
    let (f, t) = (false, true);

    mesh.push_quad(corner(t, f, f), corner(t, t, f), corner(t, t, t), corner(t, f, t));
    mesh.push_quad(corner(f, f, f), corner(f, f, t), corner(f, t, t), corner(f, t, f));
    mesh.push_quad(corner(f, t, f), corner(f, t, t), corner(t, t, t), corner(t, t, f));
    mesh.push_quad(corner(f, f, f), corner(t, f, f), corner(t, f, t), corner(f, f, t));
    mesh.push_quad(corner(f, f, t), corner(t, f, t), corner(t, t, t), corner(f, t, t));
    mesh.push_quad(corner(f, f, f), corner(f, t, f), corner(t, t, f), corner(t, f, f));
}

/// A box with 24 vertices and 12 faces.
///
/// ```
/// use mesh_support::cuboid;
/// use nalgebra::{Point3, Vector3};
///
/// let mesh = cuboid(&Point3::new(0.0, 1.0, 0.0), &Vector3::new(1.0, 1.0, 2.0), None);
/// assert_eq!(mesh.vertices.len(), 24);
/// assert!((mesh.signed_volume() - 16.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn cuboid(
    center: &Point3<f64>,
    half_extents: &Vector3<f64>,
    rotation: Option<&Rotation3<f64>>,
) -> IndexedMesh {
    let mut mesh = IndexedMesh::with_capacity(24, 12);
    let h = half_extents.abs();
    local_box(&mut mesh, -h, h);
    place(mesh, center, rotation.unwrap_or(&Rotation3::identity()))
}

/// A tapered polygonal column from `base_height` up to `tip`.
///
/// The base ring has the full radius and the top ring `radius * taper`.
/// Both rings are centered under the tip. Returns `None` when the tip is
/// not above the base.
///
/// ```
/// use mesh_support::{ColumnParams, tapered_column};
/// use mesh_types::{Point3, UpAxis};
///
/// let tip = Point3::new(0.0, 5.0, 0.0);
/// let column = tapered_column(&tip, 0.0, &ColumnParams::default(), UpAxis::Y).unwrap();
/// assert_eq!(column.faces.len(), 32);
/// assert!(tapered_column(&Point3::origin(), 1.0, &ColumnParams::default(), UpAxis::Y).is_none());
/// ```
#[must_use]
pub fn tapered_column(
    tip: &Point3<f64>,
    base_height: f64,
    params: &ColumnParams,
    axis: UpAxis,
) -> Option<IndexedMesh> {
    let height = axis.height(tip) - base_height;
    if height <= 0.0 || params.sides < 3 {
        return None;
    }

    let n = params.sides;
    let ring = |radius: f64, y: f64| -> Vec<Point3<f64>> {
        (0..n)
            .map(|i| {
                let theta = std::f64::consts::TAU * i as f64 / n as f64;
                Point3::new(radius * theta.cos(), y, radius * theta.sin())
            })
            .collect()
    };
    let bottom = ring(params.radius, 0.0);
    let top = ring(params.radius * params.taper, height);
    let (low_center, high_center) = (Point3::origin(), Point3::new(0.0, height, 0.0));

    let mut mesh = IndexedMesh::with_capacity(10 * n, 4 * n);
    for i in 0..n {
        let j = (i + 1) % n;
        mesh.push_quad(bottom[i], top[i], top[j], bottom[j]);
    }
    for i in 0..n {
        let j = (i + 1) % n;
        mesh.push_triangle(low_center, bottom[i], bottom[j]);
        mesh.push_triangle(high_center, top[j], top[i]);
    }

    let position = axis.compose(axis.plane(tip), base_height);
    Some(place(mesh, &position, &axis.frame()))
}

/// A thin wall under a segment, from `base_height` up to the segment's
/// lower endpoint.
///
/// The wall runs along the segment's horizontal direction, centered on its
/// midpoint, with `params.width` thickness across it. Returns `None` when
/// the segment is shorter than `min_edge_length` horizontally or its lower
/// endpoint is not above the base.
#[must_use]
pub fn edge_rail(
    segment: &Segment,
    base_height: f64,
    params: &RailParams,
    axis: UpAxis,
) -> Option<IndexedMesh> {
    let (center, half, rotation) = rail_box(segment, base_height, params, axis)?;
    Some(cuboid(&center, &half, Some(&rotation)))
}

/// Pose and local half-extents of the box [`edge_rail`] builds.
pub(crate) fn rail_box(
    segment: &Segment,
    base_height: f64,
    params: &RailParams,
    axis: UpAxis,
) -> Option<(Point3<f64>, Vector3<f64>, Rotation3<f64>)> {
    let direction = segment.horizontal(axis);
    let length = direction.norm();
    let top = segment.lower_height(axis);
    if length < params.min_edge_length || length <= f64::EPSILON || top <= base_height {
        return None;
    }

    let center = axis.compose(axis.plane(&segment.midpoint()), (base_height + top) / 2.0);
    let half = Vector3::new(length / 2.0, (top - base_height) / 2.0, params.width / 2.0);
    Some((center, half, upright_frame(&direction, axis)))
}

/// A wing plate in its local frame.
///
/// Width runs along X and thickness along Z, both centered on the origin.
/// Height runs from 0 to `params.height` along +Y. With a notch whose band
/// fits strictly inside the plate, the plate is split into a bottom box, a
/// thinner notch box and a top box. Otherwise it is a single box.
///
/// ```
/// use mesh_support::{NotchParams, WingParams, wing_plate};
///
/// let plain = wing_plate(&WingParams::new(4.0, 1.0, 10.0));
/// assert_eq!(plain.faces.len(), 12);
///
/// let notch = Some(NotchParams::default());
/// let notched = wing_plate(&WingParams::new(4.0, 1.0, 10.0).with_notch(notch));
/// assert_eq!(notched.faces.len(), 36);
///
/// // too short for the band: falls back to one box
/// let short = wing_plate(&WingParams::new(4.0, 1.0, 2.5).with_notch(notch));
/// assert_eq!(short.faces.len(), 12);
/// ```
#[must_use]
pub fn wing_plate(params: &WingParams) -> IndexedMesh {
    let (hw, ht, h) = (params.width / 2.0, params.thickness / 2.0, params.height);
    let slab = |mesh: &mut IndexedMesh, y0: f64, y1: f64, half_thickness: f64| {
        local_box(
            mesh,
            Vector3::new(-hw, y0, -half_thickness),
            Vector3::new(hw, y1, half_thickness),
        );
    };

    let mut mesh = IndexedMesh::with_capacity(72, 36);
    let band = params.notch.and_then(|notch| {
        let band_top = h - notch.offset_from_top;
        let band_bottom = band_top - notch.band_height;
        (band_bottom > 0.0 && band_top < h).then_some((band_bottom, band_top, notch.depth))
    });

    match band {
        Some((band_bottom, band_top, depth)) => {
            slab(&mut mesh, 0.0, band_bottom, ht);
            slab(&mut mesh, band_bottom, band_top, ht * (1.0 - depth));
            slab(&mut mesh, band_top, h, ht);
        }
        None => slab(&mut mesh, 0.0, h, ht),
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_index::{EdgeMap, WeldParams, weld};
    use mesh_types::{MeshBounds, MeshTopology};

    fn assert_closed_outward(mesh: &IndexedMesh) {
        let soup: Vec<Point3<f64>> = mesh.triangles().flat_map(|t| t.vertices()).collect();
        let welded = weld(&soup, None, &WeldParams::default()).unwrap();
        assert!(EdgeMap::build(&welded.mesh).is_closed_manifold());
        assert!(mesh.signed_volume() > 0.0);
    }

    #[test]
    fn cuboid_is_closed_and_rotated() {
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), 0.3);
        let half = Vector3::new(1.0, 0.5, 2.0);
        let mesh = cuboid(&Point3::new(1.0, 2.0, 3.0), &half, Some(&rotation));
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.face_count(), 12);
        assert!((mesh.signed_volume() - 8.0).abs() < 1e-9);
        assert_closed_outward(&mesh);
    }

    #[test]
    fn column_on_every_axis() {
        let params = ColumnParams::default();
        for axis in [UpAxis::X, UpAxis::Y, UpAxis::Z] {
            let tip = axis.compose([1.0, -2.0], 7.0);
            let mesh = tapered_column(&tip, 2.0, &params, axis).unwrap();
            assert_eq!(mesh.face_count(), 32);
            assert_eq!(mesh.vertex_count(), 80);
            assert_closed_outward(&mesh);

            let (low, high) = mesh.bounds().height_span(axis);
            assert!((low - 2.0).abs() < 1e-9);
            assert!((high - 7.0).abs() < 1e-9);
        }
    }

    #[test]
    fn column_top_ring_is_tapered() {
        let tip = Point3::new(0.0, 4.0, 0.0);
        let params = ColumnParams::default().with_taper(0.5);
        let mesh = tapered_column(&tip, 0.0, &params, UpAxis::Y).unwrap();
        let top_radius = mesh
            .positions()
            .filter(|p| (p.y - 4.0).abs() < 1e-9)
            .map(|p| p.x.hypot(p.z))
            .fold(0.0, f64::max);
        assert!((top_radius - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rail_follows_edge() {
        let segment = Segment::new(Point3::new(0.0, 5.0, 0.0), Point3::new(3.0, 6.0, 4.0));
        let mesh = edge_rail(&segment, 1.0, &RailParams::default(), UpAxis::Y).unwrap();
        assert_closed_outward(&mesh);
        // 5 long, 4 tall, 1 wide
        assert!((mesh.signed_volume() - 20.0).abs() < 1e-9);
        let (low, high) = mesh.bounds().height_span(UpAxis::Y);
        assert!((low - 1.0).abs() < 1e-9);
        assert!((high - 5.0).abs() < 1e-9);
    }

    #[test]
    fn rail_rejects_vertical_and_buried_edges() {
        let params = RailParams::default();
        let vertical = Segment::new(Point3::new(0.0, 1.0, 0.0), Point3::new(0.05, 4.0, 0.0));
        assert!(edge_rail(&vertical, 0.0, &params, UpAxis::Y).is_none());

        let low = Segment::new(Point3::new(0.0, 1.0, 0.0), Point3::new(2.0, 3.0, 0.0));
        assert!(edge_rail(&low, 1.0, &params, UpAxis::Y).is_none());
        assert!(edge_rail(&low, 0.5, &params, UpAxis::Y).is_some());
    }

    #[test]
    fn notched_wing_volume() {
        let notch = crate::NotchParams::default();
        let params = WingParams::new(4.0, 1.0, 10.0).with_notch(Some(notch));
        let mesh = wing_plate(&params);
        assert_closed_outward(&mesh);
        // 9.2 of full thickness plus a 0.8 band at half thickness
        let expected = 4.0 * (9.2 + 0.8 * 0.5);
        assert!((mesh.signed_volume() - expected).abs() < 1e-9);

        let (low, high) = mesh.bounds().height_span(UpAxis::Y);
        assert!(low.abs() < 1e-12);
        assert!((high - 10.0).abs() < 1e-12);
    }

    #[test]
    fn notch_band_touching_the_base_falls_back() {
        // band would run from 0.0 to 0.8
        let params = WingParams::new(4.0, 1.0, 2.8).with_notch(Some(crate::NotchParams::default()));
        assert_eq!(wing_plate(&params).face_count(), 12);
    }

    #[test]
    fn placed_wing_stands_on_axis() {
        let params = WingParams::new(2.0, 0.5, 3.0);
        let frame = upright_frame(&Vector3::new(1.0, 0.0, 1.0), UpAxis::Y);
        let mesh = place(wing_plate(&params), &Point3::new(5.0, 1.0, 5.0), &frame);
        assert_closed_outward(&mesh);
        let (low, high) = mesh.bounds().height_span(UpAxis::Y);
        assert!((low - 1.0).abs() < 1e-12);
        assert!((high - 4.0).abs() < 1e-12);
    }
}
