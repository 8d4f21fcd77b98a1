//! Collision-checked placement of one support under one region.
//!
//! Every solver follows the same loop: size a candidate, test its bounding
//! box against every face outside the region, and shrink on failure until
//! `max_attempts` runs out. Column, rail and wing boxes stop `clearance`
//! short of the region, so faces rising from its edges never block them
//! while faces hanging below it do.

use hashbrown::HashSet;
use mesh_collide::{
    OrientedBoundingBox, find_collision, height_below, obb_from_points, obb_triangle_overlap,
};
use mesh_index::MeshIndex;
use mesh_overhang::FaceRegion;
use mesh_types::{Aabb, IndexedMesh, MeshTopology, Point3, Rotation3, UpAxis, Vector3};
use tracing::debug;

use crate::edges::{Segment, boundary_runs, merge_nearby_edges, region_boundary_edges};
use crate::error::{PlacementError, PlacementResult, degenerate};
use crate::params::{NotchParams, PlacementParams};
use crate::shapes::{cuboid, place, rail_box, tapered_column, upright_frame, wing_plate};

/// The kind of support to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementKind {
    /// A box spanning the free vertical extent under a dangling volume.
    Box,
    /// A tapered column under the region's lowest vertex.
    Column,
    /// Thin walls under the region's straight boundary runs.
    Rail,
    /// An upright plate under the region's lowest vertex.
    Wing,
}

impl PlacementKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 4] = [Self::Box, Self::Column, Self::Rail, Self::Wing];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Column => "column",
            Self::Rail => "rail",
            Self::Wing => "wing",
        }
    }
}

impl std::fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The sizes a placement was built with.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementShape {
    /// World-aligned box.
    Box {
        /// Half extents along the world axes.
        half_extents: Vector3<f64>,
    },
    /// Tapered column.
    Column {
        /// Base radius after shrinking.
        radius: f64,
        /// Top radius as a fraction of the base radius.
        taper: f64,
        /// Number of sides.
        sides: usize,
        /// Height of the base ring.
        base_height: f64,
        /// Height of the tip.
        tip_height: f64,
    },
    /// One or more rails.
    Rail {
        /// The boundary segments that received a rail.
        segments: Vec<Segment>,
        /// Rail thickness.
        width: f64,
    },
    /// Wing plate.
    Wing {
        /// Width after shrinking.
        width: f64,
        /// Plate thickness.
        thickness: f64,
        /// Height from the base to the tip.
        height: f64,
        /// Notch, if the plate was built with one.
        notch: Option<NotchParams>,
    },
}

/// A support shape placed under a region.
#[derive(Debug, Clone)]
pub struct Placement {
    /// What was built.
    pub kind: PlacementKind,
    /// Base point of the support.
    pub position: Point3<f64>,
    /// Orientation, for shapes that are not world-aligned.
    pub rotation: Option<Rotation3<f64>>,
    /// Sizes the shape was built with.
    pub shape: PlacementShape,
    /// Face ids of the source region.
    pub region: Vec<usize>,
    /// Generated geometry, in world coordinates.
    pub mesh: IndexedMesh,
    /// Bounding box used for collision checks.
    pub obb: OrientedBoundingBox,
    /// Number of candidates tried, including the accepted one.
    pub attempts: usize,
}

/// Place one support of `kind` under `region`.
///
/// # Errors
///
/// - [`PlacementError::EmptyRegion`] if the region has no faces.
/// - [`PlacementError::InvalidConfig`] if `params` is invalid.
/// - [`PlacementError::Collision`] if every candidate hit the mesh.
/// - [`PlacementError::NoValidExtent`] if no vertical span fit (boxes) or no
///   boundary run was long enough (rails).
/// - [`PlacementError::Degenerate`] if there is no room under the region.
///
/// # Example
///
/// ```
/// use mesh_index::MeshIndex;
/// use mesh_overhang::{FaceRegion, RegionOrigin};
/// use mesh_support::{PlacementKind, PlacementParams, solve_placement};
/// use mesh_types::{IndexedMesh, Point3, Vector3};
///
/// // a down-facing square hanging at y = 5
/// let mut mesh = IndexedMesh::new();
/// mesh.push_quad(
///     Point3::new(0.0, 5.0, 0.0),
///     Point3::new(2.0, 5.0, 0.0),
///     Point3::new(2.0, 5.0, 2.0),
///     Point3::new(0.0, 5.0, 2.0),
/// );
/// let index = MeshIndex::new(mesh).unwrap();
/// let region = FaceRegion::new(vec![0, 1], RegionOrigin::Overhang, Vector3::y());
///
/// let params = PlacementParams::default();
/// let placement = solve_placement(&region, &index, PlacementKind::Column, &params).unwrap();
/// assert_eq!(placement.kind, PlacementKind::Column);
/// assert_eq!(placement.attempts, 1);
/// ```
pub fn solve_placement(
    region: &FaceRegion,
    index: &MeshIndex,
    kind: PlacementKind,
    params: &PlacementParams,
) -> PlacementResult<Placement> {
    if region.is_empty() {
        return Err(PlacementError::EmptyRegion);
    }
    params.validate()?;

    let site = Site::new(region, index, params)?;
    debug!(
        kind = kind.as_str(),
        faces = region.len(),
        attached = site.attached.len(),
        "Solving placement"
    );

    match kind {
        PlacementKind::Box => solve_box(&site),
        PlacementKind::Column => solve_column(&site),
        PlacementKind::Rail => solve_rail(&site),
        PlacementKind::Wing => solve_wing(&site),
    }
}

/// Faces outside a region that share a vertex with it.
///
/// Only boxes, which reach up into the region, treat these specially: they
/// are tested against the part of the box below the region.
#[must_use]
pub fn attached_faces(region: &FaceRegion, index: &MeshIndex) -> HashSet<usize> {
    let own: HashSet<usize> = region.faces().iter().copied().collect();
    region
        .vertices(index)
        .into_iter()
        .flat_map(|v| index.faces_around(v).iter().copied())
        .filter(|face| !own.contains(face))
        .collect()
}

/// Shared inputs of the per-kind solvers.
struct Site<'a> {
    region: &'a FaceRegion,
    index: &'a MeshIndex,
    params: &'a PlacementParams,
    own: HashSet<usize>,
    attached: HashSet<usize>,
    points: Vec<Point3<f64>>,
    tip: Point3<f64>,
}

impl<'a> Site<'a> {
    fn new(
        region: &'a FaceRegion,
        index: &'a MeshIndex,
        params: &'a PlacementParams,
    ) -> PlacementResult<Self> {
        let axis = params.axis;
        let mesh = index.mesh();
        let points: Vec<Point3<f64>> = region
            .vertices(index)
            .into_iter()
            .filter(|&v| (v as usize) < mesh.vertices.len())
            .map(|v| *mesh.position(v))
            .collect();

        // lowest vertex, ties broken by horizontal distance to the centroid
        let centroid = axis.plane(&region.stats(index).centroid);
        let planar = |p: &Point3<f64>| {
            let [x, y] = axis.plane(p);
            (x - centroid[0]).hypot(y - centroid[1])
        };
        let tip = points
            .iter()
            .min_by(|a, b| {
                axis.height(a)
                    .total_cmp(&axis.height(b))
                    .then_with(|| planar(a).total_cmp(&planar(b)))
            })
            .copied()
            .ok_or(PlacementError::EmptyRegion)?;

        Ok(Self {
            region,
            index,
            params,
            own: region.faces().iter().copied().collect(),
            attached: attached_faces(region, index),
            points,
            tip,
        })
    }

    const fn axis(&self) -> UpAxis {
        self.params.axis
    }

    fn mesh(&self) -> &IndexedMesh {
        self.index.mesh()
    }

    fn obstruction(&self, plane: [f64; 2], ceiling: f64) -> f64 {
        height_below(self.mesh(), plane, ceiling, self.axis(), &self.params.raycast)
    }

    fn collision(&self, obb: &OrientedBoundingBox) -> Option<usize> {
        find_collision(obb, self.mesh(), &self.own)
    }

    /// Collision for a world-aligned box that reaches up into the region.
    ///
    /// Attached faces only count where they meet the part of the box more
    /// than `clearance` below the region's lowest point.
    fn box_collision(&self, obb: &OrientedBoundingBox, low: f64) -> Option<usize> {
        let around: HashSet<usize> = self.own.union(&self.attached).copied().collect();
        if let Some(face) = find_collision(obb, self.mesh(), &around) {
            return Some(face);
        }

        let axis = self.axis();
        let (bottom, top) = obb.world_aabb().height_span(axis);
        let cut = (low - self.params.clearance).min(top);
        if cut <= bottom {
            return None;
        }
        let half = axis.plane(&Point3::from(obb.half_extents));
        let below = OrientedBoundingBox::new(
            axis.compose(axis.plane(&obb.center), (bottom + cut) / 2.0),
            axis.compose(half, (cut - bottom) / 2.0).coords,
            Rotation3::identity(),
        );
        let mesh = self.mesh();
        self.attached
            .iter()
            .copied()
            .filter(|&face| mesh.triangle(face).is_some_and(|t| obb_triangle_overlap(&below, &t)))
            .min()
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        kind: PlacementKind,
        position: Point3<f64>,
        rotation: Option<Rotation3<f64>>,
        shape: PlacementShape,
        mesh: IndexedMesh,
        obb: OrientedBoundingBox,
        attempts: usize,
    ) -> Placement {
        debug!(
            kind = kind.as_str(),
            attempts,
            faces = mesh.face_count(),
            "Placement accepted"
        );
        Placement {
            kind,
            position,
            rotation,
            shape,
            region: self.region.faces().to_vec(),
            mesh,
            obb,
            attempts,
        }
    }
}

fn exhausted(last_collision: Option<usize>, attempts: usize) -> PlacementError {
    match last_collision {
        Some(face) => PlacementError::Collision { face },
        None => PlacementError::NoValidExtent { attempts },
    }
}

// =============================================================================
// Column
// =============================================================================

fn solve_column(site: &Site<'_>) -> PlacementResult<Placement> {
    let (axis, params) = (site.axis(), site.params);
    let plane = axis.plane(&site.tip);
    let tip_height = axis.height(&site.tip);
    let base = site.obstruction(plane, tip_height);

    let span = tip_height - base - 2.0 * params.clearance;
    if span <= 0.0 {
        return Err(degenerate(format!(
            "no room for a column between {base} and {tip_height}"
        )));
    }
    let center = axis.compose(plane, (base + tip_height) / 2.0);

    let mut column = params.column;
    let mut last_collision = None;
    for attempt in 1..=params.max_attempts {
        let half = axis.compose([column.radius, column.radius], span / 2.0).coords;
        let obb = OrientedBoundingBox::new(center, half, Rotation3::identity());

        let Some(face) = site.collision(&obb) else {
            let mesh = tapered_column(&site.tip, base, &column, axis)
                .ok_or_else(|| degenerate("column has no height"))?;
            let shape = PlacementShape::Column {
                radius: column.radius,
                taper: column.taper,
                sides: column.sides,
                base_height: base,
                tip_height,
            };
            let position = axis.compose(plane, base);
            return Ok(site.finish(
                PlacementKind::Column,
                position,
                None,
                shape,
                mesh,
                obb,
                attempt,
            ));
        };

        debug!(attempt, face, radius = column.radius, "Column collides, shrinking");
        last_collision = Some(face);
        let next = column.radius * params.shrink_ratio;
        if next < column.min_radius {
            break;
        }
        column.radius = next;
    }
    Err(exhausted(last_collision, params.max_attempts))
}

// =============================================================================
// Rail
// =============================================================================

fn solve_rail(site: &Site<'_>) -> PlacementResult<Placement> {
    let (axis, params) = (site.axis(), site.params);
    let rail = params.rail;

    let edges = region_boundary_edges(site.index, site.region.faces());
    let segments: Vec<Segment> = boundary_runs(site.index, &edges, rail.max_turn)
        .iter()
        .flat_map(|run| merge_nearby_edges(run, rail.merge_distance, rail.min_length))
        .collect();
    debug!(edges = edges.len(), segments = segments.len(), "Rail candidates");

    let mut mesh = IndexedMesh::new();
    let mut kept = Vec::new();
    let mut corners = Vec::new();
    let mut last_collision = None;

    for segment in &segments {
        let under = axis.plane(&segment.midpoint());
        let base = site.obstruction(under, segment.lower_height(axis));
        let Some((center, half, rotation)) = rail_box(segment, base, &rail, axis) else {
            debug!(length = segment.length(), base, "Rail rejected by builder");
            continue;
        };

        let inset = Vector3::new(half.x, (half.y - params.clearance).max(0.0), half.z);
        let obb = OrientedBoundingBox::new(center, inset, rotation);
        if let Some(face) = site.collision(&obb) {
            debug!(face, length = segment.length(), "Rail collides, dropping");
            last_collision = Some(face);
            continue;
        }

        mesh.merge(&cuboid(&center, &half, Some(&rotation)));
        corners.extend(OrientedBoundingBox::new(center, half, rotation).corners());
        kept.push(*segment);
    }

    if kept.is_empty() {
        return Err(exhausted(last_collision, segments.len()));
    }

    let obb = obb_from_points(&corners);
    let shape = PlacementShape::Rail {
        segments: kept,
        width: rail.width,
    };
    let attempts = segments.len();
    Ok(site.finish(PlacementKind::Rail, obb.center, None, shape, mesh, obb, attempts))
}

// =============================================================================
// Wing
// =============================================================================

/// Horizontal direction of the region's longest spread.
fn wing_direction(points: &[Point3<f64>], axis: UpAxis) -> Vector3<f64> {
    let principal = obb_from_points(points);
    (0..3)
        .map(|i| axis.flatten(&principal.axis(i)))
        .find(|d| d.norm() > 1e-6)
        .unwrap_or_else(|| axis.compose([1.0, 0.0], 0.0).coords)
        .normalize()
}

fn solve_wing(site: &Site<'_>) -> PlacementResult<Placement> {
    let (axis, params) = (site.axis(), site.params);
    let direction = wing_direction(&site.points, axis);
    let frame = upright_frame(&direction, axis);
    let (lo, hi) = site
        .points
        .iter()
        .map(|p| p.coords.dot(&direction))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| (lo.min(d), hi.max(d)));

    // centered on the region's spread, in line with the tip
    let anchor = site.tip + direction * ((lo + hi) / 2.0 - site.tip.coords.dot(&direction));
    let plane = axis.plane(&anchor);
    let tip_height = axis.height(&site.tip);
    let base = site.obstruction(plane, tip_height);

    let height = tip_height - base;
    if height <= 2.0 * params.clearance {
        return Err(degenerate(format!(
            "no room for a wing between {base} and {tip_height}"
        )));
    }

    let position = axis.compose(plane, base);
    let center = axis.compose(plane, base + height / 2.0);
    let mut wing = params.wing.with_height(height).with_width((hi - lo).max(params.wing.width));
    let mut last_collision = None;

    for attempt in 1..=params.max_attempts {
        let half = Vector3::new(
            wing.width / 2.0,
            height / 2.0 - params.clearance,
            wing.thickness / 2.0,
        );
        let obb = OrientedBoundingBox::new(center, half, frame);

        let Some(face) = site.collision(&obb) else {
            let mesh = place(wing_plate(&wing), &position, &frame);
            let shape = PlacementShape::Wing {
                width: wing.width,
                thickness: wing.thickness,
                height,
                notch: wing.notch,
            };
            return Ok(site.finish(
                PlacementKind::Wing,
                position,
                Some(frame),
                shape,
                mesh,
                obb,
                attempt,
            ));
        };

        debug!(attempt, face, width = wing.width, "Wing collides, shrinking");
        last_collision = Some(face);
        wing = wing.with_width(wing.width * params.shrink_ratio);
    }
    Err(exhausted(last_collision, params.max_attempts))
}

// =============================================================================
// Box
// =============================================================================

/// Vertical limits for one footprint.
struct Band {
    low: f64,
    overlap_top: f64,
    region_top: f64,
}

/// Fit `[bottom, top]` around the band, or `None` if a face crosses it.
fn fit_span(site: &Site<'_>, footprint: &Aabb, band: &Band) -> Option<(f64, f64)> {
    let (axis, params) = (site.axis(), site.params);
    let mesh = site.mesh();
    let normals = site.index.face_normals();
    let cos_blocking = params.boxes.blocking_angle.to_radians().cos();

    let mut bottom = band.low - params.boxes.depth_below;
    let mut top = band.region_top.max(band.overlap_top);
    let (mut blocking, mut side) = (0_usize, 0_usize);

    for face in 0..mesh.face_count() {
        if site.own.contains(&face) {
            continue;
        }
        let Some(tri) = mesh.triangle(face) else {
            continue;
        };
        let bounds = tri.bounds();
        if !bounds.plane_intersects(axis, footprint) {
            continue;
        }

        let is_blocking = normals
            .get(face)
            .copied()
            .flatten()
            .is_some_and(|n| axis.vertical(&n).abs() >= cos_blocking);
        if is_blocking {
            blocking += 1;
        } else {
            side += 1;
        }

        let (face_low, face_high) = bounds.height_span(axis);
        // rises from the region, inside the volume the box overlaps
        let rises = site.attached.contains(&face) && face_low >= band.low - params.clearance;
        if face_high < band.low {
            bottom = bottom.max(face_high + params.clearance);
        } else if face_low > band.overlap_top {
            top = top.min(face_low - params.clearance);
        } else if !rises {
            debug!(face, blocking = is_blocking, "Face crosses the overlap band");
            return None;
        }
    }

    debug!(blocking, side, bottom, top, "Vertical span");
    (bottom <= band.low && top >= band.overlap_top).then_some((bottom, top))
}

fn solve_box(site: &Site<'_>) -> PlacementResult<Placement> {
    let (axis, params) = (site.axis(), site.params);
    let boxes = params.boxes;
    let bounds = site.region.stats(site.index).bounds;

    let (low, region_top) = bounds.height_span(axis);
    let band = Band {
        low,
        overlap_top: low + boxes.min_overlap,
        region_top,
    };
    let (lo, hi) = (axis.plane(&bounds.min), axis.plane(&bounds.max));
    let center = [(lo[0] + hi[0]) / 2.0, (lo[1] + hi[1]) / 2.0];
    let mut half =
        [0, 1].map(|i| (hi[i] - lo[i]) / 2.0 * boxes.footprint_scale + boxes.footprint_padding);
    let (floor, ceiling) = (band.low - boxes.depth_below, band.region_top.max(band.overlap_top));

    for attempt in 1..=params.max_attempts {
        let footprint = Aabb::new(
            axis.compose([center[0] - half[0], center[1] - half[1]], floor),
            axis.compose([center[0] + half[0], center[1] + half[1]], ceiling),
        );

        if let Some((bottom, top)) = fit_span(site, &footprint, &band) {
            let box_center = axis.compose(center, (bottom + top) / 2.0);
            let half_extents = axis.compose(half, (top - bottom) / 2.0).coords;
            let obb = OrientedBoundingBox::new(box_center, half_extents, Rotation3::identity());

            if let Some(face) = site.box_collision(&obb, band.low) {
                debug!(attempt, face, "Box collides, shrinking footprint");
            } else {
                let mesh = cuboid(&box_center, &half_extents, None);
                let shape = PlacementShape::Box { half_extents };
                return Ok(site.finish(
                    PlacementKind::Box,
                    box_center,
                    None,
                    shape,
                    mesh,
                    obb,
                    attempt,
                ));
            }
        } else {
            debug!(
                attempt,
                half_x = half[0],
                half_y = half[1],
                "No vertical span, shrinking footprint"
            );
        }

        half = half.map(|h| h * params.shrink_ratio);
    }
    Err(PlacementError::NoValidExtent {
        attempts: params.max_attempts,
    })
}
