//! API regression tests for the support pipeline.
//!
//! These run the whole pipeline, from indexing to placement and export, on
//! small hand-built parts. They are organized in tiers:
//!
//! - Tier 1: Detection (plate, two-plus-one, mushroom head)
//! - Tier 2: Placement (columns near walls, batch over a mushroom)
//! - Tier 3: Export (STL and JSON files)
//!
//! A failure here after an API change means the change is breaking.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use support_kit::prelude::*;
use support_kit::support::{MeshDump, SkipReason, cuboid, save_stl_binary};
use support_kit::types::Vertex;

// =============================================================================
// Fixtures
// =============================================================================

fn mesh_from(vertices: &[[f64; 3]], faces: Vec<[u32; 3]>) -> IndexedMesh {
    IndexedMesh::from_parts(vertices.iter().copied().map(Vertex::from).collect(), faces)
}

/// Revolve `(radius, height)` profile points around Y with square rings.
///
/// A zero radius becomes a pole. Each ring takes four consecutive vertex
/// ids, and each segment adds 8 faces (4 next to a pole).
fn square_lathe(profile: &[(f64, f64)]) -> IndexedMesh {
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

/// A wide base, a thin neck and a cup-shaped head whose rim hangs to y = 6.
///
/// Faces: 0..4 base bottom, 28..36 head underside (y = 8), 36..44 rim inner
/// wall, 44..52 rim bottom (y = 6), 52..64 outer wall and top.
fn mushroom() -> IndexedMesh {
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

/// Index a part so touching pieces share vertices. Face order is kept.
fn welded(mesh: &IndexedMesh) -> MeshIndex {
    let soup: Vec<Point3<f64>> = mesh.triangles().flat_map(|t| t.vertices()).collect();
    MeshIndex::from_positions(&soup, None, &WeldParams::default()).unwrap()
}

// =============================================================================
// TIER 1: Detection
// =============================================================================

mod tier1_detection {
    use super::*;

    #[test]
    fn plate_down_face_needs_support() {
        let mesh = mesh_from(
            &[
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 1.0],
                [0.0, 2.0, 0.0],
                [0.0, 2.0, 1.0],
                [1.0, 2.0, 0.0],
            ],
            vec![[0, 1, 2], [3, 4, 5]],
        );
        let index = MeshIndex::new(mesh).unwrap();
        let params = OverhangParams::new().with_filter(RegionFilter::disabled());
        let regions = analyze_overhangs(&index, &params).unwrap();

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].faces(), &[0]);
        assert_eq!(regions[0].origin(), RegionOrigin::Overhang);
    }

    #[test]
    fn two_edge_neighbors_and_one_vertex_neighbor() {
        let mesh = mesh_from(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [2.0, 0.0, 1.0],
                [1.0, 0.0, 2.0],
            ],
            vec![[0, 1, 2], [1, 3, 2], [3, 4, 5]],
        );
        let index = MeshIndex::new(mesh).unwrap();
        let params = OverhangParams::new().with_filter(RegionFilter::disabled());
        let regions = analyze_overhangs(&index, &params).unwrap();

        let faces: Vec<&[usize]> = regions.iter().map(FaceRegion::faces).collect();
        assert_eq!(faces, vec![&[0, 1][..], &[2][..]]);
    }

    #[test]
    fn mushroom_head_is_the_only_dangling_feature() {
        let index = MeshIndex::new(mushroom()).unwrap();
        let regions = analyze_dangling(&index, &DanglingParams::default()).unwrap();

        assert_eq!(regions.len(), 1);
        let region = &regions[0];
        assert_eq!(region.origin(), RegionOrigin::Dangling);
        // rim walls, rim bottom, outer wall, top: no neck or base faces
        assert_eq!(region.faces(), (36..64).collect::<Vec<usize>>().as_slice());
    }

    #[test]
    fn no_overhangs_is_an_empty_list() {
        // a single upward-facing triangle
        let mesh = mesh_from(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]], vec![[0, 1, 2]]);
        let index = MeshIndex::new(mesh).unwrap();
        let regions = analyze_overhangs(&index, &OverhangParams::new()).unwrap();
        assert!(regions.is_empty());
    }
}

// =============================================================================
// TIER 2: Placement
// =============================================================================

mod tier2_placement {
    use super::*;

    /// A pyramid hanging point down at (2, 6, 2) next to a wall block whose
    /// inner face sits at `wall_x`. Faces 0..4 are the pyramid's sides.
    fn pyramid_by_wall(wall_x: f64) -> (MeshIndex, FaceRegion) {
        let apex = Point3::new(2.0, 6.0, 2.0);
        let c = [
            Point3::new(1.5, 8.0, 1.5),
            Point3::new(2.5, 8.0, 1.5),
            Point3::new(2.5, 8.0, 2.5),
            Point3::new(1.5, 8.0, 2.5),
        ];
        let mut mesh = IndexedMesh::new();
        for i in 0..4 {
            mesh.push_triangle(apex, c[i], c[(i + 1) % 4]);
        }
        mesh.push_quad(c[0], c[3], c[2], c[1]);
        mesh.merge(&cuboid(
            &Point3::new(wall_x / 2.0, 5.0, 2.0),
            &Vector3::new(wall_x / 2.0, 5.0, 2.0),
            None,
        ));
        let region = FaceRegion::new(vec![0, 1, 2, 3], RegionOrigin::Overhang, Vector3::y());
        (welded(&mesh), region)
    }

    #[test]
    fn column_near_wall_shrinks_clear() {
        let (index, region) = pyramid_by_wall(0.8);
        let params = PlacementParams::default();
        let placement = solve_placement(&region, &index, PlacementKind::Column, &params).unwrap();

        assert!(placement.attempts > 1);
        assert!(placement.mesh.bounds().min.x > 0.8);
        let PlacementShape::Column { radius, .. } = placement.shape else {
            panic!("expected a column");
        };
        assert!(radius < 2.0);
    }

    #[test]
    fn column_near_wall_never_intersects() {
        // too close for any allowed radius
        let (index, region) = pyramid_by_wall(1.9);
        let params = PlacementParams::default();
        let result = solve_placement(&region, &index, PlacementKind::Column, &params);
        assert!(matches!(result, Err(PlacementError::Collision { .. })));
    }

    #[test]
    fn mushroom_overhangs_get_columns_clear_of_the_neck() {
        let index = MeshIndex::new(mushroom()).unwrap();
        let params = OverhangParams::new().with_filter(RegionFilter::disabled());
        let regions = analyze_overhangs(&index, &params).unwrap();
        assert_eq!(regions.len(), 3);

        let batch = solve_placements(
            &regions,
            &index,
            PlacementKind::Column,
            &PlacementParams::default(),
            &PassControl::new(),
        );
        assert!(!batch.cancelled);

        // the rim column stands on the base, outside the neck
        assert_eq!(batch.placements.len(), 1);
        let column = &batch.placements[0];
        assert_eq!(column.region, (44..52).collect::<Vec<usize>>());
        let PlacementShape::Column { base_height, tip_height, .. } = column.shape else {
            panic!("expected a column");
        };
        assert!((base_height - 1.0).abs() < 1e-9);
        assert!((tip_height - 6.0).abs() < 1e-9);

        // the head underside tip touches the neck, which shares its ring;
        // the base bottom sits on the plate
        assert_eq!(batch.skipped.len(), 2);
        assert_eq!(batch.skipped[0].region, 0);
        assert!(matches!(
            batch.skipped[0].reason,
            SkipReason::Failed(PlacementError::Collision { face }) if (20..28).contains(&face)
        ));
        assert_eq!(batch.skipped[1].region, 2);
        assert!(matches!(
            batch.skipped[1].reason,
            SkipReason::Failed(PlacementError::Degenerate { .. })
        ));
    }

    #[test]
    fn mushroom_head_box_is_blocked_by_the_neck() {
        let index = MeshIndex::new(mushroom()).unwrap();
        let regions = analyze_dangling(&index, &DanglingParams::default()).unwrap();
        let params = PlacementParams::default();
        let result = solve_placement(&regions[0], &index, PlacementKind::Box, &params);
        assert_eq!(result.unwrap_err(), PlacementError::NoValidExtent { attempts: 6 });
    }

    #[test]
    fn ray_rests_on_the_base() {
        let mesh = mushroom();
        // under the rim: base top at y = 1
        let h = ray_height_below(&mesh, [3.5, 3.5], 6.0, UpAxis::Y);
        assert!((h - 1.0).abs() < 1e-12);
        // beyond the base
        assert!(ray_height_below(&mesh, [9.0, 9.0], 6.0, UpAxis::Y).abs() < f64::EPSILON);
    }
}

// =============================================================================
// TIER 3: Export
// =============================================================================

mod tier3_export {
    use super::*;

    #[test]
    fn placements_and_regions_export() {
        let index = MeshIndex::new(mushroom()).unwrap();
        let params = OverhangParams::new().with_filter(RegionFilter::disabled());
        let regions = analyze_overhangs(&index, &params).unwrap();
        // the rim underside, clear of the neck
        let placement =
            solve_placement(&regions[1], &index, PlacementKind::Column, &PlacementParams::default())
                .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let stl = dir.path().join("support.stl");
        save_stl_binary(&stl, &placement.mesh, None).unwrap();
        assert_eq!(
            std::fs::metadata(&stl).unwrap().len(),
            84 + 50 * placement.mesh.face_count() as u64
        );

        let json = dir.path().join("region.json");
        let dump = MeshDump::from_mesh(index.mesh(), Some(regions[0].faces())).unwrap();
        dump.save_json(&json).unwrap();
        let text = std::fs::read_to_string(&json).unwrap();
        assert!(text.contains("\"indices\""));
        assert_eq!(dump.indices.len(), 8);
        assert_eq!(dump.vertices.len(), 8);
    }
}
