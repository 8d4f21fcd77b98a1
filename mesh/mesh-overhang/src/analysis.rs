//! Analysis pipelines.

use mesh_index::MeshIndex;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::classify::{FaceMask, classify};
use crate::dangling::{
    expand_upward, find_dangling_vertex_regions, merge_small_regions, tip_faces, to_face_regions,
};
use crate::error::OverhangResult;
use crate::filter::FilterVerdict;
use crate::grow::{grow_all, grow_relaxed};
use crate::params::{DanglingParams, OverhangParams};
use crate::region::{FaceRegion, RegionOrigin, VertexRegion};

/// Find overhang regions by face angle.
///
/// Classifies every face, splits the overhangs into connected regions,
/// drops regions the filter rejects, and returns the rest largest first,
/// capped at `params.max_regions`. With a positive `angle_margin`, regions
/// also absorb connected faces that miss the threshold by less than the
/// margin.
///
/// A mesh without overhangs yields an empty list.
///
/// # Errors
///
/// Returns [`OverhangError::InvalidConfig`](crate::OverhangError::InvalidConfig)
/// if the parameters are invalid.
///
/// # Example
///
/// ```
/// use mesh_index::MeshIndex;
/// use mesh_overhang::{OverhangParams, RegionFilter, analyze_overhangs};
/// use mesh_types::unit_cube;
/// use nalgebra::Vector3;
///
/// let index = MeshIndex::new(unit_cube()).unwrap();
/// let params = OverhangParams::new()
///     .with_up(Vector3::z())
///     .with_filter(RegionFilter::disabled());
///
/// let regions = analyze_overhangs(&index, &params).unwrap();
/// assert_eq!(regions.len(), 1);
/// assert_eq!(regions[0].faces(), &[0, 1]);
/// ```
pub fn analyze_overhangs(
    index: &MeshIndex,
    params: &OverhangParams,
) -> OverhangResult<Vec<FaceRegion>> {
    params.validate()?;

    info!(
        faces = index.face_count(),
        support_angle = params.support_angle,
        angle_margin = params.angle_margin,
        "Starting overhang analysis"
    );

    let normals = index.face_normals();
    let strict = classify(normals, &params.up, params.support_angle);
    if strict.count() == 0 {
        info!("No overhanging faces");
        return Ok(Vec::new());
    }

    let adjacency = index.face_adjacency();
    let components = if params.angle_margin > 0.0 {
        let relaxed = classify(normals, &params.up, params.support_angle - params.angle_margin);
        grow_relaxed(&strict, &relaxed, adjacency)
    } else {
        grow_all(&strict, adjacency)
    };
    let candidate_count = components.len();

    let mut kept: Vec<Vec<usize>> = components
        .into_par_iter()
        .filter(|faces| {
            let verdict = params.filter.evaluate(faces, index, &params.up);
            if !verdict.is_keep() {
                debug!(faces = faces.len(), ?verdict, "Rejected overhang region");
            }
            verdict.is_keep()
        })
        .collect();

    kept.sort_by(|a, b| b.len().cmp(&a.len()));
    kept.truncate(params.max_regions);

    info!(
        overhang_faces = strict.count(),
        candidates = candidate_count,
        regions = kept.len(),
        "Overhang analysis complete"
    );

    Ok(kept
        .into_iter()
        .map(|faces| {
            FaceRegion::new(faces, RegionOrigin::Overhang, params.up)
                .with_min_delta_height(params.filter.min_delta_height)
        })
        .collect())
}

/// A dangling feature with every intermediate stage of its detection.
#[derive(Debug, Clone)]
pub struct DanglingFeature {
    /// Locally lowest vertices after small-region merging.
    pub seed: VertexRegion,
    /// Seed grown upward into the hanging shape.
    pub expanded: VertexRegion,
    /// Faces of the hanging shape.
    pub region: FaceRegion,
    /// Downward faces touching the seed; the filter judges shape by these.
    pub tip_faces: Vec<usize>,
}

/// Find dangling features by vertex height.
///
/// Equivalent to [`analyze_dangling_detailed`] keeping only the face
/// regions.
///
/// # Errors
///
/// Returns [`OverhangError::InvalidConfig`](crate::OverhangError::InvalidConfig)
/// if the parameters are invalid.
pub fn analyze_dangling(
    index: &MeshIndex,
    params: &DanglingParams,
) -> OverhangResult<Vec<FaceRegion>> {
    Ok(analyze_dangling_detailed(index, params)?
        .into_iter()
        .map(|feature| feature.region)
        .collect())
}

/// Find dangling features, keeping seed and expansion details.
///
/// Candidate faces are those classified as overhangs at
/// `params.candidate_angle`. The filter's size threshold applies to the
/// whole feature and its shape thresholds to the tip faces. Features are
/// returned largest first, capped at `params.max_regions`.
///
/// # Errors
///
/// Returns [`OverhangError::InvalidConfig`](crate::OverhangError::InvalidConfig)
/// if the parameters are invalid.
pub fn analyze_dangling_detailed(
    index: &MeshIndex,
    params: &DanglingParams,
) -> OverhangResult<Vec<DanglingFeature>> {
    params.validate()?;

    let up = params.axis.unit();
    info!(
        vertices = index.vertex_count(),
        min_drop = params.min_drop,
        min_height = params.min_height,
        axis = ?params.axis,
        "Starting dangling analysis"
    );

    let candidates = classify(index.face_normals(), &up, params.candidate_angle);
    let seeds = find_dangling_vertex_regions(
        index,
        params.axis,
        params.min_drop,
        params.min_height,
        &candidates,
    );
    if seeds.is_empty() {
        info!("No dangling vertices");
        return Ok(Vec::new());
    }
    let seed_count = seeds.len();

    let seeds = merge_small_regions(seeds, params.min_region_vertices, index.vertex_adjacency());
    let expanded: Vec<VertexRegion> = seeds
        .par_iter()
        .map(|seed| expand_upward(seed, index, params.axis, params.min_drop))
        .collect();
    let face_regions = to_face_regions(&expanded, &candidates, index.mesh());

    let mut features: Vec<DanglingFeature> = seeds
        .into_par_iter()
        .zip(expanded)
        .zip(face_regions)
        .filter_map(|((seed, expanded), faces)| {
            let tips = tip_faces_or_region(&seed, &candidates, index, &faces);
            let verdict = match params.filter.check_size(&faces) {
                FilterVerdict::Keep { .. } => params.filter.evaluate_shape(&tips, index, &up),
                rejected => rejected,
            };
            if !verdict.is_keep() {
                debug!(
                    seed_vertices = seed.len(),
                    faces = faces.len(),
                    ?verdict,
                    "Rejected dangling region"
                );
                return None;
            }
            Some(DanglingFeature {
                seed,
                expanded,
                region: FaceRegion::new(faces, RegionOrigin::Dangling, up)
                    .with_min_delta_height(params.filter.min_delta_height),
                tip_faces: tips,
            })
        })
        .collect();

    features.sort_by(|a, b| b.region.len().cmp(&a.region.len()));
    features.truncate(params.max_regions);

    info!(
        seeds = seed_count,
        features = features.len(),
        "Dangling analysis complete"
    );

    Ok(features)
}

fn tip_faces_or_region(
    seed: &VertexRegion,
    candidates: &FaceMask,
    index: &MeshIndex,
    region: &[usize],
) -> Vec<usize> {
    let tips = tip_faces(seed, candidates, index);
    if tips.is_empty() { region.to_vec() } else { tips }
}
