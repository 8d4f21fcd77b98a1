//! Region growing over face adjacency.
//!
//! Regions are connected components of a face mask, found by breadth-first
//! flood fill across manifold edges.

use std::collections::VecDeque;

use mesh_index::FaceAdjacency;

use crate::classify::FaceMask;

/// Grow a region from a seed face through mask faces.
///
/// Returns the reachable mask faces in ascending order, or an empty vector
/// if the seed itself is not in the mask.
///
/// # Example
///
/// ```
/// use mesh_index::FaceAdjacency;
/// use mesh_overhang::{FaceMask, grow};
/// use mesh_types::unit_cube;
///
/// let cube = unit_cube();
/// let adjacency = FaceAdjacency::from_mesh(&cube);
/// // the two bottom triangles
/// let mask = FaceMask::from_faces(12, &[0, 1]);
/// assert_eq!(grow(0, &mask, &adjacency), vec![0, 1]);
/// assert!(grow(5, &mask, &adjacency).is_empty());
/// ```
#[must_use]
pub fn grow(seed: usize, mask: &FaceMask, adjacency: &FaceAdjacency) -> Vec<usize> {
    if !mask.contains(seed) {
        return Vec::new();
    }
    let mut visited = vec![false; mask.len()];
    flood(seed, |f| mask.contains(f), adjacency, &mut visited)
}

/// Split a mask into connected components.
///
/// Components are disjoint, each sorted, and ordered by their lowest face
/// id. Callers usually re-sort by size.
#[must_use]
pub fn grow_all(mask: &FaceMask, adjacency: &FaceAdjacency) -> Vec<Vec<usize>> {
    let mut visited = vec![false; mask.len()];
    let mut regions = Vec::new();

    for seed in mask.iter() {
        if visited[seed] {
            continue;
        }
        regions.push(flood(seed, |f| mask.contains(f), adjacency, &mut visited));
    }

    regions
}

/// Grow components that start on strict faces and may extend into relaxed
/// ones.
///
/// Faces only in `relaxed` never start a region on their own. A relaxed
/// face bridging two strict groups joins them into one region.
#[must_use]
pub fn grow_relaxed(
    strict: &FaceMask,
    relaxed: &FaceMask,
    adjacency: &FaceAdjacency,
) -> Vec<Vec<usize>> {
    let traversable = strict.union(relaxed);
    let mut visited = vec![false; traversable.len()];
    let mut regions = Vec::new();

    for seed in strict.iter() {
        if visited[seed] {
            continue;
        }
        regions.push(flood(
            seed,
            |f| traversable.contains(f),
            adjacency,
            &mut visited,
        ));
    }

    regions
}

fn flood(
    seed: usize,
    traversable: impl Fn(usize) -> bool,
    adjacency: &FaceAdjacency,
    visited: &mut [bool],
) -> Vec<usize> {
    let mut region = Vec::new();
    let mut queue = VecDeque::from([seed]);
    visited[seed] = true;

    while let Some(face) = queue.pop_front() {
        region.push(face);
        for &neighbor in adjacency.neighbors(face) {
            if neighbor < visited.len() && !visited[neighbor] && traversable(neighbor) {
                visited[neighbor] = true;
                queue.push_back(neighbor);
            }
        }
    }

    region.sort_unstable();
    region
}
