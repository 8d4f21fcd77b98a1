//! Dangling-feature detection.
//!
//! A dangling feature is material that hangs below its surroundings with
//! nothing underneath: the tip of a stalactite, the lip of a mushroom cap,
//! a chin. Face angles alone miss these when the lowest faces are small or
//! steep, so detection works on vertex heights instead:
//!
//! 1. Seed vertices are locally lowest: no neighbor sits `min_drop` below.
//! 2. Seeds are grouped into connected vertex regions with union-find.
//! 3. Tiny regions merge into an adjacent larger one.
//! 4. Each region expands upward while every lower neighbor of a candidate
//!    is already inside, which stops at the supporting body.
//! 5. Vertex regions become face regions.

use std::collections::VecDeque;

use hashbrown::HashMap;
use mesh_index::{MeshIndex, VertexAdjacency};
use mesh_types::{IndexedMesh, UpAxis};

use crate::classify::FaceMask;
use crate::region::VertexRegion;

/// Disjoint sets over dense ids, with set sizes.
#[derive(Debug, Clone)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    /// Root of the set containing `x`, halving paths on the way.
    pub(crate) fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Union by size.
    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] { (ra, rb) } else { (rb, ra) };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }

    /// Attach the set of `from` under the root of `into`.
    pub(crate) fn union_into(&mut self, from: usize, into: usize) {
        let (rf, ri) = (self.find(from), self.find(into));
        if rf == ri {
            return;
        }
        self.parent[rf] = ri;
        self.size[ri] += self.size[rf];
    }

    /// Size of the set containing `x`.
    pub(crate) fn set_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }
}

/// Find connected groups of locally lowest vertices.
///
/// A vertex is a seed when:
/// - its height along `axis` exceeds `min_height`,
/// - it has at least one neighbor and none at or below `height - min_drop`,
/// - it touches a face in `candidates`.
///
/// Regions are ordered by their lowest vertex id.
#[must_use]
pub fn find_dangling_vertex_regions(
    index: &MeshIndex,
    axis: UpAxis,
    min_drop: f64,
    min_height: f64,
    candidates: &FaceMask,
) -> Vec<VertexRegion> {
    let heights = vertex_heights(index.mesh(), axis);
    let adjacency = index.vertex_adjacency();

    let seeds: Vec<bool> = (0..heights.len())
        .map(|v| {
            #[allow(clippy::cast_possible_truncation)]
            // Truncation: vertex count was bounded to u32 on load
            let id = v as u32;
            let h = heights[v];
            let neighbors = adjacency.neighbors(id);
            h > min_height
                && !neighbors.is_empty()
                && neighbors.iter().all(|&n| heights[n as usize] > h - min_drop)
                && index.faces_around(id).iter().any(|&f| candidates.contains(f))
        })
        .collect();

    let mut sets = UnionFind::new(heights.len());
    for v in (0..heights.len()).filter(|&v| seeds[v]) {
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: vertex count was bounded to u32 on load
        let id = v as u32;
        for &n in adjacency.neighbors(id) {
            if seeds[n as usize] {
                sets.union(v, n as usize);
            }
        }
    }

    let mut by_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<u32>> = Vec::new();
    for v in (0..heights.len()).filter(|&v| seeds[v]) {
        let root = sets.find(v);
        let slot = *by_root.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: vertex count was bounded to u32 on load
        groups[slot].push(v as u32);
    }

    groups.into_iter().map(VertexRegion::new).collect()
}

/// Merge regions smaller than `min_vertex_count` into their largest
/// adjacent region.
///
/// Regions are adjacent when a member of one neighbors a member of the
/// other, directly or through a single vertex outside both. A small region
/// with no adjacent region is kept as is. Ties go to the region listed
/// first. Output order follows the first region of each merged group.
#[must_use]
pub fn merge_small_regions(
    regions: Vec<VertexRegion>,
    min_vertex_count: usize,
    adjacency: &VertexAdjacency,
) -> Vec<VertexRegion> {
    if regions.len() < 2 || regions.iter().all(|r| r.len() >= min_vertex_count) {
        return regions;
    }

    let mut owner: HashMap<u32, usize> = HashMap::new();
    for (id, region) in regions.iter().enumerate() {
        for v in region.iter() {
            owner.entry(v).or_insert(id);
        }
    }

    let mut sets = UnionFind::new(regions.len());
    for (id, region) in regions.iter().enumerate() {
        // sizes are member counts, not region counts
        sets.size[id] = region.len();
    }

    for id in 0..regions.len() {
        if sets.set_size(id) >= min_vertex_count {
            continue;
        }
        let own_root = sets.find(id);

        let mut touching: Vec<usize> = Vec::new();
        for v in regions[id].iter() {
            for &n in adjacency.neighbors(v) {
                if let Some(&other) = owner.get(&n) {
                    touching.push(other);
                } else {
                    touching.extend(
                        adjacency
                            .neighbors(n)
                            .iter()
                            .filter_map(|m| owner.get(m).copied()),
                    );
                }
            }
        }

        let mut best: Option<(usize, usize)> = None;
        for other in touching {
            let root = sets.find(other);
            if root == own_root {
                continue;
            }
            let size = sets.size[root];
            let better = match best {
                None => true,
                Some((best_root, best_size)) => {
                    size > best_size || (size == best_size && root < best_root)
                }
            };
            if better {
                best = Some((root, size));
            }
        }

        if let Some((target, _)) = best {
            sets.union_into(own_root, target);
        }
    }

    let mut by_root: HashMap<usize, usize> = HashMap::new();
    let mut merged: Vec<Vec<u32>> = Vec::new();
    for (id, region) in regions.iter().enumerate() {
        let root = sets.find(id);
        let slot = *by_root.entry(root).or_insert_with(|| {
            merged.push(Vec::new());
            merged.len() - 1
        });
        merged[slot].extend(region.iter());
    }

    merged.into_iter().map(VertexRegion::new).collect()
}

/// Grow a vertex region upward into the shape it hangs from.
///
/// A neighbor joins when every one of its own lower neighbors (at or below
/// its height minus `min_drop`) is already a member. A vertex with no lower
/// neighbors joins as soon as it touches the region. The worklist revisits
/// the neighbors of each new member, so the result is a fixpoint and each
/// vertex is admitted at most once.
#[must_use]
pub fn expand_upward(
    region: &VertexRegion,
    index: &MeshIndex,
    axis: UpAxis,
    min_drop: f64,
) -> VertexRegion {
    let heights = vertex_heights(index.mesh(), axis);
    let adjacency = index.vertex_adjacency();
    let mut member = vec![false; heights.len()];
    let mut queue: VecDeque<u32> = VecDeque::new();

    for v in region.iter() {
        if let Some(slot) = member.get_mut(v as usize) {
            *slot = true;
        }
    }
    for v in region.iter() {
        queue.extend(adjacency.neighbors(v).iter().copied().filter(|&n| !member[n as usize]));
    }

    let mut admitted = region.vertices().to_vec();
    while let Some(candidate) = queue.pop_front() {
        if member[candidate as usize] {
            continue;
        }
        let h = heights[candidate as usize];
        let supported_inside = adjacency
            .neighbors(candidate)
            .iter()
            .filter(|&&n| heights[n as usize] <= h - min_drop)
            .all(|&n| member[n as usize]);
        if !supported_inside {
            continue;
        }

        member[candidate as usize] = true;
        admitted.push(candidate);
        queue.extend(
            adjacency
                .neighbors(candidate)
                .iter()
                .copied()
                .filter(|&n| !member[n as usize]),
        );
    }

    VertexRegion::new(admitted)
}

/// Convert vertex regions into face regions.
///
/// A face joins a region when all three of its vertices are members. If a
/// region gets no face that way, candidate faces with at least two member
/// vertices join instead. A face claimed by an earlier region is never
/// claimed again. The output is aligned with the input; entries may be
/// empty.
#[must_use]
pub fn to_face_regions(
    regions: &[VertexRegion],
    candidates: &FaceMask,
    mesh: &IndexedMesh,
) -> Vec<Vec<usize>> {
    let mut claimed = vec![false; mesh.faces.len()];

    regions
        .iter()
        .map(|region| {
            let members = |face: &[u32; 3]| face.iter().filter(|&&v| region.contains(v)).count();

            let mut faces: Vec<usize> = mesh
                .faces
                .iter()
                .enumerate()
                .filter(|&(f, face)| !claimed[f] && members(face) == 3)
                .map(|(f, _)| f)
                .collect();

            if faces.is_empty() {
                faces = mesh
                    .faces
                    .iter()
                    .enumerate()
                    .filter(|&(f, face)| {
                        !claimed[f] && candidates.contains(f) && members(face) >= 2
                    })
                    .map(|(f, _)| f)
                    .collect();
            }

            for &f in &faces {
                claimed[f] = true;
            }
            faces
        })
        .collect()
}

/// Candidate faces touching any vertex of a seed region.
///
/// These are the faces that actually hang lowest; shape filters judge a
/// dangling feature by them rather than by the whole expanded region.
#[must_use]
pub fn tip_faces(seed: &VertexRegion, candidates: &FaceMask, index: &MeshIndex) -> Vec<usize> {
    let mut faces: Vec<usize> = seed
        .iter()
        .flat_map(|v| index.faces_around(v).iter().copied())
        .filter(|&f| candidates.contains(f))
        .collect();
    faces.sort_unstable();
    faces.dedup();
    faces
}

fn vertex_heights(mesh: &IndexedMesh, axis: UpAxis) -> Vec<f64> {
    mesh.positions().map(|p| axis.height(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use mesh_types::{Point3, Vertex};

    /// A downward-pointing square pyramid hanging from a flat square roof.
    ///
    /// Apex 4 at height 0.5, base ring 0..4 at height 2, roof apex 5 at 3.
    fn hanging_pyramid() -> MeshIndex {
        let vertices = vec![
            Vertex::from_coords(1.0, 2.0, 1.0),
            Vertex::from_coords(-1.0, 2.0, 1.0),
            Vertex::from_coords(-1.0, 2.0, -1.0),
            Vertex::from_coords(1.0, 2.0, -1.0),
            Vertex::from_coords(0.0, 0.5, 0.0),
            Vertex::from_coords(0.0, 3.0, 0.0),
        ];
        // bottom cone faces outward-down, roof faces outward-up
        let faces = vec![
            [0, 1, 4],
            [1, 2, 4],
            [2, 3, 4],
            [3, 0, 4],
            [0, 5, 1],
            [1, 5, 2],
            [2, 5, 3],
            [3, 5, 0],
        ];
        MeshIndex::new(IndexedMesh::from_parts(vertices, faces)).unwrap()
    }

    fn downward(index: &MeshIndex) -> FaceMask {
        classify(index.face_normals(), &UpAxis::Y.unit(), 0.0)
    }

    #[test]
    fn union_find_sizes() {
        let mut sets = UnionFind::new(5);
        sets.union(0, 1);
        sets.union(3, 4);
        sets.union(1, 4);
        assert_eq!(sets.set_size(0), 4);
        assert_eq!(sets.set_size(2), 1);
        assert_eq!(sets.find(0), sets.find(3));
        sets.union_into(2, 0);
        assert_eq!(sets.set_size(2), 5);
    }

    #[test]
    fn apex_is_the_only_seed() {
        let index = hanging_pyramid();
        let mask = downward(&index);
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);

        let regions = find_dangling_vertex_regions(&index, UpAxis::Y, 0.05, 0.2, &mask);
        assert_eq!(regions, vec![VertexRegion::new(vec![4])]);
    }

    #[test]
    fn min_height_suppresses_seeds() {
        let index = hanging_pyramid();
        let mask = downward(&index);
        assert!(find_dangling_vertex_regions(&index, UpAxis::Y, 0.05, 0.6, &mask).is_empty());
    }

    #[test]
    fn expansion_climbs_to_the_roof() {
        let index = hanging_pyramid();
        let seed = VertexRegion::new(vec![4]);
        let expanded = expand_upward(&seed, &index, UpAxis::Y, 0.05);
        // ring vertices have only the apex below them, then the roof apex
        assert_eq!(expanded.vertices(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn strict_faces_then_loose_fallback() {
        let index = hanging_pyramid();
        let mask = downward(&index);

        let strict = to_face_regions(&[VertexRegion::new(vec![0, 1, 4])], &mask, index.mesh());
        assert_eq!(strict, vec![vec![0]]);

        // two vertices of a cone face: only the loose pass can claim it
        let loose = to_face_regions(&[VertexRegion::new(vec![1, 4])], &mask, index.mesh());
        assert_eq!(loose, vec![vec![0, 1]]);

        // the second region cannot reclaim face 0
        let both = to_face_regions(
            &[VertexRegion::new(vec![0, 1, 4]), VertexRegion::new(vec![0, 1, 4])],
            &mask,
            index.mesh(),
        );
        assert_eq!(both[0], vec![0]);
        assert!(!both[1].contains(&0));
    }

    #[test]
    fn tip_faces_of_apex() {
        let index = hanging_pyramid();
        let mask = downward(&index);
        assert_eq!(tip_faces(&VertexRegion::new(vec![4]), &mask, &index), vec![0, 1, 2, 3]);
    }

    /// Vertex adjacency of a strip of quads along x; vertex `2i` sits at
    /// `(i, 0, 0)` and `2i + 1` at `(i, 0, 1)`.
    fn strip(length: u32) -> VertexAdjacency {
        let vertices: Vec<Vertex> = (0..=length)
            .flat_map(|i| {
                let x = f64::from(i);
                [Vertex::new(Point3::new(x, 0.0, 0.0)), Vertex::new(Point3::new(x, 0.0, 1.0))]
            })
            .collect();
        let faces = (0..length)
            .flat_map(|i| {
                let (a, b, c, d) = (2 * i, 2 * i + 2, 2 * i + 3, 2 * i + 1);
                [[a, b, c], [a, c, d]]
            })
            .collect();
        VertexAdjacency::from_mesh(&IndexedMesh::from_parts(vertices, faces))
    }

    #[test]
    fn small_region_joins_largest_neighbor() {
        let adjacency = strip(6);

        // big region at x=0..1, tiny region at x=3, medium region at x=5..6
        let big = VertexRegion::new(vec![0, 1, 2, 3]);
        let tiny = VertexRegion::new(vec![6]);
        let medium = VertexRegion::new(vec![10, 12, 13]);
        let merged = merge_small_regions(vec![big, tiny, medium], 3, &adjacency);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].vertices(), &[0, 1, 2, 3, 6]);
        assert_eq!(merged[1].vertices(), &[10, 12, 13]);
    }

    #[test]
    fn isolated_small_region_is_kept() {
        let adjacency = strip(6);
        let a = VertexRegion::new(vec![0]);
        let b = VertexRegion::new(vec![12]);
        let merged = merge_small_regions(vec![a.clone(), b.clone()], 3, &adjacency);
        assert_eq!(merged, vec![a, b]);
    }

    #[test]
    fn regions_two_hops_apart_merge() {
        let adjacency = strip(6);
        // x=0 and x=2 share the neighbors at x=1
        let merged = merge_small_regions(
            vec![VertexRegion::new(vec![0]), VertexRegion::new(vec![4])],
            3,
            &adjacency,
        );
        assert_eq!(merged, vec![VertexRegion::new(vec![0, 4])]);
    }
}
