//! Region boundary extraction and edge chaining for rails.

use hashbrown::{HashMap, HashSet};
use mesh_index::MeshIndex;
use mesh_types::{Point3, UpAxis, Vector3};

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint.
    pub start: Point3<f64>,
    /// Second endpoint.
    pub end: Point3<f64>,
}

impl Segment {
    /// Create a segment.
    #[must_use]
    pub const fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    /// Length in 3D.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Midpoint.
    #[must_use]
    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.start, &self.end)
    }

    /// Direction from start to end, not normalized.
    #[must_use]
    pub fn direction(&self) -> Vector3<f64> {
        self.end - self.start
    }

    /// Direction projected onto the horizontal plane, not normalized.
    #[must_use]
    pub fn horizontal(&self, axis: UpAxis) -> Vector3<f64> {
        axis.flatten(&self.direction())
    }

    /// Height of the lower endpoint.
    #[must_use]
    pub fn lower_height(&self, axis: UpAxis) -> f64 {
        axis.height(&self.start).min(axis.height(&self.end))
    }
}

/// Directed edges of a face set that no other face in the set shares.
///
/// An edge is on the boundary when the faces across it are all outside the
/// set, or when there are none. Edges keep the winding of the face they
/// come from, so on a manifold region they chain into closed loops.
///
/// ```
/// use mesh_index::MeshIndex;
/// use mesh_support::region_boundary_edges;
/// use mesh_types::unit_cube;
///
/// let index = MeshIndex::new(unit_cube()).unwrap();
/// // the two bottom triangles share their diagonal
/// assert_eq!(region_boundary_edges(&index, &[0, 1]).len(), 4);
/// ```
#[must_use]
pub fn region_boundary_edges(index: &MeshIndex, faces: &[usize]) -> Vec<(u32, u32)> {
    let members: HashSet<usize> = faces.iter().copied().collect();
    let edge_map = index.edge_map();
    let mesh = index.mesh();

    let mut edges = Vec::new();
    for &face in faces {
        let Some(&[a, b, c]) = mesh.faces.get(face) else {
            continue;
        };
        for (u, v) in [(a, b), (b, c), (c, a)] {
            let shared = edge_map
                .faces_for_edge(u, v)
                .iter()
                .any(|&other| other != face && members.contains(&other));
            if !shared {
                edges.push((u, v));
            }
        }
    }
    edges
}

/// Split directed boundary edges into straight runs.
///
/// Edges are followed head to tail. A run ends where the next edge turns
/// more than `max_turn_deg` away from the run's first edge. A closed loop
/// that never turns that far becomes a single run.
#[must_use]
pub fn boundary_runs(
    index: &MeshIndex,
    edges: &[(u32, u32)],
    max_turn_deg: f64,
) -> Vec<Vec<Segment>> {
    let mesh = index.mesh();
    let segment = |(u, v): (u32, u32)| Segment::new(*mesh.position(u), *mesh.position(v));
    let cos_limit = max_turn_deg.to_radians().cos();

    let mut outgoing: HashMap<u32, Vec<usize>> = HashMap::new();
    for (i, &(u, _)) in edges.iter().enumerate() {
        outgoing.entry(u).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut loops: Vec<Vec<usize>> = Vec::new();
    for first in 0..edges.len() {
        if used[first] {
            continue;
        }
        let mut path = vec![first];
        used[first] = true;
        let mut head = edges[first].1;
        while let Some(next) = outgoing
            .get(&head)
            .and_then(|out| out.iter().copied().find(|&e| !used[e]))
        {
            used[next] = true;
            path.push(next);
            head = edges[next].1;
        }
        loops.push(path);
    }

    let turns = |a: &Segment, b: &Segment| {
        let (da, db) = (a.direction(), b.direction());
        let denom = da.norm() * db.norm();
        denom > f64::EPSILON && da.dot(&db) / denom < cos_limit
    };

    let mut runs = Vec::new();
    for path in loops {
        let segments: Vec<Segment> = path.iter().map(|&e| segment(edges[e])).collect();

        // start a closed loop at a corner so the first run is not split
        let closed = path.len() > 1
            && edges[path[path.len() - 1]].1 == edges[path[0]].0;
        let start = if closed {
            (0..segments.len())
                .find(|&i| {
                    let prev = &segments[(i + segments.len() - 1) % segments.len()];
                    turns(prev, &segments[i])
                })
                .unwrap_or(0)
        } else {
            0
        };

        let mut run: Vec<Segment> = Vec::new();
        for k in 0..segments.len() {
            let s = segments[(start + k) % segments.len()];
            if let Some(first) = run.first()
                && turns(first, &s)
            {
                runs.push(std::mem::take(&mut run));
            }
            run.push(s);
        }
        if !run.is_empty() {
            runs.push(run);
        }
    }
    runs
}

/// Greedily chain segments whose endpoints lie within `merge_distance`.
///
/// Each chain starts from the first unused segment and repeatedly absorbs
/// the first unused segment that touches it, checking end to start, end to
/// end, start to start and start to end in that order. The chain is
/// replaced by the straight segment between its extreme endpoints. Chains
/// shorter than `min_length` are dropped, including a lone segment.
///
/// ```
/// use mesh_support::{Segment, merge_nearby_edges};
/// use mesh_types::Point3;
///
/// let edges = [
///     Segment::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.5, 0.0, 0.0)),
///     Segment::new(Point3::new(1.6, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0)),
/// ];
/// let merged = merge_nearby_edges(&edges, 1.0, 2.0);
/// assert_eq!(merged.len(), 1);
/// assert!((merged[0].length() - 3.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn merge_nearby_edges(
    edges: &[Segment],
    merge_distance: f64,
    min_length: f64,
) -> Vec<Segment> {
    let near = |a: &Point3<f64>, b: &Point3<f64>| (a - b).norm() <= merge_distance;
    let mut used = vec![false; edges.len()];
    let mut merged = Vec::new();

    for i in 0..edges.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut chain = edges[i];

        let mut grew = true;
        while grew {
            grew = false;
            for (j, e) in edges.iter().enumerate() {
                if used[j] {
                    continue;
                }
                if near(&chain.end, &e.start) {
                    chain.end = e.end;
                } else if near(&chain.end, &e.end) {
                    chain.end = e.start;
                } else if near(&chain.start, &e.start) {
                    chain.start = e.end;
                } else if near(&chain.start, &e.end) {
                    chain.start = e.start;
                } else {
                    continue;
                }
                used[j] = true;
                grew = true;
            }
        }

        if chain.length() >= min_length {
            merged.push(chain);
        }
    }
    merged
}
