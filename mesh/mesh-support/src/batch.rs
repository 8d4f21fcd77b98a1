//! Placing supports for many regions at once.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use mesh_collide::obb_intersects_obb;
use mesh_index::MeshIndex;
use mesh_overhang::FaceRegion;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::PlacementError;
use crate::params::PlacementParams;
use crate::placement::{Placement, PlacementKind, solve_placement};

/// Progress callback, called with `(done, total)` after each region.
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Sync);

/// Cancellation and progress hooks for a batch.
#[derive(Clone, Copy, Default)]
pub struct PassControl<'a> {
    /// Set to stop starting new regions.
    pub cancel: Option<&'a AtomicBool>,
    /// Called as regions finish.
    pub progress: Option<ProgressFn<'a>>,
}

impl std::fmt::Debug for PassControl<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassControl")
            .field("cancel", &self.cancel)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl<'a> PassControl<'a> {
    /// No hooks.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cancel: None,
            progress: None,
        }
    }

    /// Watch a cancel flag.
    #[must_use]
    pub const fn with_cancel(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Report progress.
    #[must_use]
    pub const fn with_progress(mut self, progress: ProgressFn<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Whether the cancel flag is set.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Why a region got no support.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The solver failed.
    Failed(PlacementError),
    /// The support overlapped the one placed for an earlier region.
    Overlap {
        /// Index of the earlier region in the batch input.
        region: usize,
    },
}

/// A region left without a support.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRegion {
    /// Index of the region in the batch input.
    pub region: usize,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Result of [`solve_placements`].
#[derive(Debug, Clone, Default)]
pub struct PlacementBatch {
    /// Accepted placements, in region order.
    pub placements: Vec<Placement>,
    /// Regions without a support, in region order.
    pub skipped: Vec<SkippedRegion>,
    /// Whether the pass stopped early.
    pub cancelled: bool,
}

impl PlacementBatch {
    /// Number of regions that were solved or skipped.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.placements.len() + self.skipped.len()
    }
}

/// Place one support of `kind` per region.
///
/// Regions are solved in parallel. A failing region is reported in
/// `skipped` and the rest carry on. Accepted placements are then checked
/// in region order, and one whose box intersects an earlier accepted box
/// is skipped as [`SkipReason::Overlap`].
///
/// Once the cancel flag is set no further region starts. Regions that never
/// started are absent from both lists.
///
/// # Example
///
/// ```
/// use mesh_index::MeshIndex;
/// use mesh_overhang::{FaceRegion, RegionOrigin};
/// use mesh_support::{PassControl, PlacementKind, PlacementParams, solve_placements};
/// use mesh_types::{IndexedMesh, Point3, Vector3};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.push_quad(
///     Point3::new(0.0, 5.0, 0.0),
///     Point3::new(2.0, 5.0, 0.0),
///     Point3::new(2.0, 5.0, 2.0),
///     Point3::new(0.0, 5.0, 2.0),
/// );
/// let index = MeshIndex::new(mesh).unwrap();
/// let regions = vec![
///     FaceRegion::new(vec![0, 1], RegionOrigin::Overhang, Vector3::y()),
///     FaceRegion::new(vec![], RegionOrigin::Overhang, Vector3::y()),
/// ];
///
/// let batch = solve_placements(
///     &regions,
///     &index,
///     PlacementKind::Column,
///     &PlacementParams::default(),
///     &PassControl::new(),
/// );
/// assert_eq!(batch.placements.len(), 1);
/// assert_eq!(batch.skipped.len(), 1);
/// ```
#[must_use]
pub fn solve_placements(
    regions: &[FaceRegion],
    index: &MeshIndex,
    kind: PlacementKind,
    params: &PlacementParams,
    control: &PassControl<'_>,
) -> PlacementBatch {
    let total = regions.len();
    info!(regions = total, kind = kind.as_str(), "Starting placement pass");

    let done = AtomicUsize::new(0);
    let solved: Vec<Option<Result<Placement, PlacementError>>> = regions
        .par_iter()
        .map(|region| {
            if control.is_cancelled() {
                return None;
            }
            let outcome = solve_placement(region, index, kind, params);
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(progress) = control.progress {
                progress(finished, total);
            }
            Some(outcome)
        })
        .collect();

    let mut batch = PlacementBatch {
        cancelled: control.is_cancelled(),
        ..PlacementBatch::default()
    };
    // batch input index of each accepted placement
    let mut owners: Vec<usize> = Vec::new();

    for (region, outcome) in solved.into_iter().enumerate() {
        match outcome {
            None => {}
            Some(Err(err)) => batch.skipped.push(SkippedRegion {
                region,
                reason: SkipReason::Failed(err),
            }),
            Some(Ok(placement)) => {
                let clash = batch
                    .placements
                    .iter()
                    .zip(&owners)
                    .find(|(accepted, _)| obb_intersects_obb(&accepted.obb, &placement.obb))
                    .map(|(_, &owner)| owner);
                if let Some(owner) = clash {
                    batch.skipped.push(SkippedRegion {
                        region,
                        reason: SkipReason::Overlap { region: owner },
                    });
                } else {
                    owners.push(region);
                    batch.placements.push(placement);
                }
            }
        }
    }

    if batch.cancelled {
        warn!(
            processed = batch.processed(),
            regions = total,
            "Placement pass cancelled"
        );
    }
    info!(
        placed = batch.placements.len(),
        skipped = batch.skipped.len(),
        "Placement pass complete"
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_overhang::RegionOrigin;
    use mesh_types::{IndexedMesh, Point3, Vector3};

    /// Down-facing unit squares at y = 5, one per x offset.
    fn ceilings(offsets: &[f64]) -> (MeshIndex, Vec<FaceRegion>) {
        let mut mesh = IndexedMesh::new();
        let mut regions = Vec::new();
        for (i, &x) in offsets.iter().enumerate() {
            mesh.push_quad(
                Point3::new(x, 5.0, 0.0),
                Point3::new(x + 1.0, 5.0, 0.0),
                Point3::new(x + 1.0, 5.0, 1.0),
                Point3::new(x, 5.0, 1.0),
            );
            regions.push(FaceRegion::new(
                vec![2 * i, 2 * i + 1],
                RegionOrigin::Overhang,
                Vector3::y(),
            ));
        }
        (MeshIndex::new(mesh).unwrap(), regions)
    }

    #[test]
    fn overlapping_placements_keep_the_first() {
        // columns of radius 2 under squares 1 apart overlap
        let (index, regions) = ceilings(&[0.0, 1.0, 20.0]);
        let batch = solve_placements(
            &regions,
            &index,
            PlacementKind::Column,
            &PlacementParams::default(),
            &PassControl::new(),
        );
        assert!(!batch.cancelled);
        assert_eq!(batch.placements.len(), 2);
        assert_eq!(batch.placements[0].region, vec![0, 1]);
        assert_eq!(batch.placements[1].region, vec![4, 5]);
        assert_eq!(
            batch.skipped,
            vec![SkippedRegion {
                region: 1,
                reason: SkipReason::Overlap { region: 0 },
            }]
        );
    }

    #[test]
    fn failures_do_not_abort() {
        let (index, mut regions) = ceilings(&[0.0, 20.0]);
        regions.insert(1, FaceRegion::new(vec![], RegionOrigin::Overhang, Vector3::y()));
        let batch = solve_placements(
            &regions,
            &index,
            PlacementKind::Column,
            &PlacementParams::default(),
            &PassControl::new(),
        );
        assert_eq!(batch.placements.len(), 2);
        assert_eq!(
            batch.skipped,
            vec![SkippedRegion {
                region: 1,
                reason: SkipReason::Failed(PlacementError::EmptyRegion),
            }]
        );
    }

    #[test]
    fn cancelled_before_start_places_nothing() {
        let (index, regions) = ceilings(&[0.0, 10.0, 20.0]);
        let flag = AtomicBool::new(true);
        let control = PassControl::new().with_cancel(&flag);
        let batch = solve_placements(
            &regions,
            &index,
            PlacementKind::Column,
            &PlacementParams::default(),
            &control,
        );
        assert!(batch.cancelled);
        assert_eq!(batch.processed(), 0);
    }

    #[test]
    fn progress_reaches_total() {
        let (index, regions) = ceilings(&[0.0, 10.0, 20.0, 30.0]);
        let calls = AtomicUsize::new(0);
        let highest = AtomicUsize::new(0);
        let progress = |done: usize, total: usize| {
            assert_eq!(total, 4);
            calls.fetch_add(1, Ordering::Relaxed);
            highest.fetch_max(done, Ordering::Relaxed);
        };
        let control = PassControl::new().with_progress(&progress);
        let batch = solve_placements(
            &regions,
            &index,
            PlacementKind::Column,
            &PlacementParams::default(),
            &control,
        );
        assert_eq!(batch.placements.len(), 4);
        assert_eq!(calls.load(Ordering::Relaxed), 4);
        assert_eq!(highest.load(Ordering::Relaxed), 4);
    }
}
