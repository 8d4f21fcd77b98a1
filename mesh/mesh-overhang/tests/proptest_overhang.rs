//! Property-based tests for classification and region growing.
//!
//! Run with: cargo test -p mesh-overhang --test proptest_overhang

#![allow(clippy::unwrap_used)]

mod common;

use hashbrown::HashSet;
use mesh_index::FaceAdjacency;
use mesh_overhang::{FaceMask, angle_from_up, classify, grow, grow_all};
use nalgebra::Vector3;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Unit vector from spherical coordinates.
fn arb_unit() -> impl Strategy<Value = Vector3<f64>> {
    (0.0..std::f64::consts::TAU, -1.0..1.0f64).prop_map(|(phi, z)| {
        let r = (1.0 - z * z).sqrt();
        Vector3::new(r * phi.cos(), r * phi.sin(), z)
    })
}

/// Normals with the occasional degenerate face.
fn arb_normals(max: usize) -> impl Strategy<Value = Vec<Option<Vector3<f64>>>> {
    prop::collection::vec(prop::option::weighted(0.9, arb_unit()), 0..max)
}

// =============================================================================
// Classification
// =============================================================================

proptest! {
    /// No face is an overhang for both `up` and `-up`, and with a zero
    /// support angle every non-vertical face is an overhang for exactly one.
    #[test]
    fn flipping_up_swaps_classification(
        normals in arb_normals(64),
        up in arb_unit(),
        scale in 0.1..10.0f64,
        angle in 0.0..89.0f64,
    ) {
        let up = up * scale;
        let down = -up;

        let a = classify(&normals, &up, angle);
        let b = classify(&normals, &down, angle);
        prop_assert_eq!(a.len(), normals.len());
        for f in 0..normals.len() {
            prop_assert!(!(a.contains(f) && b.contains(f)));
        }

        let a0 = classify(&normals, &up, 0.0);
        let b0 = classify(&normals, &down, 0.0);
        for (f, normal) in normals.iter().enumerate() {
            match normal {
                None => prop_assert!(!a0.contains(f) && !b0.contains(f)),
                Some(n) => {
                    let theta = angle_from_up(n, &up).unwrap();
                    if (theta - 90.0).abs() > 1e-6 {
                        prop_assert!(a0.contains(f) != b0.contains(f));
                    }
                }
            }
        }
    }

    /// Raising the support angle never adds overhangs.
    #[test]
    fn classification_is_monotone(
        normals in arb_normals(64),
        up in arb_unit(),
        low in 0.0..45.0f64,
        extra in 0.0..44.0f64,
    ) {
        let loose = classify(&normals, &up, low);
        let tight = classify(&normals, &up, low + extra);
        for f in tight.iter() {
            prop_assert!(loose.contains(f));
        }
    }
}

// =============================================================================
// Region growing
// =============================================================================

proptest! {
    /// Components partition the mask, and growing from any member face
    /// reproduces the component that contains it.
    #[test]
    fn grow_all_partitions_independent_of_seed(
        bits in prop::collection::vec(any::<bool>(), 72),
    ) {
        let mesh = common::grid(6, 0.0);
        let adjacency = FaceAdjacency::from_mesh(&mesh);
        let mask = FaceMask::from(bits);

        let regions = grow_all(&mask, &adjacency);

        let mut seen = HashSet::new();
        for region in &regions {
            prop_assert!(!region.is_empty());
            for &f in region {
                prop_assert!(mask.contains(f));
                prop_assert!(seen.insert(f), "face {} in two regions", f);
            }
        }
        prop_assert_eq!(seen.len(), mask.count());

        for region in &regions {
            for &seed in region {
                prop_assert_eq!(&grow(seed, &mask, &adjacency), region);
            }
        }
    }
}
