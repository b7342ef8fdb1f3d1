//! Choosing which assets and which sampled points a layer uses.
//!
//! - [select_assets]: loops the whole pool when the target reaches its size, otherwise draws a
//!   random subset without replacement.
//! - [choose_points]: keeps sampled order or draws a random subset without replacement.
use glam::Vec3;
use rand::RngCore;

use crate::assets::{AssetDescriptor, AssetPool};
use crate::sampling::uniform_index;

/// Which asset-selection case applied to a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionBranch {
    /// Full passes over the pool, then a prefix of `remainder` descriptors.
    Looped { passes: usize, remainder: usize },
    /// Uniform subset without replacement.
    RandomSubset,
}

/// How sampled points are matched to objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointSelection {
    /// Use points in sampling order.
    #[default]
    InOrder,
    /// Use a uniform subset without replacement.
    RandomSubset,
}

pub fn selection_branch(target: usize, pool_len: usize) -> SelectionBranch {
    if pool_len > 0 && target >= pool_len {
        SelectionBranch::Looped {
            passes: target / pool_len,
            remainder: target % pool_len,
        }
    } else {
        SelectionBranch::RandomSubset
    }
}

/// Pick `target` descriptors from `pool`.
///
/// The looped branch is fully deterministic and draws nothing from `rng`.
pub fn select_assets(
    target: usize,
    pool: &AssetPool,
    rng: &mut dyn RngCore,
) -> (SelectionBranch, Vec<AssetDescriptor>) {
    let assets = pool.assets();
    let branch = selection_branch(target, assets.len());
    let selected = match branch {
        SelectionBranch::Looped { passes, remainder } => {
            let mut out = Vec::with_capacity(target);
            for _ in 0..passes {
                out.extend_from_slice(assets);
            }
            out.extend_from_slice(&assets[..remainder]);
            out
        }
        SelectionBranch::RandomSubset => sample_indices(rng, assets.len(), target)
            .into_iter()
            .map(|i| assets[i].clone())
            .collect(),
    };
    (branch, selected)
}

/// Pick `target` of `points` according to `selection`.
pub fn choose_points(
    selection: PointSelection,
    target: usize,
    points: &[Vec3],
    rng: &mut dyn RngCore,
) -> Vec<Vec3> {
    let target = target.min(points.len());
    match selection {
        PointSelection::InOrder => points[..target].to_vec(),
        PointSelection::RandomSubset => sample_indices(rng, points.len(), target)
            .into_iter()
            .map(|i| points[i])
            .collect(),
    }
}

/// `k` distinct indices from `0..n` via a partial Fisher-Yates shuffle.
fn sample_indices(rng: &mut dyn RngCore, n: usize, k: usize) -> Vec<usize> {
    let k = k.min(n);
    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = i + uniform_index(rng, n - i);
        indices.swap(i, j);
    }
    indices.truncate(k);
    indices
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::tests::FixedRng;

    fn pool(n: usize) -> AssetPool {
        let assets = (0..n)
            .map(|i| AssetDescriptor::new(format!("pool/asset_{i}.blend")))
            .collect();
        AssetPool::from_descriptors("pool", "blend", assets).unwrap()
    }

    #[test]
    fn loop_branch_for_twelve_from_five() {
        let pool = pool(5);
        let mut rng = StdRng::seed_from_u64(0);
        let (branch, selected) = select_assets(12, &pool, &mut rng);

        assert_eq!(
            branch,
            SelectionBranch::Looped {
                passes: 2,
                remainder: 2
            }
        );
        assert_eq!(selected.len(), 12);
        let a = pool.assets();
        let expected: Vec<_> = a.iter().chain(a).chain(&a[..2]).cloned().collect();
        assert_eq!(selected, expected);
    }

    #[test]
    fn target_equal_to_pool_is_one_full_pass() {
        assert_eq!(
            selection_branch(5, 5),
            SelectionBranch::Looped {
                passes: 1,
                remainder: 0
            }
        );
        assert_eq!(selection_branch(4, 5), SelectionBranch::RandomSubset);

        let pool = pool(5);
        let mut rng = FixedRng { value: 0 };
        let (_, selected) = select_assets(5, &pool, &mut rng);
        assert_eq!(selected, pool.assets());
    }

    #[test]
    fn loop_multiset_counts_hold_for_many_targets() {
        let pool = pool(4);
        let mut rng = StdRng::seed_from_u64(1);
        for target in 4..40 {
            let (_, selected) = select_assets(target, &pool, &mut rng);
            assert_eq!(selected.len(), target);
            for (i, asset) in pool.assets().iter().enumerate() {
                let count = selected.iter().filter(|s| *s == asset).count();
                let extra = usize::from(i < target % 4);
                assert_eq!(count, target / 4 + extra, "target {target}, asset {i}");
            }
        }
    }

    #[test]
    fn random_subset_has_no_duplicates() {
        let pool = pool(30);
        let mut rng = StdRng::seed_from_u64(8);
        for target in 0..30 {
            let (branch, selected) = select_assets(target, &pool, &mut rng);
            assert_eq!(branch, SelectionBranch::RandomSubset);
            assert_eq!(selected.len(), target);
            let unique: HashSet<_> = selected.iter().collect();
            assert_eq!(unique.len(), target);
            assert!(selected.iter().all(|s| pool.assets().contains(s)));
        }
    }

    #[test]
    fn in_order_points_keep_sampling_order() {
        let points: Vec<Vec3> = (0..6).map(|i| Vec3::splat(i as f32)).collect();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            choose_points(PointSelection::InOrder, 6, &points, &mut rng),
            points
        );
        assert_eq!(
            choose_points(PointSelection::InOrder, 2, &points, &mut rng),
            points[..2]
        );
    }

    #[test]
    fn random_points_are_distinct_members() {
        let points: Vec<Vec3> = (0..20).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let mut rng = StdRng::seed_from_u64(4);
        let chosen = choose_points(PointSelection::RandomSubset, 7, &points, &mut rng);
        assert_eq!(chosen.len(), 7);
        let xs: HashSet<u32> = chosen.iter().map(|p| p.x as u32).collect();
        assert_eq!(xs.len(), 7);
        assert!(chosen.iter().all(|p| points.contains(p)));
    }
}
