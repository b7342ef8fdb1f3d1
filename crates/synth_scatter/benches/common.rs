#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use synth_scatter::prelude::{AssetDescriptor, AssetPool};

const SAMPLES: usize = 20;
const WARM_UP: Duration = Duration::from_millis(800);
const MEASURE: Duration = Duration::from_secs(2);

/// Shared criterion settings for every bench target in this crate.
pub fn bench_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLES)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASURE)
}

/// Throughput in placed (or sampled) objects per iteration.
pub fn objects(count: usize) -> Throughput {
    Throughput::Elements(count.max(1) as u64)
}

/// Seeded RNG keyed by a bench tag and the sampling radius.
pub fn radius_rng(tag: u64, radius: f32) -> StdRng {
    StdRng::seed_from_u64(tag ^ u64::from(radius.to_bits()))
}

/// In-memory pool of `size` descriptors that never touch the filesystem.
pub fn memory_pool(size: usize) -> AssetPool {
    let assets = (0..size)
        .map(|i| AssetDescriptor::new(format!("assets/obj_{i:04}.blend")))
        .collect();
    AssetPool::from_descriptors("assets", "blend", assets).expect("non-empty pool")
}

/// Deterministic points spread over a 2.5 x 1.5 x 0.5 volume.
pub fn scattered_points(count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let f = i as f32;
            Vec3::new((f * 0.37) % 2.5, (f * 0.61) % 1.5, (f * 0.13) % 0.5)
        })
        .collect()
}
