mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use synth_scatter::sampling::{Domain, PoissonDiskSampling};

const PLANE_RADII: [f32; 4] = [0.4, 0.2, 0.1, 0.05];
const VOLUME_RADII: [f32; 3] = [0.3, 0.2, 0.1];

fn sampling_poisson_plane_benches(c: &mut Criterion) {
    let domain = Domain::plane(3.2, 2.4);
    let mut group = c.benchmark_group("sampling/poisson_disk/plane");

    for &radius in &PLANE_RADII {
        let sampler = PoissonDiskSampling::new(radius);
        let mut rng_est = common::radius_rng(0xB6, radius);
        let expected = sampler.generate(domain, &mut rng_est).len();
        group.throughput(common::objects(expected));

        let mut rng = common::radius_rng(0xB6 << 8, radius);
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
            b.iter(|| {
                let pts = sampler.generate(domain, &mut rng);
                black_box(pts.len());
            });
        });
    }

    group.finish();
}

fn sampling_poisson_volume_benches(c: &mut Criterion) {
    let domain = Domain::volume(2.5, 1.5, 0.5);
    let mut group = c.benchmark_group("sampling/poisson_disk/volume");

    for &radius in &VOLUME_RADII {
        let sampler = PoissonDiskSampling::new(radius);
        let mut rng_est = common::radius_rng(0xF6, radius);
        let expected = sampler.generate(domain, &mut rng_est).len();
        group.throughput(common::objects(expected));

        let mut rng = common::radius_rng(0xF6 << 8, radius);
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
            b.iter(|| {
                let pts = sampler.generate(domain, &mut rng);
                black_box(pts.len());
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::bench_criterion();
    targets = sampling_poisson_plane_benches, sampling_poisson_volume_benches
}
criterion_main!(benches);
