//! Poisson disk sampling (Bridson) generalized over the number of dimensions.
use std::f32::consts::TAU;

use glam::Vec3;
use rand::RngCore;

use crate::sampling::{next_down, rand01, uniform_f32, uniform_index, Domain};

/// Candidates tried around an active point before it is retired.
pub const DEFAULT_REJECTION_THRESHOLD: usize = 30;

/// Poisson disk sampling strategy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoissonDiskSampling {
    /// Minimum distance between samples in world units.
    pub radius: f32,
    /// Failed candidates around an active point before that point is retired.
    #[cfg_attr(feature = "serde", serde(default = "default_rejection_threshold"))]
    pub rejection_threshold: usize,
}

#[cfg(feature = "serde")]
fn default_rejection_threshold() -> usize {
    DEFAULT_REJECTION_THRESHOLD
}

impl PoissonDiskSampling {
    /// Create a new PoissonDiskSampling with specified radius and the default threshold.
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            rejection_threshold: DEFAULT_REJECTION_THRESHOLD,
        }
    }

    pub fn with_rejection_threshold(mut self, rejection_threshold: usize) -> Self {
        self.rejection_threshold = rejection_threshold;
        self
    }

    /// Sample `domain`, returning accepted points in acceptance order.
    ///
    /// Points lie in `[0, extent)` on each sampled axis. Invalid parameters (non-positive
    /// radius, zero threshold, degenerate domain) yield an empty cloud.
    pub fn generate(&self, domain: Domain, rng: &mut dyn RngCore) -> Vec<Vec3> {
        if !self.radius.is_finite()
            || self.radius <= 0.0
            || self.rejection_threshold == 0
            || !domain.is_valid()
        {
            return Vec::new();
        }

        match domain {
            Domain::Plane(extent) => {
                PoissonDiskSampler::new(self.radius, extent.to_array(), self.rejection_threshold)
                    .generate(rng)
                    .into_iter()
                    .map(|[x, y]| Vec3::new(x, y, 0.0))
                    .collect()
            }
            Domain::Volume(extent) => {
                PoissonDiskSampler::new(self.radius, extent.to_array(), self.rejection_threshold)
                    .generate(rng)
                    .into_iter()
                    .map(Vec3::from_array)
                    .collect()
            }
        }
    }
}

/// Convenience form of [`PoissonDiskSampling::generate`].
pub fn sample(
    radius: f32,
    domain: Domain,
    rejection_threshold: usize,
    rng: &mut dyn RngCore,
) -> Vec<Vec3> {
    PoissonDiskSampling::new(radius)
        .with_rejection_threshold(rejection_threshold)
        .generate(domain, rng)
}

struct PoissonDiskSampler<const D: usize> {
    radius: f32,
    radius_squared: f32,
    cell_size: f32,
    rejection_threshold: usize,
    bounds: [f32; D],
    upper: [f32; D],
    grid_dims: [usize; D],
    /// Indices into `points`, one bucket per cell. Cells are `radius` wide, so a bucket may
    /// hold more than one point.
    grid: Vec<Vec<u32>>,
    points: Vec<[f32; D]>,
    active: Vec<usize>,
}

impl<const D: usize> PoissonDiskSampler<D> {
    fn new(radius: f32, bounds: [f32; D], rejection_threshold: usize) -> Self {
        debug_assert!(radius > 0.0);
        let cell_size = radius;
        let grid_dims: [usize; D] =
            std::array::from_fn(|i| ((bounds[i] / cell_size).ceil() as usize).max(1));
        let cell_count = grid_dims.iter().product();

        Self {
            radius,
            radius_squared: radius * radius,
            cell_size,
            rejection_threshold,
            bounds,
            upper: std::array::from_fn(|i| next_down(bounds[i])),
            grid_dims,
            grid: vec![Vec::new(); cell_count],
            points: Vec::new(),
            active: Vec::new(),
        }
    }

    #[inline]
    fn cell_coords(&self, point: &[f32; D]) -> [usize; D] {
        std::array::from_fn(|i| {
            ((point[i] / self.cell_size).floor() as isize)
                .clamp(0, self.grid_dims[i] as isize - 1) as usize
        })
    }

    #[inline]
    fn cell_index(&self, coords: &[usize; D]) -> usize {
        let mut index = 0;
        for i in (0..D).rev() {
            index = index * self.grid_dims[i] + coords[i];
        }
        index
    }

    fn is_valid_point(&self, point: &[f32; D]) -> bool {
        if (0..D).any(|i| point[i] < 0.0 || point[i] >= self.bounds[i]) {
            return false;
        }

        let center = self.cell_coords(point);
        let lo: [usize; D] = std::array::from_fn(|i| center[i].saturating_sub(1));
        let hi: [usize; D] = std::array::from_fn(|i| (center[i] + 1).min(self.grid_dims[i] - 1));
        let mut cursor = lo;

        loop {
            for &idx in &self.grid[self.cell_index(&cursor)] {
                let existing = &self.points[idx as usize];
                let dist2: f32 = (0..D).map(|i| (point[i] - existing[i]).powi(2)).sum();
                if dist2 < self.radius_squared {
                    return false;
                }
            }

            let mut axis = 0;
            loop {
                if axis == D {
                    return true;
                }
                if cursor[axis] < hi[axis] {
                    cursor[axis] += 1;
                    break;
                }
                cursor[axis] = lo[axis];
                axis += 1;
            }
        }
    }

    fn add_point(&mut self, point: [f32; D]) {
        let cell = self.cell_index(&self.cell_coords(&point));
        let idx = self.points.len();
        self.grid[cell].push(idx as u32);
        self.points.push(point);
        self.active.push(idx);
    }

    fn generate_around_point(&self, rng: &mut dyn RngCore, origin: [f32; D]) -> Option<[f32; D]> {
        for _ in 0..self.rejection_threshold {
            let direction = random_direction::<D>(rng);
            let distance = self.radius + rand01(rng) * self.radius;
            let candidate: [f32; D] = std::array::from_fn(|i| origin[i] + direction[i] * distance);

            if self.is_valid_point(&candidate) {
                return Some(candidate);
            }
        }

        None
    }

    fn generate(mut self, rng: &mut dyn RngCore) -> Vec<[f32; D]> {
        let seed: [f32; D] =
            std::array::from_fn(|i| (rand01(rng) * self.bounds[i]).min(self.upper[i]).max(0.0));
        self.add_point(seed);

        while !self.active.is_empty() {
            let slot = uniform_index(rng, self.active.len());
            let origin = self.points[self.active[slot]];
            match self.generate_around_point(rng, origin) {
                Some(candidate) => self.add_point(candidate),
                None => {
                    self.active.swap_remove(slot);
                }
            }
        }

        self.points
    }
}

/// Uniformly distributed unit direction in `D` dimensions.
pub(crate) fn random_direction<const D: usize>(rng: &mut dyn RngCore) -> [f32; D] {
    let mut dir = [0.0f32; D];
    match dir.as_mut_slice() {
        [] => {}
        [x] => *x = if rand01(rng) < 0.5 { -1.0 } else { 1.0 },
        [x, y] => {
            let angle = rand01(rng) * TAU;
            *x = angle.cos();
            *y = angle.sin();
        }
        [x, y, z] => {
            let phi = rand01(rng) * TAU;
            let cos_theta = uniform_f32(rng, -1.0, 1.0);
            let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
            *x = sin_theta * phi.cos();
            *y = sin_theta * phi.sin();
            *z = cos_theta;
        }
        rest => {
            // Box-Muller normals, normalized.
            for v in rest.iter_mut() {
                let u1 = rand01(rng).max(f32::MIN_POSITIVE);
                let u2 = rand01(rng);
                *v = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
            }
            let norm = rest.iter().map(|v| v * v).sum::<f32>().sqrt();
            if norm > f32::EPSILON {
                rest.iter_mut().for_each(|v| *v /= norm);
            } else {
                rest.fill(0.0);
                rest[0] = 1.0;
            }
        }
    }
    dir
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn pairwise_min_distance(points: &[Vec3]) -> f32 {
        let mut min = f32::MAX;
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let dist = points[i].distance(points[j]);
                if dist < min {
                    min = dist;
                }
            }
        }
        min
    }

    #[test]
    fn sampler_initializes_grid_dimensions() {
        let sampler = PoissonDiskSampler::<2>::new(0.5, [2.0, 1.2], 30);
        assert_eq!(sampler.grid_dims, [4, 3]);
        assert_eq!(sampler.grid.len(), 12);

        let sampler = PoissonDiskSampler::<3>::new(0.3, [2.5, 1.5, 0.5], 30);
        assert_eq!(sampler.grid_dims, [9, 5, 2]);
    }

    #[test]
    fn is_valid_point_rejects_close_neighbors() {
        let mut sampler = PoissonDiskSampler::<2>::new(1.0, [4.0, 4.0], 30);
        sampler.add_point([2.0, 2.0]);

        assert!(!sampler.is_valid_point(&[2.5, 2.0]));
        assert!(!sampler.is_valid_point(&[2.9, 2.4]));
        assert!(sampler.is_valid_point(&[3.5, 3.5]));
        assert!(sampler.is_valid_point(&[3.0, 2.0]));
    }

    #[test]
    fn is_valid_point_rejects_outside_domain() {
        let sampler = PoissonDiskSampler::<3>::new(0.25, [1.2, 0.8, 0.4], 30);
        assert!(!sampler.is_valid_point(&[-0.01, 0.1, 0.1]));
        assert!(!sampler.is_valid_point(&[0.1, 0.8, 0.1]));
        assert!(!sampler.is_valid_point(&[0.1, 0.1, 0.41]));
        assert!(sampler.is_valid_point(&[0.1, 0.1, 0.1]));
    }

    #[test]
    fn plane_points_respect_radius_and_domain() {
        let domain = Domain::plane(3.2, 2.4);
        for seed in [1_u64, 7, 123, 2024] {
            let mut rng = StdRng::seed_from_u64(seed);
            let points = sample(0.2, domain, DEFAULT_REJECTION_THRESHOLD, &mut rng);

            assert!(!points.is_empty());
            for p in &points {
                assert!(domain.contains(*p), "{p:?} escaped the domain");
            }
            assert!(pairwise_min_distance(&points) >= 0.2 - 1e-6);
        }
    }

    #[test]
    fn volume_points_respect_radius_and_domain() {
        let domain = Domain::volume(2.5, 1.5, 0.5);
        let mut rng = StdRng::seed_from_u64(99);
        let points = PoissonDiskSampling::new(0.3).generate(domain, &mut rng);

        assert!(points.len() > 1);
        for p in &points {
            assert!(domain.contains(*p));
        }
        assert!(pairwise_min_distance(&points) >= 0.3 - 1e-6);
    }

    #[test]
    fn same_seed_reproduces_the_cloud() {
        let domain = Domain::plane(3.2, 2.4);
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = sample(0.2, domain, 30, &mut rng_a);
        let b = sample(0.2, domain, 30, &mut rng_b);
        assert_eq!(a, b);
    }

    #[test]
    fn plane_cloud_is_reasonably_dense() {
        // Disks of radius r/2 around each point are disjoint, so the count is bounded above;
        // a maximal packing should also reach a fair fraction of that bound.
        let mut rng = StdRng::seed_from_u64(5);
        let points = sample(0.2, Domain::plane(3.2, 2.4), 30, &mut rng);
        assert!(points.len() > 60, "only {} points", points.len());
        assert!(points.len() < 300);
    }

    #[test]
    fn invalid_parameters_return_no_points() {
        let mut rng = StdRng::seed_from_u64(1);
        let domain = Domain::plane(1.0, 1.0);
        assert!(sample(0.0, domain, 30, &mut rng).is_empty());
        assert!(sample(-1.0, domain, 30, &mut rng).is_empty());
        assert!(sample(f32::NAN, domain, 30, &mut rng).is_empty());
        assert!(sample(0.1, domain, 0, &mut rng).is_empty());
        assert!(sample(0.1, Domain::plane(0.0, 1.0), 30, &mut rng).is_empty());
    }

    #[test]
    fn radius_larger_than_domain_yields_single_point() {
        let mut rng = StdRng::seed_from_u64(11);
        let points = sample(5.0, Domain::plane(1.0, 1.0), 30, &mut rng);
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn random_direction_is_unit_length() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..64 {
            let d2 = random_direction::<2>(&mut rng);
            assert_abs_diff_eq!(d2.iter().map(|v| v * v).sum::<f32>(), 1.0, epsilon = 1e-4);
            let d3 = random_direction::<3>(&mut rng);
            assert_abs_diff_eq!(d3.iter().map(|v| v * v).sum::<f32>(), 1.0, epsilon = 1e-4);
            let d4 = random_direction::<4>(&mut rng);
            assert_abs_diff_eq!(d4.iter().map(|v| v * v).sum::<f32>(), 1.0, epsilon = 1e-4);
        }
    }
}
