//! Point sampling inside a bounded 2D or 3D domain.
//!
//! This module defines the sampling [`Domain`], the Poisson disk sampler used by every
//! placement layer, and the bounded retry loop that keeps an empty point cloud from
//! ever reaching the binder. It also hosts the small RNG helpers shared across the crate.
use glam::{Vec2, Vec3};
use rand::RngCore;

pub mod poisson_disk;
pub mod retry;

pub use poisson_disk::{PoissonDiskSampling, DEFAULT_REJECTION_THRESHOLD};
pub use retry::{sample_until_nonempty, RetryPolicy, SampledPoints};

/// Axis-aligned sampling region anchored at the origin.
///
/// Points are generated in `[0, extent)` on every axis. Planes produce points with `z == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Domain {
    /// Width × height.
    Plane(Vec2),
    /// Width × height × depth.
    Volume(Vec3),
}

impl Domain {
    pub fn plane(width: f32, height: f32) -> Self {
        Domain::Plane(Vec2::new(width, height))
    }

    pub fn volume(width: f32, height: f32, depth: f32) -> Self {
        Domain::Volume(Vec3::new(width, height, depth))
    }

    /// Number of sampled axes (2 or 3).
    pub fn dimensions(&self) -> usize {
        match self {
            Domain::Plane(_) => 2,
            Domain::Volume(_) => 3,
        }
    }

    /// Extent as a 3D vector; planes report a zero depth.
    pub fn extent(&self) -> Vec3 {
        match *self {
            Domain::Plane(e) => e.extend(0.0),
            Domain::Volume(e) => e,
        }
    }

    /// True when every sampled axis has a finite, strictly positive extent.
    pub fn is_valid(&self) -> bool {
        let e = self.extent();
        e.to_array()[..self.dimensions()]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    /// True when `point` lies within `[0, extent]` on every sampled axis.
    pub fn contains(&self, point: Vec3) -> bool {
        let e = self.extent().to_array();
        let p = point.to_array();
        let sampled = (0..self.dimensions()).all(|i| p[i] >= 0.0 && p[i] <= e[i]);
        match self {
            Domain::Plane(_) => sampled && p[2] == 0.0,
            Domain::Volume(_) => sampled,
        }
    }
}

/// Generate a random float in the range [0, 1).
///
/// Uses the top 24 bits so every result is exactly representable and below 1.0.
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32
}

/// Uniform integer in `[0, n)` without modulo bias. `n` must be > 0.
#[inline]
pub(crate) fn uniform_below(rng: &mut dyn RngCore, n: u64) -> u64 {
    debug_assert!(n > 0, "uniform_below needs a non-empty range");
    let zone = u64::MAX - (u64::MAX % n);
    loop {
        let v = rng.next_u64();
        if v < zone {
            return v % n;
        }
    }
}

/// Uniform index into a collection of length `len`. `len` must be > 0.
#[inline]
pub(crate) fn uniform_index(rng: &mut dyn RngCore, len: usize) -> usize {
    uniform_below(rng, len as u64) as usize
}

/// Uniform integer in the inclusive range `[min, max]`. Returns `min` when `max <= min`.
pub(crate) fn uniform_inclusive(rng: &mut dyn RngCore, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    let span = max.abs_diff(min);
    match span.checked_add(1) {
        Some(n) => min.wrapping_add(uniform_below(rng, n) as i64),
        None => rng.next_u64() as i64,
    }
}

/// Uniform float in `[min, max)`. Returns `min` when `max <= min`.
#[inline]
pub(crate) fn uniform_f32(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    (min + rand01(rng) * (max - min)).min(next_down(max))
}

/// Compute the next smaller representable float value.
///
/// Returns a value that is strictly less than the input, useful for
/// ensuring bounds are strictly inside a domain. Handles edge cases
/// safely including very small positive values and zero.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}
