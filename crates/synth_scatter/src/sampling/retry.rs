//! Bounded retry around point sampling.
//!
//! The binder must never see an empty point cloud. An empty attempt is retried; after the
//! first retry the rejection threshold is jittered upwards (exponentially widening range)
//! so a systematic failure for a given radius/domain ratio does not spin forever. Once
//! [`RetryPolicy::max_attempts`] is spent the layer fails with
//! [`Error::SamplingExhausted`](crate::error::Error::SamplingExhausted).
use glam::Vec3;
use rand::RngCore;
use tracing::warn;

use crate::error::{Error, Result};
use crate::sampling::uniform_index;
use crate::scatter::LayerKind;

/// Upper bound on the exponent used when widening the threshold jitter.
const MAX_JITTER_DOUBLINGS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryPolicy {
    /// Total sampling attempts, including the first one.
    pub max_attempts: u32,
    /// Jitter the rejection threshold on attempts after the first.
    pub jitter_threshold: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            jitter_threshold: true,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn with_jitter_threshold(mut self, jitter: bool) -> Self {
        self.jitter_threshold = jitter;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig(
                "retry.max_attempts must be >= 1".into(),
            ));
        }
        Ok(())
    }

    /// Rejection threshold to use on `attempt` (0-based).
    ///
    /// Attempt 0 always uses `base`. Later attempts draw from
    /// `[base, base * 2^attempt]` when jitter is enabled.
    pub fn threshold_for_attempt(&self, base: usize, attempt: u32, rng: &mut dyn RngCore) -> usize {
        if attempt == 0 || !self.jitter_threshold || base == 0 {
            return base;
        }
        let widen = (1usize << attempt.min(MAX_JITTER_DOUBLINGS)) - 1;
        let spread = base.saturating_mul(widen);
        base.saturating_add(uniform_index(rng, spread.saturating_add(1)))
    }
}

/// A non-empty point cloud together with the number of attempts it took.
#[derive(Debug, Clone)]
pub struct SampledPoints {
    pub points: Vec<Vec3>,
    pub attempts: u32,
}

/// Invoke `attempt_fn` until it yields a non-empty cloud or the policy is exhausted.
pub fn sample_until_nonempty<F>(
    policy: &RetryPolicy,
    layer: LayerKind,
    rng: &mut dyn RngCore,
    mut attempt_fn: F,
) -> Result<SampledPoints>
where
    F: FnMut(u32, &mut dyn RngCore) -> Vec<Vec3>,
{
    for attempt in 0..policy.max_attempts {
        let points = attempt_fn(attempt, &mut *rng);
        if !points.is_empty() {
            return Ok(SampledPoints {
                points,
                attempts: attempt + 1,
            });
        }
        warn!(
            "{} layer sampling attempt {}/{} returned no points; retrying.",
            layer,
            attempt + 1,
            policy.max_attempts
        );
    }

    Err(Error::SamplingExhausted {
        layer,
        attempts: policy.max_attempts,
    })
}
