//! How many objects a layer places per generation cycle.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::sampling::uniform_inclusive;
use crate::scatter::LayerKind;

/// Quantity policy of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuantityPolicy {
    /// One object per sampled point.
    AllSamples,
    /// A uniform draw from `[min, max]`, made once per cycle.
    Ranged { min: usize, max: usize },
}

impl QuantityPolicy {
    pub fn ranged(min: usize, max: usize) -> Self {
        QuantityPolicy::Ranged { min, max }
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        if let QuantityPolicy::Ranged { min, max } = *self {
            if min > max {
                return Err(Error::InvalidConfig(format!(
                    "{name}.quantity: min ({min}) must be <= max ({max})"
                )));
            }
        }
        Ok(())
    }

    pub fn resolve_target_count(&self, rng: &mut dyn RngCore) -> TargetCount {
        match *self {
            QuantityPolicy::AllSamples => TargetCount::AllSamples,
            QuantityPolicy::Ranged { min, max } => {
                TargetCount::Exactly(uniform_inclusive(rng, min as i64, max as i64) as usize)
            }
        }
    }
}

/// Target drawn for one cycle, before the point cloud is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetCount {
    AllSamples,
    Exactly(usize),
}

impl TargetCount {
    /// Final object count given `available` sampled points.
    ///
    /// Fails with [`Error::InsufficientSamples`] when an exact target exceeds the cloud.
    pub fn reconcile(self, layer: LayerKind, available: usize) -> Result<usize> {
        match self {
            TargetCount::AllSamples => Ok(available),
            TargetCount::Exactly(required) if required > available => {
                Err(Error::InsufficientSamples {
                    layer,
                    required,
                    available,
                })
            }
            TargetCount::Exactly(required) => Ok(required),
        }
    }
}

/// Free-function form of [`QuantityPolicy::resolve_target_count`].
pub fn resolve_target_count(policy: &QuantityPolicy, rng: &mut dyn RngCore) -> TargetCount {
    policy.resolve_target_count(rng)
}
