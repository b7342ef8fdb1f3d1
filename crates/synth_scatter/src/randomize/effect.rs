//! Bernoulli-gated effect values.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::randomize::ValueRange;
use crate::sampling::rand01;

/// Outcome of an "apply with probability p" trial. Both arms carry the value to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect<T> {
    Enabled(T),
    Disabled(T),
}

impl<T> Effect<T> {
    /// Run one trial: `Enabled(enabled(rng))` with probability `probability`, else
    /// `Disabled(disabled)`.
    pub fn roll<F>(probability: f32, rng: &mut dyn RngCore, enabled: F, disabled: T) -> Self
    where
        F: FnOnce(&mut dyn RngCore) -> T,
    {
        if rand01(rng) < probability {
            Effect::Enabled(enabled(rng))
        } else {
            Effect::Disabled(disabled)
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Effect::Enabled(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Effect::Enabled(v) | Effect::Disabled(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Effect::Enabled(v) | Effect::Disabled(v) => v,
        }
    }
}

/// Probability, stepped value range, and identity value of one scalar effect.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    pub probability: f32,
    pub range: ValueRange,
    /// Granularity of drawn values.
    pub step: f32,
    /// Value applied when the effect is disabled.
    pub identity: f32,
}

impl EffectSpec {
    pub const fn new(probability: f32, range: ValueRange, step: f32, identity: f32) -> Self {
        Self {
            probability,
            range,
            step,
            identity,
        }
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(Error::InvalidConfig(format!(
                "{name}.probability must be within [0, 1]"
            )));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(Error::InvalidConfig(format!("{name}.step must be > 0")));
        }
        self.range.validate(&format!("{name}.range"))
    }

    pub fn roll(&self, rng: &mut dyn RngCore) -> Effect<f32> {
        let range = self.range;
        let step = self.step;
        Effect::roll(
            self.probability,
            rng,
            |rng| range.draw_stepped(step, rng),
            self.identity,
        )
    }
}
