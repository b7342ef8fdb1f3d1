//! Per-cycle randomizers applied after placement: scale, surface materials, rotation,
//! lighting, and camera effects.
//!
//! Each randomizer draws its values from an injected RNG into a small plan type and then
//! pushes that plan through the [`SceneSurface`](crate::scene::SceneSurface). Draws use
//! stepped integer ranges so values land on the same grid the reference generator used
//! (tenths for scale and exposure, thousandths for hue and saturation, and so on).
use rand::RngCore;

use crate::error::{Error, Result};
use crate::sampling::{uniform_below, uniform_inclusive};

pub mod camera;
pub mod effect;
pub mod light;
pub mod rotation;
pub mod scale;
pub mod texture;

pub use camera::{CameraEffectPlan, CameraEffectsConfig, SensorNoise};
pub use effect::{Effect, EffectSpec};
pub use light::{randomize_lighting, LightingConfig, LightingPlan};
pub use rotation::{randomize_rotation, RotationMode};
pub use scale::randomize_scale;
pub use texture::{assign_materials, randomize_textures, MaterialAssignment, TextureConfig};

/// Closed float range `[min, max]` from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(Error::InvalidConfig(format!("{name} must be finite")));
        }
        if self.min > self.max {
            return Err(Error::InvalidConfig(format!(
                "{name}: min ({}) must be <= max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Multiple of `step` drawn uniformly from `[min, max]`, both ends included.
    pub fn draw_stepped(&self, step: f32, rng: &mut dyn RngCore) -> f32 {
        let lo = to_steps(self.min, step);
        let hi = to_steps(self.max, step);
        uniform_inclusive(rng, lo, hi) as f32 * step
    }

    /// Multiple of `step` drawn uniformly from `[min, max)`; `max` itself when the range is a
    /// single value.
    pub fn draw_stepped_exclusive(&self, step: f32, rng: &mut dyn RngCore) -> f32 {
        if self.min == self.max {
            return self.max;
        }
        let lo = to_steps(self.min, step);
        let hi = to_steps(self.max, step);
        if hi <= lo {
            return lo as f32 * step;
        }
        (lo + uniform_below(rng, hi.abs_diff(lo)) as i64) as f32 * step
    }
}

/// Number of whole `step`s in `value`, truncating toward zero but tolerant of float noise
/// such as `0.7 / 0.1 == 6.9999995`.
fn to_steps(value: f32, step: f32) -> i64 {
    let steps = value / step;
    let nearest = steps.round();
    if (steps - nearest).abs() < 1e-3 {
        nearest as i64
    } else {
        steps.trunc() as i64
    }
}
