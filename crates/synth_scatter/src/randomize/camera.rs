//! Camera and post-processing effect draws.
//!
//! Only the values are produced here. Building the compositing graph that consumes them is
//! the host engine's job.
use glam::Vec3;
use rand::RngCore;

use crate::error::{Error, Result};
use crate::randomize::{Effect, EffectSpec, ValueRange};
use crate::sampling::poisson_disk::random_direction;
use crate::sampling::uniform_index;

/// Mix factors a noise overlay may be blended with.
const NOISE_MIX_FACTORS: [f32; 4] = [0.25, 0.5, 0.75, 1.0];

/// Render and effect parameters for the camera.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CameraEffectsConfig {
    pub focal_length_mm: f32,
    pub resolution: (u32, u32),
    pub max_samples: u32,
    pub chromatic_aberration: EffectSpec,
    pub blur: EffectSpec,
    /// Speed range; the direction is drawn uniformly on the unit sphere.
    pub motion_blur: EffectSpec,
    pub exposure: EffectSpec,
    /// Noise texture intensity range; the blend factor comes from a fixed set.
    pub noise: EffectSpec,
    pub white_balance: EffectSpec,
    pub brightness: EffectSpec,
    pub contrast: EffectSpec,
    pub hue: EffectSpec,
    pub saturation: EffectSpec,
}

impl Default for CameraEffectsConfig {
    fn default() -> Self {
        Self {
            focal_length_mm: 35.0,
            resolution: (1728, 1152),
            max_samples: 128,
            chromatic_aberration: EffectSpec::new(0.1, ValueRange::new(0.1, 1.0), 0.1, 0.0),
            blur: EffectSpec::new(0.1, ValueRange::new(2.0, 4.0), 1.0, 0.0),
            motion_blur: EffectSpec::new(0.1, ValueRange::new(2.0, 7.0), 1.0, 0.0),
            exposure: EffectSpec::new(0.15, ValueRange::new(-0.5, 2.0), 0.1, 0.0),
            noise: EffectSpec::new(0.1, ValueRange::new(1.6, 1.8), 0.1, 0.0),
            white_balance: EffectSpec::new(0.15, ValueRange::new(3500.0, 9500.0), 1.0, 6500.0),
            brightness: EffectSpec::new(0.15, ValueRange::new(-1.0, 1.0), 1.0, 0.0),
            contrast: EffectSpec::new(0.15, ValueRange::new(-1.0, 5.0), 1.0, 0.0),
            hue: EffectSpec::new(0.15, ValueRange::new(0.45, 0.55), 0.001, 0.5),
            saturation: EffectSpec::new(0.15, ValueRange::new(0.75, 1.25), 0.001, 1.0),
        }
    }
}

impl CameraEffectsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return Err(Error::InvalidConfig("camera.resolution must be > 0".into()));
        }
        if self.max_samples == 0 {
            return Err(Error::InvalidConfig("camera.max_samples must be > 0".into()));
        }
        if !self.focal_length_mm.is_finite() || self.focal_length_mm <= 0.0 {
            return Err(Error::InvalidConfig(
                "camera.focal_length_mm must be > 0".into(),
            ));
        }
        for (name, spec) in self.effects() {
            spec.validate(&format!("camera.{name}"))?;
        }
        Ok(())
    }

    /// Named effect specs, in the order they are rolled.
    pub fn effects(&self) -> [(&'static str, &EffectSpec); 10] {
        [
            ("chromatic_aberration", &self.chromatic_aberration),
            ("blur", &self.blur),
            ("motion_blur", &self.motion_blur),
            ("exposure", &self.exposure),
            ("noise", &self.noise),
            ("white_balance", &self.white_balance),
            ("brightness", &self.brightness),
            ("contrast", &self.contrast),
            ("hue", &self.hue),
            ("saturation", &self.saturation),
        ]
    }

    /// Roll every effect once.
    pub fn roll(&self, rng: &mut dyn RngCore) -> CameraEffectPlan {
        let motion = self.motion_blur;
        let noise = self.noise;

        CameraEffectPlan {
            focal_length_mm: self.focal_length_mm,
            resolution: self.resolution,
            max_samples: self.max_samples,
            chromatic_aberration: self.chromatic_aberration.roll(rng),
            blur: self.blur.roll(rng),
            motion_blur: Effect::roll(
                motion.probability,
                rng,
                |rng| {
                    let speed = motion.range.draw_stepped(motion.step, rng);
                    Vec3::from_array(random_direction::<3>(rng)) * speed
                },
                Vec3::ZERO,
            ),
            exposure: self.exposure.roll(rng),
            noise: Effect::roll(
                noise.probability,
                rng,
                |rng| SensorNoise {
                    intensity: noise.range.draw_stepped(noise.step, rng),
                    mix: NOISE_MIX_FACTORS[uniform_index(rng, NOISE_MIX_FACTORS.len())],
                },
                SensorNoise::NONE,
            ),
            white_balance: self.white_balance.roll(rng),
            brightness: self.brightness.roll(rng),
            contrast: self.contrast.roll(rng),
            hue: self.hue.roll(rng),
            saturation: self.saturation.roll(rng),
        }
    }
}

/// Film-grain overlay: texture intensity and how strongly it is blended in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorNoise {
    pub intensity: f32,
    pub mix: f32,
}

impl SensorNoise {
    pub const NONE: SensorNoise = SensorNoise {
        intensity: 0.0,
        mix: 0.0,
    };
}

/// Concrete camera settings for one generation cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraEffectPlan {
    pub focal_length_mm: f32,
    pub resolution: (u32, u32),
    pub max_samples: u32,
    pub chromatic_aberration: Effect<f32>,
    pub blur: Effect<f32>,
    /// Blur vector (direction × speed).
    pub motion_blur: Effect<Vec3>,
    pub exposure: Effect<f32>,
    pub noise: Effect<SensorNoise>,
    pub white_balance: Effect<f32>,
    pub brightness: Effect<f32>,
    pub contrast: Effect<f32>,
    pub hue: Effect<f32>,
    pub saturation: Effect<f32>,
}

impl CameraEffectPlan {
    /// Number of effects that came up enabled.
    pub fn enabled_count(&self) -> usize {
        [
            self.chromatic_aberration.is_enabled(),
            self.blur.is_enabled(),
            self.motion_blur.is_enabled(),
            self.exposure.is_enabled(),
            self.noise.is_enabled(),
            self.white_balance.is_enabled(),
            self.brightness.is_enabled(),
            self.contrast.is_enabled(),
            self.hue.is_enabled(),
            self.saturation.is_enabled(),
        ]
        .into_iter()
        .filter(|e| *e)
        .count()
    }
}
