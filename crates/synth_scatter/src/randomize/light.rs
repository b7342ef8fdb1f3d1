//! Environment lighting selection.
use std::path::PathBuf;

use glam::Vec3;
use rand::RngCore;
use tracing::info;

use crate::assets::{AssetDescriptor, AssetPool};
use crate::error::Result;
use crate::randomize::ValueRange;
use crate::sampling::{uniform_f32, uniform_index};
use crate::scene::SceneSurface;

/// Where environment maps live and how bright they may be.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LightingConfig {
    pub folder: PathBuf,
    pub extension: String,
    pub strength: ValueRange,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("assets/hdri_lighting"),
            extension: "exr".into(),
            strength: ValueRange::new(0.2, 2.2),
        }
    }
}

impl LightingConfig {
    pub fn validate(&self) -> Result<()> {
        self.strength.validate("lighting.strength")
    }

    /// Draw a lighting plan from an already-resolved pool.
    pub fn roll(&self, pool: &AssetPool, rng: &mut dyn RngCore) -> LightingPlan {
        let environment = pool.assets()[uniform_index(rng, pool.len())].clone();
        let strength = self.strength.draw_stepped_exclusive(0.1, rng);
        let rotation = Vec3::new(
            uniform_f32(rng, -30.0, 120.0).to_radians(),
            uniform_f32(rng, -30.0, 30.0).to_radians(),
            uniform_f32(rng, 0.0, 360.0).to_radians(),
        );
        LightingPlan {
            environment,
            strength,
            rotation,
        }
    }
}

/// Environment map, its intensity, and its Euler XYZ rotation in radians.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightingPlan {
    pub environment: AssetDescriptor,
    pub strength: f32,
    pub rotation: Vec3,
}

/// Resolve the environment-map pool, draw a plan, and apply it to the scene.
pub fn randomize_lighting(
    config: &LightingConfig,
    scene: &mut dyn SceneSurface,
    rng: &mut dyn RngCore,
) -> Result<LightingPlan> {
    let pool = AssetPool::resolve(&config.folder, &config.extension)?;
    let plan = config.roll(&pool, rng);
    scene.set_lighting(&plan)?;
    info!(
        "Lighting '{}' at strength {:.1}.",
        plan.environment.name(),
        plan.strength
    );
    Ok(plan)
}
