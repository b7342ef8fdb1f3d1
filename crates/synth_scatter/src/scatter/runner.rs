//! Runner for one generation cycle across all placement layers.
use std::collections::HashSet;

use rand::RngCore;
use tracing::{debug, info};

use crate::assets::AssetPool;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::randomize::{
    randomize_lighting, randomize_rotation, randomize_scale, randomize_textures,
    CameraEffectPlan, LightingPlan, MaterialAssignment,
};
use crate::sampling::{sample_until_nonempty, RetryPolicy};
use crate::scatter::binder::{apply_plan, bind, PlacementPlan};
use crate::scatter::events::{CycleEvent, EventSink};
use crate::scatter::plan::LayerConfig;
use crate::scatter::LayerKind;
use crate::scene::{ObjectHandle, SceneSurface};

/// Outcome of placing one layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerReport {
    pub plan: PlacementPlan,
    /// Size of the point cloud the plan was drawn from.
    pub sampled: usize,
    /// Sampling attempts needed for a non-empty cloud.
    pub attempts: u32,
    pub handles: Vec<ObjectHandle>,
}

/// Everything decided during one generation cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleReport {
    /// One entry per layer, in placement order.
    pub layers: Vec<LayerReport>,
    /// Materials given to background and occluder objects.
    pub materials: Vec<MaterialAssignment>,
    pub lighting: LightingPlan,
    pub camera: CameraEffectPlan,
}

impl CycleReport {
    pub fn layer(&self, layer: LayerKind) -> Option<&LayerReport> {
        self.layers.iter().find(|r| r.plan.layer == layer)
    }

    /// Total number of objects placed.
    pub fn placed(&self) -> usize {
        self.layers.iter().map(|r| r.plan.len()).sum()
    }
}

/// Validated generator configuration bound to a runner.
pub struct CycleRunner {
    pub config: GeneratorConfig,
}

impl CycleRunner {
    pub fn try_new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn run(&self, scene: &mut dyn SceneSurface, rng: &mut dyn RngCore) -> Result<CycleReport> {
        run_cycle(&self.config, scene, rng, &mut ())
    }

    pub fn run_with_events(
        &self,
        scene: &mut dyn SceneSurface,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<CycleReport> {
        run_cycle(&self.config, scene, rng, sink)
    }
}

/// Place one layer: resolve its pool, draw a target, sample, bind, and apply.
///
/// The asset pool is resolved first so an empty pool fails before anything is sampled or
/// placed.
pub fn run_layer(
    layer: LayerKind,
    config: &LayerConfig,
    retry: &RetryPolicy,
    scene: &mut dyn SceneSurface,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<LayerReport> {
    let pool = AssetPool::resolve(&config.asset_folder, &config.asset_extension)?;
    let target = config.quantity.resolve_target_count(rng);
    debug!("{} layer target: {:?}.", layer, target);

    let base_threshold = config.sampling.rejection_threshold;
    let sampled = sample_until_nonempty(retry, layer, rng, |attempt, rng| {
        if attempt > 0 {
            sink.send(CycleEvent::SamplingRetried { layer, attempt });
        }
        let threshold = retry.threshold_for_attempt(base_threshold, attempt, rng);
        config
            .sampling
            .clone()
            .with_rejection_threshold(threshold)
            .generate(config.domain, rng)
    })?;

    let plan = bind(
        layer,
        target,
        &sampled.points,
        &pool,
        config.point_selection,
        config.offset,
        rng,
    )?;
    let handles = apply_plan(&plan, scene)?;

    info!(
        "Placed {} of {} sampled points in {} layer ({} assets, {:?}).",
        plan.len(),
        sampled.points.len(),
        layer,
        pool.len(),
        plan.branch
    );
    sink.send(CycleEvent::layer_placed(&plan, sampled.points.len()));

    Ok(LayerReport {
        plan,
        sampled: sampled.points.len(),
        attempts: sampled.attempts,
        handles,
    })
}

/// Run a full generation cycle against `scene`.
///
/// Order: reset, background, foreground, occluder, scale, materials, rotation, lighting,
/// camera effects. The first error aborts the cycle; nothing already applied is rolled back.
pub fn run_cycle(
    config: &GeneratorConfig,
    scene: &mut dyn SceneSurface,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<CycleReport> {
    config.validate()?;
    scene.reset()?;
    sink.send(CycleEvent::CycleStarted);

    let mut layers = Vec::with_capacity(LayerKind::ALL.len());
    for layer in LayerKind::ALL {
        layers.push(run_layer(
            layer,
            config.layer(layer),
            &config.retry,
            scene,
            rng,
            sink,
        )?);
    }

    for layer in LayerKind::ALL {
        randomize_scale(scene, layer, &config.layer(layer).scale, rng)?;
    }
    let materials = randomize_textures(&config.texture, scene, rng)?;
    sink.send(CycleEvent::MaterialsAssigned {
        objects: materials.len(),
        distinct: materials
            .iter()
            .map(|a| &a.material)
            .collect::<HashSet<_>>()
            .len(),
    });
    for layer in LayerKind::ALL {
        let objects = randomize_rotation(scene, layer, config.layer(layer).rotation, rng)?;
        sink.send(CycleEvent::LayerRandomized { layer, objects });
    }

    let lighting = randomize_lighting(&config.lighting, scene, rng)?;
    sink.send(CycleEvent::LightingChosen {
        environment: lighting.environment.name(),
        strength: lighting.strength,
    });

    let camera = config.camera.roll(rng);
    scene.set_camera_effects(&camera)?;
    sink.send(CycleEvent::CameraEffectsRolled {
        enabled: camera.enabled_count(),
    });

    let report = CycleReport {
        layers,
        materials,
        lighting,
        camera,
    };
    info!(
        "Cycle placed {} objects with {} camera effects enabled.",
        report.placed(),
        report.camera.enabled_count()
    );
    sink.send(CycleEvent::CycleFinished {
        placed: report.placed(),
    });
    Ok(report)
}
