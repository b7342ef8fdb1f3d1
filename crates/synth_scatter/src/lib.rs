#![forbid(unsafe_code)]
//! synth_scatter: spatial placement engine for procedurally generated synthetic training scenes.
//!
//! Modules:
//! - sampling: Poisson disk point clouds in 2D/3D domains, bounded retry on empty clouds
//! - assets: asset pool discovery by folder and extension
//! - scatter: quantity allocation, point-to-asset binding, layer configs, cycle runner, events
//! - randomize: per-cycle scale, material, rotation, lighting, and camera effect draws
//! - scene: host-engine boundary trait and an in-memory scene
//! - cycle: per-cycle identifiers and output paths
//!
//! For a walkthrough, see the README.
pub mod assets;
pub mod config;
pub mod cycle;
pub mod error;
pub mod randomize;
pub mod sampling;
pub mod scatter;
pub mod scene;

#[cfg(test)]
mod test_support;

/// Convenient re-exports for common types. Import with `use synth_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::assets::{resolve_pool, AssetDescriptor, AssetPool};
    pub use crate::config::GeneratorConfig;
    pub use crate::cycle::{CycleId, OutputConfig};
    pub use crate::error::{Error, Result};
    pub use crate::randomize::{
        assign_materials, randomize_lighting, randomize_rotation, randomize_scale,
        randomize_textures, CameraEffectPlan, CameraEffectsConfig, Effect, EffectSpec,
        LightingConfig, LightingPlan, MaterialAssignment, RotationMode, SensorNoise,
        TextureConfig, ValueRange,
    };
    pub use crate::sampling::{
        sample_until_nonempty, Domain, PoissonDiskSampling, RetryPolicy, SampledPoints,
        DEFAULT_REJECTION_THRESHOLD,
    };
    pub use crate::scatter::binder::{
        apply_plan, bind, CoordinateOffset, Placement, PlacementPlan,
    };
    pub use crate::scatter::events::{CycleEvent, EventSink, FnSink, VecSink};
    pub use crate::scatter::plan::LayerConfig;
    pub use crate::scatter::quantity::{resolve_target_count, QuantityPolicy, TargetCount};
    pub use crate::scatter::runner::{run_cycle, run_layer, CycleReport, CycleRunner, LayerReport};
    pub use crate::scatter::selection::{
        choose_points, select_assets, selection_branch, PointSelection, SelectionBranch,
    };
    pub use crate::scatter::LayerKind;
    pub use crate::scene::{EntityCategory, MemoryScene, ObjectHandle, SceneSurface};
}
