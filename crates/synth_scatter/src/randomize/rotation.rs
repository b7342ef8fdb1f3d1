//! Random orientation of placed objects.
use std::f32::consts::TAU;

use glam::Vec3;
use rand::RngCore;

use crate::error::Result;
use crate::sampling::uniform_f32;
use crate::scatter::LayerKind;
use crate::scene::SceneSurface;

/// How a layer's objects are rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationMode {
    /// A fresh rotation per object.
    #[default]
    Independent,
    /// One rotation shared by every object of the layer.
    Unified,
}

/// Euler XYZ angles, each uniform in `[0, 2π)`.
pub fn random_euler(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(
        uniform_f32(rng, 0.0, TAU),
        uniform_f32(rng, 0.0, TAU),
        uniform_f32(rng, 0.0, TAU),
    )
}

/// Rotate every instance of `layer`; returns how many objects were rotated.
pub fn randomize_rotation(
    scene: &mut dyn SceneSurface,
    layer: LayerKind,
    mode: RotationMode,
    rng: &mut dyn RngCore,
) -> Result<usize> {
    let handles = scene.list_instances(layer);
    let shared = match mode {
        RotationMode::Unified => Some(random_euler(rng)),
        RotationMode::Independent => None,
    };
    for &handle in &handles {
        let euler = shared.unwrap_or_else(|| random_euler(rng));
        scene.set_rotation(handle, euler.into())?;
    }
    Ok(handles.len())
}
