//! Per-object size randomization.
use rand::RngCore;

use crate::error::Result;
use crate::randomize::ValueRange;
use crate::scatter::LayerKind;
use crate::scene::SceneSurface;

/// Scale ratio for one object: the range's value when fixed, otherwise a tenth-step draw
/// from `[min, max)`.
pub fn draw_scale_ratio(range: &ValueRange, rng: &mut dyn RngCore) -> f32 {
    range.draw_stepped_exclusive(0.1, rng)
}

/// Multiply the dimensions of every instance of `layer` by its own ratio.
pub fn randomize_scale(
    scene: &mut dyn SceneSurface,
    layer: LayerKind,
    range: &ValueRange,
    rng: &mut dyn RngCore,
) -> Result<usize> {
    let handles = scene.list_instances(layer);
    for &handle in &handles {
        scene.scale_by(handle, draw_scale_ratio(range, rng))?;
    }
    Ok(handles.len())
}
