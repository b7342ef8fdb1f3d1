//! Binding sampled points to asset instances and pushing them into the scene.
use glam::Vec3;
use rand::RngCore;
use tracing::debug;

use crate::assets::{AssetDescriptor, AssetPool};
use crate::error::Result;
use crate::sampling::Domain;
use crate::scatter::quantity::TargetCount;
use crate::scatter::selection::{choose_points, select_assets, PointSelection, SelectionBranch};
use crate::scatter::LayerKind;
use crate::scene::{ObjectHandle, SceneSurface};

/// Per-layer vector subtracted from every sampled point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CoordinateOffset(pub Vec3);

impl CoordinateOffset {
    pub const ZERO: CoordinateOffset = CoordinateOffset(Vec3::ZERO);

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Offset that centers `domain` on the origin in x/y and moves the layer along the depth
    /// axis by `-depth_shift`.
    pub fn centering(domain: &Domain, depth_shift: f32) -> Self {
        let half = domain.extent() * 0.5;
        Self(Vec3::new(half.x, half.y, depth_shift))
    }

    pub fn apply(&self, point: Vec3) -> Vec3 {
        point - self.0
    }

    pub fn revert(&self, point: Vec3) -> Vec3 {
        point + self.0
    }
}

/// One point bound to one asset, in scene coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub asset: AssetDescriptor,
    pub position: Vec3,
}

/// Point-to-asset mapping for one layer in one generation cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementPlan {
    pub layer: LayerKind,
    pub branch: SelectionBranch,
    pub placements: Vec<Placement>,
}

impl PlacementPlan {
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Build a placement plan. Pure apart from RNG draws.
///
/// The count check runs before any selection, so an insufficient cloud never yields a
/// partial plan.
pub fn bind(
    layer: LayerKind,
    target: TargetCount,
    points: &[Vec3],
    pool: &AssetPool,
    selection: PointSelection,
    offset: CoordinateOffset,
    rng: &mut dyn RngCore,
) -> Result<PlacementPlan> {
    let count = target.reconcile(layer, points.len())?;
    let chosen = choose_points(selection, count, points, rng);
    let (branch, assets) = select_assets(count, pool, rng);

    let placements = chosen
        .into_iter()
        .zip(assets)
        .map(|(point, asset)| Placement {
            asset,
            position: offset.apply(point),
        })
        .collect();

    Ok(PlacementPlan {
        layer,
        branch,
        placements,
    })
}

/// Import and position every placement of `plan`.
///
/// Stops at the first failure; objects placed before it stay in the scene.
pub fn apply_plan(plan: &PlacementPlan, scene: &mut dyn SceneSurface) -> Result<Vec<ObjectHandle>> {
    let mut handles = Vec::with_capacity(plan.len());
    for placement in &plan.placements {
        let handle = scene.import_asset(&placement.asset, plan.layer)?;
        scene.set_position(handle, placement.position.into())?;
        debug!(
            "Placed '{}' as {} at {:?} in {} layer.",
            placement.asset.name(),
            handle,
            placement.position,
            plan.layer
        );
        handles.push(handle);
    }
    Ok(handles)
}
