//! Boundary to the host 3D engine.
//!
//! The placement engine never owns scene objects. It talks to the host through
//! [`SceneSurface`], receiving opaque [`ObjectHandle`]s that are only meaningful for the
//! current generation cycle. [`MemoryScene`] is an in-process implementation used for dry
//! runs and tests.
use std::fmt;

use mint::Vector3;

use crate::assets::AssetDescriptor;
use crate::error::Result;
use crate::randomize::{CameraEffectPlan, LightingPlan};
use crate::scatter::LayerKind;

pub mod memory;

pub use memory::{MemoryScene, SceneEntity};

/// Opaque identifier of an object living in the host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectHandle(pub u64);

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kinds of data a host scene holds. Resetting a scene removes everything that is not
/// [protected](EntityCategory::is_protected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityCategory {
    Scene,
    Script,
    Object,
    Mesh,
    Material,
    Image,
    World,
    Camera,
    Collection,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 9] = [
        EntityCategory::Scene,
        EntityCategory::Script,
        EntityCategory::Object,
        EntityCategory::Mesh,
        EntityCategory::Material,
        EntityCategory::Image,
        EntityCategory::World,
        EntityCategory::Camera,
        EntityCategory::Collection,
    ];

    /// Categories that survive a scene reset.
    pub const PROTECTED: [EntityCategory; 2] = [EntityCategory::Scene, EntityCategory::Script];

    pub fn is_protected(self) -> bool {
        Self::PROTECTED.contains(&self)
    }
}

/// Mutation surface of the host engine used by one generation cycle.
pub trait SceneSurface {
    /// Remove every unprotected entity and recreate the empty per-layer containers, world,
    /// and camera.
    fn reset(&mut self) -> Result<()>;

    /// Instantiate `asset` into the container of `layer`.
    fn import_asset(&mut self, asset: &AssetDescriptor, layer: LayerKind) -> Result<ObjectHandle>;

    fn set_position(&mut self, handle: ObjectHandle, position: Vector3<f32>) -> Result<()>;

    /// Euler XYZ angles in radians.
    fn set_rotation(&mut self, handle: ObjectHandle, euler: Vector3<f32>) -> Result<()>;

    /// Multiply the object's dimensions by `ratio`.
    fn scale_by(&mut self, handle: ObjectHandle, ratio: f32) -> Result<()>;

    /// Replace the object's surface material with one built from `color_map`.
    fn set_material(&mut self, handle: ObjectHandle, color_map: &AssetDescriptor) -> Result<()>;

    /// Objects currently in the container of `layer`, in import order.
    fn list_instances(&self, layer: LayerKind) -> Vec<ObjectHandle>;

    fn set_lighting(&mut self, lighting: &LightingPlan) -> Result<()>;

    fn set_camera_effects(&mut self, effects: &CameraEffectPlan) -> Result<()>;
}
