//! In-process scene used for dry runs and tests.
use glam::Vec3;
use mint::Vector3;
use tracing::debug;

use crate::assets::AssetDescriptor;
use crate::error::{Error, Result};
use crate::randomize::{CameraEffectPlan, LightingPlan};
use crate::scatter::LayerKind;
use crate::scene::{EntityCategory, ObjectHandle, SceneSurface};

/// Default camera location in scene units.
const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 3.0);

/// One entity tracked by [`MemoryScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEntity {
    pub handle: ObjectHandle,
    pub category: EntityCategory,
    pub name: String,
    /// Layer container an imported object belongs to.
    pub layer: Option<LayerKind>,
    pub asset: Option<AssetDescriptor>,
    pub position: Vec3,
    /// Euler XYZ in radians.
    pub rotation: Vec3,
    pub scale: Vec3,
    /// Color map of the material assigned to an object.
    pub material: Option<AssetDescriptor>,
}

/// [`SceneSurface`] that records every mutation in memory.
///
/// A fresh scene holds a protected scene root and control script, a world, a camera, and one
/// collection per layer. Imports check that the asset file exists unless disabled with
/// [`MemoryScene::without_file_checks`].
#[derive(Debug, Clone)]
pub struct MemoryScene {
    entities: Vec<SceneEntity>,
    next_handle: u64,
    check_files: bool,
    lighting: Option<LightingPlan>,
    camera_effects: Option<CameraEffectPlan>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    pub fn new() -> Self {
        let mut scene = Self {
            entities: Vec::new(),
            next_handle: 0,
            check_files: true,
            lighting: None,
            camera_effects: None,
        };
        scene.add_entity(EntityCategory::Scene, "Scene");
        scene.add_entity(EntityCategory::Script, "control_script");
        scene.populate_defaults();
        scene
    }

    /// Accept imports of asset paths that do not exist on disk.
    pub fn without_file_checks(mut self) -> Self {
        self.check_files = false;
        self
    }

    pub fn entity(&self, handle: ObjectHandle) -> Option<&SceneEntity> {
        self.entities.iter().find(|e| e.handle == handle)
    }

    pub fn entities(&self) -> &[SceneEntity] {
        &self.entities
    }

    /// Entities of one category, in creation order.
    pub fn entities_of(&self, category: EntityCategory) -> impl Iterator<Item = &SceneEntity> + '_ {
        self.entities.iter().filter(move |e| e.category == category)
    }

    pub fn lighting(&self) -> Option<&LightingPlan> {
        self.lighting.as_ref()
    }

    pub fn camera_effects(&self) -> Option<&CameraEffectPlan> {
        self.camera_effects.as_ref()
    }

    /// Insert a bare entity, e.g. a leftover material from a previous cycle.
    pub fn add_entity(&mut self, category: EntityCategory, name: impl Into<String>) -> ObjectHandle {
        let handle = ObjectHandle(self.next_handle);
        self.next_handle += 1;
        self.entities.push(SceneEntity {
            handle,
            category,
            name: name.into(),
            layer: None,
            asset: None,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            material: None,
        });
        handle
    }

    fn populate_defaults(&mut self) {
        self.add_entity(EntityCategory::World, "World");
        let camera = self.add_entity(EntityCategory::Camera, "Camera");
        if let Some(e) = self.entity_mut(camera) {
            e.position = CAMERA_POSITION;
        }
        for layer in LayerKind::ALL {
            self.add_entity(EntityCategory::Collection, layer.as_str());
        }
    }

    fn entity_mut(&mut self, handle: ObjectHandle) -> Option<&mut SceneEntity> {
        self.entities.iter_mut().find(|e| e.handle == handle)
    }

    fn object_mut(&mut self, handle: ObjectHandle) -> Result<&mut SceneEntity> {
        self.entities
            .iter_mut()
            .find(|e| e.handle == handle && e.category == EntityCategory::Object)
            .ok_or(Error::UnknownObject(handle))
    }
}

impl SceneSurface for MemoryScene {
    fn reset(&mut self) -> Result<()> {
        let before = self.entities.len();
        self.entities.retain(|e| e.category.is_protected());
        self.lighting = None;
        self.camera_effects = None;
        debug!(
            "Scene reset removed {} entities.",
            before - self.entities.len()
        );
        self.populate_defaults();
        Ok(())
    }

    fn import_asset(&mut self, asset: &AssetDescriptor, layer: LayerKind) -> Result<ObjectHandle> {
        if self.check_files && !asset.path().is_file() {
            return Err(Error::AssetImport {
                path: asset.path().to_path_buf(),
                reason: "file does not exist".into(),
            });
        }
        let handle = self.add_entity(EntityCategory::Object, asset.name());
        if let Some(e) = self.entity_mut(handle) {
            e.layer = Some(layer);
            e.asset = Some(asset.clone());
        }
        Ok(handle)
    }

    fn set_position(&mut self, handle: ObjectHandle, position: Vector3<f32>) -> Result<()> {
        self.object_mut(handle)?.position = position.into();
        Ok(())
    }

    fn set_rotation(&mut self, handle: ObjectHandle, euler: Vector3<f32>) -> Result<()> {
        self.object_mut(handle)?.rotation = euler.into();
        Ok(())
    }

    fn scale_by(&mut self, handle: ObjectHandle, ratio: f32) -> Result<()> {
        self.object_mut(handle)?.scale *= ratio;
        Ok(())
    }

    fn set_material(&mut self, handle: ObjectHandle, color_map: &AssetDescriptor) -> Result<()> {
        let object = self.object_mut(handle)?;
        object.material = Some(color_map.clone());
        let name = format!("Material_{}", object.name);
        self.add_entity(EntityCategory::Material, name);
        Ok(())
    }

    fn list_instances(&self, layer: LayerKind) -> Vec<ObjectHandle> {
        self.entities
            .iter()
            .filter(|e| e.category == EntityCategory::Object && e.layer == Some(layer))
            .map(|e| e.handle)
            .collect()
    }

    fn set_lighting(&mut self, lighting: &LightingPlan) -> Result<()> {
        self.lighting = Some(lighting.clone());
        Ok(())
    }

    fn set_camera_effects(&mut self, effects: &CameraEffectPlan) -> Result<()> {
        self.camera_effects = Some(effects.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::asset_folder;

    #[test]
    fn fresh_scene_has_containers_world_and_camera() {
        let scene = MemoryScene::new();
        assert_eq!(scene.entities_of(EntityCategory::Collection).count(), 3);
        assert_eq!(scene.entities_of(EntityCategory::World).count(), 1);
        let camera = scene.entities_of(EntityCategory::Camera).next().unwrap();
        assert_eq!(camera.position, CAMERA_POSITION);
    }

    #[test]
    fn reset_keeps_only_protected_entities_and_recreates_defaults() {
        let mut scene = MemoryScene::new().without_file_checks();
        scene.add_entity(EntityCategory::Material, "leftover");
        scene.add_entity(EntityCategory::Image, "render");
        scene
            .import_asset(&AssetDescriptor::new("a.blend"), LayerKind::Foreground)
            .unwrap();

        scene.reset().unwrap();

        assert_eq!(scene.entities_of(EntityCategory::Scene).count(), 1);
        assert_eq!(scene.entities_of(EntityCategory::Script).count(), 1);
        assert_eq!(scene.entities_of(EntityCategory::Material).count(), 0);
        assert_eq!(scene.entities_of(EntityCategory::Image).count(), 0);
        assert!(scene.list_instances(LayerKind::Foreground).is_empty());
        assert_eq!(scene.entities_of(EntityCategory::Collection).count(), 3);
        assert_eq!(scene.entities_of(EntityCategory::Camera).count(), 1);
    }

    #[test]
    fn import_requires_existing_file_when_checking() {
        let mut scene = MemoryScene::new();
        let err = scene
            .import_asset(&AssetDescriptor::new("/nonexistent/x.blend"), LayerKind::Occluder)
            .unwrap_err();
        assert!(matches!(err, Error::AssetImport { .. }));

        let dir = asset_folder("memory-import", 1, "blend");
        let asset = AssetDescriptor::new(dir.join("asset_00.blend"));
        let h = scene.import_asset(&asset, LayerKind::Occluder).unwrap();
        let e = scene.entity(h).unwrap();
        assert_eq!(e.name, "asset_00");
        assert_eq!(e.layer, Some(LayerKind::Occluder));
        assert_eq!(e.asset.as_ref(), Some(&asset));
    }

    #[test]
    fn transforms_apply_to_objects_only() {
        let mut scene = MemoryScene::new().without_file_checks();
        let h = scene
            .import_asset(&AssetDescriptor::new("a.blend"), LayerKind::Background)
            .unwrap();
        scene
            .set_position(h, Vec3::new(1.0, 2.0, 3.0).into())
            .unwrap();
        scene.scale_by(h, 2.0).unwrap();
        scene.scale_by(h, 0.5).unwrap();
        let e = scene.entity(h).unwrap();
        assert_eq!(e.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(e.scale, Vec3::ONE);

        let world = scene.entities_of(EntityCategory::World).next().unwrap().handle;
        assert!(matches!(
            scene.scale_by(world, 2.0),
            Err(Error::UnknownObject(_))
        ));
        assert!(matches!(
            scene.set_rotation(ObjectHandle(999), Vec3::ZERO.into()),
            Err(Error::UnknownObject(ObjectHandle(999)))
        ));
    }

    #[test]
    fn materials_are_recorded_and_cleared_on_reset() {
        let mut scene = MemoryScene::new().without_file_checks();
        let h = scene
            .import_asset(&AssetDescriptor::new("crate.blend"), LayerKind::Occluder)
            .unwrap();
        let map = AssetDescriptor::new("lib/Wood049/Wood049_2K_Color.jpg");
        scene.set_material(h, &map).unwrap();

        assert_eq!(scene.entity(h).unwrap().material.as_ref(), Some(&map));
        let material = scene.entities_of(EntityCategory::Material).next().unwrap();
        assert_eq!(material.name, "Material_crate");
        assert!(matches!(
            scene.set_material(ObjectHandle(999), &map),
            Err(Error::UnknownObject(_))
        ));

        scene.reset().unwrap();
        assert_eq!(scene.entities_of(EntityCategory::Material).count(), 0);
    }

    #[test]
    fn list_instances_keeps_import_order_per_layer() {
        let mut scene = MemoryScene::new().without_file_checks();
        let a = scene
            .import_asset(&AssetDescriptor::new("a.blend"), LayerKind::Foreground)
            .unwrap();
        scene
            .import_asset(&AssetDescriptor::new("b.blend"), LayerKind::Occluder)
            .unwrap();
        let c = scene
            .import_asset(&AssetDescriptor::new("c.blend"), LayerKind::Foreground)
            .unwrap();
        assert_eq!(scene.list_instances(LayerKind::Foreground), vec![a, c]);
    }
}
