//! Surface material assignment for background and occluder objects.
//!
//! A material library is a folder of material folders, each holding a color map named
//! `<material>/<material><suffix>` (e.g. `Wood049/Wood049_2K_Color.jpg`). Every textured
//! object gets one color map drawn with replacement, so materials may repeat within a cycle.
use std::fs;
use std::path::{Path, PathBuf};

use rand::RngCore;
use tracing::{debug, info};

use crate::assets::{AssetDescriptor, AssetPool};
use crate::error::{Error, Result};
use crate::sampling::uniform_index;
use crate::scatter::LayerKind;
use crate::scene::{ObjectHandle, SceneSurface};

/// Layers whose objects receive a random material, in assignment order.
pub const TEXTURED_LAYERS: [LayerKind; 2] = [LayerKind::Occluder, LayerKind::Background];

/// Where the material library lives and how its color maps are named.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextureConfig {
    pub folder: PathBuf,
    /// Appended to a material folder's name to form its color map file name.
    pub color_map_suffix: String,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("assets/pbr_texture"),
            color_map_suffix: "_2K_Color.jpg".into(),
        }
    }
}

impl TextureConfig {
    pub fn validate(&self) -> Result<()> {
        if self.color_map_suffix.is_empty() || self.color_map_suffix.contains(['/', '\\']) {
            return Err(Error::InvalidConfig(
                "texture.color_map_suffix must be a non-empty file name suffix".into(),
            ));
        }
        Ok(())
    }

    /// Color map path of the material folder `material`, if it follows the naming scheme.
    fn color_map(&self, material: &Path) -> Option<PathBuf> {
        let name = material.file_name()?.to_string_lossy();
        let path = material.join(format!("{name}{}", self.color_map_suffix));
        path.is_file().then_some(path)
    }

    /// Collect every material's color map, ordered by material folder name.
    ///
    /// Loose files and material folders without a matching color map are skipped. Finding
    /// no material at all is an [`Error::EmptyAssetPool`].
    pub fn resolve(&self) -> Result<AssetPool> {
        let mut maps = Vec::new();
        for entry in fs::read_dir(&self.folder)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            match self.color_map(&path) {
                Some(map) => maps.push(AssetDescriptor::new(map)),
                None => debug!("Skipping {}: no color map.", path.display()),
            }
        }
        maps.sort();

        let extension = Path::new(&self.color_map_suffix)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        AssetPool::from_descriptors(&self.folder, &extension, maps)
    }
}

/// One object and the color map it was given.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialAssignment {
    pub handle: ObjectHandle,
    pub material: AssetDescriptor,
}

/// Draw one material per handle, with replacement.
pub fn assign_materials(
    pool: &AssetPool,
    handles: &[ObjectHandle],
    rng: &mut dyn RngCore,
) -> Vec<MaterialAssignment> {
    handles
        .iter()
        .map(|&handle| MaterialAssignment {
            handle,
            material: pool.assets()[uniform_index(rng, pool.len())].clone(),
        })
        .collect()
}

/// Resolve the material library and give every occluder and background object a material.
///
/// The library is resolved before anything is touched, so an empty library fails without
/// changing the scene.
pub fn randomize_textures(
    config: &TextureConfig,
    scene: &mut dyn SceneSurface,
    rng: &mut dyn RngCore,
) -> Result<Vec<MaterialAssignment>> {
    let pool = config.resolve()?;
    let handles: Vec<ObjectHandle> = TEXTURED_LAYERS
        .iter()
        .flat_map(|&layer| scene.list_instances(layer))
        .collect();

    let assignments = assign_materials(&pool, &handles, rng);
    for a in &assignments {
        scene.set_material(a.handle, &a.material)?;
    }
    info!(
        "Assigned materials to {} objects from {} in library.",
        assignments.len(),
        pool.len()
    );
    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::scene::MemoryScene;
    use crate::test_support::ScratchDir;

    fn library(dir: &ScratchDir, count: usize) -> TextureConfig {
        TextureConfig {
            folder: dir.material_folder("library", count),
            ..Default::default()
        }
    }

    fn populated_scene() -> MemoryScene {
        let mut scene = MemoryScene::new().without_file_checks();
        for layer in LayerKind::ALL {
            for i in 0..4 {
                scene
                    .import_asset(&AssetDescriptor::new(format!("{layer}_{i}.blend")), layer)
                    .unwrap();
            }
        }
        scene
    }

    #[test]
    fn resolve_finds_color_maps_in_material_folders() {
        let dir = ScratchDir::new("texture-resolve");
        let config = library(&dir, 3);
        fs::write(config.folder.join("loose_2K_Color.jpg"), b"").unwrap();
        fs::create_dir_all(config.folder.join("no_maps")).unwrap();
        fs::write(config.folder.join("no_maps").join("preview.png"), b"").unwrap();

        let pool = config.resolve().unwrap();
        let names: Vec<String> = pool.assets().iter().map(AssetDescriptor::name).collect();
        assert_eq!(
            names,
            vec!["mat_00_2K_Color", "mat_01_2K_Color", "mat_02_2K_Color"]
        );
        assert_eq!(pool.extension(), "jpg");
    }

    #[test]
    fn empty_library_is_fatal_and_leaves_scene_untouched() {
        let dir = ScratchDir::new("texture-empty");
        let config = library(&dir, 0);
        let mut scene = populated_scene();
        let mut rng = StdRng::seed_from_u64(1);

        let err = randomize_textures(&config, &mut scene, &mut rng).unwrap_err();
        assert!(matches!(err, Error::EmptyAssetPool { .. }));
        assert!(scene.entities().iter().all(|e| e.material.is_none()));
    }

    #[test]
    fn only_background_and_occluder_objects_get_materials() {
        let dir = ScratchDir::new("texture-layers");
        let config = library(&dir, 2);
        let mut scene = populated_scene();
        let mut rng = StdRng::seed_from_u64(8);

        let assignments = randomize_textures(&config, &mut scene, &mut rng).unwrap();
        assert_eq!(assignments.len(), 8);

        let occluders = scene.list_instances(LayerKind::Occluder);
        let handles: Vec<ObjectHandle> = assignments.iter().map(|a| a.handle).collect();
        assert_eq!(&handles[..4], occluders.as_slice());

        for a in &assignments {
            assert_eq!(scene.entity(a.handle).unwrap().material.as_ref(), Some(&a.material));
        }
        for h in scene.list_instances(LayerKind::Foreground) {
            assert!(scene.entity(h).unwrap().material.is_none());
        }
    }

    #[test]
    fn draws_repeat_materials_when_objects_outnumber_library() {
        let pool = AssetPool::from_descriptors(
            "mem",
            "jpg",
            vec![AssetDescriptor::new("a.jpg"), AssetDescriptor::new("b.jpg")],
        )
        .unwrap();
        let handles: Vec<ObjectHandle> = (0..12).map(ObjectHandle).collect();
        let mut rng = StdRng::seed_from_u64(3);

        let assignments = assign_materials(&pool, &handles, &mut rng);
        assert_eq!(assignments.len(), 12);
        let distinct: HashSet<_> = assignments.iter().map(|a| &a.material).collect();
        assert!(distinct.len() <= 2);
        assert!(assignments
            .iter()
            .all(|a| pool.assets().contains(&a.material)));
    }

    #[test]
    fn suffix_must_be_a_plain_name() {
        assert!(TextureConfig::default().validate().is_ok());
        let bad = TextureConfig {
            color_map_suffix: String::new(),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = TextureConfig {
            color_map_suffix: "/x.jpg".into(),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
