//! Asset pool discovery.
//!
//! A pool is the ordered list of importable asset files found directly inside one folder
//! (no recursion) whose extension matches a filter. An empty pool is a fatal
//! [`Error::EmptyAssetPool`]; a pool value therefore always holds at least one descriptor.
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// File-system path identifying one importable asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AssetDescriptor(PathBuf);

impl AssetDescriptor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File name without extension, used as a human-readable asset name.
    pub fn name(&self) -> String {
        self.0
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl fmt::Display for AssetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<PathBuf> for AssetDescriptor {
    fn from(value: PathBuf) -> Self {
        Self(value)
    }
}

/// Non-empty, ordered set of asset descriptors resolved from one folder.
#[derive(Debug, Clone)]
pub struct AssetPool {
    folder: PathBuf,
    extension: String,
    assets: Vec<AssetDescriptor>,
}

impl AssetPool {
    /// Scan `folder` for files with the given extension (case-insensitive, leading dot optional).
    ///
    /// Results are ordered by file name so seeded runs are reproducible across platforms.
    pub fn resolve(folder: impl AsRef<Path>, extension: &str) -> Result<Self> {
        let folder = folder.as_ref();
        let extension = normalize_extension(extension);

        let mut assets = Vec::new();
        for entry in fs::read_dir(folder)? {
            let path = entry?.path();
            if path.is_file() && has_extension(&path, &extension) {
                assets.push(AssetDescriptor::new(path));
            }
        }
        assets.sort_by(|a, b| a.path().file_name().cmp(&b.path().file_name()));

        debug!(
            "Resolved {} '.{}' assets in {}.",
            assets.len(),
            extension,
            folder.display()
        );
        Self::from_descriptors(folder, &extension, assets)
    }

    /// Build a pool from already-known descriptors, keeping their order.
    pub fn from_descriptors(
        folder: impl Into<PathBuf>,
        extension: &str,
        assets: Vec<AssetDescriptor>,
    ) -> Result<Self> {
        let folder = folder.into();
        let extension = normalize_extension(extension);
        if assets.is_empty() {
            return Err(Error::EmptyAssetPool { folder, extension });
        }
        Ok(Self {
            folder,
            extension,
            assets,
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn assets(&self) -> &[AssetDescriptor] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Free-function form of [`AssetPool::resolve`].
pub fn resolve_pool(folder: impl AsRef<Path>, extension: &str) -> Result<AssetPool> {
    AssetPool::resolve(folder, extension)
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase() == extension)
        .unwrap_or(false)
}
