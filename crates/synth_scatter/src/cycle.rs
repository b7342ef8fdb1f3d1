//! Per-cycle identifiers and output locations.
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// Width the timestamp part of a [`CycleId`] is zero-padded to.
pub const TIMESTAMP_WIDTH: usize = 15;

/// Where rendered images and their label files go, and which machine produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OutputConfig {
    pub image_dir: PathBuf,
    pub label_dir: PathBuf,
    /// Prefix that keeps ids from several render machines apart.
    pub machine_tag: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("gen_data/images"),
            label_dir: PathBuf::from("gen_data/labels"),
            machine_tag: "a".into(),
        }
    }
}

impl OutputConfig {
    pub fn validate(&self) -> Result<()> {
        if self
            .machine_tag
            .chars()
            .any(|c| std::path::is_separator(c) || c.is_whitespace())
        {
            return Err(Error::InvalidConfig(
                "output.machine_tag must not contain separators or whitespace".into(),
            ));
        }
        Ok(())
    }

    /// Identifier for a cycle started now.
    pub fn next_cycle_id(&self) -> CycleId {
        CycleId::now(&self.machine_tag)
    }

    pub fn image_path(&self, id: &CycleId) -> PathBuf {
        id.image_path(&self.image_dir)
    }

    pub fn label_path(&self, id: &CycleId) -> PathBuf {
        id.label_path(&self.label_dir)
    }
}

/// Machine tag followed by a zero-padded unix timestamp, e.g. `a000001767225600`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CycleId(String);

impl CycleId {
    pub fn new(machine_tag: &str, unix_seconds: u64) -> Self {
        Self(format!("{machine_tag}{unix_seconds:0width$}", width = TIMESTAMP_WIDTH))
    }

    pub fn now(machine_tag: &str) -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::new(machine_tag, secs)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn image_path(&self, image_dir: impl AsRef<Path>) -> PathBuf {
        image_dir.as_ref().join(format!("{}.png", self.0))
    }

    pub fn label_path(&self, label_dir: impl AsRef<Path>) -> PathBuf {
        label_dir.as_ref().join(format!("{}.txt", self.0))
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
