//! RON configuration file holding the generator and driver sections.
use std::fs;
use std::path::Path;

use anyhow::Context;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use synth_scatter::prelude::GeneratorConfig;

use crate::looper::DriverConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub driver: DriverConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_ron(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.generator.validate()?;
        self.driver.validate()
    }

    pub fn to_ron(&self) -> anyhow::Result<String> {
        Ok(ron::ser::to_string_pretty(self, PrettyConfig::default())?)
    }
}
