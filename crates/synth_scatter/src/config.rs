//! Top-level generator configuration.
use crate::cycle::OutputConfig;
use crate::error::Result;
use crate::randomize::{CameraEffectsConfig, LightingConfig, TextureConfig};
use crate::sampling::RetryPolicy;
use crate::scatter::plan::LayerConfig;
use crate::scatter::LayerKind;

/// Parameters of one generation cycle. `Default` reproduces the reference scene setup.
///
/// Deserialization falls back to defaults for missing sections, and for missing fields of a
/// layer to that layer's reference values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneratorConfig {
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "crate::scatter::plan::partial::background")
    )]
    pub background: LayerConfig,
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "crate::scatter::plan::partial::foreground")
    )]
    pub foreground: LayerConfig,
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "crate::scatter::plan::partial::occluder")
    )]
    pub occluder: LayerConfig,
    pub retry: RetryPolicy,
    pub texture: TextureConfig,
    pub lighting: LightingConfig,
    pub camera: CameraEffectsConfig,
    pub output: OutputConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            background: LayerConfig::background(),
            foreground: LayerConfig::foreground(),
            occluder: LayerConfig::occluder(),
            retry: RetryPolicy::default(),
            texture: TextureConfig::default(),
            lighting: LightingConfig::default(),
            camera: CameraEffectsConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn layer(&self, layer: LayerKind) -> &LayerConfig {
        match layer {
            LayerKind::Background => &self.background,
            LayerKind::Foreground => &self.foreground,
            LayerKind::Occluder => &self.occluder,
        }
    }

    pub fn layer_mut(&mut self, layer: LayerKind) -> &mut LayerConfig {
        match layer {
            LayerKind::Background => &mut self.background,
            LayerKind::Foreground => &mut self.foreground,
            LayerKind::Occluder => &mut self.occluder,
        }
    }

    pub fn with_layer(mut self, layer: LayerKind, config: LayerConfig) -> Self {
        *self.layer_mut(layer) = config;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_texture(mut self, texture: TextureConfig) -> Self {
        self.texture = texture;
        self
    }

    pub fn with_lighting(mut self, lighting: LightingConfig) -> Self {
        self.lighting = lighting;
        self
    }

    pub fn with_camera(mut self, camera: CameraEffectsConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for layer in LayerKind::ALL {
            self.layer(layer).validate(layer)?;
        }
        self.retry.validate()?;
        self.texture.validate()?;
        self.lighting.validate()?;
        self.camera.validate()?;
        self.output.validate()
    }
}
