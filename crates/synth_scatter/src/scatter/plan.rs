//! Per-layer configuration records.
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::randomize::{RotationMode, ValueRange};
use crate::sampling::{Domain, PoissonDiskSampling};
use crate::scatter::binder::CoordinateOffset;
use crate::scatter::quantity::QuantityPolicy;
use crate::scatter::selection::PointSelection;
use crate::scatter::LayerKind;

/// File extension of importable scene assets.
pub const DEFAULT_ASSET_EXTENSION: &str = "blend";

/// Everything one placement layer needs for a generation cycle.
///
/// Inside a [`GeneratorConfig`](crate::config::GeneratorConfig) a layer may be given
/// partially; omitted fields keep that layer's reference values.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerConfig {
    pub domain: Domain,
    pub sampling: PoissonDiskSampling,
    pub quantity: QuantityPolicy,
    pub asset_folder: PathBuf,
    pub asset_extension: String,
    pub offset: CoordinateOffset,
    pub point_selection: PointSelection,
    /// Per-object size ratio range.
    pub scale: ValueRange,
    pub rotation: RotationMode,
}

impl LayerConfig {
    /// Create a layer config with in-order points, unit scale, and independent rotation.
    pub fn new(
        domain: Domain,
        radius: f32,
        quantity: QuantityPolicy,
        asset_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            domain,
            sampling: PoissonDiskSampling::new(radius),
            quantity,
            asset_folder: asset_folder.into(),
            asset_extension: DEFAULT_ASSET_EXTENSION.into(),
            offset: CoordinateOffset::ZERO,
            point_selection: PointSelection::InOrder,
            scale: ValueRange::fixed(1.0),
            rotation: RotationMode::Independent,
        }
    }

    /// Backdrop plane: every sampled point gets an object.
    pub fn background() -> Self {
        let domain = Domain::plane(3.2, 2.4);
        Self::new(
            domain,
            0.2,
            QuantityPolicy::AllSamples,
            "assets/background_objects",
        )
        .with_offset(CoordinateOffset::centering(&domain, 0.0))
        .with_scale(ValueRange::fixed(2.5))
    }

    /// Labeled subject volume: 8 to 20 objects sharing one orientation.
    pub fn foreground() -> Self {
        let domain = Domain::volume(2.5, 1.5, 0.5);
        Self::new(
            domain,
            0.3,
            QuantityPolicy::ranged(8, 20),
            "assets/foreground_objects",
        )
        .with_offset(CoordinateOffset::centering(&domain, -0.5))
        .with_point_selection(PointSelection::RandomSubset)
        .with_scale(ValueRange::new(0.5, 2.5))
        .with_rotation(RotationMode::Unified)
    }

    /// Clutter volume closest to the camera: 5 to 10 objects.
    pub fn occluder() -> Self {
        let domain = Domain::volume(1.2, 0.8, 0.4);
        Self::new(
            domain,
            0.25,
            QuantityPolicy::ranged(5, 10),
            "assets/occluder_objects",
        )
        .with_offset(CoordinateOffset::centering(&domain, -1.5))
        .with_point_selection(PointSelection::RandomSubset)
        .with_scale(ValueRange::new(0.5, 1.5))
    }

    /// Reference configuration for `layer`.
    pub fn for_layer(layer: LayerKind) -> Self {
        match layer {
            LayerKind::Background => Self::background(),
            LayerKind::Foreground => Self::foreground(),
            LayerKind::Occluder => Self::occluder(),
        }
    }

    pub fn with_sampling(mut self, sampling: PoissonDiskSampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_asset_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.asset_folder = folder.into();
        self
    }

    pub fn with_asset_extension(mut self, extension: impl Into<String>) -> Self {
        self.asset_extension = extension.into();
        self
    }

    pub fn with_offset(mut self, offset: CoordinateOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_point_selection(mut self, selection: PointSelection) -> Self {
        self.point_selection = selection;
        self
    }

    pub fn with_scale(mut self, scale: ValueRange) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: RotationMode) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn validate(&self, layer: LayerKind) -> Result<()> {
        let name = layer.as_str();
        if !self.domain.is_valid() {
            return Err(Error::InvalidConfig(format!(
                "{name}.domain extents must be finite and > 0"
            )));
        }
        if !self.sampling.radius.is_finite() || self.sampling.radius <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "{name}.sampling.radius must be > 0"
            )));
        }
        if self.sampling.rejection_threshold == 0 {
            return Err(Error::InvalidConfig(format!(
                "{name}.sampling.rejection_threshold must be >= 1"
            )));
        }
        if self.asset_extension.trim_start_matches('.').is_empty() {
            return Err(Error::InvalidConfig(format!(
                "{name}.asset_extension must not be empty"
            )));
        }
        if !self.offset.0.is_finite() {
            return Err(Error::InvalidConfig(format!("{name}.offset must be finite")));
        }
        self.quantity.validate(name)?;
        self.scale.validate(&format!("{name}.scale"))?;
        if self.scale.min <= 0.0 {
            return Err(Error::InvalidConfig(format!("{name}.scale must be > 0")));
        }
        Ok(())
    }
}

/// Partial layer records merged onto the reference layer of the field they fill.
#[cfg(feature = "serde")]
pub(crate) mod partial {
    use serde::{Deserialize, Deserializer};

    use super::*;

    /// Accept a bare value for an `Option` field; absence is handled by `#[serde(default)]`.
    fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        T::deserialize(deserializer).map(Some)
    }

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct SamplingOverlay {
        #[serde(default, deserialize_with = "present")]
        radius: Option<f32>,
        #[serde(default, deserialize_with = "present")]
        rejection_threshold: Option<usize>,
    }

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct LayerOverlay {
        #[serde(default, deserialize_with = "present")]
        domain: Option<Domain>,
        #[serde(default, deserialize_with = "present")]
        sampling: Option<SamplingOverlay>,
        #[serde(default, deserialize_with = "present")]
        quantity: Option<QuantityPolicy>,
        #[serde(default, deserialize_with = "present")]
        asset_folder: Option<PathBuf>,
        #[serde(default, deserialize_with = "present")]
        asset_extension: Option<String>,
        #[serde(default, deserialize_with = "present")]
        offset: Option<CoordinateOffset>,
        #[serde(default, deserialize_with = "present")]
        point_selection: Option<PointSelection>,
        #[serde(default, deserialize_with = "present")]
        scale: Option<ValueRange>,
        #[serde(default, deserialize_with = "present")]
        rotation: Option<RotationMode>,
    }

    impl LayerOverlay {
        fn merge_onto(self, mut layer: LayerConfig) -> LayerConfig {
            if let Some(domain) = self.domain {
                layer.domain = domain;
            }
            if let Some(sampling) = self.sampling {
                if let Some(radius) = sampling.radius {
                    layer.sampling.radius = radius;
                }
                if let Some(threshold) = sampling.rejection_threshold {
                    layer.sampling.rejection_threshold = threshold;
                }
            }
            if let Some(quantity) = self.quantity {
                layer.quantity = quantity;
            }
            if let Some(folder) = self.asset_folder {
                layer.asset_folder = folder;
            }
            if let Some(extension) = self.asset_extension {
                layer.asset_extension = extension;
            }
            if let Some(offset) = self.offset {
                layer.offset = offset;
            }
            if let Some(selection) = self.point_selection {
                layer.point_selection = selection;
            }
            if let Some(scale) = self.scale {
                layer.scale = scale;
            }
            if let Some(rotation) = self.rotation {
                layer.rotation = rotation;
            }
            layer
        }
    }

    fn layer<'de, D>(kind: LayerKind, deserializer: D) -> std::result::Result<LayerConfig, D::Error>
    where
        D: Deserializer<'de>,
    {
        LayerOverlay::deserialize(deserializer).map(|o| o.merge_onto(LayerConfig::for_layer(kind)))
    }

    pub(crate) fn background<'de, D>(deserializer: D) -> std::result::Result<LayerConfig, D::Error>
    where
        D: Deserializer<'de>,
    {
        layer(LayerKind::Background, deserializer)
    }

    pub(crate) fn foreground<'de, D>(deserializer: D) -> std::result::Result<LayerConfig, D::Error>
    where
        D: Deserializer<'de>,
    {
        layer(LayerKind::Foreground, deserializer)
    }

    pub(crate) fn occluder<'de, D>(deserializer: D) -> std::result::Result<LayerConfig, D::Error>
    where
        D: Deserializer<'de>,
    {
        layer(LayerKind::Occluder, deserializer)
    }
}
