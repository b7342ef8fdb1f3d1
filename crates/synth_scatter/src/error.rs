//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, the fatal placement conditions of a generation cycle (empty
//! asset pool, insufficient samples, exhausted sampling retries, failed imports),
//! scene-surface misuse, IO, and generic errors.
use std::path::PathBuf;

use thiserror::Error;

use crate::scatter::LayerKind;
use crate::scene::ObjectHandle;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("can not find any '.{extension}' asset in {}", folder.display())]
    EmptyAssetPool { folder: PathBuf, extension: String },

    #[error(
        "{layer} layer needs {required} positions but sampling produced only {available}"
    )]
    InsufficientSamples {
        layer: LayerKind,
        required: usize,
        available: usize,
    },

    #[error("{layer} layer sampling returned no points after {attempts} attempts")]
    SamplingExhausted { layer: LayerKind, attempts: u32 },

    #[error("failed to import asset '{}': {reason}", path.display())]
    AssetImport { path: PathBuf, reason: String },

    #[error("unknown scene object {0}")]
    UnknownObject(ObjectHandle),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        matches!(err, Error::Other(_))
            .then_some(())
            .expect("expected Other variant");
    }

    #[test]
    fn from_str_allocates_owned_message() {
        let err: Error = "issue".into();
        assert!(matches!(err, Error::Other(ref msg) if msg == "issue"));
    }

    #[test]
    fn fatal_messages_name_the_offending_input() {
        let err = Error::EmptyAssetPool {
            folder: PathBuf::from("assets/occluder"),
            extension: "blend".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("assets/occluder"));
        assert!(msg.contains(".blend"));

        let err = Error::InsufficientSamples {
            layer: LayerKind::Foreground,
            required: 15,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "foreground layer needs 15 positions but sampling produced only 10"
        );
    }
}
