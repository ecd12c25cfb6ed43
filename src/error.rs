//! Top-level error type for the configstore library and CLI.

use thiserror::Error;

use configstore_manifest::ManifestError;
use configstore_overlay::{AssemblyError, OverlayError};

use crate::config::ConfigError;
use crate::opinions::OpinionsError;
use crate::writer::WriterError;

#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Opinions(#[from] OpinionsError),

    #[error("building base tree: {0}")]
    BaseTree(#[from] OverlayError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Writer(#[from] WriterError),

    #[error("no job '{job}' in role '{role}'")]
    UnknownUnit { role: String, job: String },

    #[error("serialization failed: {0}")]
    Serialize(String),
}

pub type Result<T, E = ConfigStoreError> = std::result::Result<T, E>;
