//! Manifest loading errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read role manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse role manifest: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("role '{0}' is declared more than once")]
    DuplicateRole(String),

    #[error("role '{role}' references unknown release '{release}'")]
    UnknownRelease { role: String, release: String },

    #[error("role '{role}' references job '{job}' not found in release '{release}'")]
    UnknownJob {
        role: String,
        job: String,
        release: String,
    },
}
