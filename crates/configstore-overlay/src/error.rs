//! Error types for key resolution and tree overlays.

use thiserror::Error;

/// Failures raised while resolving keys or applying an overlay to a tree.
///
/// All of these are fatal for the unit being assembled: the data is static,
/// so a retry cannot change the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// The dotted key is empty or contains an empty segment.
    #[error("malformed configuration key '{key}': {reason}")]
    MalformedKey { key: String, reason: &'static str },

    /// An insert had to descend through a value that is not a tree.
    #[error("cannot insert '{path}': '{segment}' holds a non-tree value")]
    PathConflict { path: String, segment: String },

    /// A subtract had to descend through structure that was never created.
    #[error("the configuration key {path} does not exist")]
    PathNotFound { path: String },
}

impl OverlayError {
    /// The offending key path (or raw key, for malformed keys).
    pub fn path(&self) -> &str {
        match self {
            Self::MalformedKey { key, .. } => key,
            Self::PathConflict { path, .. } => path,
            Self::PathNotFound { path } => path,
        }
    }
}

/// An overlay failure attributed to the unit whose assembly it aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("assembling {unit}: {source}")]
pub struct AssemblyError {
    /// Identifier of the unit (e.g. `role/job`).
    pub unit: String,
    #[source]
    pub source: OverlayError,
}

impl AssemblyError {
    pub fn new(unit: impl Into<String>, source: OverlayError) -> Self {
        Self {
            unit: unit.into(),
            source,
        }
    }
}
