//! Loading light and dark opinion files.
//!
//! Each file is a YAML document whose top-level `properties` mapping is the
//! opinion tree for that layer.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use configstore_overlay::{Layer, Opinions, PropertyTree};

/// Top-level key holding the opinion tree.
pub const PROPERTIES_KEY: &str = "properties";

#[derive(Debug, Error)]
pub enum OpinionsError {
    #[error("failed to read {layer} opinions {path}: {source}")]
    Io {
        layer: Layer,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {layer} opinions {path}: {source}")]
    Parse {
        layer: Layer,
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{layer} opinions {path}: {message}")]
    Shape {
        layer: Layer,
        path: String,
        message: &'static str,
    },
}

/// Load both opinion layers.
pub fn load_opinions(light: &Path, dark: &Path) -> Result<Opinions, OpinionsError> {
    Ok(Opinions::new(
        load_layer(Layer::Light, light)?,
        load_layer(Layer::Dark, dark)?,
    ))
}

/// Load one opinion layer from a file.
pub fn load_layer(layer: Layer, path: &Path) -> Result<PropertyTree, OpinionsError> {
    let origin = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|source| OpinionsError::Io {
        layer,
        path: origin.clone(),
        source,
    })?;

    let tree = parse_layer(layer, &origin, &contents)?;
    debug!(%layer, path = %origin, keys = tree.len(), "loaded opinions");
    Ok(tree)
}

/// Parse an opinion document; `origin` names it in errors.
pub fn parse_layer(layer: Layer, origin: &str, contents: &str) -> Result<PropertyTree, OpinionsError> {
    let shape_error = |message| OpinionsError::Shape {
        layer,
        path: origin.to_string(),
        message,
    };

    if contents.trim().is_empty() {
        return Ok(PropertyTree::new());
    }

    let document: Value = serde_yaml::from_str(contents).map_err(|source| OpinionsError::Parse {
        layer,
        path: origin.to_string(),
        source,
    })?;

    let mut root = match document {
        // A document holding only comments
        Value::Null => return Ok(PropertyTree::new()),
        Value::Object(map) => map,
        _ => return Err(shape_error("document is not a mapping")),
    };

    match root.remove(PROPERTIES_KEY) {
        None | Some(Value::Null) => Ok(PropertyTree::new()),
        Some(Value::Object(properties)) => Ok(properties),
        Some(_) => Err(shape_error("'properties' is not a mapping")),
    }
}
