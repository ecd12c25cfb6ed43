//! Light (additions) and dark (subtractions) opinion layers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::key::KeyPath;
use crate::tree::PropertyTree;

/// Which opinion layer to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Values inserted into a unit's tree.
    Light,
    /// Values subtracted from a unit's tree.
    Dark,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Light => write!(f, "light"),
            Layer::Dark => write!(f, "dark"),
        }
    }
}

/// Anything that can answer "what does this layer say about this key".
pub trait OpinionSource {
    /// The opinion stored at `path`, or `None` when the layer has none.
    fn lookup(&self, layer: Layer, path: &KeyPath) -> Option<&Value>;
}

/// The pair of opinion trees loaded for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Opinions {
    pub light: PropertyTree,
    pub dark: PropertyTree,
}

impl Opinions {
    pub fn new(light: PropertyTree, dark: PropertyTree) -> Self {
        Self { light, dark }
    }

    pub fn layer(&self, layer: Layer) -> &PropertyTree {
        match layer {
            Layer::Light => &self.light,
            Layer::Dark => &self.dark,
        }
    }
}

impl OpinionSource for Opinions {
    fn lookup(&self, layer: Layer, path: &KeyPath) -> Option<&Value> {
        lookup_in(self.layer(layer), path)
    }
}

/// Walk `tree` along `path`; any missing segment means "no opinion".
pub fn lookup_in<'a>(tree: &'a PropertyTree, path: &KeyPath) -> Option<&'a Value> {
    let mut current = tree;
    for segment in path.parents() {
        current = match current.get(segment)? {
            Value::Object(child) => child,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
                return None
            }
        };
    }
    current.get(path.leaf())
}
