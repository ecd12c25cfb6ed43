//! Inserting values at key paths.

use serde_json::{Map, Value};

use crate::error::OverlayError;
use crate::key::KeyPath;
use crate::tree::PropertyTree;

/// Set `value` at `path`, creating empty intermediate trees as needed.
///
/// The final segment is overwritten unconditionally (last write wins, no
/// merging). Descending through an existing scalar or sequence fails with
/// [`OverlayError::PathConflict`].
pub fn insert(tree: &mut PropertyTree, path: &KeyPath, value: Value) -> Result<(), OverlayError> {
    let mut current = tree;
    for segment in path.parents() {
        let entry = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match entry {
            Value::Object(child) => child,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
                return Err(OverlayError::PathConflict {
                    path: path.to_string(),
                    segment: segment.clone(),
                });
            }
        };
    }

    current.insert(path.leaf().to_string(), value);
    Ok(())
}
