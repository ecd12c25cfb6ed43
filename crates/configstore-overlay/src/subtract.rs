//! Removing values at key paths.
//!
//! The shape of the subtracted value selects the removal mode:
//! - a tree removes exactly the leaves it lists, recursively, keeping siblings
//! - anything else removes the whole entry, whatever it currently holds

use serde_json::Value;

use crate::error::OverlayError;
use crate::key::{KeyPath, SEGMENT_DELIMITER};
use crate::tree::PropertyTree;

/// Subtract `value` from the entry at `path`.
///
/// Intermediate segments are never created; an absent or non-tree
/// intermediate fails with [`OverlayError::PathNotFound`]. A partial
/// subtraction additionally requires every tree it descends into to exist.
pub fn subtract(tree: &mut PropertyTree, path: &KeyPath, value: &Value) -> Result<(), OverlayError> {
    let mut current = tree;
    for segment in path.parents() {
        current = match current.get_mut(segment) {
            Some(Value::Object(child)) => child,
            Some(_) | None => {
                return Err(OverlayError::PathNotFound {
                    path: path.to_string(),
                });
            }
        };
    }

    match value {
        Value::Object(difference) => match current.get_mut(path.leaf()) {
            Some(Value::Object(target)) => remove_listed(target, difference, &path.to_string()),
            Some(_) | None => Err(OverlayError::PathNotFound {
                path: path.to_string(),
            }),
        },
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
            current.remove(path.leaf());
            Ok(())
        }
    }
}

/// Remove every leaf named in `difference` from `target`.
fn remove_listed(
    target: &mut PropertyTree,
    difference: &PropertyTree,
    prefix: &str,
) -> Result<(), OverlayError> {
    for (key, value) in difference {
        match value {
            Value::Object(nested) => {
                let nested_path = format!("{}{}{}", prefix, SEGMENT_DELIMITER, key);
                match target.get_mut(key) {
                    Some(Value::Object(child)) => remove_listed(child, nested, &nested_path)?,
                    Some(_) | None => return Err(OverlayError::PathNotFound { path: nested_path }),
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
                target.remove(key);
            }
        }
    }
    Ok(())
}
