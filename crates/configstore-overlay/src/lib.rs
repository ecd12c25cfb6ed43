//! Configuration overlay engine.
//!
//! Property trees are addressed by dotted key paths. A unit's final tree is
//! a private copy of a shared base tree with the unit's defaults inserted and
//! light/dark opinions inserted and subtracted on top.

mod assemble;
mod error;
mod insert;
mod key;
mod opinions;
mod subtract;
mod tree;

pub use assemble::{Assembler, PropertyDefault, UnitDeclaration};
pub use error::{AssemblyError, OverlayError};
pub use insert::insert;
pub use key::{resolve, KeyPath, SEGMENT_DELIMITER};
pub use opinions::{lookup_in, Layer, OpinionSource, Opinions};
pub use subtract::subtract;
pub use tree::{deep_copy, PropertyTree};

/// Convert a JSON value into a property tree, if it is an object.
pub fn into_tree(value: serde_json::Value) -> Option<PropertyTree> {
    match value {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    }
}
