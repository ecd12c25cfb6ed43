//! Property trees and deep copies of them.
//!
//! A property tree maps string keys to [`Value`]s. `Value` is a closed set of
//! variants, which the overlay code treats as three shapes:
//! - Scalar: `Null`, `Bool`, `Number`, `String`
//! - Tree: `Object`
//! - Sequence: `Array`

use serde_json::{Map, Value};

/// A nested key/value configuration tree.
pub type PropertyTree = Map<String, Value>;

/// Produce an independent copy of `tree`.
///
/// `Value` owns all of its children, so this is a structural copy: nested
/// trees and sequences are duplicated, and numbers keep their exact
/// representation (an integer stays an integer).
pub fn deep_copy(tree: &PropertyTree) -> PropertyTree {
    tree.clone()
}
