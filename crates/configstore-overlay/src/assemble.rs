//! Per-unit property tree assembly.
//!
//! For one deployable unit the final tree is built in three passes over a
//! private copy of the base tree:
//! 1. the unit's declared property defaults are inserted
//! 2. for each unique config key, the light opinion (if any) is inserted
//! 3. immediately after, the dark opinion (if any) for that same key is subtracted
//!
//! Light always precedes dark for a key, so a dark opinion can retract what a
//! default or light opinion introduced, never the other way round.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{AssemblyError, OverlayError};
use crate::insert::insert;
use crate::key::KeyPath;
use crate::opinions::{Layer, OpinionSource, Opinions};
use crate::subtract::subtract;
use crate::tree::{deep_copy, PropertyTree};

/// A property a unit declares, with its default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefault {
    /// Dotted property name.
    pub name: String,
    /// Default value; `null` when the declaration has none.
    #[serde(default)]
    pub default: Value,
}

impl PropertyDefault {
    pub fn new(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }
}

/// Read-only description of what a unit contributes to its own tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitDeclaration {
    /// Identifier used in diagnostics (e.g. `role/job`).
    pub id: String,
    /// Properties owned by the unit, inserted in order.
    #[serde(default)]
    pub properties: Vec<PropertyDefault>,
    /// Globally unique config keys to look up in the opinion layers.
    #[serde(default)]
    pub unique_keys: Vec<String>,
}

/// Builds per-unit trees from a shared base tree and opinion layers.
///
/// Holds only shared references, so one assembler may serve any number of
/// units; each call works on its own copy of the base tree.
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a, S: OpinionSource = Opinions> {
    base: &'a PropertyTree,
    opinions: &'a S,
}

impl<'a, S: OpinionSource> Assembler<'a, S> {
    pub fn new(base: &'a PropertyTree, opinions: &'a S) -> Self {
        Self { base, opinions }
    }

    /// Produce the final property tree for `unit`.
    ///
    /// The first failure aborts the unit; no partial tree is returned.
    pub fn assemble(&self, unit: &UnitDeclaration) -> Result<PropertyTree, AssemblyError> {
        let span = tracing::debug_span!("assemble", unit = %unit.id);
        let _guard = span.enter();

        self.build(unit)
            .map_err(|source| AssemblyError::new(unit.id.clone(), source))
    }

    fn build(&self, unit: &UnitDeclaration) -> Result<PropertyTree, OverlayError> {
        let mut result = deep_copy(self.base);

        for property in &unit.properties {
            let path = KeyPath::resolve(&property.name)?;
            trace!(key = %path, "inserting declared default");
            insert(&mut result, &path, property.default.clone())?;
        }

        for key in &unit.unique_keys {
            let path = KeyPath::resolve(key)?;

            if let Some(light) = self.opinions.lookup(Layer::Light, &path) {
                debug!(key = %path, "applying light opinion");
                insert(&mut result, &path, light.clone())?;
            }

            if let Some(dark) = self.opinions.lookup(Layer::Dark, &path) {
                debug!(key = %path, "applying dark opinion");
                subtract(&mut result, &path, dark)?;
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    fn tree(value: Value) -> PropertyTree {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    fn unit(properties: &[(&str, Value)], keys: &[&str]) -> UnitDeclaration {
        UnitDeclaration {
            id: "role/job".to_string(),
            properties: properties
                .iter()
                .map(|(name, default)| PropertyDefault::new(*name, default.clone()))
                .collect(),
            unique_keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Opinion source that records every lookup it serves.
    struct RecordingSource {
        inner: Opinions,
        calls: RefCell<Vec<(Layer, String)>>,
    }

    impl OpinionSource for RecordingSource {
        fn lookup(&self, layer: Layer, path: &KeyPath) -> Option<&Value> {
            self.calls.borrow_mut().push((layer, path.to_string()));
            self.inner.lookup(layer, path)
        }
    }

    #[test]
    fn test_defaults_are_inserted() {
        let base = PropertyTree::new();
        let opinions = Opinions::default();
        let assembler = Assembler::new(&base, &opinions);

        let result = assembler
            .assemble(&unit(&[("nats.port", json!(4222)), ("nats.user", json!(null))], &[]))
            .unwrap();
        assert_eq!(
            Value::Object(result),
            json!({"nats": {"port": 4222, "user": null}})
        );
    }

    #[test]
    fn test_light_overrides_default_then_dark_trims() {
        let base = PropertyTree::new();
        let opinions = Opinions::new(
            tree(json!({"cc": {"db": {"user": "admin", "password": "pw", "port": 5524}}})),
            tree(json!({"cc": {"db": {"password": "~"}}})),
        );
        let assembler = Assembler::new(&base, &opinions);

        let result = assembler
            .assemble(&unit(&[("cc.db", json!({"port": 1}))], &["cc.db"]))
            .unwrap();
        assert_eq!(
            Value::Object(result),
            json!({"cc": {"db": {"user": "admin", "port": 5524}}})
        );
    }

    #[test]
    fn test_dark_removes_what_light_inserted() {
        let base = PropertyTree::new();
        let opinions = Opinions::new(
            tree(json!({"a": {"b": 1}})),
            tree(json!({"a": {"b": "gone"}})),
        );
        let assembler = Assembler::new(&base, &opinions);

        let result = assembler.assemble(&unit(&[], &["a.b"])).unwrap();
        assert_eq!(Value::Object(result), json!({"a": {}}));
    }

    #[test]
    fn test_null_opinions_are_applied() {
        let base = PropertyTree::new();
        let opinions = Opinions::new(
            tree(json!({"nats": {"user": null}, "cc": {"secret": "s"}})),
            tree(json!({"cc": {"secret": null}})),
        );
        let assembler = Assembler::new(&base, &opinions);

        let result = assembler
            .assemble(&unit(
                &[("nats.user", json!("admin")), ("cc.secret", json!("d"))],
                &["nats.user", "cc.secret"],
            ))
            .unwrap();
        assert_eq!(
            Value::Object(result),
            json!({"nats": {"user": null}, "cc": {}})
        );
    }

    #[test]
    fn test_light_looked_up_before_dark_for_each_key() {
        let base = PropertyTree::new();
        let source = RecordingSource {
            inner: Opinions::new(tree(json!({"a": 1, "b": 2})), tree(json!({"a": "x"}))),
            calls: RefCell::new(Vec::new()),
        };
        let assembler = Assembler::new(&base, &source);

        assembler.assemble(&unit(&[], &["a", "b"])).unwrap();

        assert_eq!(
            source.calls.into_inner(),
            vec![
                (Layer::Light, "a".to_string()),
                (Layer::Dark, "a".to_string()),
                (Layer::Light, "b".to_string()),
                (Layer::Dark, "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_opinions_leave_defaults() {
        let base = tree(json!({"global": true}));
        let opinions = Opinions::new(tree(json!({"other": 1})), tree(json!({"other": 1})));
        let assembler = Assembler::new(&base, &opinions);

        let result = assembler
            .assemble(&unit(&[("log.level", json!("info"))], &["log.level"]))
            .unwrap();
        assert_eq!(
            Value::Object(result),
            json!({"global": true, "log": {"level": "info"}})
        );
    }

    #[test]
    fn test_units_do_not_share_state() {
        let base = tree(json!({"shared": {"x": 1}}));
        let opinions = Opinions::new(PropertyTree::new(), tree(json!({"shared": {"x": "~"}})));
        let assembler = Assembler::new(&base, &opinions);

        let mut first = assembler.assemble(&unit(&[("only.first", json!(1))], &[])).unwrap();
        let second = assembler.assemble(&unit(&[], &["shared"])).unwrap();

        first["shared"]["x"] = json!(99);

        assert_eq!(Value::Object(base.clone()), json!({"shared": {"x": 1}}));
        assert_eq!(Value::Object(second), json!({"shared": {}}));
        assert!(!first.is_empty());
        assert_eq!(first["only"]["first"], 1);
    }

    #[test]
    fn test_error_aborts_with_unit_id() {
        let base = PropertyTree::new();
        let opinions = Opinions::new(PropertyTree::new(), tree(json!({"a": {"b": "x"}})));
        let assembler = Assembler::new(&base, &opinions);

        let err = assembler.assemble(&unit(&[], &["a.b"])).unwrap_err();
        assert_eq!(err.unit, "role/job");
        assert_eq!(
            err.source,
            OverlayError::PathNotFound {
                path: "a.b".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_key_aborts() {
        let base = PropertyTree::new();
        let opinions = Opinions::default();
        let assembler = Assembler::new(&base, &opinions);

        let err = assembler.assemble(&unit(&[("a..b", json!(1))], &[])).unwrap_err();
        assert!(matches!(err.source, OverlayError::MalformedKey { .. }));
    }
}
