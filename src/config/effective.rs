//! Effective configuration with provenance
//!
//! Captures the merged settings plus where each contributing layer came from.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Project,
    Cli,
}

/// A contributing config source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Merged tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// The merged configuration object
    pub config: Value,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

/// Keys holding paths that must not be empty
const REQUIRED_PATHS: &[&str] = &["manifest", "opinions.light", "opinions.dark", "output.dir"];

impl EffectiveConfig {
    /// Build effective config from layers
    ///
    /// A project config path that does not exist is skipped.
    pub fn build(
        project_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        if let Some(path) = project_config_path {
            if path.exists() {
                let (value, digest) = Self::load_toml_file(path)?;
                debug!(path = %path.display(), %digest, "loaded project config");
                layers.push(value);
                sources.push(ConfigSource {
                    origin: ConfigOrigin::Project,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
            }
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        Self::validate_config(&merged)?;

        Ok(Self {
            config: merged,
            sources,
        })
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        Ok((Self::toml_to_json(toml_value), digest))
    }

    /// Convert TOML Value to JSON Value
    fn toml_to_json(toml: toml::Value) -> Value {
        match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(i.into()),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => Value::Array(arr.into_iter().map(Self::toml_to_json).collect()),
            toml::Value::Table(table) => Value::Object(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::toml_to_json(v)))
                    .collect(),
            ),
        }
    }

    fn validate_config(config: &Value) -> Result<(), ConfigError> {
        for key in REQUIRED_PATHS {
            match lookup(config, key) {
                Some(Value::String(s)) if !s.trim().is_empty() => {}
                _ => {
                    return Err(ConfigError::ValidationError(format!(
                        "{} must be a non-empty path",
                        key
                    )))
                }
            }
        }

        if let Some(summary) = lookup(config, "output.summary") {
            if !summary.is_boolean() {
                return Err(ConfigError::ValidationError(
                    "output.summary must be a boolean".to_string(),
                ));
            }
        }

        match lookup(config, "values.defaults") {
            None => {}
            Some(Value::Object(map)) => {
                if let Some((key, _)) = map.iter().find(|(_, v)| !v.is_string()) {
                    return Err(ConfigError::ValidationError(format!(
                        "values.defaults.{} must be a string",
                        key
                    )));
                }
            }
            Some(_) => {
                return Err(ConfigError::ValidationError(
                    "values.defaults must be a table".to_string(),
                ))
            }
        }

        Ok(())
    }

    /// Get a config value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.config, path)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }

    fn get_path(&self, path: &str) -> PathBuf {
        PathBuf::from(self.get_str(path).unwrap_or_default())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.get_path("manifest")
    }

    pub fn light_opinions_path(&self) -> PathBuf {
        self.get_path("opinions.light")
    }

    pub fn dark_opinions_path(&self) -> PathBuf {
        self.get_path("opinions.dark")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.get_path("output.dir")
    }

    pub fn write_summary(&self) -> bool {
        self.get_bool("output.summary").unwrap_or(false)
    }

    /// Variable defaults used when rendering chart values
    pub fn values_defaults(&self) -> BTreeMap<String, String> {
        self.get("values.defaults")
            .and_then(|v| v.as_object())
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
