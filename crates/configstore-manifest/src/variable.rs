//! Configuration variables exposed to the deployment runtime.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kind of value an upstream generator produces for a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorType {
    Password,
    Ssh,
    Certificate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generator {
    #[serde(rename = "type")]
    pub kind: GeneratorType,
}

/// A named variable with an optional default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub secret: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<Generator>,
}

impl Variable {
    /// Resolve the value: an entry in `defaults` wins over the declared default.
    pub fn value(&self, defaults: &BTreeMap<String, String>) -> Option<String> {
        defaults
            .get(&self.name)
            .cloned()
            .or_else(|| self.default.clone())
    }

    /// Secrets produced by a password generator never get a default value.
    pub fn is_generated_password(&self) -> bool {
        self.secret
            && matches!(
                self.generator,
                Some(Generator {
                    kind: GeneratorType::Password
                })
            )
    }
}
