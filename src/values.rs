//! Chart values: variable defaults plus the fixed `kube` section.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use tracing::debug;

use configstore_manifest::RoleManifest;

/// Build the values tree for `manifest`.
///
/// Secret variables filled by a password generator are left out; every other
/// variable gets its resolved value, or null when it has none.
pub fn make_values(manifest: &RoleManifest, defaults: &BTreeMap<String, String>) -> Value {
    let mut env = Map::new();
    for variable in &manifest.variables {
        if variable.is_generated_password() {
            debug!(name = %variable.name, "skipping generated password");
            continue;
        }
        let value = variable.value(defaults).map_or(Value::Null, Value::String);
        env.insert(variable.name.clone(), value);
    }

    json!({
        "env": env,
        "kube": {
            "external_ip": "192.168.77.77",
            "storage_class": {
                "persistent": "persistent",
                "shared": "shared"
            }
        }
    })
}

/// Render values as YAML.
///
/// Each `env` entry is preceded by its variable's description as comment
/// lines. serde_yaml has no comment support, so the `env` mapping is written
/// entry by entry and the remaining sections are serialized as one mapping.
pub fn to_yaml(manifest: &RoleManifest, values: &Value) -> Result<String, serde_yaml::Error> {
    let descriptions: BTreeMap<&str, &str> = manifest
        .variables
        .iter()
        .filter_map(|v| Some((v.name.as_str(), v.description.as_deref()?)))
        .collect();

    let mut rest = match values {
        Value::Object(map) => map.clone(),
        other => return serde_yaml::to_string(other),
    };

    let mut out = String::new();
    if let Some(env) = rest.remove("env") {
        match env {
            Value::Object(entries) if !entries.is_empty() => {
                out.push_str("env:\n");
                for (name, value) in entries {
                    if let Some(description) = descriptions.get(name.as_str()) {
                        for line in description.lines() {
                            out.push_str(format!("  # {}", line).trim_end());
                            out.push('\n');
                        }
                    }
                    let mut entry = Map::new();
                    entry.insert(name, value);
                    for line in serde_yaml::to_string(&entry)?.lines() {
                        out.push_str(&format!("  {}\n", line));
                    }
                }
            }
            other => {
                let mut entry = Map::new();
                entry.insert("env".to_string(), other);
                out.push_str(&serde_yaml::to_string(&entry)?);
            }
        }
    }

    if !rest.is_empty() {
        out.push_str(&serde_yaml::to_string(&rest)?);
    }
    Ok(out)
}
