//! Built-in defaults (layer 1)

use serde::{Deserialize, Serialize};

/// Project config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "configstore.toml";

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Role manifest path (default: "role-manifest.yml")
    pub manifest: String,

    /// Light opinions file (default: "opinions.yml")
    pub light_opinions: String,

    /// Dark opinions file (default: "dark-opinions.yml")
    pub dark_opinions: String,

    /// Output directory for job configs (default: "configs")
    pub output_dir: String,

    /// Write summary.json next to the configs (default: false)
    pub write_summary: bool,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            manifest: "role-manifest.yml".to_string(),
            light_opinions: "opinions.yml".to_string(),
            dark_opinions: "dark-opinions.yml".to_string(),
            output_dir: "configs".to_string(),
            write_summary: false,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "manifest": self.manifest,
            "opinions": {
                "light": self.light_opinions,
                "dark": self.dark_opinions
            },
            "output": {
                "dir": self.output_dir,
                "summary": self.write_summary
            },
            "values": {
                "defaults": {}
            }
        })
    }
}
