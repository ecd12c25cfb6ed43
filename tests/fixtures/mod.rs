//! Test fixtures: a small role manifest with light and dark opinions.
//!
//! - `role-manifest.yml`: release `cf` with jobs `nats`, `gorouter`, `cloud_controller`
//! - `opinions.yml`: light opinions for those jobs
//! - `dark-opinions.yml`: dark opinions removing secrets and one nested leaf

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use configstore::config::EffectiveConfig;

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn manifest_path() -> PathBuf {
    fixture_path("role-manifest.yml")
}

pub fn light_opinions_path() -> PathBuf {
    fixture_path("opinions.yml")
}

pub fn dark_opinions_path() -> PathBuf {
    fixture_path("dark-opinions.yml")
}

/// Effective config pointing at the fixtures, writing into `output_dir`.
pub fn fixture_config(output_dir: &Path) -> EffectiveConfig {
    let overrides = serde_json::json!({
        "manifest": manifest_path().to_string_lossy(),
        "opinions": {
            "light": light_opinions_path().to_string_lossy(),
            "dark": dark_opinions_path().to_string_lossy()
        },
        "output": {
            "dir": output_dir.to_string_lossy()
        }
    });
    EffectiveConfig::build(None, Some(overrides)).expect("fixture config is valid")
}
