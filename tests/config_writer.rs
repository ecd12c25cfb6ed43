//! End-to-end job config generation from the fixture manifest and opinions.

mod fixtures;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use configstore::writer::{job_config_path, WRITE_SUMMARY_FILE, WRITE_SUMMARY_SCHEMA_ID};
use configstore::{values, ConfigStoreError, JsonConfigWriter, Workspace};
use configstore_overlay::OverlayError;
use serde_json::{json, Value};
use tempfile::TempDir;

fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_workspace_loads_fixtures() {
    let tmp = TempDir::new().unwrap();
    let config = fixtures::fixture_config(&tmp.path().join("out"));
    let workspace = Workspace::load(&config).unwrap();

    assert_eq!(workspace.manifest.roles.len(), 3);
    assert_eq!(workspace.opinions.light["nats"]["user"], "nats_user");
    // every property of every role job is present in the base tree
    assert_eq!(workspace.base["cc"]["db"]["port"], Value::Null);
    assert_eq!(workspace.base["router"]["ssl"], Value::Null);
}

#[test]
fn test_show_unit_properties() {
    let tmp = TempDir::new().unwrap();
    let workspace = Workspace::load(&fixtures::fixture_config(tmp.path())).unwrap();

    let api = workspace.assemble_unit("api", "cloud_controller").unwrap();
    assert_eq!(
        Value::Object(api),
        json!({
            "cc": {
                "db": {"host": "db.internal", "port": 5524},
                "logging": {"level": "info"}
            },
            "nats": {"machines": ["10.0.0.5"], "port": null, "user": "nats_user"},
            "router": {"port": null, "ssl": {"enabled": true}}
        })
    );

    let nats = workspace.assemble_unit("nats", "nats").unwrap();
    assert_eq!(nats["nats"]["port"], 4222);
    assert!(nats["nats"].get("password").is_none());
    assert_eq!(nats["cc"]["db"]["port"], Value::Null);
}

#[test]
fn test_unknown_unit() {
    let tmp = TempDir::new().unwrap();
    let workspace = Workspace::load(&fixtures::fixture_config(tmp.path())).unwrap();

    let err = workspace.assemble_unit("api", "nats").unwrap_err();
    assert!(matches!(err, ConfigStoreError::UnknownUnit { .. }));
}

#[test]
fn test_write_configs() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("configs");
    fs::create_dir_all(out.join("stale")).unwrap();
    fs::write(out.join("stale/old.json"), "{}").unwrap();

    let config = fixtures::fixture_config(&out);
    let workspace = Workspace::load(&config).unwrap();
    let summary = JsonConfigWriter::new()
        .with_summary(true)
        .write_configs(&workspace.manifest, &workspace.assembler(), &config.output_dir())
        .unwrap();

    assert!(!out.join("stale").exists());
    assert_eq!(summary.configs.len(), 3);
    assert_eq!(summary.schema_id, WRITE_SUMMARY_SCHEMA_ID);

    let router_path = job_config_path(&out, "router", "gorouter");
    let router = read_json(&router_path);
    assert_eq!(router["job"]["name"], "router");
    assert_eq!(router["job"]["templates"], json!([{"name": "gorouter"}]));
    assert_eq!(router["parameters"], json!({}));
    assert_eq!(router["networks"], json!({"default": {}}));
    assert_eq!(router["properties"]["router"]["port"], 80);
    assert_eq!(router["properties"]["router"]["ssl"], json!({"enabled": true}));

    let text = fs::read_to_string(&router_path).unwrap();
    assert!(text.contains("\n    \"properties\": {\n        \"cc\""));

    let written = read_json(&out.join(WRITE_SUMMARY_FILE));
    assert_eq!(written["configs"].as_array().unwrap().len(), 3);
}

#[test]
fn test_digests_match_properties() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("configs");
    let config = fixtures::fixture_config(&out);
    let workspace = Workspace::load(&config).unwrap();

    let summary = JsonConfigWriter::new()
        .write_configs(&workspace.manifest, &workspace.assembler(), &out)
        .unwrap();
    assert!(!out.join(WRITE_SUMMARY_FILE).exists());

    for entry in &summary.configs {
        let properties = workspace.assemble_unit(&entry.role, &entry.job).unwrap();
        assert_eq!(
            entry.properties_sha256,
            configstore::writer::properties_digest(&properties).unwrap()
        );
    }
}

#[test]
fn test_dark_opinion_on_unplaced_job_fails_loudly() {
    let tmp = TempDir::new().unwrap();
    let manifest = tmp.path().join("role-manifest.yml");
    fs::write(
        &manifest,
        r#"
releases:
  - name: uaa
    jobs:
      - name: uaa
        properties:
          - name: uaa.port
            default: 8080
      - name: uaa_db
        properties:
          - name: uaadb.password
roles:
  - name: uaa
    jobs:
      - name: uaa
        release_name: uaa
"#,
    )
    .unwrap();
    let light = tmp.path().join("light.yml");
    fs::write(&light, "properties: {}\n").unwrap();
    let dark = tmp.path().join("dark.yml");
    fs::write(&dark, "properties:\n  uaadb:\n    password: ~\n").unwrap();

    let overrides = json!({
        "manifest": manifest.to_string_lossy(),
        "opinions": {"light": light.to_string_lossy(), "dark": dark.to_string_lossy()},
        "output": {"dir": tmp.path().join("out").to_string_lossy()}
    });
    let config = configstore::EffectiveConfig::build(None, Some(overrides)).unwrap();
    let workspace = Workspace::load(&config).unwrap();

    let err = JsonConfigWriter::new()
        .write_configs(&workspace.manifest, &workspace.assembler(), &config.output_dir())
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("uaa/uaa"), "{}", message);

    match err {
        configstore::writer::WriterError::Assembly(assembly) => assert_eq!(
            assembly.source,
            OverlayError::PathNotFound {
                path: "uaadb.password".to_string()
            }
        ),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_chart_values_from_fixture() {
    let tmp = TempDir::new().unwrap();
    let workspace = Workspace::load(&fixtures::fixture_config(tmp.path())).unwrap();

    let mut defaults = BTreeMap::new();
    defaults.insert("LOG_HOST".to_string(), "syslog.internal".to_string());
    let chart = values::make_values(&workspace.manifest, &defaults);

    assert_eq!(
        chart["env"],
        json!({"DOMAIN": "cf.example.com", "LOG_HOST": "syslog.internal"})
    );
    assert_eq!(chart["kube"]["storage_class"]["persistent"], "persistent");
}
