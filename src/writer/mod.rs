//! JSON job-config writer
//!
//! Writes one `<output>/<role>/<job>.json` per deployable unit. Each file
//! wraps the unit's assembled properties in the fixed job scaffold the
//! deployment runtime expects.

mod summary;

pub use summary::{
    properties_digest, WriteSummary, WrittenConfig, WRITE_SUMMARY_FILE,
    WRITE_SUMMARY_SCHEMA_ID, WRITE_SUMMARY_SCHEMA_VERSION,
};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use configstore_manifest::{ManifestError, Role, RoleManifest};
use configstore_overlay::{Assembler, AssemblyError, OpinionSource, PropertyTree};

/// File extension of job configs
pub const JOB_CONFIG_EXTENSION: &str = "json";

/// Indentation used in job configs
pub const JOB_CONFIG_INDENT: &[u8] = b"    ";

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("JSON canonicalization failed: {0}")]
    Canonicalize(String),
}

impl WriterError {
    fn io(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.display().to_string();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}

/// The job scaffold around a unit's properties.
pub fn job_config(role: &Role, properties: PropertyTree) -> Value {
    let templates: Vec<Value> = role
        .jobs
        .iter()
        .map(|job| json!({ "name": job.name }))
        .collect();

    json!({
        "job": {
            "name": role.name,
            "templates": templates
        },
        "parameters": {},
        "properties": properties,
        "networks": {
            "default": {}
        }
    })
}

/// Serialize with the job-config indentation.
pub fn to_indented_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JOB_CONFIG_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

/// Path of the config file for `role`/`job` under `output_dir`.
pub fn job_config_path(output_dir: &Path, role: &str, job: &str) -> PathBuf {
    output_dir
        .join(role)
        .join(format!("{}.{}", job, JOB_CONFIG_EXTENSION))
}

/// Writes job configs for every unit of a manifest.
#[derive(Debug, Clone, Default)]
pub struct JsonConfigWriter {
    write_summary: bool,
}

impl JsonConfigWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also write `summary.json` into the output directory.
    pub fn with_summary(mut self, write_summary: bool) -> Self {
        self.write_summary = write_summary;
        self
    }

    /// Replace `output_dir` with freshly assembled job configs.
    ///
    /// Stops at the first failing unit.
    pub fn write_configs<S: OpinionSource>(
        &self,
        manifest: &RoleManifest,
        assembler: &Assembler<'_, S>,
        output_dir: &Path,
    ) -> Result<WriteSummary, WriterError> {
        if output_dir.exists() {
            warn!(path = %output_dir.display(), "removing existing output directory");
            fs::remove_dir_all(output_dir).map_err(WriterError::io("removing", output_dir))?;
        }

        let mut summary = WriteSummary::new(output_dir);

        for role in &manifest.roles {
            let role_dir = output_dir.join(&role.name);
            fs::create_dir_all(&role_dir).map_err(WriterError::io("creating", &role_dir))?;

            for role_job in &role.jobs {
                let Some(unit) = manifest.unit(&role.name, &role_job.name)? else {
                    continue;
                };
                let properties = assembler.assemble(&unit.declaration())?;
                let digest = properties_digest(&properties)?;
                let top_level_keys = properties.len();

                let path = job_config_path(output_dir, &role.name, &role_job.name);
                let bytes = to_indented_json(&job_config(role, properties))?;
                fs::write(&path, bytes).map_err(WriterError::io("writing", &path))?;

                info!(unit = %unit.id(), path = %path.display(), "wrote job config");
                summary.configs.push(WrittenConfig {
                    role: role.name.clone(),
                    job: role_job.name.clone(),
                    path: path.display().to_string(),
                    properties_sha256: digest,
                    top_level_keys,
                });
            }
        }

        if self.write_summary {
            let path = output_dir.join(WRITE_SUMMARY_FILE);
            summary
                .write_to_file(&path)
                .map_err(WriterError::io("writing", &path))?;
        }

        Ok(summary)
    }
}
