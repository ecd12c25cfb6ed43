//! Write summary (summary.json)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

use configstore_overlay::PropertyTree;

use super::WriterError;

/// Schema version for summary.json
pub const WRITE_SUMMARY_SCHEMA_VERSION: u32 = 1;

/// Schema identifier for summary.json
pub const WRITE_SUMMARY_SCHEMA_ID: &str = "configstore/write_summary@1";

/// File name of the summary inside the output directory
pub const WRITE_SUMMARY_FILE: &str = "summary.json";

/// One job config written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenConfig {
    pub role: String,
    pub job: String,

    /// Path of the written file
    pub path: String,

    /// SHA-256 of the RFC 8785 canonical form of the properties tree
    pub properties_sha256: String,

    /// Number of top-level property keys
    pub top_level_keys: usize,
}

/// Summary of a config-writing pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteSummary {
    pub schema_version: u32,
    pub schema_id: String,
    pub created_at: DateTime<Utc>,
    pub output_dir: String,
    pub configs: Vec<WrittenConfig>,
}

impl WriteSummary {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            schema_version: WRITE_SUMMARY_SCHEMA_VERSION,
            schema_id: WRITE_SUMMARY_SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            output_dir: output_dir.display().to_string(),
            configs: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("JSON error: {}", e))
        })?;
        fs::write(path, json)
    }

    /// Human-readable listing, one line per config
    pub fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Wrote {} job config(s) to {}",
            self.configs.len(),
            self.output_dir
        )];
        for config in &self.configs {
            lines.push(format!(
                "  {}/{}  {}  {}",
                config.role,
                config.job,
                &config.properties_sha256[..12.min(config.properties_sha256.len())],
                config.path
            ));
        }
        lines.join("\n")
    }
}

/// SHA-256 hex digest of the canonical JSON form of `properties`
///
/// Key order and formatting do not affect the digest.
pub fn properties_digest(properties: &PropertyTree) -> Result<String, WriterError> {
    let jcs_bytes = serde_json_canonicalizer::to_vec(properties)
        .map_err(|e| WriterError::Canonicalize(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&jcs_bytes);
    Ok(hex::encode(hasher.finalize()))
}
