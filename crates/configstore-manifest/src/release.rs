//! Releases and the jobs (with property declarations) they ship.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use configstore_overlay::PropertyDefault;

/// A property declared in a job spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProperty {
    /// Dotted property name.
    pub name: String,
    /// Default value (null when the job declares none).
    #[serde(default)]
    pub default: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JobProperty {
    pub fn to_default(&self) -> PropertyDefault {
        PropertyDefault::new(self.name.clone(), self.default.clone())
    }
}

/// A job shipped by a release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<JobProperty>,
}

/// A configuration key declared by at least one job of a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueConfig {
    pub name: String,
    /// First non-empty description seen across the declaring jobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Names of the jobs declaring this key, in declaration order.
    pub jobs: Vec<String>,
}

/// A release: a named collection of jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub name: String,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl Release {
    pub fn job(&self, name: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.name == name)
    }

    /// Every property name declared by any job of this release, deduplicated
    /// and ordered by name.
    pub fn unique_configs(&self) -> BTreeMap<String, UniqueConfig> {
        let mut configs: BTreeMap<String, UniqueConfig> = BTreeMap::new();

        for job in &self.jobs {
            for property in &job.properties {
                let entry = configs
                    .entry(property.name.clone())
                    .or_insert_with(|| UniqueConfig {
                        name: property.name.clone(),
                        description: None,
                        jobs: Vec::new(),
                    });

                if entry.description.is_none() {
                    entry.description = property
                        .description
                        .clone()
                        .filter(|d| !d.trim().is_empty());
                }
                if !entry.jobs.contains(&job.name) {
                    entry.jobs.push(job.name.clone());
                }
            }
        }

        configs
    }

    /// Names from [`Release::unique_configs`], in order.
    pub fn unique_config_names(&self) -> Vec<String> {
        self.unique_configs().into_keys().collect()
    }
}
