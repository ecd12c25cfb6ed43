//! Role manifest model.
//!
//! A role manifest names the releases in play (each shipping jobs that
//! declare properties with defaults), the roles built from those jobs, and
//! the variables exposed to the deployment runtime. Every (role, job) pair
//! is one deployable unit.

mod error;
mod release;
mod variable;

pub use error::ManifestError;
pub use release::{Job, JobProperty, Release, UniqueConfig};
pub use variable::{Generator, GeneratorType, Variable};

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use configstore_overlay::{insert, KeyPath, OverlayError, PropertyTree, UnitDeclaration};

/// A job placed in a role, referencing the release that ships it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleJob {
    pub name: String,
    pub release_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub jobs: Vec<RoleJob>,
}

/// One (role, job) pair with the release job it resolves to.
#[derive(Debug, Clone, Copy)]
pub struct Unit<'a> {
    pub role: &'a Role,
    pub job: &'a Job,
    pub release: &'a Release,
}

impl Unit<'_> {
    /// `role/job`, used to identify the unit in diagnostics.
    pub fn id(&self) -> String {
        format!("{}/{}", self.role.name, self.job.name)
    }

    /// What the overlay engine needs to assemble this unit.
    pub fn declaration(&self) -> UnitDeclaration {
        UnitDeclaration {
            id: self.id(),
            properties: self.job.properties.iter().map(JobProperty::to_default).collect(),
            unique_keys: self.release.unique_config_names(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleManifest {
    #[serde(default)]
    pub releases: Vec<Release>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl RoleManifest {
    /// Load and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "loaded role manifest");
        Self::from_yaml(&contents)
    }

    /// Parse and validate a manifest document.
    pub fn from_yaml(contents: &str) -> Result<Self, ManifestError> {
        let manifest: RoleManifest = serde_yaml::from_str(contents)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check role names are unique and every role job resolves.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut seen = HashSet::new();
        for role in &self.roles {
            if !seen.insert(role.name.as_str()) {
                return Err(ManifestError::DuplicateRole(role.name.clone()));
            }
            for role_job in &role.jobs {
                self.resolve(role, role_job)?;
            }
        }
        Ok(())
    }

    pub fn release(&self, name: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.name == name)
    }

    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.name == name)
    }

    /// Every deployable unit, in role then job order.
    pub fn units(&self) -> Result<Vec<Unit<'_>>, ManifestError> {
        let mut units = Vec::new();
        for role in &self.roles {
            for role_job in &role.jobs {
                units.push(self.resolve(role, role_job)?);
            }
        }
        Ok(units)
    }

    /// The unit for `role_name`/`job_name`, if both exist.
    pub fn unit(&self, role_name: &str, job_name: &str) -> Result<Option<Unit<'_>>, ManifestError> {
        let Some(role) = self.role(role_name) else {
            return Ok(None);
        };
        match role.jobs.iter().find(|j| j.name == job_name) {
            Some(role_job) => self.resolve(role, role_job).map(Some),
            None => Ok(None),
        }
    }

    /// The tree every unit starts from: each property of every role job,
    /// present with a null value.
    ///
    /// Having every key present lets a dark opinion address a key the unit's
    /// own job does not declare.
    pub fn base_tree(&self) -> Result<PropertyTree, OverlayError> {
        let mut tree = PropertyTree::new();
        for role in &self.roles {
            for role_job in &role.jobs {
                let Some(job) = self
                    .release(&role_job.release_name)
                    .and_then(|r| r.job(&role_job.name))
                else {
                    continue;
                };
                for property in &job.properties {
                    insert(&mut tree, &KeyPath::resolve(&property.name)?, serde_json::Value::Null)?;
                }
            }
        }
        Ok(tree)
    }

    /// Engine declarations for every unit.
    pub fn unit_declarations(&self) -> Result<Vec<UnitDeclaration>, ManifestError> {
        Ok(self.units()?.iter().map(Unit::declaration).collect())
    }

    fn resolve<'a>(&'a self, role: &'a Role, role_job: &RoleJob) -> Result<Unit<'a>, ManifestError> {
        let release = self
            .release(&role_job.release_name)
            .ok_or_else(|| ManifestError::UnknownRelease {
                role: role.name.clone(),
                release: role_job.release_name.clone(),
            })?;
        let job = release
            .job(&role_job.name)
            .ok_or_else(|| ManifestError::UnknownJob {
                role: role.name.clone(),
                job: role_job.name.clone(),
                release: release.name.clone(),
            })?;
        Ok(Unit { role, job, release })
    }
}
