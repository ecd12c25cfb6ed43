//! configstore - per-job configuration assembly
//!
//! Loads a role manifest and light/dark opinion files, assembles the final
//! property tree of every (role, job) unit with the overlay engine, and
//! writes the results as JSON job configs.

pub mod config;
pub mod error;
pub mod opinions;
pub mod values;
pub mod writer;

pub use config::EffectiveConfig;
pub use error::{ConfigStoreError, Result};
pub use opinions::{load_opinions, OpinionsError};
pub use writer::{JsonConfigWriter, WriteSummary};

pub use configstore_manifest::RoleManifest;
pub use configstore_overlay::{Assembler, Opinions, PropertyTree};

/// Inputs loaded once per run and shared read-only by every unit.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub manifest: RoleManifest,
    pub opinions: Opinions,
    /// Tree every unit starts from before its own defaults are applied.
    pub base: PropertyTree,
}

impl Workspace {
    /// Load the manifest and both opinion layers named by `config`.
    pub fn load(config: &EffectiveConfig) -> Result<Self> {
        let manifest = RoleManifest::load(&config.manifest_path())?;
        let opinions = load_opinions(&config.light_opinions_path(), &config.dark_opinions_path())?;
        let base = manifest.base_tree()?;
        Ok(Self {
            manifest,
            opinions,
            base,
        })
    }

    pub fn assembler(&self) -> Assembler<'_> {
        Assembler::new(&self.base, &self.opinions)
    }

    /// Assemble the property tree of a single unit.
    pub fn assemble_unit(&self, role: &str, job: &str) -> Result<PropertyTree> {
        let unit = self
            .manifest
            .unit(role, job)?
            .ok_or_else(|| ConfigStoreError::UnknownUnit {
                role: role.to_string(),
                job: job.to_string(),
            })?;
        Ok(self.assembler().assemble(&unit.declaration())?)
    }
}
