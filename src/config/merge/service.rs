//! MergeService: orchestrates sources, applies merge policy, deserializes to DisktreeConfig.

use crate::config::sources::{environment, file, legacy};
use crate::config::DisktreeConfig;
use config::{ConfigError, Map};
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from the standard sources and the process environment.
    /// Precedence: defaults (lowest) -> global file -> explicit file -> DISKTREE_* -> legacy vars (highest).
    pub fn load(global: Option<&Path>, explicit: Option<&Path>) -> Result<DisktreeConfig, ConfigError> {
        let config = Self::build(global, explicit, None)?;
        Ok(legacy::apply(config, |key| std::env::var(key).ok()))
    }

    /// Same as [`MergeService::load`] with an explicit variable map standing in
    /// for the process environment.
    pub fn load_with_vars(
        global: Option<&Path>,
        explicit: Option<&Path>,
        vars: Map<String, String>,
    ) -> Result<DisktreeConfig, ConfigError> {
        let config = Self::build(global, explicit, Some(vars.clone()))?;
        Ok(legacy::apply(config, |key| vars.get(key).cloned()))
    }

    fn build(
        global: Option<&Path>,
        explicit: Option<&Path>,
        vars: Option<Map<String, String>>,
    ) -> Result<DisktreeConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = file::add_global(builder, global);
        let builder = file::add_explicit(builder, explicit);
        let builder = environment::add_to_builder(builder, vars);

        let config = builder.build()?;
        config.try_deserialize()
    }
}
