//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::paths::xdg_root;
use super::DisktreeConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file, an optional explicit file and
    /// the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<DisktreeConfig, ApiError> {
        let global = xdg_root::global_config_path().ok();
        let config = MergeService::load(global.as_deref(), explicit)?;
        config.validate().map_err(ApiError::ConfigError)?;
        Ok(config)
    }

    /// Create default configuration.
    pub fn default() -> DisktreeConfig {
        DisktreeConfig::default()
    }
}
