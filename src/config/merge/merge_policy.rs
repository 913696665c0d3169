//! Base layer of every configuration build: serialized built-in defaults.

use crate::config::DisktreeConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Start a builder whose lowest-precedence source is `DisktreeConfig::default()`.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&DisktreeConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}
