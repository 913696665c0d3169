//! Environment variable source: DISKTREE_ prefix with __ separator

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, Map};

pub const ENV_PREFIX: &str = "DISKTREE";

/// Add environment variable overlay to builder.
///
/// `DISKTREE_SERVER__PORT=9000` sets `server.port`. When `vars` is given it
/// replaces the process environment, which keeps tests hermetic.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    vars: Option<Map<String, String>>,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(vars),
    )
}
