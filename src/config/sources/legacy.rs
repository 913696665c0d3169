//! Environment variables honored for compatibility with earlier releases.
//!
//! `NCDU_PORT` overrides the server port and `IS_DOCKER_CONTAINER=true`
//! suppresses opening a browser. Both win over every other source.

use crate::config::DisktreeConfig;
use tracing::warn;

pub const PORT_VAR: &str = "NCDU_PORT";
pub const CONTAINER_VAR: &str = "IS_DOCKER_CONTAINER";

/// Apply legacy overrides using `lookup` to read variables.
pub fn apply<F>(mut config: DisktreeConfig, lookup: F) -> DisktreeConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup(PORT_VAR).filter(|p| !p.is_empty()) {
        match port.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(value = %port, "Ignoring invalid {}", PORT_VAR),
        }
    }
    if lookup(CONTAINER_VAR).as_deref() == Some("true") {
        config.server.open_browser = false;
    }
    config
}
