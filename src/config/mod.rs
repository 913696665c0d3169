//! Configuration
//!
//! Layered configuration built with the `config` crate. Precedence, lowest to
//! highest: built-in defaults, global file, explicit `--config` file,
//! `DISKTREE_*` environment, legacy environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::tree::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisktreeConfig {
    pub scan: ScanConfig,
    pub server: ServerConfig,
    pub transform: TransformConfig,
    pub logging: LoggingConfig,
}

/// External scanner invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Scanner binary, looked up on PATH unless it contains a separator
    pub command: String,
    /// Pass `-x` (stay on one filesystem)
    pub one_file_system: bool,
    /// Pass `--exclude-kernfs`
    pub exclude_kernfs: bool,
    /// Extra arguments appended before the directory
    pub extra_args: Vec<String>,
    /// Abort the scan after this many seconds; 0 disables the deadline
    pub timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            command: "ncdu".to_string(),
            one_file_system: true,
            exclude_kernfs: true,
            extra_args: Vec::new(),
            timeout_secs: 0,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
    /// Re-run the scanner on every `/data` request instead of serving a snapshot
    pub rescan_on_request: bool,
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8810,
            open_browser: true,
            rescan_on_request: false,
            shutdown_grace_secs: 5,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn public_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

/// Transform limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub max_depth: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DisktreeConfig {
    /// Reject values that would only fail later at runtime.
    pub fn validate(&self) -> Result<(), String> {
        if self.scan.command.trim().is_empty() {
            return Err("scan.command cannot be empty".to_string());
        }
        if self.server.port == 0 {
            return Err("server.port must be between 1 and 65535".to_string());
        }
        if self.server.host.trim().is_empty() {
            return Err("server.host cannot be empty".to_string());
        }
        if self.transform.max_depth == 0 || self.transform.max_depth > MAX_DEPTH_LIMIT {
            return Err(format!(
                "transform.max_depth must be between 1 and {}",
                MAX_DEPTH_LIMIT
            ));
        }
        self.logging.validate()?;
        Ok(())
    }
}
