//! Error types
//!
//! Only envelope-level problems are errors. Individual malformed records are
//! absorbed by the tree builder and never surface here.

use std::process::ExitStatus;
use thiserror::Error;

/// Failures of the export-to-tree transform.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The document is not a `[major, minor, metadata, root]` array.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Failed to decode scanner output as JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures while running the external scanner.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("'{0}' command not found. Please install it (e.g., sudo apt install ncdu) or ensure it's in your PATH")]
    NotInstalled(String),

    #[error("Failed to start scanner: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Scanner exited with {status}")]
    Failed { status: ExitStatus },

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Scan timed out after {0}s")]
    TimedOut(u64),
}

/// Top-level error returned by CLI commands.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
