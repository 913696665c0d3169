//! disktree: ncdu export normalization
//!
//! Turns the nested JSON export of the `ncdu` disk-usage scanner into a typed,
//! size-aggregated tree of directories and files, and serves it to a
//! hierarchical visualization client.

pub mod browser;
pub mod config;
pub mod error;
pub mod logging;
pub mod scan;
pub mod server;
pub mod tooling;
pub mod tree;

pub use error::{ApiError, ScanError, TransformError};
pub use tree::{parse_root, Node, NodeKind};
