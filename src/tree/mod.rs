//! Export-to-tree transform
//!
//! Turns the positional JSON produced by `ncdu -o -` into a typed [`Node`]
//! tree with aggregated sizes and slash-joined paths.

pub mod builder;
pub mod envelope;
pub mod node;
pub mod path;
pub mod record;

pub use builder::{
    classify, parse_bytes, parse_root, TransformStats, TreeBuilder, DEFAULT_MAX_DEPTH,
    MAX_DEPTH_LIMIT,
};
pub use envelope::{decode_document, read_header, release, ScanHeader};
pub use node::{Node, NodeKind};
pub use path::build_path;
