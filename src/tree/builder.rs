//! Tree builder
//!
//! Walks an ncdu export top-down and produces an owned [`Node`] tree. Records
//! that match neither the directory nor the file shape are dropped together
//! with their subtree and contribute nothing to their parent's size.

use super::envelope;
use super::node::Node;
use super::path::build_path;
use super::record::{self, Metadata, RecordShape};
use crate::error::TransformError;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

/// Default nesting limit for directory records.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Highest accepted `transform.max_depth`. Serializing the finished tree
/// still recurses once per level.
pub const MAX_DEPTH_LIMIT: usize = 4096;

/// Counters collected during one transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub files: u64,
    pub directories: u64,
    /// Records dropped for any reason, including the depth limit.
    pub skipped: u64,
    /// Records dropped because they were nested deeper than the limit.
    pub depth_limited: u64,
    /// Deepest level at which a node was produced; the root is level 0.
    pub deepest: usize,
}

impl TransformStats {
    pub fn nodes(&self) -> u64 {
        self.files + self.directories
    }
}

/// Stateful transform over one export document.
///
/// A builder is cheap; create one per document so that stats stay scoped to
/// a single transform.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    max_depth: usize,
    stats: TransformStats,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            stats: TransformStats::default(),
        }
    }

    /// Records nested deeper than `max_depth` levels below the root are dropped.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn stats(&self) -> &TransformStats {
        &self.stats
    }

    /// Transform a decoded export envelope.
    ///
    /// Fails only when the envelope itself is malformed. `Ok(None)` means the
    /// envelope was fine but the root record could not be classified.
    pub fn parse_root(&mut self, document: &Value) -> Result<Option<Node>, TransformError> {
        let root = envelope::root_record(document)?;
        let tree = self.classify_at(root, "", 0);
        debug!(
            files = self.stats.files,
            directories = self.stats.directories,
            skipped = self.stats.skipped,
            deepest = self.stats.deepest,
            "Transformed scan export"
        );
        Ok(tree)
    }

    /// Classify a single raw record under `parent_path`.
    pub fn classify(&mut self, raw: &Value, parent_path: &str) -> Option<Node> {
        self.classify_at(raw, parent_path, 0)
    }

    fn classify_at(&mut self, raw: &Value, parent_path: &str, depth: usize) -> Option<Node> {
        if depth > self.max_depth {
            self.drop_too_deep(parent_path);
            return None;
        }

        match record::shape_of(raw) {
            RecordShape::Directory { metadata, children } => {
                Some(self.build_directory(metadata, children, parent_path, depth))
            }
            RecordShape::File { metadata } => {
                let node = self.build_file(metadata, parent_path);
                self.reached(depth);
                Some(node)
            }
            RecordShape::Malformed(reason) => {
                self.skip(parent_path, reason);
                None
            }
        }
    }

    /// Build a directory node, visiting children in input order.
    ///
    /// Nested directories are kept on an explicit stack, so stack usage does
    /// not grow with the depth of the export.
    pub fn build_directory(
        &mut self,
        metadata: &Metadata,
        children_raw: &[Value],
        parent_path: &str,
        depth: usize,
    ) -> Node {
        let mut current = OpenDirectory::new(metadata, children_raw, parent_path, depth);
        let mut ancestors: Vec<OpenDirectory<'_>> = Vec::new();

        loop {
            match current.remaining.next() {
                Some(raw) => {
                    let child_depth = current.depth + 1;
                    if child_depth > self.max_depth {
                        self.drop_too_deep(&current.path);
                        continue;
                    }
                    match record::shape_of(raw) {
                        RecordShape::Directory { metadata, children } => {
                            let child =
                                OpenDirectory::new(metadata, children, &current.path, child_depth);
                            ancestors.push(std::mem::replace(&mut current, child));
                        }
                        RecordShape::File { metadata } => {
                            let node = self.build_file(metadata, &current.path);
                            self.reached(child_depth);
                            current.children.push(node);
                        }
                        RecordShape::Malformed(reason) => self.skip(&current.path, reason),
                    }
                }
                None => {
                    let node = self.close(current);
                    match ancestors.pop() {
                        Some(parent) => {
                            current = parent;
                            current.children.push(node);
                        }
                        None => return node,
                    }
                }
            }
        }
    }

    /// Build a leaf file node.
    pub fn build_file(&mut self, metadata: &Metadata, parent_path: &str) -> Node {
        let name = record::name_of(metadata).unwrap_or_default().to_string();
        let path = build_path(parent_path, &name);
        let size = record::apparent_size(metadata);

        self.stats.files += 1;
        Node::file(name, path, size)
    }

    fn close(&mut self, dir: OpenDirectory<'_>) -> Node {
        self.stats.directories += 1;
        self.reached(dir.depth);
        Node::directory(dir.name, dir.path, dir.children)
    }

    fn reached(&mut self, depth: usize) {
        self.stats.deepest = self.stats.deepest.max(depth);
    }

    fn skip(&mut self, parent_path: &str, reason: record::MalformedReason) {
        trace!(parent = parent_path, %reason, "Skipping unclassifiable record");
        self.stats.skipped += 1;
    }

    fn drop_too_deep(&mut self, parent_path: &str) {
        if self.stats.depth_limited == 0 {
            warn!(
                max_depth = self.max_depth,
                parent = parent_path,
                "Dropping records nested beyond the depth limit"
            );
        }
        self.stats.depth_limited += 1;
        self.stats.skipped += 1;
    }
}

/// A directory whose children are still being visited.
struct OpenDirectory<'a> {
    name: String,
    path: String,
    depth: usize,
    remaining: std::slice::Iter<'a, Value>,
    children: Vec<Node>,
}

impl<'a> OpenDirectory<'a> {
    fn new(metadata: &Metadata, children_raw: &'a [Value], parent_path: &str, depth: usize) -> Self {
        let name = record::name_of(metadata).unwrap_or_default().to_string();
        let path = build_path(parent_path, &name);
        Self {
            name,
            path,
            depth,
            remaining: children_raw.iter(),
            children: Vec::new(),
        }
    }
}

/// Transform a decoded export envelope with default settings.
pub fn parse_root(document: &Value) -> Result<Option<Node>, TransformError> {
    TreeBuilder::new().parse_root(document)
}

/// Classify a single raw record with default settings.
pub fn classify(raw: &Value, parent_path: &str) -> Option<Node> {
    TreeBuilder::new().classify(raw, parent_path)
}

/// Decode raw scanner output and transform it in one step.
pub fn parse_bytes(
    bytes: &[u8],
    max_depth: usize,
) -> Result<(Option<Node>, TransformStats), TransformError> {
    let document = envelope::decode_document(bytes)?;
    if let Some(header) = envelope::read_header(&document) {
        debug!(%header, "Decoded scan export");
    }
    let mut builder = TreeBuilder::new().with_max_depth(max_depth);
    let tree = builder.parse_root(&document);
    envelope::release(document);
    Ok((tree?, *builder.stats()))
}
