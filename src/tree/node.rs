//! Normalized tree node types

use serde::Serialize;

/// Node kind, serialized as the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// One entry of the normalized tree.
///
/// Nodes are immutable once built. A directory's size is computed from its
/// children at construction, so the aggregation invariant cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    name: String,
    path: String,
    #[serde(rename = "value")]
    size: u64,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Node {
    /// File node with the already-coerced size.
    pub fn file(name: String, path: String, size: u64) -> Self {
        Self {
            name,
            path,
            size,
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    /// Directory node; size is the saturating sum of the children's sizes.
    pub fn directory(name: String, path: String, children: Vec<Node>) -> Self {
        let size = children
            .iter()
            .fold(0u64, |total, child| total.saturating_add(child.size));
        Self {
            name,
            path,
            size,
            kind: NodeKind::Directory,
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Size in bytes (`value` on the wire).
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Pre-order traversal of this node and all descendants.
    pub fn iter(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Children sorted by size, largest first. Ties keep input order.
    pub fn largest_children(&self, limit: usize) -> Vec<&Node> {
        let mut sorted: Vec<&Node> = self.children.iter().collect();
        sorted.sort_by(|a, b| b.size.cmp(&a.size));
        sorted.truncate(limit);
        sorted
    }
}

// Children are detached and dropped one level at a time so that deep trees
// do not recurse in drop glue.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Iterator returned by [`Node::iter`].
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
