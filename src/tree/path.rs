//! Path construction for tree nodes

/// Separator between path segments. Always `/`, independent of the host OS.
const SEPARATOR: char = '/';

/// Join a node name onto its parent path.
///
/// An empty parent denotes the root, whose path is its bare name.
pub fn build_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        return name.to_string();
    }
    let mut path = String::with_capacity(parent.len() + 1 + name.len());
    path.push_str(parent);
    path.push(SEPARATOR);
    path.push_str(name);
    path
}
