//! Integration tests for the disktree export transform and CLI

mod cli_parse;
mod end_to_end;
mod transform_command;
mod tree_properties;

use std::path::PathBuf;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Export whose root is a chain of `levels` directories ending in one 7-byte file.
pub fn deep_export(levels: usize) -> Vec<u8> {
    let mut text = String::from("[1,2,{\"progname\":\"ncdu\"},");
    text.push_str(&r#"[{"name":"d"},"#.repeat(levels));
    text.push_str(r#"{"name":"leaf","asize":7}"#);
    text.push_str(&"]".repeat(levels + 1));
    text.into_bytes()
}
