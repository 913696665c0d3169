use disktree::tree::{
    decode_document, parse_bytes, parse_root, read_header, TreeBuilder, DEFAULT_MAX_DEPTH,
};
use disktree::{NodeKind, TransformError};
use serde_json::json;

use super::{deep_export, fixture};

#[test]
fn documented_scenario_produces_expected_tree() {
    let doc = json!([
        1,
        2,
        {},
        [
            {"name": "root"},
            {"name": "a.txt", "asize": 100},
            [{"name": "sub"}, {"name": "b.txt", "asize": 50}]
        ]
    ]);

    let root = parse_root(&doc).unwrap().expect("root should classify");
    assert_eq!(root.name(), "root");
    assert_eq!(root.path(), "root");
    assert_eq!(root.kind(), NodeKind::Directory);
    assert_eq!(root.size(), 150);

    let children = root.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].path(), "root/a.txt");
    assert_eq!(children[0].kind(), NodeKind::File);
    assert_eq!(children[0].size(), 100);
    assert_eq!(children[1].path(), "root/sub");
    assert_eq!(children[1].size(), 50);
    assert_eq!(children[1].children()[0].path(), "root/sub/b.txt");
}

#[test]
fn short_envelope_is_malformed_input() {
    let result = parse_root(&json!([1, 2, {}]));
    assert!(matches!(result, Err(TransformError::MalformedInput(_))));
}

#[test]
fn fixture_export_transforms() {
    let bytes = std::fs::read(fixture("sample_export.json")).unwrap();
    let (tree, stats) = parse_bytes(&bytes, 64).unwrap();
    let root = tree.unwrap();

    assert_eq!(root.path(), "/srv/project");
    assert_eq!(root.size(), 1536 + 52311 + 812 + 20480);
    assert_eq!(root.children().len(), 6);
    assert_eq!(stats.files, 6);
    assert_eq!(stats.directories, 4);
    assert_eq!(stats.skipped, 0);
    assert_eq!(stats.deepest, 2);

    let src = &root.children()[2];
    assert_eq!(src.path(), "/srv/project/src");
    assert_eq!(src.size(), 812 + 20480);
    let empty = &src.children()[2];
    assert!(empty.is_dir());
    assert_eq!(empty.size(), 0);
    assert_eq!(empty.path(), "/srv/project/src/empty");

    let cache = root
        .children()
        .iter()
        .find(|n| n.name() == ".cache")
        .unwrap();
    assert_eq!(cache.size(), 0);
}

#[test]
fn fixture_header_is_readable() {
    let bytes = std::fs::read(fixture("sample_export.json")).unwrap();
    let document = decode_document(&bytes).unwrap();
    let header = read_header(&document).unwrap();
    assert_eq!(header.progname.as_deref(), Some("ncdu"));
    assert_eq!(header.major_version, Some(1));
    assert_eq!(header.minor_version, Some(2));
}

#[test]
fn broken_sibling_does_not_affect_others() {
    let doc = json!([
        1,
        2,
        {},
        [
            {"name": "r"},
            {"name": "ok1", "asize": 1},
            [[{"name": "nested-bad"}]],
            {"name": "ok2", "asize": 2}
        ]
    ]);
    let mut builder = TreeBuilder::new();
    let root = builder.parse_root(&doc).unwrap().unwrap();
    let names: Vec<&str> = root.children().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["ok1", "ok2"]);
    assert_eq!(root.size(), 3);
    assert_eq!(builder.stats().skipped, 1);
}

#[test]
fn transform_is_deterministic() {
    let bytes = std::fs::read(fixture("sample_export.json")).unwrap();
    let first = parse_bytes(&bytes, 64).unwrap();
    let second = parse_bytes(&bytes, 64).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.0).unwrap(),
        serde_json::to_string(&second.0).unwrap()
    );
}

#[test]
fn invalid_json_is_a_decode_error() {
    let result = parse_bytes(b"ncdu: error", 64);
    assert!(matches!(result, Err(TransformError::Decode(_))));
}

#[test]
fn deep_export_decodes_and_respects_depth_limit() {
    let bytes = deep_export(250);

    let (tree, stats) = parse_bytes(&bytes, DEFAULT_MAX_DEPTH).unwrap();
    assert_eq!(tree.unwrap().size(), 7);
    assert_eq!(stats.directories, 250);
    assert_eq!(stats.deepest, 250);
    assert_eq!(stats.depth_limited, 0);

    let (tree, stats) = parse_bytes(&bytes, 100).unwrap();
    assert_eq!(tree.unwrap().size(), 0);
    assert_eq!(stats.directories, 101);
    assert_eq!(stats.depth_limited, 1);
    assert_eq!(stats.deepest, 100);
}
