use disktree::tree::{build_path, parse_root, Node};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Random raw records: files, directories and junk.
fn raw_record() -> impl Strategy<Value = Value> {
    let name = "[a-z]{1,8}";
    let leaf = prop_oneof![
        4 => (name, 0u64..1_000_000).prop_map(|(n, s)| json!({"name": n, "asize": s})),
        1 => (name, 0.0f64..1e6).prop_map(|(n, s)| json!({"name": n, "asize": s})),
        1 => name.prop_map(|n| json!({"name": n})),
        1 => Just(json!([])),
        1 => Just(json!(null)),
        1 => Just(json!({"asize": 10})),
    ];
    leaf.prop_recursive(5, 64, 6, move |inner| {
        (name, prop::collection::vec(inner, 0..6)).prop_map(|(n, children)| {
            let mut items = vec![json!({ "name": n })];
            items.extend(children);
            Value::Array(items)
        })
    })
}

fn check_invariants(node: &Node, parent: &str) {
    assert_eq!(node.path(), build_path(parent, node.name()));
    if node.is_dir() {
        let sum: u64 = node.children().iter().map(Node::size).sum();
        assert_eq!(node.size(), sum, "aggregation broken at {}", node.path());
        for child in node.children() {
            check_invariants(child, node.path());
        }
    } else {
        assert!(node.children().is_empty());
    }
}

proptest! {
    #[test]
    fn aggregation_and_path_invariants_hold(root in raw_record()) {
        let doc = json!([1, 2, {}, root]);
        if let Some(tree) = parse_root(&doc).unwrap() {
            prop_assert_eq!(tree.path(), tree.name());
            check_invariants(&tree, "");
        }
    }

    #[test]
    fn transform_is_idempotent(root in raw_record()) {
        let doc = json!([1, 2, {}, root]);
        prop_assert_eq!(parse_root(&doc).unwrap(), parse_root(&doc).unwrap());
    }

    #[test]
    fn file_sizes_truncate(size in 0.0f64..1e12) {
        let doc = json!([1, 2, {}, {"name": "f", "asize": size}]);
        let tree = parse_root(&doc).unwrap().unwrap();
        prop_assert_eq!(tree.size(), size.trunc() as u64);
    }
}
