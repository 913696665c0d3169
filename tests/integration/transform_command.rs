use disktree::config::DisktreeConfig;
use disktree::tooling::cli::{CliContext, Commands, ConfigCommands};
use disktree::{ApiError, TransformError};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

use super::{deep_export, fixture};

fn transform(input: std::path::PathBuf) -> Commands {
    Commands::Transform {
        input,
        output: None,
        pretty: false,
        stats: false,
    }
}

#[test]
fn transform_prints_tree_json() {
    let ctx = CliContext::from_config(DisktreeConfig::default());
    let out = ctx.execute(&transform(fixture("sample_export.json"))).unwrap();

    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["name"], "/srv/project");
    assert_eq!(value["type"], "directory");
    assert_eq!(value["value"], 1536 + 52311 + 812 + 20480);
    assert_eq!(value["children"][0]["path"], "/srv/project/README.md");
    assert_eq!(value["children"][0]["value"], 1536);
    // Childless directories carry no children key.
    assert!(value["children"][3].get("children").is_none());
}

#[test]
fn transform_writes_output_file() {
    let temp = TempDir::new().unwrap();
    let out_path = temp.path().join("transformed.json");
    let ctx = CliContext::from_config(DisktreeConfig::default());

    let message = ctx
        .execute(&Commands::Transform {
            input: fixture("sample_export.json"),
            output: Some(out_path.clone()),
            pretty: true,
            stats: false,
        })
        .unwrap();
    assert!(message.contains("Wrote 10 nodes"));

    let written = fs::read_to_string(&out_path).unwrap();
    assert!(written.contains("\n  \"name\""));
    let value: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["path"], "/srv/project");
}

#[test]
fn transform_stats_summary() {
    let ctx = CliContext::from_config(DisktreeConfig::default());
    let out = ctx
        .execute(&Commands::Transform {
            input: fixture("sample_export.json"),
            output: None,
            pretty: false,
            stats: true,
        })
        .unwrap();
    assert!(out.contains("/srv/project"));
    assert!(out.contains("Cargo.lock"));
    assert!(out.contains("Directories"));
}

#[test]
fn transform_rejects_short_envelope() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("short.json");
    fs::write(&input, "[1,2,{}]").unwrap();

    let ctx = CliContext::from_config(DisktreeConfig::default());
    let err = ctx.execute(&transform(input)).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Transform(TransformError::MalformedInput(_))
    ));
}

#[test]
fn transform_unclassifiable_root_prints_null() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("odd.json");
    fs::write(&input, "[1,2,{},\"not a record\"]").unwrap();

    let ctx = CliContext::from_config(DisktreeConfig::default());
    let out = ctx.execute(&transform(input)).unwrap();
    assert_eq!(out, "null");
}

#[test]
fn transform_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let ctx = CliContext::from_config(DisktreeConfig::default());
    let err = ctx
        .execute(&transform(temp.path().join("absent.json")))
        .unwrap_err();
    assert!(matches!(err, ApiError::Io(_)));
}

#[test]
fn transform_honors_configured_depth_limit() {
    let mut config = DisktreeConfig::default();
    config.transform.max_depth = 1;
    let ctx = CliContext::from_config(config);
    let out = ctx.execute(&transform(fixture("sample_export.json"))).unwrap();

    let value: Value = serde_json::from_str(&out).unwrap();
    // Files inside src/ sit at level 2 and are dropped.
    assert_eq!(value["value"], 1536 + 52311);
}

#[test]
fn config_show_renders_toml() {
    let ctx = CliContext::from_config(DisktreeConfig::default());
    let out = ctx
        .execute(&Commands::Config {
            command: ConfigCommands::Show,
        })
        .unwrap();
    let parsed: DisktreeConfig = toml::from_str(&out).unwrap();
    assert_eq!(parsed, DisktreeConfig::default());
}

#[test]
fn transform_accepts_deeply_nested_export() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("deep.json");
    fs::write(&input, deep_export(300)).unwrap();

    let ctx = CliContext::from_config(DisktreeConfig::default());
    let out = ctx.execute(&transform(input)).unwrap();
    assert!(out.starts_with(r#"{"name":"d","path":"d","value":7"#));
    assert!(out.contains(r#""name":"leaf""#));
}
