use clap::Parser;
use disktree::tooling::cli::{Cli, Commands};
use std::path::PathBuf;

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["disktree", "serve"],
        vec!["disktree", "serve", "/var"],
        vec!["disktree", "serve", "--port", "9000", "--no-browser"],
        vec!["disktree", "serve", "--host", "0.0.0.0", "--rescan", "/home"],
        vec!["disktree", "transform"],
        vec!["disktree", "transform", "export.json", "--pretty"],
        vec!["disktree", "transform", "-", "-o", "transformed.json"],
        vec!["disktree", "transform", "export.json", "--stats"],
        vec!["disktree", "--verbose", "--log-output", "stderr", "config", "show"],
        vec!["disktree", "--config", "custom.toml", "transform"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn serve_defaults_to_current_directory() {
    let cli = Cli::try_parse_from(["disktree", "serve"]).unwrap();
    match cli.command {
        Commands::Serve {
            dir,
            port,
            no_browser,
            rescan,
            ..
        } => {
            assert_eq!(dir, PathBuf::from("."));
            assert_eq!(port, None);
            assert!(!no_browser);
            assert!(!rescan);
        }
        _ => panic!("expected serve command"),
    }
}

#[test]
fn transform_defaults_to_stdin() {
    let cli = Cli::try_parse_from(["disktree", "transform"]).unwrap();
    match cli.command {
        Commands::Transform { input, output, .. } => {
            assert_eq!(input, PathBuf::from("-"));
            assert_eq!(output, None);
        }
        _ => panic!("expected transform command"),
    }
}

#[test]
fn parse_rejects_invalid_arguments() {
    assert!(Cli::try_parse_from(["disktree"]).is_err());
    assert!(Cli::try_parse_from(["disktree", "serve", "--port", "http"]).is_err());
    assert!(Cli::try_parse_from(["disktree", "serve", "--port", "70000"]).is_err());
    assert!(
        Cli::try_parse_from(["disktree", "transform", "x.json", "--stats", "--pretty"]).is_err()
    );
}
