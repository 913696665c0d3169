//! CLI Tooling
//!
//! Command-line interface: scan and serve a directory, or transform an
//! existing ncdu export offline.

use crate::browser;
use crate::config::{ConfigLoader, DisktreeConfig};
use crate::error::{ApiError, ScanError, TransformError};
use crate::scan::{scan_tree, Scanner};
use crate::server::{self, AppState, TreeSource};
use crate::tree::{parse_bytes, Node, NodeKind, TransformStats};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Entries listed in the `--stats` breakdown.
const TOP_ENTRIES: usize = 10;

/// Worker and blocking thread stack size; serializing a tree recurses per level.
const RUNTIME_STACK_SIZE: usize = 8 * 1024 * 1024;

/// disktree - browse ncdu disk-usage exports as a tree
#[derive(Parser)]
#[command(name = "disktree")]
#[command(about = "Normalize ncdu disk-usage exports and serve them to a treemap client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan a directory with ncdu and serve the tree over HTTP
    Serve {
        /// Directory to scan
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_browser: bool,
        /// Re-run the scan on every data request
        #[arg(long)]
        rescan: bool,
    },
    /// Transform an existing ncdu export (`ncdu -o file`) into tree JSON
    Transform {
        /// Export file, or "-" for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
        /// Write the result to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
        /// Print a size summary instead of JSON
        #[arg(long, conflicts_with_all = ["output", "pretty"])]
        stats: bool,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
}

/// CLI context holding the loaded configuration.
pub struct CliContext {
    config: DisktreeConfig,
    config_path: Option<PathBuf>,
}

impl CliContext {
    /// Create a new CLI context, loading configuration from all sources.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(Self {
            config,
            config_path,
        })
    }

    /// Create a context around an already-built configuration.
    pub fn from_config(config: DisktreeConfig) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    pub fn config(&self) -> &DisktreeConfig {
        &self.config
    }

    /// Apply logging flags from the command line; flags beat every config source.
    pub fn apply_log_overrides(&mut self, cli: &Cli) {
        let logging = &mut self.config.logging;
        if cli.verbose {
            logging.level = "debug".to_string();
        }
        if let Some(level) = &cli.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &cli.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &cli.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &cli.log_file {
            logging.file = Some(file.clone());
        }
    }

    /// Execute a CLI command, returning text for stdout.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Serve {
                dir,
                port,
                host,
                no_browser,
                rescan,
            } => {
                let mut server_config = self.config.server.clone();
                if let Some(port) = port {
                    server_config.port = *port;
                }
                if let Some(host) = host {
                    server_config.host = host.clone();
                }
                if *no_browser {
                    server_config.open_browser = false;
                }
                if *rescan {
                    server_config.rescan_on_request = true;
                }
                let runtime = tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .thread_stack_size(RUNTIME_STACK_SIZE)
                    .build()?;
                runtime.block_on(self.serve(dir, server_config))
            }
            Commands::Transform {
                input,
                output,
                pretty,
                stats,
            } => self.transform(input, output.as_deref(), *pretty, *stats),
            Commands::Config { command } => match command {
                ConfigCommands::Show => {
                    let mut text = String::new();
                    if let Some(path) = &self.config_path {
                        text.push_str(&format!("# loaded with --config {}\n", path.display()));
                    }
                    text.push_str(&toml::to_string_pretty(&self.config).map_err(|e| {
                        ApiError::ConfigError(format!("Failed to render config: {}", e))
                    })?);
                    Ok(text)
                }
            },
        }
    }

    async fn serve(
        &self,
        dir: &Path,
        server_config: crate::config::ServerConfig,
    ) -> Result<String, ApiError> {
        let scanner = Scanner::new(self.config.scan.clone());
        scanner.locate()?;
        let max_depth = self.config.transform.max_depth;

        let source = if server_config.rescan_on_request {
            info!(dir = %dir.display(), "Serving with a fresh scan per request");
            TreeSource::Rescan {
                scanner,
                dir: dir.to_path_buf(),
                max_depth,
            }
        } else {
            println!(
                "Scanning '{}' with {}... (this may take a moment)",
                dir.display(),
                self.config.scan.command
            );
            match scan_tree(&scanner, dir, max_depth, ctrl_c()).await {
                Ok((tree, _)) => {
                    if tree.is_none() {
                        warn!("Scan export has no usable root record; serving an empty tree");
                    }
                    println!("Scan complete.");
                    TreeSource::Snapshot(Arc::new(tree))
                }
                Err(ApiError::Scan(ScanError::Cancelled)) => {
                    return Ok("\nScan cancelled by user.".to_string());
                }
                Err(e) => return Err(e),
            }
        };

        let listener = TcpListener::bind(server_config.bind_addr()).await?;
        let url = server_config.public_url();
        println!("Serving at {}", url);
        info!(addr = %server_config.bind_addr(), "HTTP server listening");

        if server_config.open_browser {
            if let Err(e) = browser::open(&url) {
                warn!(error = %e, "Failed to open browser");
            }
        }

        server::serve(
            listener,
            Arc::new(AppState { source }),
            ctrl_c(),
            Duration::from_secs(server_config.shutdown_grace_secs),
        )
        .await?;
        Ok("Server exiting".to_string())
    }

    fn transform(
        &self,
        input: &Path,
        output: Option<&Path>,
        pretty: bool,
        stats: bool,
    ) -> Result<String, ApiError> {
        let bytes = read_input(input)?;
        let (tree, transform_stats) = parse_bytes(&bytes, self.config.transform.max_depth)?;
        if tree.is_none() {
            warn!("Export has no usable root record");
        }

        if stats {
            return Ok(format_stats(tree.as_ref(), &transform_stats));
        }

        let json = if pretty {
            serde_json::to_string_pretty(&tree)
        } else {
            serde_json::to_string(&tree)
        }
        .map_err(TransformError::from)?;

        match output {
            Some(path) => {
                std::fs::write(path, json)?;
                Ok(format!(
                    "Wrote {} nodes to {}",
                    transform_stats.nodes(),
                    path.display()
                ))
            }
            None => Ok(json),
        }
    }
}

fn read_input(input: &Path) -> Result<Vec<u8>, ApiError> {
    if input.as_os_str() == "-" {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes)?;
        return Ok(bytes);
    }
    std::fs::read(input).map_err(|e| {
        ApiError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", input.display(), e),
        ))
    })
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Human-readable byte count with binary units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Summary tables for `transform --stats`.
pub fn format_stats(tree: Option<&Node>, stats: &TransformStats) -> String {
    let mut summary = Table::new();
    summary.load_preset(UTF8_FULL);
    summary.set_header(vec!["Metric", "Value"]);
    summary.add_row(vec![
        Cell::new("Root"),
        Cell::new(tree.map(Node::path).unwrap_or("(none)")),
    ]);
    summary.add_row(vec![
        Cell::new("Total size"),
        Cell::new(format_bytes(tree.map(Node::size).unwrap_or(0))),
    ]);
    summary.add_row(vec![Cell::new("Files"), Cell::new(stats.files)]);
    summary.add_row(vec![Cell::new("Directories"), Cell::new(stats.directories)]);
    summary.add_row(vec![Cell::new("Skipped records"), Cell::new(stats.skipped)]);
    if stats.depth_limited > 0 {
        summary.add_row(vec![
            Cell::new("Dropped by depth limit"),
            Cell::new(stats.depth_limited),
        ]);
    }
    summary.add_row(vec![Cell::new("Deepest level"), Cell::new(stats.deepest)]);
    let largest_file = tree.and_then(|root| {
        root.iter()
            .filter(|node| !node.is_dir())
            .max_by_key(|node| node.size())
    });
    if let Some(file) = largest_file {
        summary.add_row(vec![
            Cell::new("Largest file"),
            Cell::new(format!("{} ({})", file.path(), format_bytes(file.size()))),
        ]);
    }

    let mut out = summary.to_string();

    if let Some(root) = tree.filter(|t| !t.children().is_empty()) {
        let mut top = Table::new();
        top.load_preset(UTF8_FULL);
        top.set_header(vec!["Largest entries", "Size", "Type", "Share"]);
        for child in root.largest_children(TOP_ENTRIES) {
            let share = if root.size() == 0 {
                0.0
            } else {
                100.0 * child.size() as f64 / root.size() as f64
            };
            let kind = match child.kind() {
                NodeKind::Directory => "directory",
                NodeKind::File => "file",
            };
            top.add_row(vec![
                Cell::new(child.name()),
                Cell::new(format_bytes(child.size())),
                Cell::new(kind),
                Cell::new(format!("{:.1}%", share)),
            ]);
        }
        out.push('\n');
        out.push_str(&top.to_string());
    }
    out
}
