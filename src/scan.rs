//! Scanner invocation
//!
//! Runs `ncdu -o -` (or a compatible command) against a directory and returns
//! its raw JSON export. The child process is killed if the returned future is
//! dropped, cancelled or times out.

use crate::config::ScanConfig;
use crate::error::{ApiError, ScanError};
use crate::tree::{parse_bytes, Node, TransformStats};
use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info};

/// Configured scanner command.
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Arguments passed to the scanner for `dir`.
    pub fn command_args(&self, dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-o".into(), "-".into()];
        if self.config.one_file_system {
            args.push("-x".into());
        }
        if self.config.exclude_kernfs {
            args.push("--exclude-kernfs".into());
        }
        args.extend(self.config.extra_args.iter().map(OsString::from));
        args.push(dir.as_os_str().to_owned());
        args
    }

    /// Resolve the scanner binary, searching PATH for bare command names.
    pub fn locate(&self) -> Result<PathBuf, ScanError> {
        let command = Path::new(&self.config.command);
        if command.components().count() > 1 {
            return if command.is_file() {
                Ok(command.to_path_buf())
            } else {
                Err(ScanError::NotInstalled(self.config.command.clone()))
            };
        }
        let path_var = std::env::var_os("PATH").unwrap_or_default();
        std::env::split_paths(&path_var)
            .map(|dir| dir.join(command))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ScanError::NotInstalled(self.config.command.clone()))
    }

    /// Run the scanner to completion, or until `cancel` resolves.
    pub async fn run<C>(&self, dir: &Path, cancel: C) -> Result<Vec<u8>, ScanError>
    where
        C: Future<Output = ()>,
    {
        let program = self.locate()?;
        debug!(program = %program.display(), dir = %dir.display(), "Starting scanner");

        let child = Command::new(&program)
            .args(self.command_args(dir))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(ScanError::Spawn)?;

        let output = async {
            let output = child.wait_with_output().await.map_err(ScanError::Spawn)?;
            if !output.status.success() {
                return Err(ScanError::Failed {
                    status: output.status,
                });
            }
            Ok(output.stdout)
        };

        let timeout_secs = self.config.timeout_secs;
        let deadline = async {
            if timeout_secs == 0 {
                std::future::pending::<()>().await;
            }
            tokio::time::sleep(Duration::from_secs(timeout_secs)).await;
        };

        tokio::select! {
            result = output => result,
            _ = cancel => Err(ScanError::Cancelled),
            _ = deadline => Err(ScanError::TimedOut(timeout_secs)),
        }
    }
}

/// Scan `dir` and transform the export into a tree.
pub async fn scan_tree<C>(
    scanner: &Scanner,
    dir: &Path,
    max_depth: usize,
    cancel: C,
) -> Result<(Option<Node>, TransformStats), ApiError>
where
    C: Future<Output = ()>,
{
    let started = Instant::now();
    let bytes = scanner.run(dir, cancel).await?;
    info!(
        bytes = bytes.len(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Scan complete"
    );

    let (tree, stats) = tokio::task::spawn_blocking(move || parse_bytes(&bytes, max_depth))
        .await
        .map_err(|e| ApiError::Server(format!("Transform task failed: {}", e)))??;
    info!(
        files = stats.files,
        directories = stats.directories,
        skipped = stats.skipped,
        total_bytes = tree.as_ref().map(Node::size).unwrap_or(0),
        "Parsed scan export"
    );
    Ok((tree, stats))
}
