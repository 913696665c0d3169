//! Best-effort launch of the platform URL opener.

use std::io;
use std::process::{Command, Stdio};

/// Opener program and arguments for the current platform.
pub fn opener_command(url: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("open", vec![url.to_string()])
    } else if cfg!(target_os = "windows") {
        (
            "cmd",
            vec!["/C".to_string(), "start".to_string(), String::new(), url.to_string()],
        )
    } else {
        ("xdg-open", vec![url.to_string()])
    }
}

/// Spawn the opener without waiting for it.
pub fn open(url: &str) -> io::Result<()> {
    let (program, args) = opener_command(url);
    Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}
