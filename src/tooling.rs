//! Tooling & Integration Layer
//!
//! Command-line entry points over the transform, scanner and server.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, ConfigCommands};
