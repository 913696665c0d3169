//! TOML file sources: the optional global file and an explicit `--config` file.

use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use std::path::Path;

/// Overlay the global config file if it exists.
pub fn add_global(
    builder: ConfigBuilder<DefaultState>,
    path: Option<&Path>,
) -> ConfigBuilder<DefaultState> {
    match path {
        Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml).required(false)),
        None => builder,
    }
}

/// Overlay an explicitly requested config file, which must exist.
pub fn add_explicit(
    builder: ConfigBuilder<DefaultState>,
    path: Option<&Path>,
) -> ConfigBuilder<DefaultState> {
    match path {
        Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml).required(true)),
        None => builder,
    }
}
