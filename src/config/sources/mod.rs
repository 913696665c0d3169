//! Individual configuration sources.

pub mod environment;
pub mod file;
pub mod legacy;
