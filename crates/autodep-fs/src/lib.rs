//! Filesystem layer for autodep
//!
//! Provides dependency directory layout, normalized paths, and safe I/O
//! for the JSON manifests and TOML configuration the core reads and writes.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use config::ConfigStore;
pub use constants::DepPath;
pub use error::{Error, Result};
pub use layout::{DependencyLayout, validate_dependency_name};
pub use path::NormalizedPath;
