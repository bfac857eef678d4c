//! Configuration: generator arguments and the optional per-project file
//!
//! This module provides:
//! - The argument list handed to the external project generator
//! - `ProjectConfig`, read from a YAML file at the project root

pub mod generator;
pub mod project;

pub use generator::{rails_new_args, CLEAN_MODE_FLAGS};
pub use project::{BuildConfig, ProjectConfig};
