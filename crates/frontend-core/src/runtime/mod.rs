//! Runtime detection and external tool management
//!
//! This module provides:
//! - Rails detection and minimum version check
//! - A wrapper for the executables the CLI delegates to (rails, wget,
//!   bin/importmap, bin/dev)

pub mod check;
pub mod tool;

pub use check::{check_rails, detect_rails, parse_version, RuntimeInfo, MIN_RAILS_VERSION};
pub use tool::{CapturedOutput, ExternalTool};
