//! Interactive command layer using cliclack
//!
//! This module is optional and only available when the `tui` feature is enabled.

#[cfg(feature = "tui")]
mod commands;

#[cfg(feature = "tui")]
pub use commands::{exec_dev_server, run, Action, Invocation, Outcome};
