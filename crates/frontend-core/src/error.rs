//! Error conditions raised by the patcher, scanner, exporter and command layer

use std::path::PathBuf;
use thiserror::Error;

/// Typed failure conditions.
///
/// Public operations return `anyhow::Result` and raise these with
/// `anyhow::bail!`; callers that need to react to one specific condition
/// (e.g. the soft [`FrontendError::DirectiveConflict`]) recover it with
/// `downcast_ref`.
#[derive(Debug, Error)]
pub enum FrontendError {
    /// Missing or malformed command-line input
    #[error("{0}")]
    Usage(String),

    /// The working directory is not a Rails project
    #[error(
        "This directory is not a Rails project: {}\n\
         Run the command inside a Rails project (config/routes.rb and Gemfile are required).",
        .0.display()
    )]
    NotAProject(PathBuf),

    /// A required file or tool is absent
    #[error("{0}")]
    Precondition(String),

    /// No live development server behind the pid file
    #[error(
        "Rails server is not running (no live process behind {}).\n\
         Start it first with 'rails-frontend run'.",
        pid_file.display()
    )]
    ServerNotRunning { pid_file: PathBuf },

    /// The file a generator would create is already present
    #[error("{what} already exists: {}", path.display())]
    AlreadyExists { what: &'static str, path: PathBuf },

    /// The requested change collides with existing project state
    #[error("{0}")]
    Conflict(String),

    /// The target of a removal does not exist
    #[error("{what} not found: {target}")]
    NotFound { what: &'static str, target: String },

    /// A layout directive with this name is already declared
    #[error("Layout directive '{layout}' already exists in {}", path.display())]
    DirectiveConflict { layout: String, path: PathBuf },

    /// The anchor a fragment is inserted relative to is missing
    #[error("Could not find {anchor} in {}", path.display())]
    HostStructureNotFound { anchor: String, path: PathBuf },

    /// An external generator, mirror tool or pin manager reported failure
    #[error("{tool} failed:\n{output}")]
    ExternalTool { tool: String, output: String },
}

impl FrontendError {
    /// Whether this condition should abort only the current sub-step
    pub fn is_soft(&self) -> bool {
        matches!(self, FrontendError::DirectiveConflict { .. })
    }
}
