//! Idempotent fragment insertion and removal in existing project files
//!
//! Every edit is line-oriented and pattern-based; no Ruby or ERB parsing is
//! performed. A [`Fragment`] knows how to add itself to, or cut itself out
//! of, a file's content. A [`HostFile`] owns the read/modify/write cycle and
//! only touches the disk when the content actually changed.
//!
//! - `routes`: route declarations in `config/routes.rb`
//! - `controller`: actions and layout directives in the home controller
//! - `layout`: header/footer shell of the application layout

pub mod controller;
pub mod layout;
pub mod routes;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use controller::{
    find_layout_for_view, insert_controller_action, insert_layout_directive,
    remove_controller_action, remove_layout_directive, ControllerAction, LayoutDirective,
};
pub use layout::ApplicationShell;
pub use routes::{insert_route, remove_route, RouteFragment};

/// A named unit of text that can be patched into or out of a host file
pub trait Fragment {
    /// Short description for log lines (e.g. `route /about`)
    fn describe(&self) -> String;

    /// Content with the fragment inserted, or `None` if it is already present
    fn apply(&self, content: &str, path: &Path) -> Result<Option<String>>;

    /// Content with the fragment removed, or `None` if it is absent
    fn remove(&self, content: &str, path: &Path) -> Result<Option<String>>;
}

/// Result of applying or removing a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The file was rewritten
    Applied,
    /// Nothing to do; the file was left untouched
    Unchanged,
}

/// An existing text file that fragments are patched into
#[derive(Debug, Clone)]
pub struct HostFile {
    path: PathBuf,
}

impl HostFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<String> {
        std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))
    }

    pub fn apply_fragment(&self, fragment: &dyn Fragment) -> Result<PatchOutcome> {
        let content = self.read()?;
        match fragment.apply(&content, &self.path)? {
            Some(updated) => self
                .write_verified(&updated, fragment)
                .map(|_| PatchOutcome::Applied),
            None => Ok(PatchOutcome::Unchanged),
        }
    }

    pub fn remove_fragment(&self, fragment: &dyn Fragment) -> Result<PatchOutcome> {
        let content = self.read()?;
        match fragment.remove(&content, &self.path)? {
            Some(updated) => self
                .write_verified(&updated, fragment)
                .map(|_| PatchOutcome::Applied),
            None => Ok(PatchOutcome::Unchanged),
        }
    }

    /// Write the full content, then read it back so the next patch in the
    /// same invocation is guaranteed to see it
    fn write_verified(&self, content: &str, fragment: &dyn Fragment) -> Result<()> {
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        let written = self.read()?;
        if written != content {
            anyhow::bail!(
                "Patching {} into {} could not be confirmed: file content differs after writing",
                fragment.describe(),
                self.path.display()
            );
        }
        Ok(())
    }
}
