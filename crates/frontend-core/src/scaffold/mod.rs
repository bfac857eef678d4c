//! File generation from fixed templates
//!
//! This module provides:
//! - Page, stylesheet, Stimulus controller and layout templates
//! - The frontend skeleton (`Blueprint`) written by `new`
//! - `write_new`, which refuses to overwrite an existing file

pub mod blueprint;
pub mod templates;

use crate::error::FrontendError;
use anyhow::{Context, Result};
use std::path::Path;

pub use blueprint::{apply_blueprint, clean_project, Blueprint, ScaffoldFile};

/// Write a freshly generated file, creating parent directories.
/// Fails with `AlreadyExists` if the target is present.
pub fn write_new(path: &Path, what: &'static str, content: &str) -> Result<()> {
    if path.exists() {
        anyhow::bail!(FrontendError::AlreadyExists {
            what,
            path: path.to_path_buf(),
        });
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Delete a generated file; a missing file is not an error
pub fn remove_file(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_new_refuses_existing_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("app/views/home/about.html.erb");
        write_new(&path, "View", "first").expect("write");

        let err = write_new(&path, "View", "second").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FrontendError>(),
            Some(FrontendError::AlreadyExists { what: "View", .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "first");
    }

    #[test]
    fn test_remove_file_tolerates_missing() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("gone.css");
        assert!(!remove_file(&path).expect("remove"));
        std::fs::write(&path, "").expect("write");
        assert!(remove_file(&path).expect("remove"));
        assert!(!path.exists());
    }
}
