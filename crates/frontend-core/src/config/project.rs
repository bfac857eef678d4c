//! Per-project configuration file parsing

use crate::error::FrontendError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Settings of the static export (`build`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Export destination, relative to the project root
    pub output_dir: PathBuf,

    /// Pid file written by the development server
    pub pid_file: PathBuf,

    /// Executable used to mirror the running site
    pub mirror_tool: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("build"),
            pid_file: PathBuf::from("tmp/pids/server.pid"),
            mirror_tool: "wget".to_string(),
        }
    }
}

/// Top-level project directories an export must never be written into
const PROJECT_DIRS: &[&str] = &[
    "app", "bin", "config", "db", "lib", "log", "public", "script", "storage", "test", "tmp",
    "vendor", "node_modules",
];

impl BuildConfig {
    /// Reject settings that would make the export clear part of the project
    pub fn validate(&self) -> Result<()> {
        validate_output_dir(&self.output_dir)
    }
}

/// The export destination is wiped before every build, so it must be a plain
/// relative path below the project root that is not one of its own directories
pub fn validate_output_dir(output_dir: &Path) -> Result<()> {
    let mut components = output_dir.components().peekable();
    if components.peek().is_none() {
        anyhow::bail!(FrontendError::Precondition(
            "build.output_dir must not be empty".to_string()
        ));
    }
    for component in components {
        if !matches!(component, Component::Normal(_)) {
            anyhow::bail!(FrontendError::Precondition(format!(
                "build.output_dir must be a relative path without '.' or '..': {}",
                output_dir.display()
            )));
        }
    }
    if let Some(Component::Normal(first)) = output_dir.components().next() {
        if PROJECT_DIRS.iter().any(|dir| first == *dir) {
            anyhow::bail!(FrontendError::Precondition(format!(
                "build.output_dir would overwrite the project's {} directory",
                first.to_string_lossy()
            )));
        }
    }
    Ok(())
}

/// Optional `.rails-frontend.yaml` at the project root. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub build: BuildConfig,
}

impl ProjectConfig {
    /// Load the config file from the project root, or defaults if it is absent
    pub fn load(root: &Path, file_name: &str) -> Result<Self> {
        let path = root.join(file_name);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::parse(&content).map_err(|e| {
            anyhow::Error::from(FrontendError::Precondition(format!(
                "Invalid {}: {}",
                path.display(),
                e
            )))
        })?;
        config
            .build
            .validate()
            .with_context(|| format!("Invalid {}", path.display()))?;
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes as null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = tempdir().expect("tempdir");
        let config = ProjectConfig::load(temp.path(), ".rails-frontend.yaml").expect("load");
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.build.output_dir, PathBuf::from("build"));
        assert_eq!(config.build.mirror_tool, "wget");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(
            temp.path().join(".rails-frontend.yaml"),
            "build:\n  output_dir: dist\n",
        )
        .expect("write");

        let config = ProjectConfig::load(temp.path(), ".rails-frontend.yaml").expect("load");
        assert_eq!(config.build.output_dir, PathBuf::from("dist"));
        assert_eq!(config.build.pid_file, PathBuf::from("tmp/pids/server.pid"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(temp.path().join(".rails-frontend.yaml"), "\n").expect("write");
        let config = ProjectConfig::load(temp.path(), ".rails-frontend.yaml").expect("load");
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_unsafe_output_dir_is_rejected() {
        let temp = tempdir().expect("tempdir");
        for value in ["\".\"", "\"\"", "..", "../site", "/tmp/site", "./build", "app", "config/site"] {
            std::fs::write(
                temp.path().join(".rails-frontend.yaml"),
                format!("build:\n  output_dir: {}\n", value),
            )
            .expect("write");

            let err = ProjectConfig::load(temp.path(), ".rails-frontend.yaml").unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<FrontendError>(),
                    Some(FrontendError::Precondition(_))
                ),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_nested_output_dir_is_accepted() {
        assert!(validate_output_dir(Path::new("dist/site")).is_ok());
        assert!(validate_output_dir(Path::new("build")).is_ok());
    }

    #[test]
    fn test_malformed_file_is_precondition_error() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(temp.path().join(".rails-frontend.yaml"), "build: [1, 2").expect("write");

        let err = ProjectConfig::load(temp.path(), ".rails-frontend.yaml").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FrontendError>(),
            Some(FrontendError::Precondition(_))
        ));
    }
}
