//! Frontend skeleton written into a freshly generated project

use super::templates;
use anyhow::{Context, Result};
use std::path::Path;

/// One file of the skeleton, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub path: String,
    pub content: String,
}

impl ScaffoldFile {
    fn new(path: &str, content: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            content: content.into(),
        }
    }
}

/// Generator output that a frontend-only project does not need (`new --clean`)
pub const CLEAN_MODE_REMOVALS: &[&str] = &[
    ".github",
    "app/models",
    "app/javascript/controllers/hello_controller.js",
    "config/environments/production.rb",
    "config/environments/test.rb",
    "lib",
    "public",
    "script",
];

/// Ordered list of skeleton files; later entries never depend on earlier ones
#[derive(Debug, Clone)]
pub struct Blueprint {
    pub files: Vec<ScaffoldFile>,
}

impl Blueprint {
    /// Home controller and view, shared partials, base stylesheets, asset
    /// folders and `Procfile.dev`
    pub fn frontend() -> Self {
        let section = |name: &str| templates::render(templates::SECTION_STYLESHEET, name);
        Self {
            files: vec![
                ScaffoldFile::new("app/controllers/home_controller.rb", templates::HOME_CONTROLLER),
                ScaffoldFile::new("app/views/home/index.html.erb", templates::HOME_INDEX_VIEW),
                ScaffoldFile::new("app/views/shared/_header.html.erb", templates::SHARED_HEADER),
                ScaffoldFile::new("app/views/shared/_navbar.html.erb", templates::SHARED_NAVBAR),
                ScaffoldFile::new("app/views/shared/_footer.html.erb", templates::SHARED_FOOTER),
                ScaffoldFile::new("app/assets/stylesheets/home.css", templates::page_stylesheet("home")),
                ScaffoldFile::new("app/assets/stylesheets/header.css", section("header")),
                ScaffoldFile::new("app/assets/stylesheets/navbar.css", section("nav")),
                ScaffoldFile::new("app/assets/stylesheets/footer.css", section("footer")),
                ScaffoldFile::new("app/assets/images/.keep", ""),
                ScaffoldFile::new("app/assets/fonts/.keep", ""),
                ScaffoldFile::new("Procfile.dev", templates::PROCFILE_DEV),
            ],
        }
    }
}

/// Write every blueprint file under `target_dir`, overwriting generator output
pub fn apply_blueprint(blueprint: &Blueprint, target_dir: &Path) -> Result<Vec<String>> {
    let mut written = Vec::new();

    for file in &blueprint.files {
        let target_path = target_dir.join(&file.path);
        if let Some(parent) = target_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&target_path, &file.content)
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;
        written.push(file.path.clone());
    }

    Ok(written)
}

/// Remove [`CLEAN_MODE_REMOVALS`] entries that exist; returns what was removed
pub fn clean_project(target_dir: &Path) -> Result<Vec<String>> {
    let mut removed = Vec::new();

    for entry in CLEAN_MODE_REMOVALS {
        let path = target_dir.join(entry);
        if path.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        } else if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        } else {
            continue;
        }
        removed.push(entry.to_string());
    }

    Ok(removed)
}
