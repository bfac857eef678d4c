//! Rails project root validation and conventional paths

use crate::error::FrontendError;
use crate::names;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Controller that owns every generated page action and layout directive
pub const HOME_CONTROLLER: &str = "app/controllers/home_controller.rb";
pub const HOME_CONTROLLER_CLASS: &str = "HomeController";
pub const ROUTES_FILE: &str = "config/routes.rb";
pub const MANIFEST_FILE: &str = "Gemfile";
pub const IMPORTMAP_FILE: &str = "config/importmap.rb";
pub const IMPORTMAP_BIN: &str = "bin/importmap";
pub const DEV_BIN: &str = "bin/dev";
pub const APPLICATION_CONFIG: &str = "config/application.rb";
pub const APPLICATION_LAYOUT: &str = "app/views/layouts/application.html.erb";

const HOME_VIEWS_DIR: &str = "app/views/home";
const LAYOUTS_DIR: &str = "app/views/layouts";
const STYLESHEETS_DIR: &str = "app/assets/stylesheets";
const STIMULUS_DIR: &str = "app/javascript/controllers";
const VIEW_SUFFIX: &str = ".html.erb";

/// A directory known to contain a Rails project
#[derive(Debug, Clone)]
pub struct ProjectRoot {
    root: PathBuf,
}

impl ProjectRoot {
    /// Validate that `dir` holds both a routes file and a dependency manifest
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let root = dir.into();
        if !root.join(ROUTES_FILE).is_file() || !root.join(MANIFEST_FILE).is_file() {
            anyhow::bail!(FrontendError::NotAProject(root));
        }
        Ok(Self { root })
    }

    /// Wrap a directory without validation (freshly generated projects)
    pub fn unchecked(dir: impl Into<PathBuf>) -> Self {
        Self { root: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    pub fn routes_file(&self) -> PathBuf {
        self.join(ROUTES_FILE)
    }

    pub fn home_controller(&self) -> PathBuf {
        self.join(HOME_CONTROLLER)
    }

    pub fn view_file(&self, page: &str) -> PathBuf {
        self.join(HOME_VIEWS_DIR).join(format!("{}{}", page, VIEW_SUFFIX))
    }

    pub fn stylesheet_file(&self, page: &str) -> PathBuf {
        self.join(STYLESHEETS_DIR).join(format!("{}.css", page))
    }

    pub fn stimulus_file(&self, name: &str) -> PathBuf {
        self.join(STIMULUS_DIR).join(format!("{}_controller.js", name))
    }

    pub fn layout_file(&self, layout: &str) -> PathBuf {
        self.join(LAYOUTS_DIR).join(format!("{}{}", layout, VIEW_SUFFIX))
    }

    pub fn importmap_file(&self) -> PathBuf {
        self.join(IMPORTMAP_FILE)
    }

    /// Path relative to the root, for display
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    /// Sorted page names under `app/views/home`, excluding `index`
    pub fn list_home_views(&self) -> Result<Vec<String>> {
        let dir = self.join(HOME_VIEWS_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut views = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            if let Some(stem) = file_name.strip_suffix(VIEW_SUFFIX) {
                if stem != "index" {
                    views.push(stem.to_string());
                }
            }
        }
        views.sort();
        Ok(views)
    }

    /// Whether `config/importmap.rb` declares a pin for `package`
    pub fn is_pinned(&self, package: &str) -> Result<bool> {
        let path = self.importmap_file();
        if !path.is_file() {
            anyhow::bail!(FrontendError::Precondition(format!(
                "{} not found. This project may not be using importmap.",
                IMPORTMAP_FILE
            )));
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let pin = Regex::new(&format!(r#"(?m)^\s*pin\s+["']{}["']"#, regex::escape(package)))?;
        Ok(pin.is_match(&content))
    }

    /// Human-readable application title for generated layouts
    ///
    /// Taken from the first `module CamelCase` in `config/application.rb`,
    /// falling back to the directory name.
    pub fn application_title(&self) -> String {
        static RE_MODULE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"module\s+([A-Z][a-zA-Z0-9_]*)").unwrap());

        if let Ok(content) = std::fs::read_to_string(self.join(APPLICATION_CONFIG)) {
            if let Some(caps) = RE_MODULE.captures(&content) {
                return names::split_camel_case(&caps[1]);
            }
        }

        let dir_name = self
            .root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone())
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        dir_name
            .split('_')
            .map(names::capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    pub(crate) fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, content).expect("write");
    }

    /// Minimal project tree: routes, Gemfile and a home controller
    pub(crate) fn scaffold_project(root: &Path) {
        write_file(
            &root.join(ROUTES_FILE),
            "Rails.application.routes.draw do\n  root \"home#index\"\nend\n",
        );
        write_file(&root.join(MANIFEST_FILE), "source \"https://rubygems.org\"\n");
        write_file(
            &root.join(HOME_CONTROLLER),
            "class HomeController < ApplicationController\n  def index\n  end\nend\n",
        );
        write_file(&root.join("app/views/home/index.html.erb"), "<div></div>\n");
    }

    #[test]
    fn test_open_requires_routes_and_gemfile() {
        let temp = tempdir().expect("tempdir");
        let err = ProjectRoot::open(temp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FrontendError>(),
            Some(FrontendError::NotAProject(_))
        ));

        write_file(&temp.path().join(ROUTES_FILE), "");
        assert!(ProjectRoot::open(temp.path()).is_err());

        write_file(&temp.path().join(MANIFEST_FILE), "");
        assert!(ProjectRoot::open(temp.path()).is_ok());
    }

    #[test]
    fn test_list_home_views_excludes_index_and_sorts() {
        let temp = tempdir().expect("tempdir");
        scaffold_project(temp.path());
        let project = ProjectRoot::open(temp.path()).expect("open");
        write_file(&project.view_file("contact"), "");
        write_file(&project.view_file("about"), "");
        write_file(&temp.path().join("app/views/home/notes.txt"), "");

        assert_eq!(project.list_home_views().expect("list"), vec!["about", "contact"]);
    }

    #[test]
    fn test_is_pinned_matches_exact_package() {
        let temp = tempdir().expect("tempdir");
        scaffold_project(temp.path());
        let project = ProjectRoot::open(temp.path()).expect("open");
        assert!(project.is_pinned("alpinejs").is_err());

        write_file(
            &project.importmap_file(),
            "pin \"application\"\npin \"chart.js\", to: \"https://cdn/chart.js\"\n# pin \"alpinejs\"\n",
        );
        assert!(project.is_pinned("chart.js").expect("check"));
        assert!(!project.is_pinned("chart").expect("check"));
        assert!(!project.is_pinned("alpinejs").expect("check"));
    }

    #[test]
    fn test_application_title_from_module() {
        let temp = tempdir().expect("tempdir");
        scaffold_project(temp.path());
        write_file(
            &temp.path().join(APPLICATION_CONFIG),
            "require_relative \"boot\"\n\nmodule MyShop\n  class Application < Rails::Application\n  end\nend\n",
        );
        let project = ProjectRoot::open(temp.path()).expect("open");
        assert_eq!(project.application_title(), "My Shop");
    }

    #[test]
    fn test_application_title_falls_back_to_directory_name() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path().join("coffee_shop");
        scaffold_project(&root);
        let project = ProjectRoot::open(&root).expect("open");
        assert_eq!(project.application_title(), "Coffee Shop");
    }
}
