//! Actions and layout directives in the home controller

use super::{Fragment, HostFile, PatchOutcome};
use crate::error::FrontendError;
use crate::project::HOME_CONTROLLER_CLASS;
use anyhow::Result;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static RE_EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// An empty action method: `def <name>` / `end`
#[derive(Debug, Clone)]
pub struct ControllerAction {
    pub name: String,
}

impl ControllerAction {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    fn definition_pattern(&self) -> Result<Regex> {
        Ok(Regex::new(&format!(
            r"(?m)^[ \t]*def[ \t]+{}[ \t]*\r?$",
            regex::escape(&self.name)
        ))?)
    }

    /// From the `def` line through the first `end` line, plus the blank
    /// line insertion leaves behind
    fn block_pattern(&self) -> Result<Regex> {
        Ok(Regex::new(&format!(
            r"(?ms)^[ \t]*def[ \t]+{}[ \t]*\r?\n.*?^[ \t]*end[ \t]*\r?(?:\n(?:[ \t]*\r?\n)?|\z)",
            regex::escape(&self.name)
        ))?)
    }
}

/// Byte offset of the last line that is exactly `end`
fn last_block_terminator(content: &str) -> Option<usize> {
    let mut offset = 0;
    let mut last = None;
    for line in content.split_inclusive('\n') {
        if line.trim() == "end" {
            last = Some(offset);
        }
        offset += line.len();
    }
    last
}

impl Fragment for ControllerAction {
    fn describe(&self) -> String {
        format!("action {}", self.name)
    }

    fn apply(&self, content: &str, path: &Path) -> Result<Option<String>> {
        if self.definition_pattern()?.is_match(content) {
            return Ok(None);
        }

        let Some(at) = last_block_terminator(content) else {
            anyhow::bail!(FrontendError::HostStructureNotFound {
                anchor: "a closing 'end' line".to_string(),
                path: path.to_path_buf(),
            });
        };

        let mut updated = String::with_capacity(content.len() + 32);
        updated.push_str(&content[..at]);
        updated.push_str(&format!("  def {}\n  end\n\n", self.name));
        updated.push_str(&content[at..]);
        Ok(Some(updated))
    }

    fn remove(&self, content: &str, _path: &Path) -> Result<Option<String>> {
        let pattern = self.block_pattern()?;
        if !pattern.is_match(content) {
            return Ok(None);
        }
        let removed = pattern.replace_all(content, "");
        Ok(Some(
            RE_EXCESS_BLANK_LINES
                .replace_all(&removed, "\n\n")
                .into_owned(),
        ))
    }
}

/// `layout "<layout>", only: :<view>` right after the class declaration
#[derive(Debug, Clone)]
pub struct LayoutDirective {
    pub layout: String,
    pub view: String,
    pub host_class: String,
}

impl LayoutDirective {
    pub fn new(layout: &str, view: &str) -> Self {
        Self {
            layout: layout.to_string(),
            view: view.to_string(),
            host_class: HOME_CONTROLLER_CLASS.to_string(),
        }
    }

    fn declared_pattern(&self) -> Result<Regex> {
        Ok(Regex::new(&format!(
            r#"layout\s+["']{}["']"#,
            regex::escape(&self.layout)
        ))?)
    }

    fn class_pattern(&self) -> Result<Regex> {
        Ok(Regex::new(&format!(
            r"class\s+{}\s*<\s*ApplicationController[ \t]*\r?\n",
            regex::escape(&self.host_class)
        ))?)
    }

    fn line_pattern(&self) -> Result<Regex> {
        Ok(Regex::new(&format!(
            r#"(?m)^[ \t]*layout\s+["']{}["'][^\n]*(?:\n(?:[ \t]*\r?\n)?|\z)"#,
            regex::escape(&self.layout)
        ))?)
    }
}

impl Fragment for LayoutDirective {
    fn describe(&self) -> String {
        format!("layout \"{}\" for :{}", self.layout, self.view)
    }

    fn apply(&self, content: &str, path: &Path) -> Result<Option<String>> {
        if self.declared_pattern()?.is_match(content) {
            anyhow::bail!(FrontendError::DirectiveConflict {
                layout: self.layout.clone(),
                path: path.to_path_buf(),
            });
        }

        let Some(class_line) = self.class_pattern()?.find(content) else {
            anyhow::bail!(FrontendError::HostStructureNotFound {
                anchor: format!("'class {} < ApplicationController'", self.host_class),
                path: path.to_path_buf(),
            });
        };

        let mut updated = String::with_capacity(content.len() + 48);
        updated.push_str(&content[..class_line.end()]);
        updated.push_str(&format!(
            "  layout \"{}\", only: :{}\n\n",
            self.layout, self.view
        ));
        updated.push_str(&content[class_line.end()..]);
        Ok(Some(updated))
    }

    fn remove(&self, content: &str, _path: &Path) -> Result<Option<String>> {
        let pattern = self.line_pattern()?;
        if !pattern.is_match(content) {
            return Ok(None);
        }
        Ok(Some(pattern.replace_all(content, "").into_owned()))
    }
}

/// Add an empty action before the class's closing `end`; no-op if an action
/// with exactly this name exists
pub fn insert_controller_action(controller: &Path, name: &str) -> Result<PatchOutcome> {
    HostFile::new(controller).apply_fragment(&ControllerAction::new(name))
}

/// Remove the action block and collapse the blank lines it leaves behind
pub fn remove_controller_action(controller: &Path, name: &str) -> Result<PatchOutcome> {
    HostFile::new(controller).remove_fragment(&ControllerAction::new(name))
}

/// Declare `layout` for `view`. Fails with `DirectiveConflict` (leaving the
/// file untouched) if the layout is already declared.
pub fn insert_layout_directive(controller: &Path, layout: &str, view: &str) -> Result<PatchOutcome> {
    HostFile::new(controller).apply_fragment(&LayoutDirective::new(layout, view))
}

/// Delete the directive line for `layout`; no-op if absent
pub fn remove_layout_directive(controller: &Path, layout: &str) -> Result<PatchOutcome> {
    HostFile::new(controller).remove_fragment(&LayoutDirective::new(layout, ""))
}

/// Name of the first layout whose `only:` scope names `view`
///
/// Recognizes `only: :view`, `only: [:a, :view]` and `only: %i[a view]`.
pub fn find_layout_for_view(controller: &Path, view: &str) -> Result<Option<String>> {
    if !controller.exists() {
        return Ok(None);
    }
    let content = HostFile::new(controller).read()?;
    let view = regex::escape(view);
    let pattern = Regex::new(&format!(
        r#"layout\s+["']([^"']+)["'][^\n]*only:\s*(?::{view}\b|\[[^\]\n]*:{view}\b|%i\[[^\]\n]*\b{view}\b)"#
    ))?;
    Ok(pattern.captures(&content).map(|caps| caps[1].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CONTROLLER: &str =
        "class HomeController < ApplicationController\n  def index\n  end\nend\n";

    fn controller_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("home_controller.rb");
        std::fs::write(&path, content).expect("write");
        (temp, path)
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).expect("read")
    }

    #[test]
    fn test_insert_action_before_last_end() {
        let (_temp, path) = controller_file(CONTROLLER);
        insert_controller_action(&path, "about").expect("insert");
        assert_eq!(
            read(&path),
            "class HomeController < ApplicationController\n  def index\n  end\n  def about\n  end\n\nend\n"
        );
    }

    #[test]
    fn test_insert_action_is_idempotent() {
        let (_temp, path) = controller_file(CONTROLLER);
        insert_controller_action(&path, "about").expect("insert");
        assert_eq!(
            insert_controller_action(&path, "about").expect("insert"),
            PatchOutcome::Unchanged
        );
        assert_eq!(read(&path).matches("def about").count(), 1);
    }

    #[test]
    fn test_insert_action_uses_word_boundary() {
        let (_temp, path) = controller_file(
            "class HomeController < ApplicationController\n  def products\n  end\nend\n",
        );
        assert_eq!(
            insert_controller_action(&path, "product").expect("insert"),
            PatchOutcome::Applied
        );
        let content = read(&path);
        assert!(content.contains("  def product\n"));
        assert!(content.contains("  def products\n"));
    }

    #[test]
    fn test_insert_then_remove_round_trips() {
        let (_temp, path) = controller_file(CONTROLLER);
        insert_controller_action(&path, "about").expect("insert");
        insert_controller_action(&path, "contact").expect("insert");
        remove_controller_action(&path, "about").expect("remove");
        remove_controller_action(&path, "contact").expect("remove");
        assert_eq!(read(&path), CONTROLLER);
    }

    #[test]
    fn test_remove_action_leaves_similar_names() {
        let (_temp, path) = controller_file(CONTROLLER);
        insert_controller_action(&path, "about").expect("insert");
        insert_controller_action(&path, "about_us").expect("insert");
        remove_controller_action(&path, "about").expect("remove");

        let content = read(&path);
        assert!(!content.contains("def about\n"));
        assert!(content.contains("def about_us\n"));
        assert!(!content.contains("\n\n\n"));
    }

    #[test]
    fn test_remove_missing_action_is_noop() {
        let (_temp, path) = controller_file(CONTROLLER);
        assert_eq!(
            remove_controller_action(&path, "about").expect("remove"),
            PatchOutcome::Unchanged
        );
        assert_eq!(read(&path), CONTROLLER);
    }

    #[test]
    fn test_insert_action_without_end_fails() {
        let (_temp, path) = controller_file("# empty\n");
        let err = insert_controller_action(&path, "about").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FrontendError>(),
            Some(FrontendError::HostStructureNotFound { .. })
        ));
    }

    #[test]
    fn test_layout_directive_insert_and_remove() {
        let (_temp, path) = controller_file(CONTROLLER);
        insert_layout_directive(&path, "landing", "about").expect("insert");
        assert_eq!(
            read(&path),
            "class HomeController < ApplicationController\n  layout \"landing\", only: :about\n\n  def index\n  end\nend\n"
        );

        remove_layout_directive(&path, "landing").expect("remove");
        assert_eq!(read(&path), CONTROLLER);
    }

    #[test]
    fn test_duplicate_layout_directive_is_soft_conflict() {
        let (_temp, path) = controller_file(CONTROLLER);
        insert_layout_directive(&path, "landing", "about").expect("insert");
        let before = read(&path);

        let err = insert_layout_directive(&path, "landing", "contact").unwrap_err();
        let condition = err.downcast_ref::<FrontendError>().expect("typed error");
        assert!(matches!(condition, FrontendError::DirectiveConflict { .. }));
        assert!(condition.is_soft());
        assert_eq!(read(&path), before);
    }

    #[test]
    fn test_layout_directive_requires_class_declaration() {
        let (_temp, path) = controller_file("module Foo\nend\n");
        let err = insert_layout_directive(&path, "landing", "about").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FrontendError>(),
            Some(FrontendError::HostStructureNotFound { .. })
        ));
    }

    #[test]
    fn test_find_layout_for_view() {
        let (_temp, path) = controller_file(
            "class HomeController < ApplicationController\n  layout \"landing\", only: :about\n  layout 'shop', only: [:products, :cart]\n  def index\n  end\nend\n",
        );
        assert_eq!(
            find_layout_for_view(&path, "about").expect("find"),
            Some("landing".to_string())
        );
        assert_eq!(
            find_layout_for_view(&path, "cart").expect("find"),
            Some("shop".to_string())
        );
        assert_eq!(find_layout_for_view(&path, "abou").expect("find"), None);
        assert_eq!(find_layout_for_view(&path, "contact").expect("find"), None);
    }

    #[test]
    fn test_find_layout_for_view_missing_controller() {
        let temp = tempdir().expect("tempdir");
        assert_eq!(
            find_layout_for_view(&temp.path().join("nope.rb"), "about").expect("find"),
            None
        );
    }
}
