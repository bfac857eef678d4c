//! Route declarations in `config/routes.rb`

use super::{Fragment, HostFile, PatchOutcome};
use crate::error::FrontendError;
use anyhow::Result;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Controller every generated route points at
const ROUTE_CONTROLLER: &str = "home";

static RE_DRAW_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Rails\.application\.routes\.draw\s+do[ \t]*\r?\n").unwrap());

static RE_ROOT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*root\b.*(?:\n|\z)").unwrap());

/// One route line: either `get "/page", to: "home#action"` or the single
/// `root "home#action"` declaration
#[derive(Debug, Clone)]
pub struct RouteFragment {
    pub page: String,
    pub action: String,
    pub root: bool,
}

impl RouteFragment {
    pub fn page(page: &str, action: &str) -> Self {
        Self {
            page: page.to_string(),
            action: action.to_string(),
            root: false,
        }
    }

    pub fn root(action: &str) -> Self {
        Self {
            page: String::new(),
            action: action.to_string(),
            root: true,
        }
    }

    /// The declaration, without indentation or newline
    pub fn declaration(&self) -> String {
        if self.root {
            format!("root \"{}#{}\"", ROUTE_CONTROLLER, self.action)
        } else {
            format!(
                "get \"/{}\", to: \"{}#{}\"",
                self.page, ROUTE_CONTROLLER, self.action
            )
        }
    }

    fn line(&self) -> String {
        format!("  {}\n", self.declaration())
    }

    fn page_pattern(&self) -> Result<Regex> {
        Ok(Regex::new(&format!(
            r#"(?m)^[ \t]*get\s+['"]/{}['"].*(?:\n|\z)"#,
            regex::escape(&self.page)
        ))?)
    }

    fn insert_after_draw_block(&self, content: &str, path: &Path) -> Result<String> {
        let Some(marker) = RE_DRAW_BLOCK.find(content) else {
            anyhow::bail!(FrontendError::HostStructureNotFound {
                anchor: "'Rails.application.routes.draw do'".to_string(),
                path: path.to_path_buf(),
            });
        };
        let mut updated = String::with_capacity(content.len() + 64);
        updated.push_str(&content[..marker.end()]);
        updated.push_str(&self.line());
        updated.push_str(&content[marker.end()..]);
        Ok(updated)
    }

    fn apply_root(&self, content: &str, path: &Path) -> Result<Option<String>> {
        let existing: Vec<_> = RE_ROOT_LINE.find_iter(content).collect();
        if existing.is_empty() {
            return self.insert_after_draw_block(content, path).map(Some);
        }

        let declaration = self.declaration();
        if existing.len() == 1 && existing[0].as_str().trim() == declaration {
            return Ok(None);
        }

        // The first root line is replaced in place, any others are dropped
        let mut updated = String::with_capacity(content.len());
        let mut last = 0;
        for (i, m) in existing.iter().enumerate() {
            updated.push_str(&content[last..m.start()]);
            if i == 0 {
                updated.push_str(&self.line());
            }
            last = m.end();
        }
        updated.push_str(&content[last..]);
        Ok(Some(updated))
    }
}

impl Fragment for RouteFragment {
    fn describe(&self) -> String {
        if self.root {
            format!("root route {}#{}", ROUTE_CONTROLLER, self.action)
        } else {
            format!("route /{}", self.page)
        }
    }

    fn apply(&self, content: &str, path: &Path) -> Result<Option<String>> {
        if self.root {
            return self.apply_root(content, path);
        }

        let declaration = self.declaration();
        if content.lines().any(|line| line.trim() == declaration) {
            return Ok(None);
        }
        self.insert_after_draw_block(content, path).map(Some)
    }

    fn remove(&self, content: &str, _path: &Path) -> Result<Option<String>> {
        if self.root {
            let declaration = self.declaration();
            let Some(m) = RE_ROOT_LINE
                .find_iter(content)
                .find(|m| m.as_str().trim() == declaration)
            else {
                return Ok(None);
            };
            return Ok(Some(format!("{}{}", &content[..m.start()], &content[m.end()..])));
        }

        let pattern = self.page_pattern()?;
        if !pattern.is_match(content) {
            return Ok(None);
        }
        Ok(Some(pattern.replace_all(content, "").into_owned()))
    }
}

/// Add a route to `home#<action>`; with `as_root` the single root route is
/// replaced instead. Repeated insertion is a no-op.
pub fn insert_route(routes: &Path, page: &str, action: &str, as_root: bool) -> Result<PatchOutcome> {
    let fragment = if as_root {
        RouteFragment::root(action)
    } else {
        RouteFragment::page(page, action)
    };
    HostFile::new(routes).apply_fragment(&fragment)
}

/// Delete the `get "/<page>"` declaration; absent routes are not an error
pub fn remove_route(routes: &Path, page: &str) -> Result<PatchOutcome> {
    HostFile::new(routes).remove_fragment(&RouteFragment::page(page, page))
}
