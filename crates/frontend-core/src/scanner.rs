//! Reference scanning before destructive removals
//!
//! Read-only. Used to warn the operator that a Stimulus controller or an
//! importmap pin is still referenced somewhere in the project.

use crate::names;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A subtree, the file suffix scanned inside it, and the alternative
/// patterns any of which counts as a reference
#[derive(Debug, Clone)]
pub struct ScanTarget {
    pub subtree: PathBuf,
    pub suffix: &'static str,
    pub patterns: Vec<Regex>,
}

/// Everything that must be searched to find references to one entity
#[derive(Debug, Clone)]
pub struct UsageQuery {
    pub targets: Vec<ScanTarget>,
}

impl UsageQuery {
    /// References to a Stimulus controller in view templates:
    /// `data-controller="a name b"` and `data: { controller: "name" }`,
    /// matching whole tokens in either underscore or dashed form
    pub fn stimulus_controller(name: &str) -> Result<Self> {
        let identifiers = format!(
            "(?:{}|{})",
            regex::escape(name),
            regex::escape(&names::stimulus_identifier(name))
        );
        let attribute = Regex::new(&format!(
            r#"data-controller=["'](?:[^"']*\s)?{identifiers}(?:\s[^"']*)?["']"#
        ))?;
        let helper = Regex::new(&format!(
            r#"data:\s*\{{[^}}]*controller:\s*["'](?:[^"']*\s)?{identifiers}(?:\s[^"']*)?["'][^}}]*\}}"#
        ))?;

        Ok(Self {
            targets: vec![ScanTarget {
                subtree: PathBuf::from("app/views"),
                suffix: ".html.erb",
                patterns: vec![attribute, helper],
            }],
        })
    }

    /// References to an importmap pin: import specifiers in scripts, and any
    /// exact quoted occurrence in view templates
    pub fn pin(package: &str) -> Result<Self> {
        let quoted = format!(r#"["']{}["']"#, regex::escape(package));

        Ok(Self {
            targets: vec![
                ScanTarget {
                    subtree: PathBuf::from("app/javascript"),
                    suffix: ".js",
                    patterns: vec![
                        Regex::new(&format!(r"from\s+{}", quoted))?,
                        Regex::new(&format!(r"import\s+{}", quoted))?,
                        Regex::new(&format!(r"import\s+.+\s+from\s+{}", quoted))?,
                    ],
                },
                ScanTarget {
                    subtree: PathBuf::from("app/views"),
                    suffix: ".html.erb",
                    patterns: vec![Regex::new(&quoted)?],
                },
            ],
        })
    }
}

/// Every file under `scan_root` matching the query, deduplicated, in
/// discovery order (targets in order, files sorted by name)
pub fn find_usages(scan_root: &Path, query: &UsageQuery) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for target in &query.targets {
        let dir = scan_root.join(&target.subtree);
        if !dir.is_dir() {
            continue;
        }

        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !path.to_string_lossy().ends_with(target.suffix) {
                continue;
            }

            // Binary or non-UTF-8 files cannot hold a textual reference
            let Ok(content) = std::fs::read_to_string(path) else {
                continue;
            };
            if target.patterns.iter().any(|p| p.is_match(&content))
                && seen.insert(path.to_path_buf())
            {
                found.push(path.to_path_buf());
            }
        }
    }

    Ok(found)
}
