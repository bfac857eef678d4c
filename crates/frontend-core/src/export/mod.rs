//! Static export of a running development server
//!
//! Stages, in order:
//! 1. `server`: find the live server and its port from the pid file
//! 2. `mirror`: crawl the site into the output directory
//! 3. `reorganize`: move assets into `assets/{img,js,css,fonts}`
//! 4. `rewrite`: fix asset references in HTML and CSS, strip CSRF tags
//! 5. `archive`: optionally zip the result

pub mod archive;
pub mod mirror;
pub mod reorganize;
pub mod rewrite;
pub mod server;

use crate::config::BuildConfig;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub use archive::{archive_export, archive_path};
pub use mirror::{mirror_site, MirrorReport};
pub use reorganize::{prepare_asset_dirs, reorganize, AssetKind, ReorganizeReport};
pub use rewrite::{clean_html, rewrite_css_urls, HtmlRewriter};
pub use server::{detect_server, ServerInfo, DEFAULT_PORT};

/// Counts from the stages that run after mirroring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub moved: usize,
    pub skipped: usize,
    pub html_rewritten: usize,
    pub css_rewritten: usize,
    pub html_cleaned: usize,
}

/// Runs the export stages for one project
#[derive(Debug, Clone)]
pub struct Exporter {
    root: PathBuf,
    config: BuildConfig,
}

impl Exporter {
    pub fn new(root: &Path, config: BuildConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output_dir)
    }

    pub fn mirror_tool(&self) -> &str {
        &self.config.mirror_tool
    }

    pub fn detect_server(&self) -> Result<ServerInfo> {
        detect_server(&self.root, &self.config.pid_file)
    }

    pub async fn mirror(&self, port: u16) -> Result<MirrorReport> {
        mirror_site(
            &self.root,
            &self.config.output_dir,
            &self.config.mirror_tool,
            port,
        )
        .await
    }

    /// Reorganize, rewrite and clean an already mirrored tree
    pub fn finish(&self, port: u16) -> Result<ExportReport> {
        let out = self.output_dir();

        prepare_asset_dirs(&out)?;
        let moved = reorganize(&out)?;
        let html_rewritten = rewrite::rewrite_html_files(&out, port)?;
        let css_rewritten = rewrite::rewrite_css_files(&out)?;
        let html_cleaned = rewrite::clean_html_files(&out)?;

        Ok(ExportReport {
            moved: moved.moved,
            skipped: moved.skipped,
            html_rewritten,
            css_rewritten,
            html_cleaned,
        })
    }

    pub fn archive(&self) -> Result<(PathBuf, usize)> {
        archive_export(&self.output_dir())
    }
}
