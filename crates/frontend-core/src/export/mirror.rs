//! Mirroring the running site with an external crawler

use crate::config::project::validate_output_dir;
use crate::error::FrontendError;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;
use url::Url;

/// Lines of crawler output kept for error reports
const OUTPUT_TAIL_LINES: usize = 20;

/// Outcome of the mirror stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    /// The crawler exited successfully
    pub clean_exit: bool,
    /// A `host:port` wrapper directory was flattened
    pub hoisted: bool,
    /// Tail of the crawler's output when it exited with an error
    pub output_tail: Option<String>,
}

/// Root URL of the local development server
pub fn site_url(port: u16) -> Result<Url> {
    let url_str = format!("http://localhost:{}/", port);
    Url::parse(&url_str).with_context(|| format!("Invalid server URL: {}", url_str))
}

/// Crawler arguments: follow internal links, rewrite them for offline use
/// and fetch every page requisite
pub fn mirror_args(output_dir: &Path, url: &Url) -> Vec<String> {
    vec![
        "--mirror".to_string(),
        "--convert-links".to_string(),
        "--adjust-extension".to_string(),
        "--page-requisites".to_string(),
        "--no-parent".to_string(),
        format!("--directory-prefix={}", output_dir.display()),
        url.to_string(),
    ]
}

/// Remove a previous export
pub fn clear_output_dir(output_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        std::fs::remove_dir_all(output_dir)
            .with_context(|| format!("Failed to clear {}", output_dir.display()))?;
    }
    Ok(())
}

/// Move the contents of `<output_dir>/localhost:<port>` up one level and
/// drop the wrapper. Returns whether a wrapper was found.
pub fn hoist_host_dir(output_dir: &Path, port: u16) -> Result<bool> {
    let wrapper = output_dir.join(format!("localhost:{}", port));
    if !wrapper.is_dir() {
        return Ok(false);
    }

    for entry in std::fs::read_dir(&wrapper)
        .with_context(|| format!("Failed to read directory: {}", wrapper.display()))?
    {
        let entry = entry?;
        let dest = output_dir.join(entry.file_name());
        std::fs::rename(entry.path(), &dest).with_context(|| {
            format!(
                "Failed to move {} to {}",
                entry.path().display(),
                dest.display()
            )
        })?;
    }
    std::fs::remove_dir_all(&wrapper)
        .with_context(|| format!("Failed to remove {}", wrapper.display()))?;
    Ok(true)
}

fn has_content(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

fn tail(output: &[u8]) -> String {
    let text = String::from_utf8_lossy(output);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
    lines[start..].join("\n")
}

/// Clear `output_dir`, crawl `http://localhost:<port>/` into it with `tool`,
/// and flatten the crawler's host directory
///
/// No timeout is applied: mirroring a large site takes as long as it takes.
pub async fn mirror_site(
    root: &Path,
    output_dir: &Path,
    tool: &str,
    port: u16,
) -> Result<MirrorReport> {
    validate_output_dir(output_dir)?;
    let target = root.join(output_dir);
    clear_output_dir(&target)?;

    let url = site_url(port)?;
    let output = TokioCommand::new(tool)
        .args(mirror_args(output_dir, &url))
        .current_dir(root)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| FrontendError::ExternalTool {
            tool: tool.to_string(),
            output: format!("could not be started: {}", e),
        })?;

    let hoisted = hoist_host_dir(&target, port)?;
    let clean_exit = output.status.success();

    if !clean_exit && !has_content(&target) {
        anyhow::bail!(FrontendError::ExternalTool {
            tool: tool.to_string(),
            output: format!(
                "exit code {}, nothing was mirrored from {}\n{}",
                output.status.code().unwrap_or(-1),
                url,
                tail(&output.stderr)
            ),
        });
    }

    Ok(MirrorReport {
        clean_exit,
        hoisted,
        output_tail: (!clean_exit).then(|| tail(&output.stderr)),
    })
}
