//! Path rewriting and cleanup of the mirrored HTML and CSS

use super::reorganize::{AssetKind, ASSETS_DIR};
use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &str = "jpg|jpeg|png|gif|svg|webp|ico";
const FONT_EXTENSIONS: &str = "woff2?|ttf|eot|otf";

/// Relocation rules for HTML, in application order. The script-module rule
/// comes first since it is the narrower one; nested module directories are
/// flattened the same way the files are.
static HTML_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r#"assets/controllers/(?:[^"'\s]+/)?([^/\s"']+\.js)\b"#).unwrap(),
            "assets/js/$1",
        ),
        (
            Regex::new(r#"assets/([^/\s"']+\.js)\b"#).unwrap(),
            "assets/js/$1",
        ),
        (
            Regex::new(r#"assets/([^/\s"']+\.css)\b"#).unwrap(),
            "assets/css/$1",
        ),
        (
            Regex::new(&format!(r#"assets/([^/\s"']+\.(?:{}))\b"#, IMAGE_EXTENSIONS)).unwrap(),
            "assets/img/$1",
        ),
        (
            Regex::new(&format!(r#"assets/([^/\s"']+\.(?:{}))\b"#, FONT_EXTENSIONS)).unwrap(),
            "assets/fonts/$1",
        ),
    ]
});

static RE_CSS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(\s*(["']?)([^"')]+)(["']?)\s*\)"#).unwrap());

static RE_NESTED_INDEX_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="[^"]*/index\.html""#).unwrap());

static RE_BARE_INDEX_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="index\.html""#).unwrap());

static RE_CSRF_META: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta name="csrf-(?:param|token)"[^>]*>"#).unwrap());

/// Rewrites asset references in mirrored HTML for one server port
#[derive(Debug, Clone)]
pub struct HtmlRewriter {
    absolute_images: Regex,
}

impl HtmlRewriter {
    pub fn new(port: u16) -> Result<Self> {
        let absolute_images = Regex::new(&format!(
            r#"http://localhost:{}/([^/\s"']+\.(?:{}))\b"#,
            port, IMAGE_EXTENSIONS
        ))?;
        Ok(Self { absolute_images })
    }

    /// `assets/<name>.<ext>` gains its type directory; absolute image URLs
    /// on the dev server become `assets/img/<name>`.
    /// Already relocated references are left alone.
    pub fn rewrite(&self, content: &str) -> String {
        let mut out = content.to_string();
        for (pattern, replacement) in HTML_RULES.iter() {
            out = pattern.replace_all(&out, *replacement).into_owned();
        }
        self.absolute_images
            .replace_all(&out, "assets/img/$1")
            .into_owned()
    }
}

/// Target for a relative stylesheet `url()`, or `None` to keep it as is
fn relocated_url(url: &str) -> Option<String> {
    if url.starts_with('/') || url.contains(':') {
        return None;
    }

    let split = url.find(['?', '#']).unwrap_or(url.len());
    let (path, suffix) = url.split_at(split);
    let name = path.rsplit('/').next().filter(|n| !n.is_empty())?;

    let dir = match AssetKind::for_path(Path::new(name))? {
        AssetKind::Font => AssetKind::Font.dir_name(),
        AssetKind::Image => AssetKind::Image.dir_name(),
        AssetKind::Script | AssetKind::Stylesheet => return None,
    };
    Some(format!("/{}/{}/{}{}", ASSETS_DIR, dir, name, suffix))
}

/// Point font and image `url(...)` references at `/assets/fonts/` and
/// `/assets/img/`. Absolute, `data:` and remote URLs are untouched.
pub fn rewrite_css_urls(content: &str) -> String {
    RE_CSS_URL
        .replace_all(content, |caps: &Captures| match relocated_url(caps[2].trim()) {
            Some(target) => format!("url(\"{}\")", target),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Links to `index.html` point at `/`; CSRF meta tags are dropped
pub fn clean_html(content: &str) -> String {
    let out = RE_NESTED_INDEX_LINK.replace_all(content, r#"href="/""#);
    let out = RE_BARE_INDEX_LINK.replace_all(&out, r#"href="/""#);
    RE_CSRF_META.replace_all(&out, "").into_owned()
}

/// Apply `transform` to every file under `dir` whose name ends with
/// `suffix`, writing back only the files that changed. Returns that count.
fn transform_files(dir: &Path, suffix: &str, transform: impl Fn(&str) -> String) -> Result<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }

    let mut changed = 0;
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || !path.to_string_lossy().ends_with(suffix) {
            continue;
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let updated = transform(&content);
        if updated != content {
            std::fs::write(path, updated)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            changed += 1;
        }
    }
    Ok(changed)
}

/// Rewrite asset references in every HTML file of the export
pub fn rewrite_html_files(output_dir: &Path, port: u16) -> Result<usize> {
    let rewriter = HtmlRewriter::new(port)?;
    transform_files(output_dir, ".html", |content| rewriter.rewrite(content))
}

/// Rewrite `url(...)` references in the relocated stylesheets
pub fn rewrite_css_files(output_dir: &Path) -> Result<usize> {
    transform_files(
        &AssetKind::Stylesheet.destination(output_dir),
        ".css",
        rewrite_css_urls,
    )
}

/// Strip server-only artifacts from every HTML file of the export
pub fn clean_html_files(output_dir: &Path) -> Result<usize> {
    transform_files(output_dir, ".html", clean_html)
}
