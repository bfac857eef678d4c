//! Header/footer shell of `app/views/layouts/application.html.erb`

use super::Fragment;
use crate::error::FrontendError;
use anyhow::Result;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

const HEADER_RENDER: &str = "<%= render 'shared/header' %>";
const FOOTER_RENDER: &str = "<%= render 'shared/footer' %>";
const MAIN_OPEN: &str = "<main class=\"min-h-screen\">";
const YIELD_TAG: &str = "<%= yield %>";

static RE_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+charset\s*=\s*["']utf-8["']"#).unwrap());
static RE_MAIN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:<main[^>]*>|</main>)[ \t]*\r?\n").unwrap());
static RE_MAIN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<main[^>]*>|</main>").unwrap());
static RE_BODY_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<body[^>]*>").unwrap());
static RE_SHELL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*(?:<%= render 'shared/(?:header|footer)' %>|<main class="min-h-screen">|</main>)[ \t]*\r?\n"#,
    )
    .unwrap()
});

/// Wraps the page body in the shared header, a `<main>` element and the
/// shared footer, and declares a UTF-8 charset
#[derive(Debug, Clone, Default)]
pub struct ApplicationShell;

impl Fragment for ApplicationShell {
    fn describe(&self) -> String {
        "shared header/footer shell".to_string()
    }

    fn apply(&self, content: &str, path: &Path) -> Result<Option<String>> {
        if content.contains(HEADER_RENDER) {
            return Ok(None);
        }

        let missing = |anchor: &str| FrontendError::HostStructureNotFound {
            anchor: anchor.to_string(),
            path: path.to_path_buf(),
        };
        if !RE_BODY_OPEN.is_match(content) {
            anyhow::bail!(missing("'<body>'"));
        }
        if !content.contains(YIELD_TAG) {
            anyhow::bail!(missing("'<%= yield %>'"));
        }

        let mut layout = content.to_string();
        if !RE_CHARSET.is_match(&layout) {
            layout = layout.replacen("</title>", "</title>\n    <meta charset=\"utf-8\">", 1);
        }

        let layout = RE_MAIN_LINE.replace_all(&layout, "");
        let layout = RE_MAIN_TAG.replace_all(&layout, "");

        let layout = RE_BODY_OPEN.replace(&layout, |caps: &regex::Captures| {
            format!("{}\n    {}\n    {}", &caps[0], HEADER_RENDER, MAIN_OPEN)
        });
        let layout = layout.replacen(
            YIELD_TAG,
            &format!("{}\n    </main>\n    {}", YIELD_TAG, FOOTER_RENDER),
            1,
        );
        Ok(Some(layout))
    }

    fn remove(&self, content: &str, _path: &Path) -> Result<Option<String>> {
        if !content.contains(HEADER_RENDER) {
            return Ok(None);
        }
        Ok(Some(RE_SHELL_LINE.replace_all(content, "").into_owned()))
    }
}
