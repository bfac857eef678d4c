//! Rails availability and version check

use super::tool::ExternalTool;
use crate::error::FrontendError;
use anyhow::Result;
use regex::Regex;
use semver::Version;
use std::sync::LazyLock;

/// Oldest Rails release providing `bin/dev`, importmap and tailwindcss-rails
pub const MIN_RAILS_VERSION: Version = Version::new(7, 0, 0);

static RE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: String,
    pub version: Option<Version>,
    pub available: bool,
}

/// First `MAJOR.MINOR[.PATCH]` in a `--version` banner such as `Rails 7.1.3.4`
pub fn parse_version(banner: &str) -> Option<Version> {
    let caps = RE_VERSION.captures(banner)?;
    let major = caps[1].parse().ok()?;
    let minor = caps[2].parse().ok()?;
    let patch = caps
        .get(3)
        .map_or(Some(0), |m| m.as_str().parse().ok())?;
    Some(Version::new(major, minor, patch))
}

/// Probe the `rails` executable
pub fn detect_rails() -> RuntimeInfo {
    let tool = ExternalTool::rails();
    match tool.get_version() {
        Some(banner) => RuntimeInfo {
            name: tool.display_name,
            version: parse_version(&banner),
            available: true,
        },
        None => RuntimeInfo {
            name: tool.display_name,
            version: None,
            available: false,
        },
    }
}

/// Require an installed Rails of at least `min`
pub fn check_rails(min: &Version) -> Result<RuntimeInfo> {
    ensure_supported(detect_rails(), min)
}

fn ensure_supported(info: RuntimeInfo, min: &Version) -> Result<RuntimeInfo> {
    if !info.available {
        anyhow::bail!(FrontendError::Precondition(
            "Rails is not installed. Install it with 'gem install rails' and try again.".to_string()
        ));
    }
    match &info.version {
        Some(version) if version < min => {
            anyhow::bail!(FrontendError::Precondition(format!(
                "Rails {} is installed but {} or newer is required.",
                version, min
            )));
        }
        Some(_) => Ok(info),
        None => anyhow::bail!(FrontendError::Precondition(
            "Could not determine the installed Rails version.".to_string()
        )),
    }
}
