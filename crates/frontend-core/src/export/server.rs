//! Development server detection from its pid file

use crate::error::FrontendError;
use anyhow::Result;
use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

/// Port assumed when the server's command line does not name one
pub const DEFAULT_PORT: u16 = 3000;

static RE_LISTEN_ADDR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"tcp://[^:\s]+:(\d+)").unwrap());

/// A live development server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerInfo {
    pub pid: u32,
    pub port: u16,
}

/// Port from a server command line such as `puma 6.4 (tcp://127.0.0.1:3000) [blog]`
pub fn parse_listen_port(args: &str) -> Option<u16> {
    RE_LISTEN_ADDR
        .captures(args)
        .and_then(|caps| caps[1].parse().ok())
}

/// Command line of a live process, or `None` if no such process exists
fn process_args(pid: u32) -> Option<String> {
    let output = Command::new("ps")
        .args(["-p", &pid.to_string(), "-o", "args="])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let args = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if args.is_empty() {
        None
    } else {
        Some(args)
    }
}

/// Read the pid file and confirm the process behind it is alive
pub fn detect_server(root: &Path, pid_file: &Path) -> Result<ServerInfo> {
    let path = root.join(pid_file);
    let not_running = || FrontendError::ServerNotRunning {
        pid_file: pid_file.to_path_buf(),
    };

    let Ok(content) = std::fs::read_to_string(&path) else {
        anyhow::bail!(not_running());
    };
    let Ok(pid) = content.trim().parse::<u32>() else {
        anyhow::bail!(not_running());
    };
    let Some(args) = process_args(pid) else {
        anyhow::bail!(not_running());
    };

    Ok(ServerInfo {
        pid,
        port: parse_listen_port(&args).unwrap_or(DEFAULT_PORT),
    })
}
