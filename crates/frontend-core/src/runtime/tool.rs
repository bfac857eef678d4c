//! External executables the CLI delegates to
//!
//! The project generator, the site mirroring tool, the importmap pin manager
//! and the development server launcher all run as child processes.

use crate::error::FrontendError;
use crate::project::{DEV_BIN, IMPORTMAP_BIN};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

/// A collaborator executable
#[derive(Debug, Clone)]
pub struct ExternalTool {
    /// Program to run: a name looked up in PATH or a path to a binstub
    pub program: String,
    /// Display name for user-facing messages
    pub display_name: String,
    /// URL to the documentation, when one is known
    pub docs_url: Option<&'static str>,
}

/// Combined output of a finished tool run
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub output: String,
}

impl ExternalTool {
    /// The Rails project generator
    pub fn rails() -> Self {
        Self {
            program: "rails".to_string(),
            display_name: "Rails".to_string(),
            docs_url: Some("https://guides.rubyonrails.org/install_ruby_on_rails.html"),
        }
    }

    /// The site mirroring tool (`wget` unless configured otherwise)
    pub fn mirror(program: &str) -> Self {
        let display_name = Path::new(program)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.to_string());
        let docs_url = (display_name == "wget").then_some("https://www.gnu.org/software/wget/");
        Self {
            program: program.to_string(),
            display_name,
            docs_url,
        }
    }

    /// The project's `bin/importmap` binstub
    pub fn importmap(root: &Path) -> Self {
        Self {
            program: root.join(IMPORTMAP_BIN).to_string_lossy().into_owned(),
            display_name: "importmap".to_string(),
            docs_url: Some("https://github.com/rails/importmap-rails"),
        }
    }

    /// The project's `bin/dev` launcher
    pub fn dev_server(root: &Path) -> Self {
        Self {
            program: root.join(DEV_BIN).to_string_lossy().into_owned(),
            display_name: "bin/dev".to_string(),
            docs_url: Some("https://guides.rubyonrails.org/command_line.html"),
        }
    }

    /// Check if the tool is installed and available in PATH (or, for a
    /// binstub path, present on disk)
    pub fn is_installed(&self) -> bool {
        if self.program.contains('/') {
            return Path::new(&self.program).is_file();
        }
        std::process::Command::new("which")
            .arg(&self.program)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Get the installed tool version (if available)
    pub fn get_version(&self) -> Option<String> {
        std::process::Command::new(&self.program)
            .arg("--version")
            .output()
            .ok()
            .and_then(|output| {
                if output.status.success() {
                    String::from_utf8(output.stdout)
                        .ok()
                        .map(|s| s.trim().to_string())
                } else {
                    None
                }
            })
    }

    /// Open documentation in browser
    pub fn open_docs(&self) -> Result<()> {
        let Some(url) = self.docs_url else {
            anyhow::bail!("No documentation link is known for {}", self.display_name);
        };
        open::that(url).with_context(|| format!("Failed to open {}", url))?;
        Ok(())
    }

    fn spawn_failure(&self, e: std::io::Error) -> FrontendError {
        FrontendError::ExternalTool {
            tool: self.display_name.clone(),
            output: format!("could not start '{}': {}", self.program, e),
        }
    }

    /// Run the tool in `cwd`, relaying stdout and stderr line by line.
    /// There is no timeout; a non-zero exit status is an error.
    pub async fn run_streaming(&self, args: &[String], cwd: &Path) -> Result<()> {
        println!();
        println!(
            "{} {} {}",
            "Running:".dimmed(),
            self.program.yellow(),
            args.join(" ").yellow()
        );
        println!();

        let mut child = TokioCommand::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_failure(e))?;

        let stdout = child.stdout.take().context("Failed to capture stdout")?;
        let stderr = child.stderr.take().context("Failed to capture stderr")?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();
        let mut stdout_open = true;
        let mut stderr_open = true;

        while stdout_open || stderr_open {
            tokio::select! {
                line = stdout_reader.next_line(), if stdout_open => {
                    match line {
                        Ok(Some(line)) => println!("  {}", line),
                        Ok(None) => stdout_open = false,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stdout:".red(), e);
                            stdout_open = false;
                        }
                    }
                }
                line = stderr_reader.next_line(), if stderr_open => {
                    match line {
                        Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                        Ok(None) => stderr_open = false,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stderr:".red(), e);
                            stderr_open = false;
                        }
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("Failed to wait for {}", self.display_name))?;
        println!();

        if !status.success() {
            anyhow::bail!(FrontendError::ExternalTool {
                tool: self.display_name.clone(),
                output: format!("exit code {}", status.code().unwrap_or(-1)),
            });
        }
        Ok(())
    }

    /// Run the tool in `cwd` and collect stdout and stderr together
    pub async fn capture(&self, args: &[String], cwd: &Path) -> Result<CapturedOutput> {
        let output = TokioCommand::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_failure(e))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CapturedOutput {
            success: output.status.success(),
            code: output.status.code(),
            output: text,
        })
    }
}
