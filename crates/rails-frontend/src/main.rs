//! rails-frontend CLI - Frontend scaffolding and static builds for Rails projects

use anyhow::Result;
use clap::builder::NonEmptyStringValueParser;
use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::Colorize;
use frontend_core::tui::{Action, Invocation, Outcome};
use frontend_core::ProductConfig;
use std::path::{Path, PathBuf};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// rails-frontend product configuration
#[derive(Clone)]
pub struct RailsFrontendConfig;

impl ProductConfig for RailsFrontendConfig {
    fn name(&self) -> &'static str {
        "rails-frontend"
    }

    fn display_name(&self) -> &'static str {
        "Rails Frontend"
    }

    fn version(&self) -> &'static str {
        CLI_VERSION
    }

    fn docs_url(&self) -> &'static str {
        "https://github.com/rails-frontend/rails-frontend-cli#readme"
    }

    fn cli_description(&self) -> &'static str {
        "Add pages, layouts, Stimulus controllers and static builds to Rails projects"
    }

    fn next_steps(&self, dir: &Path) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_ref() != Some(&dir.to_path_buf()) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: Start the development server
        steps.push(format!("{} run", self.name()));

        // Step 3: Add pages
        steps.push(format!("{} add-page about", self.name()));

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "rails-frontend")]
#[command(version)]
pub struct Args {
    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Rails project with the frontend scaffold
    #[command(visible_alias = "n")]
    New {
        /// Project directory name
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        name: String,

        /// Skip tests, mailers, Active Record and other backend components
        #[arg(long)]
        clean: bool,
    },

    /// Add a page: view, stylesheet, controller action and route
    #[command(name = "add-page", visible_alias = "ap")]
    AddPage {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        name: String,
    },

    /// Remove a page and everything add-page created
    #[command(name = "remove-page", visible_alias = "rp")]
    RemovePage {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        name: String,
    },

    /// Create a Stimulus controller
    #[command(name = "add-stimulus", visible_alias = "as")]
    AddStimulus {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        name: String,
    },

    /// Delete a Stimulus controller
    #[command(name = "remove-stimulus", visible_alias = "rs")]
    RemoveStimulus {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        name: String,
    },

    /// Create a layout and attach it to a view of the home controller
    #[command(name = "add-layout", visible_alias = "al")]
    AddLayout {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        name: String,

        /// View the layout applies to (defaults to the view with the same name)
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        view: Option<String>,
    },

    /// Delete a layout and its controller directive
    #[command(name = "remove-layout", visible_alias = "rl")]
    RemoveLayout {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        name: String,
    },

    /// Pin a JavaScript package with importmap
    #[command(name = "add-pin", visible_alias = "pin")]
    AddPin {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        package: String,
    },

    /// Unpin a JavaScript package
    #[command(name = "remove-pin", visible_alias = "unpin")]
    RemovePin {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        package: String,
    },

    /// Start the development server (bin/dev)
    #[command(visible_alias = "r")]
    Run,

    /// Export the running site as static files
    #[command(visible_alias = "b")]
    Build {
        /// Also package the export as a zip archive
        #[arg(long)]
        zip: bool,
    },

    /// Print the version
    Version,
}

impl From<Command> for Action {
    fn from(command: Command) -> Self {
        match command {
            Command::New { name, clean } => Action::New { name, clean },
            Command::AddPage { name } => Action::AddPage { name },
            Command::RemovePage { name } => Action::RemovePage { name },
            Command::AddStimulus { name } => Action::AddStimulus { name },
            Command::RemoveStimulus { name } => Action::RemoveStimulus { name },
            Command::AddLayout { name, view } => Action::AddLayout { name, view },
            Command::RemoveLayout { name } => Action::RemoveLayout { name },
            Command::AddPin { package } => Action::AddPin { package },
            Command::RemovePin { package } => Action::RemovePin { package },
            Command::Run => Action::Run,
            Command::Build { zip } => Action::Build { zip },
            Command::Version => Action::Version,
        }
    }
}

/// Help and version output (including help shown for a bare invocation)
/// exit with 0; every other parse failure is a usage error
fn parse_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => 1,
    }
}

/// Exit status of a finished command; a declined confirmation is a normal exit
fn exit_code(result: &Result<Outcome>) -> i32 {
    match result {
        Ok(Outcome::Completed | Outcome::Cancelled) => 0,
        Err(_) => 1,
    }
}

#[tokio::main]
async fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let config = RailsFrontendConfig;
    let parsed = Args::command()
        .about(config.cli_description())
        .try_get_matches()
        .and_then(|matches| Args::from_arg_matches(&matches));
    let args = match parsed {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(parse_exit_code(&e));
        }
    };

    let invocation = Invocation {
        action: args.command.into(),
        project_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        yes: args.yes,
    };

    let result = frontend_core::run(&config, invocation).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = &result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
    }
    let code = exit_code(&result);
    if code != 0 {
        std::process::exit(code);
    }
}
