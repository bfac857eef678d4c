//! Command handlers with cliclack output and confirmation prompts

use crate::config::{rails_new_args, ProjectConfig};
use crate::error::FrontendError;
use crate::export::Exporter;
use crate::names;
use crate::patch::{
    find_layout_for_view, insert_controller_action, insert_layout_directive, insert_route,
    remove_controller_action, remove_layout_directive, remove_route, ApplicationShell, HostFile,
    PatchOutcome,
};
use crate::product::ProductConfig;
use crate::project::{ProjectRoot, APPLICATION_LAYOUT, DEV_BIN, IMPORTMAP_BIN};
use crate::runtime::{check_rails, ExternalTool, MIN_RAILS_VERSION};
use crate::scaffold::{self, apply_blueprint, clean_project, templates, Blueprint};
use crate::scanner::{find_usages, UsageQuery};
use anyhow::Result;
use std::convert::Infallible;
use std::path::PathBuf;

/// Markers in `bin/importmap pin` output that mean the package was not pinned
const PIN_FAILURE_MARKERS: &[&str] = &["Couldn't find", "error", "Error"];

/// One CLI verb with its arguments. Names are raw operator input and are
/// normalized by the handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    New { name: String, clean: bool },
    AddPage { name: String },
    RemovePage { name: String },
    AddStimulus { name: String },
    RemoveStimulus { name: String },
    AddLayout { name: String, view: Option<String> },
    RemoveLayout { name: String },
    AddPin { package: String },
    RemovePin { package: String },
    Run,
    Build { zip: bool },
    Version,
}

/// A fully parsed command line
#[derive(Debug, Clone)]
pub struct Invocation {
    pub action: Action,
    /// Directory the command operates in (the project root, or the parent
    /// directory for `new`)
    pub project_dir: PathBuf,
    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// How a command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The operator declined a confirmation; not an error
    Cancelled,
}

/// Dispatch one invocation
pub async fn run<C: ProductConfig>(config: &C, invocation: Invocation) -> Result<Outcome> {
    match &invocation.action {
        Action::Version => {
            println!("{} {}", config.name(), config.version());
            Ok(Outcome::Completed)
        }
        Action::New { name, clean } => new_project(config, &invocation, name, *clean).await,
        Action::AddPage { name } => add_page(&invocation, name),
        Action::RemovePage { name } => remove_page(&invocation, name),
        Action::AddStimulus { name } => add_stimulus(&invocation, name),
        Action::RemoveStimulus { name } => remove_stimulus(&invocation, name),
        Action::AddLayout { name, view } => add_layout(&invocation, name, view.as_deref()),
        Action::RemoveLayout { name } => remove_layout(&invocation, name),
        Action::AddPin { package } => add_pin(&invocation, package).await,
        Action::RemovePin { package } => remove_pin(&invocation, package).await,
        Action::Run => {
            let project = ProjectRoot::open(&invocation.project_dir)?;
            match exec_dev_server(&project)? {}
        }
        Action::Build { zip } => build(config, &invocation, *zip).await,
    }
}

/// Ask for confirmation unless `--yes` was given
fn confirm(invocation: &Invocation, prompt: &str) -> Result<bool> {
    if invocation.yes {
        cliclack::log::info(format!("{} yes (--yes)", prompt))?;
        return Ok(true);
    }
    let confirmed: bool = cliclack::confirm(prompt).initial_value(false).interact()?;
    Ok(confirmed)
}

fn cancelled() -> Result<Outcome> {
    cliclack::outro_cancel("Operation cancelled.")?;
    Ok(Outcome::Cancelled)
}

fn log_patch(outcome: PatchOutcome, applied: String, unchanged: String) -> Result<()> {
    match outcome {
        PatchOutcome::Applied => cliclack::log::success(applied)?,
        PatchOutcome::Unchanged => cliclack::log::info(unchanged)?,
    }
    Ok(())
}

fn warn_usages(project: &ProjectRoot, what: &str, usages: &[PathBuf]) -> Result<()> {
    if usages.is_empty() {
        cliclack::log::info(format!("No usage of this {} found", what))?;
        return Ok(());
    }
    let files: Vec<String> = usages
        .iter()
        .map(|p| format!("  - {}", console::style(project.display_path(p)).cyan()))
        .collect();
    cliclack::log::warning(format!(
        "This {} is used in the following files:\n{}",
        what,
        files.join("\n")
    ))?;
    Ok(())
}

/// When a required tool is missing, offer its documentation
fn offer_docs(invocation: &Invocation, tool: &ExternalTool) -> Result<()> {
    let Some(url) = tool.docs_url else {
        return Ok(());
    };
    if invocation.yes {
        return Ok(());
    }
    let open: bool = cliclack::confirm(format!(
        "{} is not available. Open its documentation ({})?",
        tool.display_name, url
    ))
    .initial_value(false)
    .interact()?;
    if open {
        tool.open_docs()?;
    }
    Ok(())
}

async fn new_project<C: ProductConfig>(
    config: &C,
    invocation: &Invocation,
    name: &str,
    clean: bool,
) -> Result<Outcome> {
    cliclack::intro(format!("{}: new project {}", config.display_name(), name))?;

    let target = invocation.project_dir.join(name);
    if target.exists() {
        anyhow::bail!(FrontendError::AlreadyExists {
            what: "Directory",
            path: target,
        });
    }

    let rails = ExternalTool::rails();
    let info = match check_rails(&MIN_RAILS_VERSION) {
        Ok(info) => info,
        Err(e) => {
            if !rails.is_installed() {
                offer_docs(invocation, &rails)?;
            }
            return Err(e);
        }
    };
    if let Some(version) = &info.version {
        cliclack::log::success(format!("{} {} installed", info.name, version))?;
    }

    rails
        .run_streaming(&rails_new_args(name, clean), &invocation.project_dir)
        .await?;
    cliclack::log::success("Rails project created")?;

    if clean {
        let removed = clean_project(&target)?;
        cliclack::log::success(format!(
            "Removed {} unneeded entries: {}",
            removed.len(),
            removed.join(", ")
        ))?;
    }

    let written = apply_blueprint(&Blueprint::frontend(), &target)?;
    cliclack::log::success(format!("Created {} frontend files", written.len()))?;

    let layout = HostFile::new(target.join(APPLICATION_LAYOUT));
    log_patch(
        layout.apply_fragment(&ApplicationShell)?,
        format!("Updated {}", APPLICATION_LAYOUT),
        format!("{} already renders the shared shell", APPLICATION_LAYOUT),
    )?;

    let project = ProjectRoot::unchecked(&target);
    log_patch(
        insert_route(&project.routes_file(), "home", "index", true)?,
        "Root route set to home#index".to_string(),
        "Root route already points to home#index".to_string(),
    )?;

    println!();
    println!("  Next steps");
    println!();
    for (i, step) in config.next_steps(&target).iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro(format!(
        "Project created in {}\n   Docs: {}",
        target.display(),
        config.docs_url()
    ))?;
    Ok(Outcome::Completed)
}

fn add_page(invocation: &Invocation, name: &str) -> Result<Outcome> {
    let project = ProjectRoot::open(&invocation.project_dir)?;
    let page = names::normalize(name);
    cliclack::intro(format!("Adding page: {}", page))?;

    let view = project.view_file(&page);
    scaffold::write_new(&view, "View", &templates::page_view(&page))?;
    cliclack::log::success(format!("Created {}", project.display_path(&view)))?;

    let stylesheet = project.stylesheet_file(&page);
    if stylesheet.exists() {
        cliclack::log::warning(format!(
            "Kept existing {}",
            project.display_path(&stylesheet)
        ))?;
    } else {
        scaffold::write_new(&stylesheet, "Stylesheet", &templates::page_stylesheet(&page))?;
        cliclack::log::success(format!("Created {}", project.display_path(&stylesheet)))?;
    }

    log_patch(
        insert_controller_action(&project.home_controller(), &page)?,
        format!("Added action '{}' to HomeController", page),
        format!("HomeController already defines '{}'", page),
    )?;
    log_patch(
        insert_route(&project.routes_file(), &page, &page, false)?,
        format!("Added route /{}", page),
        format!("Route /{} already exists", page),
    )?;

    cliclack::outro(format!("Page URL: /{}", page))?;
    Ok(Outcome::Completed)
}

fn remove_page(invocation: &Invocation, name: &str) -> Result<Outcome> {
    let project = ProjectRoot::open(&invocation.project_dir)?;
    let page = names::normalize(name);
    cliclack::intro(format!("Removing page: {}", page))?;

    if page == "home" || page == "index" {
        anyhow::bail!(FrontendError::Conflict(
            "The home page (home/index) cannot be removed.".to_string()
        ));
    }

    let view = project.view_file(&page);
    if !view.exists() {
        anyhow::bail!(FrontendError::NotFound {
            what: "Page",
            target: page,
        });
    }

    if !confirm(invocation, &format!("Delete the '{}' page?", page))? {
        return cancelled();
    }

    scaffold::remove_file(&view)?;
    cliclack::log::success(format!("Deleted {}", project.display_path(&view)))?;

    let stylesheet = project.stylesheet_file(&page);
    if scaffold::remove_file(&stylesheet)? {
        cliclack::log::success(format!("Deleted {}", project.display_path(&stylesheet)))?;
    }

    log_patch(
        remove_controller_action(&project.home_controller(), &page)?,
        format!("Removed action '{}' from HomeController", page),
        format!("HomeController has no action '{}'", page),
    )?;
    log_patch(
        remove_route(&project.routes_file(), &page)?,
        format!("Removed route /{}", page),
        format!("No route /{} to remove", page),
    )?;

    cliclack::outro("Page removed")?;
    Ok(Outcome::Completed)
}

fn add_stimulus(invocation: &Invocation, name: &str) -> Result<Outcome> {
    let project = ProjectRoot::open(&invocation.project_dir)?;
    let controller = names::normalize(name);
    cliclack::intro(format!("Creating Stimulus controller: {}", controller))?;

    let file = project.stimulus_file(&controller);
    scaffold::write_new(
        &file,
        "Stimulus controller",
        &templates::stimulus_controller(&controller),
    )?;
    cliclack::log::success(format!("Created {}", project.display_path(&file)))?;

    cliclack::outro(format!(
        "Attach it with data-controller=\"{}\"",
        names::stimulus_identifier(&controller)
    ))?;
    Ok(Outcome::Completed)
}

fn remove_stimulus(invocation: &Invocation, name: &str) -> Result<Outcome> {
    let project = ProjectRoot::open(&invocation.project_dir)?;
    let controller = names::normalize(name);
    cliclack::intro(format!("Removing Stimulus controller: {}", controller))?;

    let file = project.stimulus_file(&controller);
    if !file.exists() {
        anyhow::bail!(FrontendError::NotFound {
            what: "Stimulus controller",
            target: project.display_path(&file),
        });
    }

    let usages = find_usages(
        project.path(),
        &UsageQuery::stimulus_controller(&controller)?,
    )?;
    warn_usages(&project, "controller", &usages)?;

    if !confirm(
        invocation,
        &format!("Delete the '{}' Stimulus controller?", controller),
    )? {
        return cancelled();
    }

    scaffold::remove_file(&file)?;
    cliclack::log::success(format!("Deleted {}", project.display_path(&file)))?;

    cliclack::outro("Stimulus controller removed")?;
    Ok(Outcome::Completed)
}

/// View the new layout applies to: `--view`, else the same-named view,
/// else an interactive choice
fn select_view(
    invocation: &Invocation,
    layout: &str,
    views: &[String],
    view: Option<&str>,
) -> Result<String> {
    if let Some(requested) = view {
        let requested = names::normalize(requested);
        if !views.contains(&requested) {
            anyhow::bail!(FrontendError::NotFound {
                what: "View",
                target: format!("app/views/home/{}.html.erb", requested),
            });
        }
        return Ok(requested);
    }

    if views.iter().any(|v| v == layout) {
        cliclack::log::info(format!("Matching view found: {}.html.erb", layout))?;
        return Ok(layout.to_string());
    }

    if views.is_empty() {
        anyhow::bail!(FrontendError::Precondition(
            "No view files found in app/views/home.".to_string()
        ));
    }

    if invocation.yes {
        anyhow::bail!(FrontendError::Usage(format!(
            "No view named '{}'. Pass --view to choose one of: {}",
            layout,
            views.join(", ")
        )));
    }

    let mut select = cliclack::select("Which view will this layout be used with?");
    for v in views {
        select = select.item(v.clone(), v, "");
    }
    let chosen: String = select.interact()?;
    Ok(chosen)
}

fn add_layout(invocation: &Invocation, name: &str, view: Option<&str>) -> Result<Outcome> {
    let project = ProjectRoot::open(&invocation.project_dir)?;
    let layout = names::normalize(name);
    cliclack::intro(format!("Creating layout: {}", layout))?;

    let file = project.layout_file(&layout);
    if file.exists() {
        anyhow::bail!(FrontendError::AlreadyExists {
            what: "Layout",
            path: file,
        });
    }

    let views = project.list_home_views()?;
    let view = select_view(invocation, &layout, &views, view)?;

    let controller = project.home_controller();
    if let Some(existing) = find_layout_for_view(&controller, &view)? {
        anyhow::bail!(FrontendError::Conflict(format!(
            "A layout is already defined for the '{}' view: '{}'.\n\
             Remove it first: rails-frontend remove-layout {}",
            view, existing, existing
        )));
    }

    scaffold::write_new(
        &file,
        "Layout",
        &templates::layout(&layout, &project.application_title()),
    )?;
    cliclack::log::success(format!("Created {}", project.display_path(&file)))?;

    match insert_layout_directive(&controller, &layout, &view) {
        Ok(outcome) => log_patch(
            outcome,
            format!("HomeController uses '{}' for '{}'", layout, view),
            format!("HomeController already declares '{}'", layout),
        )?,
        Err(e) => match e.downcast_ref::<FrontendError>() {
            Some(condition) if condition.is_soft() => {
                cliclack::log::warning(condition.to_string())?;
            }
            _ => return Err(e),
        },
    }

    cliclack::outro(format!("Layout '{}' will be used for {}.html.erb", layout, view))?;
    Ok(Outcome::Completed)
}

fn remove_layout(invocation: &Invocation, name: &str) -> Result<Outcome> {
    let project = ProjectRoot::open(&invocation.project_dir)?;
    let layout = names::normalize(name);
    cliclack::intro(format!("Removing layout: {}", layout))?;

    let file = project.layout_file(&layout);
    if !file.exists() {
        anyhow::bail!(FrontendError::NotFound {
            what: "Layout",
            target: project.display_path(&file),
        });
    }

    if !confirm(invocation, &format!("Delete the '{}' layout?", layout))? {
        return cancelled();
    }

    log_patch(
        remove_layout_directive(&project.home_controller(), &layout)?,
        format!("Removed layout '{}' from HomeController", layout),
        format!("HomeController does not declare '{}'", layout),
    )?;
    scaffold::remove_file(&file)?;
    cliclack::log::success(format!("Deleted {}", project.display_path(&file)))?;

    cliclack::outro("Layout removed")?;
    Ok(Outcome::Completed)
}

fn importmap_tool(project: &ProjectRoot) -> Result<ExternalTool> {
    let tool = ExternalTool::importmap(project.path());
    if !tool.is_installed() {
        anyhow::bail!(FrontendError::Precondition(format!(
            "{} not found. This project may not be using importmap.",
            IMPORTMAP_BIN
        )));
    }
    Ok(tool)
}

async fn add_pin(invocation: &Invocation, package: &str) -> Result<Outcome> {
    let project = ProjectRoot::open(&invocation.project_dir)?;
    cliclack::intro(format!("Adding importmap pin: {}", package))?;

    let tool = importmap_tool(&project)?;
    if project.is_pinned(package)? {
        anyhow::bail!(FrontendError::Conflict(format!(
            "'{}' is already pinned in config/importmap.rb",
            package
        )));
    }

    let spinner = cliclack::spinner();
    spinner.start(format!("Pinning {}...", package));
    let captured = tool
        .capture(&["pin".to_string(), package.to_string()], project.path())
        .await?;
    let failed = !captured.success
        || PIN_FAILURE_MARKERS
            .iter()
            .any(|marker| captured.output.contains(marker));
    if failed {
        spinner.stop(format!("Could not pin {}", package));
        anyhow::bail!(FrontendError::ExternalTool {
            tool: tool.display_name.clone(),
            output: captured.output.trim().to_string(),
        });
    }
    spinner.stop(format!("Pinned {}", package));

    cliclack::outro(format!("Don't forget to import '{}' in your JavaScript", package))?;
    Ok(Outcome::Completed)
}

async fn remove_pin(invocation: &Invocation, package: &str) -> Result<Outcome> {
    let project = ProjectRoot::open(&invocation.project_dir)?;
    cliclack::intro(format!("Removing importmap pin: {}", package))?;

    let tool = importmap_tool(&project)?;
    if !project.is_pinned(package)? {
        anyhow::bail!(FrontendError::NotFound {
            what: "Pin",
            target: package.to_string(),
        });
    }

    let usages = find_usages(project.path(), &UsageQuery::pin(package)?)?;
    warn_usages(&project, "package", &usages)?;

    if !confirm(invocation, &format!("Unpin '{}'?", package))? {
        return cancelled();
    }

    let captured = tool
        .capture(&["unpin".to_string(), package.to_string()], project.path())
        .await?;
    if !captured.success {
        anyhow::bail!(FrontendError::ExternalTool {
            tool: tool.display_name.clone(),
            output: captured.output.trim().to_string(),
        });
    }
    cliclack::log::success(format!("Unpinned {}", package))?;

    cliclack::outro("Pin removed")?;
    Ok(Outcome::Completed)
}

/// Replace this process with the project's `bin/dev`
#[cfg(unix)]
pub fn exec_dev_server(project: &ProjectRoot) -> Result<Infallible> {
    use std::os::unix::process::CommandExt;

    let tool = dev_server_tool(project)?;
    let err = std::process::Command::new(&tool.program)
        .current_dir(project.path())
        .exec();
    Err(FrontendError::ExternalTool {
        tool: tool.display_name.clone(),
        output: format!("could not start '{}': {}", tool.program, err),
    }
    .into())
}

/// Run the project's `bin/dev` and exit with its status
#[cfg(not(unix))]
pub fn exec_dev_server(project: &ProjectRoot) -> Result<Infallible> {
    let tool = dev_server_tool(project)?;
    let status = std::process::Command::new(&tool.program)
        .current_dir(project.path())
        .status()
        .map_err(|e| FrontendError::ExternalTool {
            tool: tool.display_name.clone(),
            output: format!("could not start '{}': {}", tool.program, e),
        })?;
    std::process::exit(status.code().unwrap_or(1));
}

fn dev_server_tool(project: &ProjectRoot) -> Result<ExternalTool> {
    let tool = ExternalTool::dev_server(project.path());
    if !tool.is_installed() {
        anyhow::bail!(FrontendError::Precondition(format!(
            "{} not found. Is this a Rails 7+ project?",
            DEV_BIN
        )));
    }
    cliclack::intro("Starting Rails server")?;
    cliclack::outro("Use Ctrl+C to stop")?;
    Ok(tool)
}

async fn build<C: ProductConfig>(
    config: &C,
    invocation: &Invocation,
    zip: bool,
) -> Result<Outcome> {
    let project = ProjectRoot::open(&invocation.project_dir)?;
    let settings = ProjectConfig::load(project.path(), config.config_file_name())?;
    let exporter = Exporter::new(project.path(), settings.build);
    cliclack::intro("Building static site")?;

    let server = exporter.detect_server()?;
    cliclack::log::success(format!(
        "Server is running (pid {}, port {})",
        server.pid, server.port
    ))?;

    let mirror = ExternalTool::mirror(exporter.mirror_tool());
    if !mirror.is_installed() {
        offer_docs(invocation, &mirror)?;
        anyhow::bail!(FrontendError::Precondition(format!(
            "'{}' is required to mirror the site.",
            mirror.program
        )));
    }

    let spinner = cliclack::spinner();
    spinner.start(format!("Mirroring http://localhost:{}/ ...", server.port));
    let report = match exporter.mirror(server.port).await {
        Ok(report) => report,
        Err(e) => {
            spinner.stop("Mirroring failed");
            return Err(e);
        }
    };
    spinner.stop(format!(
        "Mirrored into {}",
        project.display_path(&exporter.output_dir())
    ));
    if report.hoisted {
        cliclack::log::info(format!(
            "Moved pages out of the localhost:{} directory",
            server.port
        ))?;
    }
    if let Some(tail) = &report.output_tail {
        cliclack::log::warning(format!(
            "{} reported errors; some files may be missing:\n{}",
            exporter.mirror_tool(),
            tail
        ))?;
    }

    let export = exporter.finish(server.port)?;
    cliclack::log::success(format!(
        "Organized assets: {} moved, {} duplicates skipped",
        export.moved, export.skipped
    ))?;
    cliclack::log::success(format!(
        "Fixed paths in {} HTML and {} CSS files",
        export.html_rewritten, export.css_rewritten
    ))?;
    cliclack::log::success(format!(
        "Removed server-only markup from {} HTML files",
        export.html_cleaned
    ))?;

    if zip {
        let (archive, stored) = exporter.archive()?;
        cliclack::log::success(format!(
            "Packaged {} files into {}",
            stored,
            project.display_path(&archive)
        ))?;
    }

    let out = project.display_path(&exporter.output_dir());
    cliclack::outro(format!(
        "Static site built in {}/\n   To test: cd {} && python3 -m http.server",
        out, out
    ))?;
    Ok(Outcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::tests::{scaffold_project, write_file};
    use crate::project::{HOME_CONTROLLER, IMPORTMAP_FILE, ROUTES_FILE};
    use std::path::Path;
    use tempfile::tempdir;

    #[derive(Clone)]
    struct TestConfig;

    impl ProductConfig for TestConfig {
        fn name(&self) -> &'static str {
            "rails-frontend"
        }

        fn display_name(&self) -> &'static str {
            "Rails Frontend"
        }

        fn version(&self) -> &'static str {
            "0.0.0-test"
        }

        fn docs_url(&self) -> &'static str {
            "https://example.invalid/docs"
        }

        fn cli_description(&self) -> &'static str {
            "test"
        }

        fn next_steps(&self, _project_dir: &Path) -> Vec<String> {
            Vec::new()
        }
    }

    fn invocation(root: &Path, action: Action) -> Invocation {
        Invocation {
            action,
            project_dir: root.to_path_buf(),
            yes: true,
        }
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).expect("read")
    }

    fn snapshot(root: &Path) -> Vec<(PathBuf, String)> {
        walkdir::WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| (e.path().to_path_buf(), read(e.path())))
            .collect()
    }

    fn frontend_error(err: &anyhow::Error) -> &FrontendError {
        err.downcast_ref::<FrontendError>().expect("typed error")
    }

    #[tokio::test]
    async fn test_add_page_normalizes_and_wires_everything() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        scaffold_project(root);

        let outcome = run(
            &TestConfig,
            invocation(root, Action::AddPage { name: "Ürünler".to_string() }),
        )
        .await
        .expect("add-page");

        assert_eq!(outcome, Outcome::Completed);
        assert!(root.join("app/views/home/urunler.html.erb").is_file());
        assert!(root.join("app/assets/stylesheets/urunler.css").is_file());
        assert!(read(&root.join(HOME_CONTROLLER)).contains("  def urunler\n  end\n"));
        let routes = read(&root.join(ROUTES_FILE));
        assert_eq!(routes.matches("get \"/urunler\", to: \"home#urunler\"").count(), 1);
    }

    #[tokio::test]
    async fn test_add_page_twice_is_already_exists() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        scaffold_project(root);
        let action = Action::AddPage { name: "about".to_string() };

        run(&TestConfig, invocation(root, action.clone())).await.expect("first");
        let before = snapshot(root);
        let err = run(&TestConfig, invocation(root, action)).await.unwrap_err();

        assert!(matches!(frontend_error(&err), FrontendError::AlreadyExists { .. }));
        assert_eq!(snapshot(root), before);
    }

    #[tokio::test]
    async fn test_remove_page_home_is_rejected_without_changes() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        scaffold_project(root);
        write_file(&root.join("app/views/home/home.html.erb"), "<div></div>\n");
        let before = snapshot(root);

        for name in ["home", "Home", "index"] {
            let err = run(
                &TestConfig,
                invocation(root, Action::RemovePage { name: name.to_string() }),
            )
            .await
            .unwrap_err();
            assert!(matches!(frontend_error(&err), FrontendError::Conflict(_)));
        }
        assert_eq!(snapshot(root), before);
    }

    #[tokio::test]
    async fn test_add_then_remove_page_restores_project() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        scaffold_project(root);
        let before = snapshot(root);

        run(&TestConfig, invocation(root, Action::AddPage { name: "contact".to_string() }))
            .await
            .expect("add");
        run(&TestConfig, invocation(root, Action::RemovePage { name: "contact".to_string() }))
            .await
            .expect("remove");

        assert_eq!(snapshot(root), before);
    }

    #[tokio::test]
    async fn test_remove_missing_page_is_not_found() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        scaffold_project(root);

        let err = run(&TestConfig, invocation(root, Action::RemovePage { name: "ghost".to_string() }))
            .await
            .unwrap_err();
        assert!(matches!(frontend_error(&err), FrontendError::NotFound { what: "Page", .. }));
    }

    #[tokio::test]
    async fn test_commands_require_a_project() {
        let temp = tempdir().expect("tempdir");
        let err = run(
            &TestConfig,
            invocation(temp.path(), Action::AddStimulus { name: "menu".to_string() }),
        )
        .await
        .unwrap_err();
        assert!(matches!(frontend_error(&err), FrontendError::NotAProject(_)));
    }

    #[tokio::test]
    async fn test_stimulus_lifecycle() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        scaffold_project(root);
        write_file(
            &root.join("app/views/home/index.html.erb"),
            "<div data-controller=\"date-picker\"></div>\n",
        );

        run(&TestConfig, invocation(root, Action::AddStimulus { name: "Date Picker".to_string() }))
            .await
            .expect("add");
        let file = root.join("app/javascript/controllers/date_picker_controller.js");
        assert!(file.is_file());

        let err = run(&TestConfig, invocation(root, Action::AddStimulus { name: "date_picker".to_string() }))
            .await
            .unwrap_err();
        assert!(matches!(frontend_error(&err), FrontendError::AlreadyExists { .. }));

        let outcome = run(
            &TestConfig,
            invocation(root, Action::RemoveStimulus { name: "date_picker".to_string() }),
        )
        .await
        .expect("remove");
        assert_eq!(outcome, Outcome::Completed);
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn test_layout_lifecycle() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        scaffold_project(root);
        write_file(&root.join("app/views/home/about.html.erb"), "<div></div>\n");
        write_file(&root.join("app/views/home/contact.html.erb"), "<div></div>\n");
        let controller_before = read(&root.join(HOME_CONTROLLER));

        run(
            &TestConfig,
            invocation(root, Action::AddLayout { name: "about".to_string(), view: None }),
        )
        .await
        .expect("matching view");
        assert!(root.join("app/views/layouts/about.html.erb").is_file());
        assert!(read(&root.join(HOME_CONTROLLER)).contains("layout \"about\", only: :about"));

        let err = run(
            &TestConfig,
            invocation(
                root,
                Action::AddLayout { name: "marketing".to_string(), view: Some("about".to_string()) },
            ),
        )
        .await
        .unwrap_err();
        assert!(matches!(frontend_error(&err), FrontendError::Conflict(_)));
        assert!(!root.join("app/views/layouts/marketing.html.erb").exists());

        let err = run(
            &TestConfig,
            invocation(root, Action::AddLayout { name: "marketing".to_string(), view: None }),
        )
        .await
        .unwrap_err();
        assert!(matches!(frontend_error(&err), FrontendError::Usage(_)));

        run(&TestConfig, invocation(root, Action::RemoveLayout { name: "about".to_string() }))
            .await
            .expect("remove");
        assert!(!root.join("app/views/layouts/about.html.erb").exists());
        assert_eq!(read(&root.join(HOME_CONTROLLER)), controller_before);
    }

    #[tokio::test]
    async fn test_pin_preconditions() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        scaffold_project(root);

        let err = run(&TestConfig, invocation(root, Action::AddPin { package: "alpinejs".to_string() }))
            .await
            .unwrap_err();
        assert!(matches!(frontend_error(&err), FrontendError::Precondition(_)));

        write_file(&root.join(IMPORTMAP_BIN), "#!/usr/bin/env ruby\n");
        write_file(&root.join(IMPORTMAP_FILE), "pin \"application\"\npin \"alpinejs\"\n");

        let err = run(&TestConfig, invocation(root, Action::AddPin { package: "alpinejs".to_string() }))
            .await
            .unwrap_err();
        assert!(matches!(frontend_error(&err), FrontendError::Conflict(_)));

        let err = run(&TestConfig, invocation(root, Action::RemovePin { package: "chart.js".to_string() }))
            .await
            .unwrap_err();
        assert!(matches!(frontend_error(&err), FrontendError::NotFound { what: "Pin", .. }));
    }

    #[tokio::test]
    async fn test_build_without_server() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        scaffold_project(root);

        let err = run(&TestConfig, invocation(root, Action::Build { zip: false }))
            .await
            .unwrap_err();
        assert!(matches!(frontend_error(&err), FrontendError::ServerNotRunning { .. }));
        assert!(!root.join("build").exists());
    }

    #[tokio::test]
    async fn test_version() {
        let temp = tempdir().expect("tempdir");
        let outcome = run(&TestConfig, invocation(temp.path(), Action::Version))
            .await
            .expect("version");
        assert_eq!(outcome, Outcome::Completed);
    }
}
