//! Command-line interface definition for sendrepo.
//!
//! This module defines the CLI commands and their handlers: sending a
//! project, printing its plan, listing projects and showing where the
//! configuration files were found.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::exclude::GlobalExcludes;
use crate::hook;
use crate::path::{ConfigFiles, SearchDirs};
use crate::plan::{Invocation, SyncPlan};
use crate::runner::SystemRunner;
use crate::send;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Command-line interface definition for sendrepo.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub commands: Option<Commands>,
    /// Configuration file to use instead of searching for config.yaml.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Supported sendrepo commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a project to its remote with rsync.
    Send {
        /// Name of the project to send. Optional with --sync-config.
        #[arg(required_unless_present = "sync_config")]
        project: Option<String>,
        /// Show what would be transferred without changing anything. Hooks are skipped.
        #[arg(short = 'n', long)]
        dry_run: bool,
        /// Run the config_sync command and reload the configuration first.
        #[arg(short, long)]
        sync_config: bool,
    },
    /// Print the resolved plan and rsync command for a project without running it.
    Plan {
        /// Name of the project.
        project: String,
        /// Plan a dry run.
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
    /// List all configured projects.
    List,
    /// Display the paths of the configuration and global exclude files.
    Config,
}

/// Runs a parsed command.
pub fn dispatch(commands: Commands, config: Option<&Path>) -> Result<()> {
    match commands {
        Commands::Send {
            project,
            dry_run,
            sync_config,
        } => send(config, project.as_deref(), dry_run, sync_config),
        Commands::Plan { project, dry_run } => plan(config, &project, dry_run),
        Commands::List => list(config),
        Commands::Config => show_config(config),
    }
}

/// Sends a project, optionally syncing the configuration first.
///
/// With `sync_config` the `config_sync` command runs, then the configuration
/// is read again from the same file before the plan is built.
///
/// # Errors
/// Returns an error if the configuration cannot be found or is invalid, if
/// the plan cannot be built, or if a hook or the transfer fails.
pub fn send(
    config: Option<&Path>,
    project: Option<&str>,
    dry_run: bool,
    sync_config: bool,
) -> Result<()> {
    let files = ConfigFiles::locate(config, &SearchDirs::from_env())?;
    let mut runner = SystemRunner;
    let mut app = Config::load(&files.config)?;

    if sync_config {
        let command = app.config_sync.as_deref().ok_or_else(|| Error::ConfigValidation {
            scope: "configuration".to_string(),
            field: "config_sync".to_string(),
            reason: "is required for --sync-config".to_string(),
        })?;
        println!("Executing config sync command...");
        hook::run_config_sync(command, files.config_dir(), &mut runner)?;
        app = Config::load(&files.config)?;
        println!("Configuration synced.");
    }

    let Some(project) = project else {
        return Ok(());
    };
    let excludes = GlobalExcludes::load_optional(files.global_exclude.as_deref())?;
    let plan = Invocation::now().build_plan(&app, &excludes, project, dry_run)?;
    send::send(&plan, &mut runner)
}

/// Prints the plan for a project.
pub fn plan(config: Option<&Path>, project: &str, dry_run: bool) -> Result<()> {
    let files = ConfigFiles::locate(config, &SearchDirs::from_env())?;
    let app = Config::load(&files.config)?;
    let excludes = GlobalExcludes::load_optional(files.global_exclude.as_deref())?;
    let plan = Invocation::now().build_plan(&app, &excludes, project, dry_run)?;
    println!("{}", display_plan(&plan));
    Ok(())
}

/// Lists all configured projects.
pub fn list(config: Option<&Path>) -> Result<()> {
    let files = ConfigFiles::locate(config, &SearchDirs::from_env())?;
    let app = Config::load(&files.config)?;
    if app.projects.is_empty() {
        println!("No projects are configured!");
    } else {
        println!("{}", display_projects(&app));
    }
    Ok(())
}

/// Prints the paths of the configuration and global exclude files.
pub fn show_config(config: Option<&Path>) -> Result<()> {
    match ConfigFiles::locate(config, &SearchDirs::from_env()) {
        Ok(files) => {
            println!("config file: {}", files.config.display());
            match files.global_exclude {
                Some(path) => println!("global exclude file: {}", path.display()),
                None => println!("global exclude file: not found"),
            }
            Ok(())
        }
        Err(Error::ConfigNotFound { searched }) => {
            println!("config file: not found");
            for path in searched {
                println!("  searched: {}", path.display());
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn display_projects(app: &Config) -> String {
    let width = app.projects.keys().map(String::len).max().unwrap_or(0);
    app.projects
        .iter()
        .map(|(name, project)| format!("{name:<width$}  {}", project.remote))
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_plan(plan: &SyncPlan) -> String {
    let mut s = format!(
        "project: {}\nsource: {}\nremote: {}\nport: {}",
        plan.project,
        plan.local_path.display(),
        plan.remote,
        plan.port
    );
    if let Some(dir) = &plan.backup_dir {
        s.push_str(&format!("\nbackup dir: {dir}"));
    }
    if !plan.excludes.is_empty() {
        s.push_str(&format!("\nexclude: {:?}", plan.excludes));
    }
    if let Some(hook) = plan.pre_hook() {
        s.push_str(&format!("\npre-send: {}", hook.command_line()));
    }
    if let Some(hook) = plan.post_hook() {
        s.push_str(&format!("\npost-send: {}", hook.command_line()));
    }
    if plan.dry_run {
        s.push_str("\ndry run: yes");
    }
    s.push_str(&format!("\ncommand: {}", plan.transfer_command()));
    s
}
