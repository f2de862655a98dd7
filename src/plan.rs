//! Building the sync plan for one project.
//!
//! A [`SyncPlan`] is everything needed to send a project: the resolved local
//! directory, the rsync destination and the merged exclude list. Building a
//! plan never runs anything; see [`crate::send`] for execution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::Config;
use crate::constants::TRANSFER_PROGRAM;
use crate::error::{Error, Result};
use crate::exclude::{self, GlobalExcludes};
use crate::hook::{Hook, HookKind, HookTarget};
use crate::path::expand_home;
use crate::runner::CommandLine;
use crate::template::{self, Variables};

/// One run of the tool. Captures the `{timestamp}` value once so every plan
/// built from the same invocation renders the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    timestamp: String,
}

impl Invocation {
    pub fn now() -> Self {
        Self::at(&Local::now())
    }

    pub fn at(time: &DateTime<Local>) -> Self {
        Self {
            timestamp: template::format_timestamp(time),
        }
    }

    pub fn with_timestamp(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Builds the plan for `project_name`.
    ///
    /// # Errors
    /// `ProjectNotFound` for an unknown project, `UndefinedVariable` when a
    /// template references an unknown variable and `LocalPath` when the local
    /// directory does not exist. The local path is checked in dry-run mode too.
    pub fn build_plan(
        &self,
        config: &Config,
        global_excludes: &GlobalExcludes,
        project_name: &str,
        dry_run: bool,
    ) -> Result<SyncPlan> {
        let project = config.project(project_name)?;
        let root = config.root_dir();
        let vars = Variables::for_invocation(root.as_deref(), &self.timestamp);

        let local_path = template::expand(&project.path, &vars)?;
        let backup_dir = project
            .backup_dir
            .as_deref()
            .map(|dir| template::expand(dir, &vars))
            .transpose()?;
        let excludes = exclude::merge(&global_excludes.patterns, &project.exclude);

        let local_path = absolute(&local_path)?;
        check_local_dir(&local_path)?;

        let plan = SyncPlan {
            project: project_name.to_string(),
            local_path,
            remote: project.remote.clone(),
            port: project.port,
            backup_dir,
            excludes,
            dry_run,
            pre_send: project.pre_send.clone(),
            post_send: project.post_send.clone(),
        };
        tracing::debug!(?plan, "built sync plan");
        Ok(plan)
    }
}

/// Builds a plan with a freshly captured timestamp.
pub fn build_plan(
    config: &Config,
    global_excludes: &GlobalExcludes,
    project_name: &str,
    dry_run: bool,
) -> Result<SyncPlan> {
    Invocation::now().build_plan(config, global_excludes, project_name, dry_run)
}

/// A fully resolved sync of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub project: String,
    /// Absolute local directory. A trailing separator is kept as written.
    pub local_path: PathBuf,
    /// rsync destination, verbatim from the configuration.
    pub remote: String,
    pub port: u16,
    pub backup_dir: Option<String>,
    /// Global excludes followed by project excludes, deduplicated.
    pub excludes: Vec<String>,
    pub dry_run: bool,
    pub pre_send: Option<String>,
    pub post_send: Option<String>,
}

impl SyncPlan {
    /// The rsync invocation for this plan.
    pub fn transfer_command(&self) -> CommandLine {
        let mut args: Vec<String> = vec!["-avz".into(), "--delete".into()];
        if self.dry_run {
            args.push("--dry-run".into());
        }
        if let Some(dir) = &self.backup_dir {
            args.push("--backup".into());
            args.push(format!("--backup-dir={dir}"));
        }
        args.push("-e".into());
        args.push(format!("ssh -p {}", self.port));
        for pattern in &self.excludes {
            args.push("--exclude".into());
            args.push(pattern.clone());
        }
        args.push(self.local_path.to_string_lossy().into_owned());
        args.push(self.remote.clone());

        if cfg!(windows) {
            // rsync is run inside WSL on Windows.
            args.insert(0, TRANSFER_PROGRAM.to_string());
            CommandLine::new("wsl", args)
        } else {
            CommandLine::new(TRANSFER_PROGRAM, args)
        }
    }

    /// The `pre_send` hook, run in the local project directory.
    pub fn pre_hook(&self) -> Option<Hook> {
        self.pre_send.as_ref().map(|command| Hook {
            kind: HookKind::PreSend,
            command: command.clone(),
            target: HookTarget::Local {
                cwd: self.local_path.clone(),
            },
        })
    }

    /// The `post_send` hook, run on the remote host over ssh.
    pub fn post_hook(&self) -> Option<Hook> {
        self.post_send.as_ref().map(|command| Hook {
            kind: HookKind::PostSend,
            command: command.clone(),
            target: HookTarget::Remote {
                host: self.remote_host().to_string(),
                port: self.port,
            },
        })
    }

    /// The `user@host` part of the destination.
    pub fn remote_host(&self) -> &str {
        self.remote
            .split_once(':')
            .map_or(self.remote.as_str(), |(host, _)| host)
    }
}

fn absolute(path: &str) -> Result<PathBuf> {
    let path = PathBuf::from(expand_home(path));
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = env::current_dir().map_err(|source| Error::Io {
        path: PathBuf::from("."),
        source,
    })?;
    Ok(cwd.join(path))
}

fn check_local_dir(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::LocalPath {
            path: path.to_path_buf(),
            reason: "is not a directory".to_string(),
        }),
        Err(e) => Err(Error::LocalPath {
            path: path.to_path_buf(),
            reason: format!("is not accessible: {e}"),
        }),
    }
}
