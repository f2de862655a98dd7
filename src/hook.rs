//! Pre/post send hooks.
//!
//! Hook commands are opaque strings from the configuration. They are handed
//! to a shell unmodified: `pre_send` to the local shell inside the project
//! directory, `post_send` to the remote login shell through ssh.

use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::runner::{CommandLine, Runner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    PreSend,
    PostSend,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreSend => write!(f, "pre-send"),
            Self::PostSend => write!(f, "post-send"),
        }
    }
}

/// Where a hook command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookTarget {
    /// Local shell with the given working directory.
    Local { cwd: PathBuf },
    /// Remote shell reached with `ssh -p <port> <host>`.
    Remote { host: String, port: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hook {
    pub kind: HookKind,
    pub command: String,
    pub target: HookTarget,
}

impl Hook {
    /// The process that executes this hook.
    pub fn command_line(&self) -> CommandLine {
        match &self.target {
            HookTarget::Local { cwd } => shell_command(&self.command).current_dir(cwd.clone()),
            HookTarget::Remote { host, port } => CommandLine::new(
                "ssh",
                vec![
                    "-p".to_string(),
                    port.to_string(),
                    host.clone(),
                    self.command.clone(),
                ],
            ),
        }
    }

    /// Runs the hook, failing with the matching hook error on a non-zero exit.
    pub fn run(&self, project: &str, runner: &mut dyn Runner) -> Result<()> {
        let code = runner.run(&self.command_line())?;
        if code == Some(0) {
            return Ok(());
        }
        let project = project.to_string();
        let command = self.command.clone();
        Err(match self.kind {
            HookKind::PreSend => Error::PreHookFailure {
                project,
                command,
                code,
            },
            HookKind::PostSend => Error::PostHookFailure {
                project,
                command,
                code,
            },
        })
    }
}

/// Runs the `config_sync` command from the directory holding the configuration file.
pub fn run_config_sync(command: &str, cwd: Option<PathBuf>, runner: &mut dyn Runner) -> Result<()> {
    let mut line = shell_command(command);
    line.cwd = cwd;
    match runner.run(&line)? {
        Some(0) => Ok(()),
        code => Err(Error::ConfigSyncFailure {
            command: command.to_string(),
            code,
        }),
    }
}

/// Wraps `command` in the platform shell.
pub fn shell_command(command: &str) -> CommandLine {
    if cfg!(windows) {
        CommandLine::new("cmd", vec!["/C".to_string(), command.to_string()])
    } else {
        CommandLine::new("sh", vec!["-c".to_string(), command.to_string()])
    }
}
