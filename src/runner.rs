//! Running external commands.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use crate::error::{Error, Result};

/// A program with its arguments and optional working directory. Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: None,
        }
    }

    pub fn current_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

impl fmt::Display for CommandLine {
    /// Shell-quoted form, for logs and `--dry-run` output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(&self.program).chain(&self.args);
        write!(f, "{}", shell_words::join(words))
    }
}

/// Executes commands to completion.
pub trait Runner {
    /// Runs `command` and returns its exit code, `None` when it was killed by a signal.
    fn run(&mut self, command: &CommandLine) -> Result<Option<i32>>;
}

/// Runs commands as child processes, sharing this process's stdin, stdout and stderr
/// so their output streams straight to the terminal.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&mut self, command: &CommandLine) -> Result<Option<i32>> {
        tracing::info!(%command, cwd = ?command.cwd, "running");
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(cwd) = &command.cwd {
            cmd.current_dir(cwd);
        }
        let status = cmd.status().map_err(|source| Error::Spawn {
            program: command.program.clone(),
            source,
        })?;
        tracing::debug!(program = %command.program, ?status, "finished");
        Ok(status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_arguments() {
        let command = CommandLine::new(
            "rsync",
            vec!["-e".to_string(), "ssh -p 22".to_string(), "/src/".to_string()],
        );
        assert_eq!(command.to_string(), "rsync -e 'ssh -p 22' /src/");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let command = CommandLine::new("sendrepo-definitely-not-a-program", vec![]);
        let err = SystemRunner.run(&command).unwrap_err();
        assert!(matches!(err, Error::Spawn { ref program, .. } if program == "sendrepo-definitely-not-a-program"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_and_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let ok = CommandLine::new("sh", vec!["-c".to_string(), "test -f marker".to_string()])
            .current_dir(dir.path());
        assert_eq!(SystemRunner.run(&ok).unwrap(), Some(1));

        std::fs::write(dir.path().join("marker"), "").unwrap();
        assert_eq!(SystemRunner.run(&ok).unwrap(), Some(0));
    }
}
