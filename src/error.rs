//! Error types for sendrepo.

use crate::sysexits;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sendrepo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving configuration, building a plan or running it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No configuration file found. Looked in:\n{}", display_paths(.searched))]
    ConfigNotFound { searched: Vec<PathBuf> },

    #[error("Failed to parse configuration file '{}': {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("Invalid configuration for {scope}: field '{field}' {reason}")]
    ConfigValidation {
        scope: String,
        field: String,
        reason: String,
    },

    #[error("Project '{name}' not found. Known projects: {}", display_names(.known))]
    ProjectNotFound { name: String, known: Vec<String> },

    #[error("Undefined variable '{{{variable}}}' in template '{template}'")]
    UndefinedVariable { variable: String, template: String },

    #[error("Local path '{}' {reason}", .path.display())]
    LocalPath { path: PathBuf, reason: String },

    #[error("Pre-send command for project '{project}' failed with {}: {command}", display_code(.code))]
    PreHookFailure {
        project: String,
        command: String,
        code: Option<i32>,
    },

    #[error("Post-send command for project '{project}' failed with {}: {command}", display_code(.code))]
    PostHookFailure {
        project: String,
        command: String,
        code: Option<i32>,
    },

    #[error("Config sync command failed with {}: {command}", display_code(.code))]
    ConfigSyncFailure { command: String, code: Option<i32> },

    #[error("Sync of project '{project}' failed with {}", display_code(.code))]
    Transfer { project: String, code: Option<i32> },

    #[error("Failed to execute '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// The process exit status reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ConfigNotFound { .. }
            | Error::ConfigParse { .. }
            | Error::ConfigValidation { .. }
            | Error::UndefinedVariable { .. } => sysexits::EX_CONFIG,
            Error::ProjectNotFound { .. } => sysexits::EX_USAGE,
            Error::LocalPath { .. } => sysexits::EX_NOINPUT,
            Error::PreHookFailure { .. }
            | Error::PostHookFailure { .. }
            | Error::ConfigSyncFailure { .. } => sysexits::EX_SOFTWARE,
            Error::Transfer { .. } | Error::Io { .. } => sysexits::EX_IOERR,
            Error::Spawn { .. } => sysexits::EX_OSERR,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("  {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_names(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
