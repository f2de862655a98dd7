//! Locating the configuration and global exclude files.
//!
//! Both files are looked up independently across the same ordered list of
//! candidate directories, with a per-file environment variable taking
//! priority over everything else.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_ENV, CONFIG_NAME, GLOBAL_EXCLUDE_ENV, GLOBAL_EXCLUDE_NAME, PKG_NAME};
use crate::error::{Error, Result};

/// Directories probed for a file, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchDirs {
    /// User-level config directory, e.g. `~/.config/sendrepo`.
    pub user_config: Option<PathBuf>,
    /// Directory containing the installed executable.
    pub install: Option<PathBuf>,
}

impl SearchDirs {
    /// Builds the search directories for the running process.
    pub fn from_env() -> Self {
        let install = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self {
            user_config: user_config_dir(),
            install,
        }
    }

    /// Candidate file paths for `file_name`, in probe order.
    ///
    /// `override_path` is the value of the file's environment variable. When it
    /// names a directory, `file_name` is looked up inside it.
    pub fn candidates(&self, file_name: &str, override_path: Option<OsString>) -> Vec<PathBuf> {
        let mut candidates = vec![];
        if let Some(path) = override_path.filter(|p| !p.is_empty()) {
            let path = expand_path(&path.to_string_lossy());
            if path.is_dir() {
                candidates.push(path.join(file_name));
            } else {
                candidates.push(path);
            }
        }
        if let Some(dir) = &self.user_config {
            candidates.push(dir.join(file_name));
        }
        if let Some(dir) = &self.install {
            if let Some(parent) = dir.parent() {
                candidates.push(parent.join(format!("{PKG_NAME}-config")).join(file_name));
            }
            candidates.push(dir.join(file_name));
        }
        candidates
    }

    /// Returns the first existing file for `file_name`, or `None` if no candidate exists.
    pub fn resolve(&self, file_name: &str, override_path: Option<OsString>) -> Option<PathBuf> {
        let candidates = self.candidates(file_name, override_path);
        let found = first_existing(&candidates);
        match &found {
            Some(path) => tracing::debug!(file = file_name, path = %path.display(), "resolved"),
            None => tracing::debug!(file = file_name, ?candidates, "not found"),
        }
        found
    }
}

/// The configuration file and, if present, the global exclude file for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFiles {
    pub config: PathBuf,
    pub global_exclude: Option<PathBuf>,
}

impl ConfigFiles {
    /// Locates both files using the process environment.
    ///
    /// `explicit` is a config file given on the command line; it bypasses probing.
    pub fn locate(explicit: Option<&Path>, dirs: &SearchDirs) -> Result<Self> {
        Self::locate_with(
            explicit,
            dirs,
            env::var_os(CONFIG_ENV),
            env::var_os(GLOBAL_EXCLUDE_ENV),
        )
    }

    /// Locates both files with the environment overrides passed in.
    pub fn locate_with(
        explicit: Option<&Path>,
        dirs: &SearchDirs,
        config_override: Option<OsString>,
        exclude_override: Option<OsString>,
    ) -> Result<Self> {
        let config = match explicit {
            Some(path) => first_existing(&[path.to_path_buf()]).ok_or_else(|| {
                Error::ConfigNotFound {
                    searched: vec![path.to_path_buf()],
                }
            })?,
            None => dirs
                .resolve(CONFIG_NAME, config_override.clone())
                .ok_or_else(|| Error::ConfigNotFound {
                    searched: dirs.candidates(CONFIG_NAME, config_override),
                })?,
        };
        let global_exclude = dirs.resolve(GLOBAL_EXCLUDE_NAME, exclude_override);
        Ok(Self {
            config,
            global_exclude,
        })
    }

    /// Directory holding the configuration file.
    pub fn config_dir(&self) -> Option<PathBuf> {
        self.config
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }
}

/// Returns the first path in `candidates` that is an existing file.
pub fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// Returns the configuration directory for the application, platform-specific.
#[cfg(not(target_os = "macos"))]
fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(PKG_NAME))
}

/// Returns the configuration directory for the application, platform-specific.
#[cfg(target_os = "macos")]
fn user_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|dir| dir.join(".config").join(PKG_NAME))
}

/// Expands a path, replacing a leading `~` or `$HOME` with the user's home directory.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(expand_home(path))
}

/// Replaces a leading `~` or `$HOME` with the user's home directory.
pub fn expand_home(input: &str) -> String {
    let rest = if input == "~" || input.starts_with("~/") {
        &input[1..]
    } else if input == "$HOME" || input.starts_with("$HOME/") {
        &input["$HOME".len()..]
    } else {
        return input.into();
    };
    match dirs::home_dir() {
        Some(home) => format!("{}{rest}", home.to_string_lossy()),
        None => input.into(),
    }
}
