//! The configuration document.
//!
//! `config.yaml` holds an optional `root`, an optional `config_sync` command
//! and the `projects` mapping. The document is deserialized into loosely
//! typed raw structs first and then validated once into [`Config`], so every
//! later stage can rely on required fields being present and ports being in
//! range. Unknown keys are ignored at every level.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::DEFAULT_PORT;
use crate::error::{Error, Result};
use crate::path::expand_home;

/// Validated configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Value of the `{root}` template variable, as written.
    pub root: Option<String>,
    /// Command that refreshes the configuration, run by `--sync-config`.
    pub config_sync: Option<String>,
    /// Projects by name.
    pub projects: BTreeMap<String, ProjectSpec>,
}

/// A single project: where it lives locally and where it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    /// Local path template.
    pub path: String,
    /// rsync destination, `user@host:path`.
    pub remote: String,
    /// ssh port.
    pub port: u16,
    /// Backup directory template for files replaced or deleted on the remote.
    pub backup_dir: Option<String>,
    /// Project exclude patterns, in order.
    pub exclude: Vec<String>,
    /// Command run locally before the transfer.
    pub pre_send: Option<String>,
    /// Command run on the remote host after the transfer.
    pub post_send: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct RawConfig {
    root: Option<String>,
    config_sync: Option<RawConfigSync>,
    projects: Option<BTreeMap<String, Option<RawProject>>>,
}

/// `config_sync: <command>` or `config_sync: { command: <command> }`.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawConfigSync {
    Command(String),
    Table { command: String },
}

#[derive(Deserialize, Debug, Default)]
struct RawProject {
    path: Option<String>,
    remote: Option<String>,
    port: Option<i64>,
    backup_dir: Option<String>,
    exclude: Option<Vec<String>>,
    pre_send: Option<String>,
    post_send: Option<String>,
}

impl Config {
    /// Reads and validates the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text, path)?;
        tracing::debug!(
            path = %path.display(),
            projects = config.projects.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Parses and validates a configuration document. `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let raw: RawConfig = if text.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(text).map_err(|e| Error::ConfigParse {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?
        };
        raw.validate()
    }

    /// Looks up a project by name.
    pub fn project(&self, name: &str) -> Result<&ProjectSpec> {
        self.projects
            .get(name)
            .ok_or_else(|| Error::ProjectNotFound {
                name: name.to_string(),
                known: self.project_names(),
            })
    }

    /// Project names in sorted order.
    pub fn project_names(&self) -> Vec<String> {
        self.projects.keys().cloned().collect()
    }

    /// `root` with a leading `~` or `$HOME` expanded.
    pub fn root_dir(&self) -> Option<String> {
        self.root.as_deref().map(expand_home)
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config> {
        if let Some(root) = &self.root {
            if root.trim().is_empty() {
                return Err(invalid("configuration", "root", "must not be empty"));
            }
        }

        let config_sync = match self.config_sync {
            Some(RawConfigSync::Command(command)) | Some(RawConfigSync::Table { command }) => {
                if command.trim().is_empty() {
                    return Err(invalid("configuration", "config_sync", "must not be empty"));
                }
                Some(command)
            }
            None => None,
        };

        let mut projects = BTreeMap::new();
        for (name, raw) in self.projects.unwrap_or_default() {
            let project = raw.unwrap_or_default().validate(&name)?;
            projects.insert(name, project);
        }

        Ok(Config {
            root: self.root,
            config_sync,
            projects,
        })
    }
}

impl RawProject {
    fn validate(self, name: &str) -> Result<ProjectSpec> {
        let scope = format!("project '{name}'");
        let path = required(self.path, &scope, "path")?;
        let remote = required(self.remote, &scope, "remote")?;
        let port = match self.port {
            None => DEFAULT_PORT,
            Some(port) => u16::try_from(port)
                .ok()
                .filter(|port| *port != 0)
                .ok_or_else(|| {
                    invalid(
                        &scope,
                        "port",
                        &format!("must be between 1 and 65535 (got {port})"),
                    )
                })?,
        };

        Ok(ProjectSpec {
            path,
            remote,
            port,
            backup_dir: self.backup_dir,
            exclude: self.exclude.unwrap_or_default(),
            pre_send: self.pre_send,
            post_send: self.post_send,
        })
    }
}

fn required(value: Option<String>, scope: &str, field: &str) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(invalid(scope, field, "must not be empty")),
        None => Err(invalid(scope, field, "is required")),
    }
}

fn invalid(scope: &str, field: &str, reason: &str) -> Error {
    Error::ConfigValidation {
        scope: scope.to_string(),
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SAMPLE: &str = r#"
root: /home/u/Dev
config_sync:
  command: git -C ~/dotfiles pull
projects:
  my-project:
    path: "{root}/p/"
    remote: u@h:/d/
    exclude:
      - .git
  api:
    path: /srv/api
    remote: deploy@api.example.com:/opt/api/
    port: 2222
    backup_dir: /opt/backups/{timestamp}
    pre_send: make test
    post_send: systemctl --user restart api
    colour: blue
future_key: ignored
"#;

    fn parse(text: &str) -> Result<Config> {
        Config::parse(text, &PathBuf::from("config.yaml"))
    }

    #[test]
    fn test_parse_sample() {
        let config = parse(SAMPLE).unwrap();
        assert_eq!(config.root.as_deref(), Some("/home/u/Dev"));
        assert_eq!(config.config_sync.as_deref(), Some("git -C ~/dotfiles pull"));
        assert_eq!(config.project_names(), vec!["api", "my-project"]);

        let project = config.project("my-project").unwrap();
        assert_eq!(project.path, "{root}/p/");
        assert_eq!(project.remote, "u@h:/d/");
        assert_eq!(project.port, 22);
        assert_eq!(project.backup_dir, None);
        assert_eq!(project.exclude, vec![".git"]);
        assert_eq!(project.pre_send, None);

        let api = config.project("api").unwrap();
        assert_eq!(api.port, 2222);
        assert_eq!(api.backup_dir.as_deref(), Some("/opt/backups/{timestamp}"));
        assert_eq!(api.pre_send.as_deref(), Some("make test"));
        assert_eq!(api.post_send.as_deref(), Some("systemctl --user restart api"));
        assert!(api.exclude.is_empty());
    }

    #[test]
    fn test_config_sync_as_plain_string() {
        let config = parse("config_sync: ./pull.sh\n").unwrap();
        assert_eq!(config.config_sync.as_deref(), Some("./pull.sh"));
        assert!(config.projects.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let config = parse("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_project_not_found() {
        let config = parse(SAMPLE).unwrap();
        match config.project("web") {
            Err(Error::ProjectNotFound { name, known }) => {
                assert_eq!(name, "web");
                assert_eq!(known, vec!["api", "my-project"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_every_known_project_is_found() {
        let config = parse(SAMPLE).unwrap();
        for name in config.project_names() {
            assert!(config.project(&name).is_ok());
        }
    }

    #[test]
    fn test_malformed_yaml() {
        let err = parse("projects: [unterminated\n").unwrap_err();
        match err {
            Error::ConfigParse { path, .. } => assert_eq!(path, PathBuf::from("config.yaml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err = parse("projects:\n  a:\n    path: /x\n    remote: h:/y\n    exclude: .git\n")
            .unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_missing_required_fields() {
        let err = parse("projects:\n  a:\n    remote: h:/y\n").unwrap_err();
        match err {
            Error::ConfigValidation { scope, field, .. } => {
                assert_eq!(scope, "project 'a'");
                assert_eq!(field, "path");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse("projects:\n  a:\n    path: /x\n").unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { ref field, .. } if field == "remote"));

        let err = parse("projects:\n  a:\n").unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { ref field, .. } if field == "path"));
    }

    #[test]
    fn test_port_range() {
        let doc = |port: &str| format!("projects:\n  a:\n    path: /x\n    remote: h:/y\n    port: {port}\n");
        for bad in ["0", "70000", "-1", "65536"] {
            let err = parse(&doc(bad)).unwrap_err();
            assert!(
                matches!(err, Error::ConfigValidation { ref field, .. } if field == "port"),
                "port {bad} should be rejected"
            );
        }
        for good in ["1", "22", "65535"] {
            let config = parse(&doc(good)).unwrap();
            assert_eq!(config.project("a").unwrap().port.to_string(), good);
        }
    }

    #[test]
    fn test_empty_root_is_invalid() {
        let err = parse("root: ''\n").unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { ref field, .. } if field == "root"));
    }

    #[test]
    fn test_root_dir_expands_home() {
        let config = parse("root: ~/Dev\n").unwrap();
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            config.root_dir(),
            Some(format!("{}/Dev", home.to_string_lossy()))
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("config.yaml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
