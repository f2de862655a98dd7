//! `{name}` substitution in configuration strings.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::constants::TIMESTAMP_FORMAT;
use crate::error::{Error, Result};

/// Variables available to `path` and `backup_dir` templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables for one invocation: `root` (only when configured) and `timestamp`.
    pub fn for_invocation(root: Option<&str>, timestamp: &str) -> Self {
        let mut vars = Self::new().with("timestamp", timestamp);
        if let Some(root) = root {
            vars = vars.with("root", root);
        }
        vars
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Formats `time` the way the `{timestamp}` variable renders it.
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Replaces every `{name}` in `template` with its value from `vars`.
///
/// Only identifiers (`[A-Za-z_][A-Za-z0-9_]*`) between braces are treated as
/// variables; any other brace text is copied through unchanged. Substituted
/// values are not scanned again.
pub fn expand(template: &str, vars: &Variables) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_identifier(&after[..close]) => {
                let name = &after[..close];
                let value = vars.get(name).ok_or_else(|| Error::UndefinedVariable {
                    variable: name.to_string(),
                    template: template.to_string(),
                })?;
                out.push_str(value);
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
