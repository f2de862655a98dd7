//! Global exclude list parsing and merging with project excludes.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Patterns read from the global exclude file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalExcludes {
    pub patterns: Vec<String>,
}

impl GlobalExcludes {
    /// Parses the exclude file contents. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Self {
        let patterns = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();
        Self { patterns }
    }

    /// Reads and parses the exclude file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let excludes = Self::parse(&text);
        tracing::debug!(path = %path.display(), count = excludes.patterns.len(), "loaded global excludes");
        Ok(excludes)
    }

    /// Loads the exclude file if one was found, or returns an empty list.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Merges global and project patterns: global first, then project, keeping
/// the first occurrence of each exact pattern.
pub fn merge(global: &[String], project: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    global
        .iter()
        .chain(project)
        .filter(|pattern| seen.insert(*pattern))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let text = "# global excludes\n.git\n\n  node_modules  \n   # indented comment\n*.pyc\r\n";
        let excludes = GlobalExcludes::parse(text);
        assert_eq!(excludes.patterns, strings(&[".git", "node_modules", "*.pyc"]));
    }

    #[test]
    fn test_parse_empty() {
        assert!(GlobalExcludes::parse("").patterns.is_empty());
        assert!(GlobalExcludes::parse("\n# only comments\n\n").patterns.is_empty());
    }

    #[test]
    fn test_merge_dedups_and_keeps_order() {
        let merged = merge(&strings(&[".git", "node_modules"]), &strings(&[".git", ".env"]));
        assert_eq!(merged, strings(&[".git", "node_modules", ".env"]));
    }

    #[test]
    fn test_merge_dedups_within_one_list() {
        let merged = merge(&strings(&["a", "b", "a"]), &strings(&["c", "b", "c"]));
        assert_eq!(merged, strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_merge_is_exact_string() {
        let merged = merge(&strings(&["build/"]), &strings(&["build", "/build/"]));
        assert_eq!(merged, strings(&["build/", "build", "/build/"]));
    }

    #[test]
    fn test_merge_empty_inputs() {
        assert!(merge(&[], &[]).is_empty());
        assert_eq!(merge(&[], &strings(&[".env"])), strings(&[".env"]));
    }

    #[test]
    fn test_load_optional() {
        assert_eq!(GlobalExcludes::load_optional(None).unwrap(), GlobalExcludes::default());

        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "target/\n").unwrap();
        let excludes = GlobalExcludes::load_optional(Some(file.path())).unwrap();
        assert_eq!(excludes.patterns, strings(&["target/"]));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GlobalExcludes::load(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
