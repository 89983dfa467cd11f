// src/reactor/path.rs

//! Module path handling for the reactor tree.
//!
//! A [`ModulePath`] is a normalized, slash-separated path relative to the
//! scheduler root. The first component names a top-level module; further
//! components follow the *declared* child keys of each ancestor, which may
//! themselves span more than one directory level (a parent manifest can
//! declare a child as `"a/b"`).

use std::fmt;

use crate::errors::{DocdagError, Result};

/// Normalized relative module path (forward slashes, no empty segments).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(String);

impl ModulePath {
    /// Parse and normalize a slash-separated relative path.
    ///
    /// Backslashes are normalized to forward slashes so that paths produced
    /// on Windows hosts compare equal to their manifest declarations.
    pub fn new(path: impl AsRef<str>) -> Result<Self> {
        let raw = path.as_ref().replace('\\', "/");
        if raw.is_empty() {
            return Err(DocdagError::ModuleNotFound("<empty path>".to_string()));
        }
        if raw.starts_with('/') {
            return Err(DocdagError::ConfigError(format!(
                "module path must be relative: '{raw}'"
            )));
        }
        for segment in raw.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(DocdagError::ConfigError(format!(
                    "invalid segment '{segment}' in module path '{raw}'"
                )));
            }
        }
        Ok(Self(raw))
    }

    /// Build a child path by appending a declared child key.
    pub fn join(&self, child: &str) -> Result<Self> {
        Self::new(format!("{}/{}", self.0, child))
    }

    /// The raw normalized string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split a declared-key remainder after the given prefix.
///
/// `strip_key_prefix("a/b/c", "a/b")` is `Some("c")`; the prefix must end at
/// a segment boundary, so `strip_key_prefix("ab/c", "a")` is `None`.
pub fn strip_key_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    rest.strip_prefix('/')
}
