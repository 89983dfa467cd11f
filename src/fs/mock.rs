// src/fs/mock.rs

use super::FileSystem;
use anyhow::{Result, anyhow};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// In-memory filesystem for tests.
///
/// Paths marked poisoned make any operation touching them fail, to
/// exercise I/O error handling.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Debug, Default)]
struct MockInner {
    files: HashMap<PathBuf, String>,
    mtimes: HashMap<PathBuf, SystemTime>,
    poisoned: HashSet<PathBuf>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let mut inner = self.inner.lock().unwrap();
        let path = path.as_ref().to_path_buf();
        inner.mtimes.insert(path.clone(), SystemTime::now());
        inner.files.insert(path, content.into());
    }

    /// Make any operation touching `path` fail with an I/O-style error.
    pub fn poison(&self, path: impl AsRef<Path>) {
        self.inner
            .lock()
            .unwrap()
            .poisoned
            .insert(path.as_ref().to_path_buf());
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.inner.lock().unwrap().files.get(path.as_ref()).cloned()
    }

    fn check_poisoned(inner: &MockInner, path: &Path) -> Result<()> {
        if inner.poisoned.contains(path) {
            return Err(anyhow!("simulated IO failure for {:?}", path));
        }
        Ok(())
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let inner = self.inner.lock().unwrap();
        Self::check_poisoned(&inner, path)?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("no such file {:?}", path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.inner.lock().unwrap().files.contains_key(path)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_poisoned(&inner, from)?;
        Self::check_poisoned(&inner, to)?;
        let content = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| anyhow!("no such file {:?}", from))?;
        inner.mtimes.insert(to.to_path_buf(), SystemTime::now());
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn modified(&self, path: &Path) -> Result<Option<SystemTime>> {
        let inner = self.inner.lock().unwrap();
        Self::check_poisoned(&inner, path)?;
        Ok(inner.mtimes.get(path).copied())
    }
}
