#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use anyhow::{Result, anyhow};

use docdag::artifact::ArtifactId;
use docdag::fs::mock::MockFileSystem;
use docdag::probe::{FetchOutcome, RemoteProbe};
use docdag::resolve::{
    DeclaredDep, DependencyResolver, MetadataReader, ProjectMeta, ResolvedDependencies,
};

/// A fake metadata source that:
/// - serves [`ProjectMeta`] from an in-memory map
/// - counts every `project_meta` call (for memoization assertions)
/// - can be switched to "unavailable" to simulate a dead source.
#[derive(Debug, Clone, Default)]
pub struct FakeMetadata {
    inner: Arc<Mutex<FakeMetadataInner>>,
}

#[derive(Debug, Default)]
struct FakeMetadataInner {
    metas: HashMap<ArtifactId, ProjectMeta>,
    calls: usize,
    unavailable: bool,
}

impl FakeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, meta: ProjectMeta) {
        let mut inner = self.inner.lock().unwrap();
        inner.metas.insert(meta.id.clone(), meta);
    }

    /// Number of `project_meta` calls so far.
    pub fn calls(&self) -> usize {
        self.inner.lock().unwrap().calls
    }

    /// Make every subsequent read fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unwrap().unavailable = unavailable;
    }
}

impl MetadataReader for FakeMetadata {
    fn project_meta(&self, artifact: &ArtifactId) -> Result<ProjectMeta> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls += 1;
        if inner.unavailable {
            return Err(anyhow!("metadata source unavailable"));
        }
        inner
            .metas
            .get(artifact)
            .cloned()
            .ok_or_else(|| anyhow!("no metadata for {artifact}"))
    }
}

/// A fake remote probe that:
/// - answers `exists` from a configured url set (or a blanket default)
/// - records every probed/fetched url
/// - serves fetch bodies into a [`MockFileSystem`] when one is attached.
#[derive(Debug, Clone, Default)]
pub struct FakeProbe {
    inner: Arc<Mutex<FakeProbeInner>>,
    fs: Option<MockFileSystem>,
}

#[derive(Debug, Default)]
struct FakeProbeInner {
    existing: HashSet<String>,
    bodies: HashMap<String, String>,
    everything_exists: bool,
    probed: Vec<String>,
    fetched: Vec<String>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetched bodies are written into `fs` instead of the real disk.
    pub fn with_fs(mut self, fs: MockFileSystem) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Make `exists` answer `true` for every url.
    pub fn everything_exists(self) -> Self {
        self.inner.lock().unwrap().everything_exists = true;
        self
    }

    pub fn add_existing(&self, url: &str) {
        self.inner.lock().unwrap().existing.insert(url.to_string());
    }

    pub fn add_body(&self, url: &str, body: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.existing.insert(url.to_string());
        inner.bodies.insert(url.to_string(), body.to_string());
    }

    pub fn probed(&self) -> Vec<String> {
        self.inner.lock().unwrap().probed.clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.inner.lock().unwrap().fetched.clone()
    }
}

impl RemoteProbe for FakeProbe {
    fn exists(&self, url: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.probed.push(url.to_string());
        inner.everything_exists || inner.existing.contains(url)
    }

    fn fetch(
        &self,
        url: &str,
        dest: &Path,
        _if_modified_since: Option<SystemTime>,
    ) -> Result<FetchOutcome> {
        let body = {
            let mut inner = self.inner.lock().unwrap();
            inner.fetched.push(url.to_string());
            inner.bodies.get(url).cloned()
        };
        match body {
            Some(body) => {
                if let Some(fs) = &self.fs {
                    fs.add_file(dest, body);
                }
                Ok(FetchOutcome::Fetched(200))
            }
            None => Ok(FetchOutcome::Failed(404)),
        }
    }
}

/// A fake dependency resolver that resolves a configured artifact set and
/// reports everything else unresolved.
#[derive(Debug, Clone, Default)]
pub struct FakeResolver {
    resolvable: HashSet<ArtifactId>,
}

impl FakeResolver {
    pub fn resolving(ids: impl IntoIterator<Item = ArtifactId>) -> Self {
        Self {
            resolvable: ids.into_iter().collect(),
        }
    }
}

impl DependencyResolver for FakeResolver {
    fn resolve(&self, declared: &[DeclaredDep]) -> ResolvedDependencies {
        let mut out = ResolvedDependencies::default();
        for dep in declared {
            let Some(id) = dep.to_artifact() else {
                continue;
            };
            if self.resolvable.contains(&id) {
                out.resolved.push(id);
            } else {
                out.unresolved.push(id);
            }
        }
        out
    }
}
