// src/resolve/mod.rs

//! Dependency resolution seam and the per-module link resolution engine.
//!
//! [`DependencyResolver`] partitions a module's declared dependencies into
//! resolved and unresolved sets; [`LinkResolver`] turns resolved artifacts
//! into deduplicated [`LinkSet`]s through the run-scoped
//! [`ArtifactLinkCache`]. Individual resolution failures are logged and
//! skipped — a resolved-but-undocumented dependency is never fatal.

pub mod metadata;

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::{debug, warn};

use crate::artifact::ArtifactId;
use crate::fs::FileSystem;
use crate::javadoc::{PACKAGE_LIST, normalize_package_list};
use crate::links::{ArtifactLinkCache, LinkRecord, LinkSet, UrlOverrideTable};
use crate::probe::{FetchOutcome, RemoteProbe};

pub use metadata::{DeclaredDep, MetadataReader, ProjectMeta, RepoMetadataReader, parse_pom};

/// A module's dependencies partitioned by resolvability.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDependencies {
    pub resolved: Vec<ArtifactId>,
    pub unresolved: Vec<ArtifactId>,
}

/// Resolves a module's declared dependencies to concrete artifacts.
pub trait DependencyResolver: Debug {
    fn resolve(&self, declared: &[DeclaredDep]) -> ResolvedDependencies;
}

/// [`DependencyResolver`] backed by a Maven-layout local repository: an
/// artifact resolves if its javadoc classifier jar is present there.
#[derive(Debug)]
pub struct LocalRepoResolver {
    fs: Arc<dyn FileSystem>,
    repo_root: PathBuf,
}

impl LocalRepoResolver {
    pub fn new(fs: Arc<dyn FileSystem>, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            repo_root: repo_root.into(),
        }
    }
}

impl DependencyResolver for LocalRepoResolver {
    fn resolve(&self, declared: &[DeclaredDep]) -> ResolvedDependencies {
        let mut out = ResolvedDependencies::default();
        for dep in declared {
            let Some(id) = dep.to_artifact() else {
                warn!(
                    dependency = %format!("{}:{}", dep.group_id, dep.artifact_id),
                    "dependency carries no explicit version; cannot resolve"
                );
                continue;
            };
            if self.fs.is_file(&self.repo_root.join(id.javadoc_jar_path())) {
                out.resolved.push(id);
            } else {
                out.unresolved.push(id);
            }
        }
        out
    }
}

/// Recursion bound for aggregator artifacts folding their sub-artifacts.
const MAX_AGGREGATOR_DEPTH: usize = 32;

/// Per-run link resolution engine.
///
/// Owns the url override table, the metadata/probe collaborators and the
/// artifact link cache. All state is constructor-injected and scoped to one
/// reactor run; the single-threaded scheduler contract means no internal
/// locking is needed here.
#[derive(Debug)]
pub struct LinkResolver {
    fs: Arc<dyn FileSystem>,
    metadata: Box<dyn MetadataReader>,
    probe: Box<dyn RemoteProbe>,
    overrides: UrlOverrideTable,
    cache: ArtifactLinkCache,
    offline: bool,
}

impl LinkResolver {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        metadata: Box<dyn MetadataReader>,
        probe: Box<dyn RemoteProbe>,
        overrides: UrlOverrideTable,
        offline: bool,
    ) -> Self {
        Self {
            fs,
            metadata,
            probe,
            overrides,
            cache: ArtifactLinkCache::new(),
            offline,
        }
    }

    pub fn cache(&self) -> &ArtifactLinkCache {
        &self.cache
    }

    /// Link records for one module's dependency set.
    ///
    /// Unresolved dependencies are logged and contribute nothing. I/O
    /// failures while normalizing an artifact's package index propagate —
    /// they are fatal for the calling module's action.
    pub fn links_for_module(
        &mut self,
        out_dir: &Path,
        deps: &ResolvedDependencies,
    ) -> Result<LinkSet> {
        for id in &deps.unresolved {
            warn!(artifact = %id, "dependency not resolvable; no documentation link");
        }
        let mut links = LinkSet::new();
        for id in &deps.resolved {
            links.merge(self.artifact_links(out_dir, id, 0)?);
        }
        Ok(links)
    }

    /// Cached-or-computed links for one artifact.
    fn artifact_links(&mut self, out_dir: &Path, id: &ArtifactId, depth: usize) -> Result<LinkSet> {
        if let Some(cached) = self.cache.get(id) {
            return Ok(cached.clone());
        }
        if depth > MAX_AGGREGATOR_DEPTH {
            bail!("aggregator nesting of {id} exceeds {MAX_AGGREGATOR_DEPTH} levels");
        }
        let links = self.compute_links(out_dir, id, depth)?;
        self.cache.insert(id.clone(), links.clone());
        Ok(links)
    }

    fn compute_links(&mut self, out_dir: &Path, id: &ArtifactId, depth: usize) -> Result<LinkSet> {
        let meta = match self.metadata.project_meta(id) {
            Ok(meta) => Some(meta),
            Err(error) => {
                warn!(artifact = %id, error = %format!("{error:#}"), "failed to read artifact metadata");
                None
            }
        };

        // Aggregators publish no docs of their own; fold their
        // sub-artifacts' sets instead.
        if let Some(meta) = &meta {
            if meta.is_aggregator() {
                let subs: Vec<ArtifactId> = meta
                    .dependencies
                    .iter()
                    .filter_map(DeclaredDep::to_artifact)
                    .collect();
                debug!(artifact = %id, subs = subs.len(), "folding aggregator sub-artifacts");
                let mut links = LinkSet::new();
                for sub in &subs {
                    links.merge(self.artifact_links(out_dir, sub, depth + 1)?);
                }
                return Ok(links);
            }
        }

        let url = self
            .overrides
            .lookup(id)
            .or_else(|| match self.metadata.base_url(id) {
                Ok(base) => Some(format!("{base}apidocs/")),
                Err(error) => {
                    debug!(
                        artifact = %id,
                        error = %format!("{error:#}"),
                        "no metadata-derived documentation url"
                    );
                    None
                }
            })
            .unwrap_or_else(|| id.javadoc_io_url());

        let dest = out_dir
            .join(&id.group_id)
            .join(format!("{}-{}", id.artifact_id, id.version));

        if !self.offline {
            if !self.probe.exists(&url) {
                warn!(artifact = %id, url = %url, "documentation url unreachable; skipping dependency");
                return Ok(LinkSet::new());
            }
            self.refresh_package_index(id, &url, &dest)?;
        }

        normalize_package_list(self.fs.as_ref(), &dest)?;

        let mut links = LinkSet::new();
        links.insert(LinkRecord::new(url, dest));
        Ok(links)
    }

    /// Materialize the remote package index at the artifact's destination,
    /// skipping the download when the local copy is current.
    fn refresh_package_index(&self, id: &ArtifactId, url: &str, dest: &Path) -> Result<()> {
        let index_url = format!("{}{}", metadata::ensure_slash(url.to_string()), PACKAGE_LIST);
        let dest_index = dest.join(PACKAGE_LIST);
        let since = self.fs.modified(&dest_index)?;
        match self.probe.fetch(&index_url, &dest_index, since) {
            Ok(FetchOutcome::Fetched(_)) => debug!(artifact = %id, "fetched package index"),
            Ok(FetchOutcome::NotModified) => debug!(artifact = %id, "package index up to date"),
            Ok(FetchOutcome::Failed(status)) => {
                warn!(artifact = %id, status, "package index fetch failed")
            }
            Err(error) => {
                warn!(artifact = %id, error = %format!("{error:#}"), "package index fetch failed")
            }
        }
        Ok(())
    }
}
