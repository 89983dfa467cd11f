// src/links/cache.rs

use std::collections::HashMap;

use anyhow::Result;
use tracing::debug;

use crate::artifact::ArtifactId;
use crate::links::record::LinkSet;

/// In-memory memoization of per-artifact link computation.
///
/// Link records for one artifact are computed at most once per run;
/// repeated lookups for the same identity return the stored set without
/// touching the metadata source again. Entries are never evicted — one run
/// covers a bounded, enumerable artifact set.
///
/// The cache is owned by one resolver instance, not process-global, so
/// tests can construct fresh, isolated caches.
#[derive(Debug, Default)]
pub struct ArtifactLinkCache {
    links: HashMap<ArtifactId, LinkSet>,
}

impl ArtifactLinkCache {
    pub fn new() -> Self {
        Self {
            links: HashMap::new(),
        }
    }

    /// Get the link set for an artifact, computing and caching it if
    /// necessary. A failed computation is not cached.
    pub fn get_or_compute<F>(&mut self, id: &ArtifactId, compute: F) -> Result<&LinkSet>
    where
        F: FnOnce() -> Result<LinkSet>,
    {
        if !self.links.contains_key(id) {
            debug!(artifact = %id, "cache miss: computing links");
            let links = compute()?;
            self.links.insert(id.clone(), links);
        }
        Ok(self.links.get(id).expect("entry just ensured"))
    }

    /// Already-computed links for an artifact, if any.
    pub fn get(&self, id: &ArtifactId) -> Option<&LinkSet> {
        self.links.get(id)
    }

    /// Store a computed set. First write wins; a second insert for the same
    /// identity is ignored.
    pub fn insert(&mut self, id: ArtifactId, links: LinkSet) {
        self.links.entry(id).or_insert(links);
    }

    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.links.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
