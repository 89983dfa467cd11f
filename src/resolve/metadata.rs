// src/resolve/metadata.rs

//! Artifact metadata: manifest (pom) parsing and documentation base-url
//! derivation.
//!
//! Metadata problems are recoverable resolution failures — callers log and
//! skip the affected artifact rather than aborting the run.

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use roxmltree::{Document, Node};

use crate::artifact::ArtifactId;
use crate::fs::FileSystem;

/// A dependency as declared in a manifest. The version may be managed
/// elsewhere and therefore absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDep {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
}

impl DeclaredDep {
    /// The concrete artifact identity, if the declaration carries a version.
    pub fn to_artifact(&self) -> Option<ArtifactId> {
        self.version
            .as_ref()
            .map(|v| ArtifactId::new(&self.group_id, &self.artifact_id, v))
    }
}

/// Metadata extracted from one project manifest.
#[derive(Debug, Clone)]
pub struct ProjectMeta {
    pub id: ArtifactId,
    pub packaging: String,
    pub url: Option<String>,
    pub parent: Option<ArtifactId>,
    /// Child module entries, relative directory paths.
    pub modules: Vec<String>,
    pub dependencies: Vec<DeclaredDep>,
}

impl ProjectMeta {
    /// Whether this artifact only aggregates others.
    pub fn is_aggregator(&self) -> bool {
        self.packaging == "pom"
    }
}

/// Parent-chain walks stop here; a deeper chain indicates cyclic or
/// degenerate metadata.
const MAX_PARENT_DEPTH: usize = 32;

/// Reads artifact metadata for resolved dependencies.
pub trait MetadataReader: Debug {
    fn project_meta(&self, artifact: &ArtifactId) -> Result<ProjectMeta>;

    /// Documentation base url for an artifact: the manifest's own `<url>`
    /// if present, otherwise the parent chain's url with the artifact id
    /// appended, always with a trailing slash.
    fn base_url(&self, artifact: &ArtifactId) -> Result<String> {
        self.base_url_at(artifact, 0)
    }

    #[doc(hidden)]
    fn base_url_at(&self, artifact: &ArtifactId, depth: usize) -> Result<String> {
        if depth > MAX_PARENT_DEPTH {
            bail!("parent chain of {artifact} exceeds {MAX_PARENT_DEPTH} levels");
        }
        let meta = self.project_meta(artifact)?;
        if let Some(url) = meta.url {
            return Ok(ensure_slash(url));
        }
        let parent = meta
            .parent
            .ok_or_else(|| anyhow!("manifest of {artifact} has neither url nor parent"))?;
        let parent_url = self.base_url_at(&parent, depth + 1)?;
        Ok(format!("{}{}/", parent_url, meta.id.artifact_id))
    }
}

/// [`MetadataReader`] over a Maven-layout local repository.
#[derive(Debug)]
pub struct RepoMetadataReader {
    fs: Arc<dyn FileSystem>,
    repo_root: PathBuf,
}

impl RepoMetadataReader {
    pub fn new(fs: Arc<dyn FileSystem>, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            repo_root: repo_root.into(),
        }
    }
}

impl MetadataReader for RepoMetadataReader {
    fn project_meta(&self, artifact: &ArtifactId) -> Result<ProjectMeta> {
        let pom = self.repo_root.join(artifact.pom_path());
        let text = self
            .fs
            .read_to_string(&pom)
            .with_context(|| format!("reading manifest of {artifact}"))?;
        parse_pom(&text).with_context(|| format!("parsing manifest of {artifact}"))
    }
}

/// Parse a pom document into [`ProjectMeta`].
///
/// Group id and version fall back to the `<parent>` block when absent, as
/// the format allows.
pub fn parse_pom(text: &str) -> Result<ProjectMeta> {
    let doc = Document::parse(text).context("malformed xml")?;
    let project = doc.root_element();
    if project.tag_name().name() != "project" {
        bail!("root element is <{}>, expected <project>", project.tag_name().name());
    }

    let parent = child(project, "parent").map(parse_parent).transpose()?;

    let group_id = child_text(project, "groupId")
        .or_else(|| parent.as_ref().map(|p| p.group_id.clone()))
        .ok_or_else(|| anyhow!("missing groupId (and no parent to inherit from)"))?;
    let artifact_id =
        child_text(project, "artifactId").ok_or_else(|| anyhow!("missing artifactId"))?;
    let version = child_text(project, "version")
        .or_else(|| parent.as_ref().map(|p| p.version.clone()))
        .ok_or_else(|| anyhow!("missing version (and no parent to inherit from)"))?;

    let packaging = child_text(project, "packaging").unwrap_or_else(|| "jar".to_string());
    let url = child_text(project, "url");

    let modules = child(project, "modules")
        .map(|modules| {
            modules
                .children()
                .filter(|n| n.is_element() && n.tag_name().name() == "module")
                .filter_map(|n| n.text())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let dependencies = child(project, "dependencies")
        .map(|deps| {
            deps.children()
                .filter(|n| n.is_element() && n.tag_name().name() == "dependency")
                .filter_map(|dep| {
                    let group_id = child_text(dep, "groupId")?;
                    let artifact_id = child_text(dep, "artifactId")?;
                    Some(DeclaredDep {
                        group_id,
                        artifact_id,
                        version: child_text(dep, "version"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(ProjectMeta {
        id: ArtifactId::new(group_id, artifact_id, version),
        packaging,
        url,
        parent,
        modules,
        dependencies,
    })
}

fn parse_parent(parent: Node<'_, '_>) -> Result<ArtifactId> {
    let group_id =
        child_text(parent, "groupId").ok_or_else(|| anyhow!("parent block missing groupId"))?;
    let artifact_id = child_text(parent, "artifactId")
        .ok_or_else(|| anyhow!("parent block missing artifactId"))?;
    let version =
        child_text(parent, "version").ok_or_else(|| anyhow!("parent block missing version"))?;
    Ok(ArtifactId::new(group_id, artifact_id, version))
}

fn child<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name)
        .and_then(|n| n.text())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Append a trailing slash if absent.
pub fn ensure_slash(url: String) -> String {
    if url.ends_with('/') { url } else { format!("{url}/") }
}
