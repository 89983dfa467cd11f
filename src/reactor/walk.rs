// src/reactor/walk.rs

//! Host-side adapter: manifest discovery and submission.
//!
//! Discovers modules top-down from the project root manifest (the order a
//! build tool's reactor would visit them), validates the discovered graph,
//! and submits each module to the [`ReverseScheduler`] with an action that
//! resolves its documentation links.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::artifact::ArtifactId;
use crate::errors::{DocdagError, Result};
use crate::fs::FileSystem;
use crate::links::LinkSet;
use crate::reactor::path::ModulePath;
use crate::reactor::scheduler::ReverseScheduler;
use crate::reactor::tree::ModuleAction;
use crate::resolve::{DeclaredDep, DependencyResolver, LinkResolver, parse_pom};

pub const MANIFEST_NAME: &str = "pom.xml";

/// One module found during discovery.
#[derive(Debug, Clone)]
pub struct DiscoveredModule {
    /// Reactor path: root module name, then declared child keys.
    pub path: ModulePath,
    /// Module directory on disk.
    pub dir: PathBuf,
    pub id: ArtifactId,
    /// Child entries from this module's own manifest, in manifest order.
    pub declared_children: Vec<String>,
    pub dependencies: Vec<DeclaredDep>,
}

/// Discover all modules reachable from the project root, in the top-down
/// order a reactor would visit them.
///
/// A declared child without a manifest is a hard error: the module
/// enumeration would be inconsistent with what can actually be submitted.
pub fn discover_modules(fs: &dyn FileSystem, project_root: &Path) -> Result<Vec<DiscoveredModule>> {
    let root_name = project_root
        .file_name()
        .map(|n| n.to_string_lossy().replace('\\', "/"))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "root".to_string());
    let root_path = ModulePath::new(root_name)?;

    let mut modules = Vec::new();
    discover_into(fs, project_root, &root_path, &mut modules)?;
    debug!(count = modules.len(), "module discovery complete");
    Ok(modules)
}

fn discover_into(
    fs: &dyn FileSystem,
    dir: &Path,
    path: &ModulePath,
    out: &mut Vec<DiscoveredModule>,
) -> Result<()> {
    let manifest = dir.join(MANIFEST_NAME);
    let text = fs
        .read_to_string(&manifest)
        .map_err(|e| DocdagError::ConfigError(format!("module '{path}' has no readable manifest: {e:#}")))?;
    let meta = parse_pom(&text)
        .with_context(|| format!("parsing manifest of module '{path}'"))
        .map_err(DocdagError::Other)?;

    debug!(module = %path, artifact = %meta.id, children = meta.modules.len(), "discovered module");
    out.push(DiscoveredModule {
        path: path.clone(),
        dir: dir.to_path_buf(),
        id: meta.id,
        declared_children: meta.modules.clone(),
        dependencies: meta.dependencies,
    });

    for child in &meta.modules {
        let child_path = path.join(child)?;
        discover_into(fs, &dir.join(child), &child_path, out)?;
    }
    Ok(())
}

/// Reject dependency cycles between modules of the same project.
///
/// Cross-module dependencies are matched by `group:artifact` coordinate;
/// an edge runs from a dependency to its dependent.
pub fn validate_module_graph(modules: &[DiscoveredModule]) -> Result<()> {
    let by_coordinate: HashMap<String, &str> = modules
        .iter()
        .map(|m| (m.id.coordinate(), m.path.as_str()))
        .collect();

    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for module in modules {
        graph.add_node(module.path.as_str());
    }
    for module in modules {
        for dep in &module.dependencies {
            let coordinate = format!("{}:{}", dep.group_id, dep.artifact_id);
            if let Some(&dep_path) = by_coordinate.get(&coordinate) {
                if dep_path != module.path.as_str() {
                    graph.add_edge(dep_path, module.path.as_str(), ());
                }
            }
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(DocdagError::ModuleCycle(cycle.node_id().to_string())),
    }
}

/// Submit every discovered module in order and collect the run's
/// aggregated links.
pub fn execute_reactor(
    modules: Vec<DiscoveredModule>,
    resolver: Arc<dyn DependencyResolver>,
    link_resolver: Arc<Mutex<LinkResolver>>,
    output_rel: PathBuf,
) -> Result<LinkSet> {
    let reactor_coords: HashSet<String> = modules.iter().map(|m| m.id.coordinate()).collect();

    let mut scheduler = ReverseScheduler::new();
    for module in modules {
        let path = module.path.clone();
        let declared = module.declared_children.clone();
        let action = module_action(
            module,
            Arc::clone(&resolver),
            Arc::clone(&link_resolver),
            reactor_coords.clone(),
            output_rel.clone(),
        );
        scheduler.submit(&path, &declared, action)?;
    }
    scheduler.finish()
}

/// The deferred work for one module: resolve its external dependencies'
/// documentation links and fold in whatever its children contributed.
///
/// Dependencies on sibling modules of the same project are excluded — their
/// documentation is produced by this very run and arrives through the
/// inherited set.
fn module_action(
    module: DiscoveredModule,
    resolver: Arc<dyn DependencyResolver>,
    link_resolver: Arc<Mutex<LinkResolver>>,
    reactor_coords: HashSet<String>,
    output_rel: PathBuf,
) -> ModuleAction {
    Box::new(move |inherited: LinkSet| {
        let external: Vec<DeclaredDep> = module
            .dependencies
            .iter()
            .filter(|dep| {
                !reactor_coords.contains(&format!("{}:{}", dep.group_id, dep.artifact_id))
            })
            .cloned()
            .collect();
        let deps = resolver.resolve(&external);
        let out_dir = module.dir.join(&output_rel);

        let mut links = link_resolver
            .lock()
            .unwrap()
            .links_for_module(&out_dir, &deps)?;
        links.merge(inherited);
        Ok(links)
    })
}
