// src/lib.rs

pub mod artifact;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod javadoc;
pub mod links;
pub mod logging;
pub mod probe;
pub mod reactor;
pub mod resolve;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_optional;
use crate::config::model::ConfigFile;
use crate::fs::{FileSystem, RealFileSystem};
use crate::links::UrlOverrideTable;
use crate::probe::HttpProbe;
use crate::reactor::walk::{
    DiscoveredModule, discover_modules, execute_reactor, validate_module_graph,
};
use crate::resolve::{LinkResolver, LocalRepoResolver, RepoMetadataReader};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - module discovery from the project root manifest
/// - the reverse scheduler walk
/// - the final link summary on stdout
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_optional(&config_path)?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let project_root = std::fs::canonicalize(&args.project_root)?;

    let modules = discover_modules(fs.as_ref(), &project_root)?;
    validate_module_graph(&modules)?;

    if args.dry_run {
        print_dry_run(&cfg, &modules);
        return Ok(());
    }

    let offline = args.offline || cfg.probe.offline;
    let repo_root = repository_root(&cfg);
    debug!(?repo_root, offline, "resolved run options");

    let resolver = Arc::new(LocalRepoResolver::new(Arc::clone(&fs), repo_root.clone()));
    let metadata = Box::new(RepoMetadataReader::new(Arc::clone(&fs), repo_root));
    let probe = Box::new(HttpProbe::new(Duration::from_secs(cfg.probe.timeout_secs))?);
    let link_resolver = Arc::new(Mutex::new(LinkResolver::new(
        Arc::clone(&fs),
        metadata,
        probe,
        UrlOverrideTable::new(cfg.overrides.clone()),
        offline,
    )));

    let links = execute_reactor(modules, resolver, link_resolver, cfg.output.dir.clone())?;

    info!(links = links.len(), "reactor walk complete");
    for record in links.iter() {
        println!("{} = {}", record.url, record.location.display());
    }
    Ok(())
}

/// Local artifact repository root: config, else `$HOME/.m2/repository`.
fn repository_root(cfg: &ConfigFile) -> PathBuf {
    if let Some(ref repo) = cfg.output.repository {
        return repo.clone();
    }
    let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
    home.join(".m2").join("repository")
}

/// Simple dry-run output: print modules, children and dependencies.
fn print_dry_run(cfg: &ConfigFile, modules: &[DiscoveredModule]) {
    println!("docdag dry-run");
    println!("  output.dir = {}", cfg.output.dir.display());
    println!("  probe.offline = {}", cfg.probe.offline);
    println!();

    println!("modules ({}):", modules.len());
    for module in modules {
        println!("  - {}", module.path);
        println!("      artifact: {}", module.id);
        if !module.declared_children.is_empty() {
            println!("      children: {:?}", module.declared_children);
        }
        if !module.dependencies.is_empty() {
            println!("      dependencies: {}", module.dependencies.len());
        }
    }

    if !cfg.overrides.is_empty() {
        println!();
        println!("url overrides ({}):", cfg.overrides.len());
        for entry in &cfg.overrides {
            println!("  - {} -> {}", entry.dependency, entry.url);
        }
    }

    debug!("dry-run complete (no actions executed)");
}
