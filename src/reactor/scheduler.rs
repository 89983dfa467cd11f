// src/reactor/scheduler.rs

//! Reverse scheduler: bottom-up execution over top-down submissions.
//!
//! The host visits modules in its own order and calls [`ReverseScheduler::submit`]
//! once per module. A module's action runs only once all of its declared
//! children have completed; completion propagates upward, recursively firing
//! parents whose pending sets drain, so leaves run first and the root last
//! even though the root is usually submitted first.
//!
//! The scheduler is single-threaded and synchronous: one `submit` call runs
//! to completion, including any completion cascade, before the next.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::errors::{DocdagError, Result};
use crate::links::LinkSet;
use crate::reactor::path::ModulePath;
use crate::reactor::tree::{Located, ModuleAction, ModuleTree, NodeId, NodeState};

pub struct ReverseScheduler {
    tree: ModuleTree,
    /// Link records completed children have accumulated for each live node,
    /// keyed by the node that will inherit them when it fires. The
    /// sentinel's entry collects the whole run's result.
    inherited: HashMap<NodeId, LinkSet>,
}

impl ReverseScheduler {
    pub fn new() -> Self {
        Self {
            tree: ModuleTree::new(),
            inherited: HashMap::new(),
        }
    }

    /// Register `action` for the module at `path`.
    ///
    /// `declared_children` are the child keys from the module's own
    /// manifest, relative to the module (an entry may span several path
    /// segments). If every declared child has already completed — in
    /// particular if the list is empty — the action fires before this call
    /// returns, possibly cascading into ancestors.
    pub fn submit(
        &mut self,
        path: &ModulePath,
        declared_children: &[String],
        action: ModuleAction,
    ) -> Result<()> {
        let mut declared = HashSet::new();
        for child in declared_children {
            ModulePath::new(child).map_err(|_| {
                DocdagError::ConfigError(format!(
                    "module '{path}' declares invalid child entry '{child}'"
                ))
            })?;
            declared.insert(child.clone());
        }

        debug!(module = %path, children = declared.len(), "submitting module");

        let id = match self.tree.locate_or_create(path)? {
            Located::Created(id) => id,
            Located::Placeholder(id) => {
                // Children attached before this module was submitted must
                // all have been declared by it.
                let node = self.tree.node(id);
                for key in node.children.keys().chain(node.completed.iter()) {
                    if !declared.contains(key) {
                        return Err(DocdagError::UndeclaredModule {
                            parent: path.as_str().to_string(),
                            child: key.clone(),
                        });
                    }
                }
                id
            }
        };

        let node = self.tree.node_mut(id);
        let pending: HashSet<String> = declared
            .iter()
            .filter(|key| !node.completed.contains(*key))
            .cloned()
            .collect();
        let eligible = pending.is_empty();
        node.state = NodeState::Submitted {
            declared,
            pending,
            action,
        };

        if eligible {
            self.fire(id)?;
        }
        Ok(())
    }

    /// Paths of modules still waiting (submitted or placeholder), for
    /// diagnostics.
    pub fn pending_modules(&self) -> Vec<String> {
        self.tree.live_paths()
    }

    /// Consume the scheduler after the host has submitted every module.
    ///
    /// Returns the link records accumulated at the root. Errors with
    /// [`DocdagError::PendingModules`] if any module never became eligible:
    /// the host's declared module graph was inconsistent with what it
    /// actually submitted.
    pub fn finish(mut self) -> Result<LinkSet> {
        let pending = self.tree.live_paths();
        if !pending.is_empty() {
            return Err(DocdagError::PendingModules(pending));
        }
        let sentinel = self.tree.sentinel();
        Ok(self.inherited.remove(&sentinel).unwrap_or_default())
    }

    /// Run a node's action and propagate its completion upward.
    ///
    /// The node is detached from the tree before the action runs, matching
    /// the lifecycle contract: a completed node is never referenced again.
    /// If the action fails, the parent's bookkeeping still records the
    /// child as completed (so later submissions see a consistent tree) but
    /// the cascade stops and the error surfaces from the triggering
    /// `submit`.
    fn fire(&mut self, id: NodeId) -> Result<()> {
        let path = self.tree.path_of(id);
        let node = self.tree.take(id);
        let action = match node.state {
            NodeState::Submitted { action, pending, .. } => {
                debug_assert!(pending.is_empty(), "fired with pending children");
                action
            }
            NodeState::Placeholder => unreachable!("placeholder cannot fire"),
        };

        let inherited = self.inherited.remove(&id).unwrap_or_default();
        info!(module = %path, inherited = inherited.len(), "running module action");
        let result = action(inherited);

        let parent_id = node.parent.expect("fired node has a parent");
        {
            let parent = self.tree.node_mut(parent_id);
            parent.children.remove(&node.name);
            parent.completed.insert(node.name.clone());
            if let NodeState::Submitted { pending, .. } = &mut parent.state {
                pending.remove(&node.name);
            }
        }

        let links = match result {
            Ok(links) => links,
            Err(source) => {
                return Err(DocdagError::ActionFailed {
                    module: path,
                    source,
                });
            }
        };
        debug!(module = %path, links = links.len(), "module action complete");
        self.inherited.entry(parent_id).or_default().merge(links);

        if parent_id == self.tree.sentinel() {
            return Ok(());
        }
        let parent_ready = matches!(
            &self.tree.node(parent_id).state,
            NodeState::Submitted { pending, .. } if pending.is_empty()
        );
        if parent_ready {
            return self.fire(parent_id);
        }
        Ok(())
    }
}

impl Default for ReverseScheduler {
    fn default() -> Self {
        Self::new()
    }
}
