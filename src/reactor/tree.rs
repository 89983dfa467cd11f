// src/reactor/tree.rs

//! Arena-owned tree of not-yet-completed modules.
//!
//! Nodes are owned by the [`ModuleTree`] arena and refer to their parent by
//! [`NodeId`] only; a child never owns its parent. A node exists either as a
//! `Placeholder` (named by an ancestor's declared child list, or created on
//! the way to a deeper submission, but not yet submitted itself) or as
//! `Submitted` (it has an action and a live pending-children set). Completed
//! nodes are removed from the arena immediately and their ids are never
//! reused.

use std::collections::{HashMap, HashSet};

use crate::errors::{DocdagError, Result};
use crate::links::LinkSet;
use crate::reactor::path::{ModulePath, strip_key_prefix};

/// The deferred unit of work bound to a module.
///
/// Receives the merged [`LinkSet`] accumulated by the module's already
/// completed children and returns the module's own records with the
/// inherited ones folded in.
pub type ModuleAction = Box<dyn FnOnce(LinkSet) -> anyhow::Result<LinkSet>>;

/// Non-owning handle into the arena. Ids are allocated from a counter and
/// never reused, so a stale id cannot alias a later node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

pub(crate) enum NodeState {
    /// Known to the tree but not yet submitted by the host.
    Placeholder,
    /// Submitted with its manifest facts and deferred action.
    Submitted {
        declared: HashSet<String>,
        pending: HashSet<String>,
        action: ModuleAction,
    },
}

pub(crate) struct ModuleNode {
    /// Key within the parent's namespace: the declared child entry, which
    /// may span several path segments (e.g. `"a/b"`).
    pub name: String,
    /// `None` only for the sentinel.
    pub parent: Option<NodeId>,
    /// Live (not yet completed) children by declared key.
    pub children: HashMap<String, NodeId>,
    /// Declared keys whose subtree has already completed.
    pub completed: HashSet<String>,
    pub state: NodeState,
}

impl ModuleNode {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            parent,
            children: HashMap::new(),
            completed: HashSet::new(),
            state: NodeState::Placeholder,
        }
    }

    pub(crate) fn is_submitted(&self) -> bool {
        matches!(self.state, NodeState::Submitted { .. })
    }
}

/// Outcome of locating the target node for a submission.
pub(crate) enum Located {
    /// The path named an existing placeholder.
    Placeholder(NodeId),
    /// The path did not exist; a fresh placeholder chain was created and
    /// this is its final node.
    Created(NodeId),
}

pub(crate) struct ModuleTree {
    nodes: HashMap<NodeId, ModuleNode>,
    sentinel: NodeId,
    next_id: u64,
}

impl ModuleTree {
    pub(crate) fn new() -> Self {
        let sentinel = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(sentinel, ModuleNode::new(String::new(), None));
        Self {
            nodes,
            sentinel,
            next_id: 1,
        }
    }

    pub(crate) fn sentinel(&self) -> NodeId {
        self.sentinel
    }

    pub(crate) fn node(&self, id: NodeId) -> &ModuleNode {
        &self.nodes[&id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut ModuleNode {
        self.nodes.get_mut(&id).expect("live node id")
    }

    /// Detach and return a node. The caller owns the node (and its action);
    /// the id becomes permanently dead.
    pub(crate) fn take(&mut self, id: NodeId) -> ModuleNode {
        self.nodes.remove(&id).expect("live node id")
    }

    fn alloc(&mut self, name: String, parent: NodeId) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, ModuleNode::new(name.clone(), Some(parent)));
        self.nodes
            .get_mut(&parent)
            .expect("live parent id")
            .children
            .insert(name, id);
        id
    }

    /// Full path of a live node, for diagnostics.
    pub(crate) fn path_of(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == self.sentinel {
                break;
            }
            let node = &self.nodes[&cur];
            segments.push(node.name.clone());
            current = node.parent;
        }
        segments.reverse();
        segments.join("/")
    }

    /// Paths of all live nodes except the sentinel, sorted for stable output.
    pub(crate) fn live_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .nodes
            .keys()
            .filter(|&&id| id != self.sentinel)
            .map(|&id| self.path_of(id))
            .collect();
        paths.sort();
        paths
    }

    /// Locate the node for `path`, creating placeholder ancestors as needed.
    ///
    /// Resolution walks from the sentinel. At each submitted node an exact
    /// match of the remaining path against live children and declared keys
    /// wins; otherwise the longest live-or-declared prefix is descended.
    /// At nodes with no declared information (the sentinel, placeholders)
    /// the same matching runs against live children only, and fresh
    /// structure is created one segment at a time.
    ///
    /// Errors:
    /// - [`DocdagError::DuplicateModule`] if `path` names an already
    ///   submitted or already completed module;
    /// - [`DocdagError::ModuleNotFound`] if `path` descends into a
    ///   completed subtree;
    /// - [`DocdagError::UndeclaredModule`] if a submitted ancestor never
    ///   declared the next step.
    ///
    /// The duplicate and not-found cases are detected before any mutation,
    /// so a failed call leaves the tree unchanged.
    pub(crate) fn locate_or_create(&mut self, path: &ModulePath) -> Result<Located> {
        let mut current = self.sentinel;
        let mut rest = path.as_str().to_string();

        loop {
            let node = &self.nodes[&current];

            if let Some(&child) = node.children.get(rest.as_str()) {
                return match self.nodes[&child].state {
                    NodeState::Placeholder => Ok(Located::Placeholder(child)),
                    NodeState::Submitted { .. } => {
                        Err(DocdagError::DuplicateModule(path.as_str().to_string()))
                    }
                };
            }
            if node.completed.contains(rest.as_str()) {
                return Err(DocdagError::DuplicateModule(path.as_str().to_string()));
            }

            let declared_exact = matches!(
                &node.state,
                NodeState::Submitted { declared, .. } if declared.contains(rest.as_str())
            );
            let submitted = node.is_submitted();

            // Exact declared key with no live node yet: the final target.
            if declared_exact {
                let id = self.alloc(rest, current);
                return Ok(Located::Created(id));
            }

            // Descend through the longest existing prefix.
            if let Some((key, remainder)) = self.longest_prefix(current, &rest) {
                if self.nodes[&current].completed.contains(&key) {
                    return Err(DocdagError::ModuleNotFound(path.as_str().to_string()));
                }
                let live = self.nodes[&current].children.get(&key).copied();
                current = match live {
                    Some(child) => child,
                    // Declared but not yet submitted: pre-register it.
                    None => self.alloc(key, current),
                };
                rest = remainder;
                continue;
            }

            // No match at a submitted node is a protocol violation: the
            // parent's manifest never declared this subtree.
            if submitted {
                return Err(DocdagError::UndeclaredModule {
                    parent: self.path_of(current),
                    child: rest,
                });
            }

            // No declared information to guide us: grow one segment.
            let segment = rest.split('/').next().expect("non-empty path").to_string();
            match strip_key_prefix(&rest, &segment) {
                Some(remainder) => {
                    let remainder = remainder.to_string();
                    current = self.alloc(segment, current);
                    rest = remainder;
                }
                None => {
                    let id = self.alloc(segment, current);
                    return Ok(Located::Created(id));
                }
            }
        }
    }

    /// Longest live-or-declared child key of `id` that is a proper prefix of
    /// `rest` (segment-aligned).
    fn longest_prefix(&self, id: NodeId, rest: &str) -> Option<(String, String)> {
        let node = &self.nodes[&id];
        let mut best: Option<&str> = None;
        let mut consider = |key: &str| {
            if strip_key_prefix(rest, key).is_some()
                && best.is_none_or(|b| key.len() > b.len())
            {
                best = Some(key);
            }
        };
        for key in node.children.keys() {
            consider(key);
        }
        for key in &node.completed {
            consider(key);
        }
        if let NodeState::Submitted { declared, .. } = &node.state {
            for key in declared {
                consider(key);
            }
        }
        let key = best?;
        let remainder = strip_key_prefix(rest, key).expect("checked prefix");
        Some((key.to_string(), remainder.to_string()))
    }
}
