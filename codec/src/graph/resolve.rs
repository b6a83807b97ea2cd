//! Validation and resolution of flat command graphs.
//!
//! Validation runs two independent fixpoint passes over the full index set:
//! one removes entries whose redirect target has already been removed (or
//! that have none), the other removes entries whose children have all been
//! removed. Anything left over after either pass cannot be built and the
//! graph is rejected. Each pass is computed with a worklist over reverse
//! edges, which reaches the same fixpoint as repeated sweeps in linear time.
//!
//! Resolution then walks the graph breadth-first from the root, allocating
//! each node in an arena the first time it is reached. A redirect back to a
//! node that is still being wired resolves to the already-allocated id, so
//! cycles through redirects need neither recursion nor shared ownership.

use std::collections::VecDeque;

use tracing::debug;

use super::flags::NodeFlags;
use super::flat::{FlatGraph, GraphEntry};
use super::tree::{CommandNode, CommandTree, NodeId};
use crate::error::{CodecError, CodecResult};

/// Counts the entries left after repeatedly removing every entry whose
/// dependencies have all been removed.
fn unresolved_after_pruning<S>(
    entries: &[GraphEntry<S>],
    deps: impl Fn(&GraphEntry<S>) -> &[u32],
) -> usize {
    let len = entries.len();
    let mut pending = vec![0usize; len];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); len];
    for (idx, entry) in entries.iter().enumerate() {
        for &dep in deps(entry) {
            pending[idx] += 1;
            dependents[dep as usize].push(idx);
        }
    }

    let mut ready: VecDeque<usize> = (0..len).filter(|&idx| pending[idx] == 0).collect();
    let mut removed = 0;
    while let Some(idx) = ready.pop_front() {
        removed += 1;
        for &dependent in &dependents[idx] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.push_back(dependent);
            }
        }
    }
    len - removed
}

impl<S> FlatGraph<S> {
    /// Rejects graphs that cannot be resolved into a consistent tree.
    ///
    /// Indices must already be in range (see [`FlatGraph::check_indices`]).
    pub fn validate(&self) -> CodecResult<()> {
        self.check_indices()?;
        let total = self.entries.len();

        let unbuildable = unresolved_after_pruning(&self.entries, |entry| {
            entry.redirect.as_slice()
        });
        if unbuildable != 0 {
            debug!(
                unresolved = unbuildable,
                total, "command graph has unresolvable redirects"
            );
            return Err(CodecError::ImpossibleGraph {
                unresolved: unbuildable,
                total,
            });
        }

        let unresolvable = unresolved_after_pruning(&self.entries, |entry| &entry.children);
        if unresolvable != 0 {
            debug!(
                unresolved = unresolvable,
                total, "command graph has a child cycle"
            );
            return Err(CodecError::ImpossibleGraph {
                unresolved: unresolvable,
                total,
            });
        }
        Ok(())
    }

    /// Validates the graph and builds the nodes reachable from the root.
    ///
    /// The resolved root is always [`NodeId`] `0`; other nodes are numbered
    /// in breadth-first discovery order, children before redirect.
    pub fn resolve(self) -> CodecResult<CommandTree<S>> {
        self.validate()?;

        let root = self.root as usize;
        let len = self.entries.len();
        let mut links = Vec::with_capacity(len);
        let mut arena = Arena {
            shells: Vec::with_capacity(len),
            mapping: vec![None; len],
            nodes: Vec::new(),
            queue: VecDeque::new(),
        };
        for entry in self.entries {
            let executable = entry.flags.contains(NodeFlags::EXECUTABLE);
            arena
                .shells
                .push(Some(CommandNode::shell(entry.stub, executable)));
            links.push((entry.children, entry.redirect));
        }

        let root_id = arena.allocate(root);
        while let Some(idx) = arena.queue.pop_front() {
            let (children, redirect) = &links[idx];
            let children: Vec<NodeId> = children
                .iter()
                .map(|&child| arena.allocate(child as usize))
                .collect();
            let redirect = redirect.map(|target| arena.allocate(target as usize));

            if let Some(id) = arena.mapping[idx] {
                let node = &mut arena.nodes[id.index()];
                node.children = children;
                node.redirect = redirect;
            }
        }

        Ok(CommandTree::from_parts(arena.nodes, root_id))
    }
}

struct Arena<S> {
    shells: Vec<Option<CommandNode<S>>>,
    mapping: Vec<Option<NodeId>>,
    nodes: Vec<CommandNode<S>>,
    queue: VecDeque<usize>,
}

impl<S> Arena<S> {
    /// Returns the arena id for flat index `idx`, allocating its shell and
    /// queueing it for wiring the first time it is seen.
    fn allocate(&mut self, idx: usize) -> NodeId {
        if let Some(id) = self.mapping[idx] {
            return id;
        }
        let id = NodeId::new(self.nodes.len() as u32);
        if let Some(shell) = self.shells[idx].take() {
            self.nodes.push(shell);
        }
        self.mapping[idx] = Some(id);
        self.queue.push_back(idx);
        id
    }
}
