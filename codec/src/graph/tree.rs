//! Arena-backed command tree.

use std::collections::{HashMap, HashSet, VecDeque};
use std::ops::Index;

/// Index of a node in a [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of a command tree.
///
/// The root has no stub; every other node carries a literal or argument stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode<S> {
    pub(crate) stub: Option<S>,
    pub(crate) executable: bool,
    pub(crate) children: Vec<NodeId>,
    pub(crate) redirect: Option<NodeId>,
}

impl<S> CommandNode<S> {
    pub(crate) const fn shell(stub: Option<S>, executable: bool) -> Self {
        Self {
            stub,
            executable,
            children: Vec::new(),
            redirect: None,
        }
    }

    #[must_use]
    pub const fn stub(&self) -> Option<&S> {
        self.stub.as_ref()
    }

    #[must_use]
    pub const fn is_executable(&self) -> bool {
        self.executable
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub const fn redirect(&self) -> Option<NodeId> {
        self.redirect
    }
}

/// A rooted command graph stored as an arena.
///
/// Nodes refer to each other by [`NodeId`], so redirect cycles need no
/// shared ownership and dropping the tree is a single deallocation.
///
/// Equality is structural: two trees are equal when the nodes reachable from
/// their roots correspond one to one, whatever order the arenas hold them in.
#[derive(Debug, Clone)]
pub struct CommandTree<S> {
    nodes: Vec<CommandNode<S>>,
    root: NodeId,
}

impl<S> Default for CommandTree<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CommandTree<S> {
    /// Creates a tree holding only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![CommandNode::shell(None, false)],
            root: NodeId(0),
        }
    }

    pub(crate) const fn from_parts(nodes: Vec<CommandNode<S>>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&CommandNode<S>> {
        self.nodes.get(id.index())
    }

    /// Appends a child under `parent` and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add_child(&mut self, parent: NodeId, stub: S) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(CommandNode::shell(Some(stub), false));
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Marks `node` as carrying a terminal command.
    pub fn set_executable(&mut self, node: NodeId, executable: bool) {
        self.nodes[node.index()].executable = executable;
    }

    /// Points `node`'s redirect at `target`, which may be an ancestor.
    pub fn set_redirect(&mut self, node: NodeId, target: NodeId) {
        assert!(target.index() < self.nodes.len(), "redirect target outside tree");
        self.nodes[node.index()].redirect = Some(target);
    }

    /// Iterates nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &CommandNode<S>)> + '_ {
        self.nodes
            .iter()
            .zip(0u32..)
            .map(|(node, raw)| (NodeId(raw), node))
    }
}

/// Node correspondence built while walking two trees in lockstep.
struct Pairing {
    forward: HashMap<NodeId, NodeId>,
    claimed: HashSet<NodeId>,
    queue: VecDeque<(NodeId, NodeId)>,
}

impl Pairing {
    /// Records `left ~ right`, failing if either side is already paired
    /// with a different node.
    fn pair(&mut self, left: NodeId, right: NodeId) -> bool {
        if let Some(&mapped) = self.forward.get(&left) {
            return mapped == right;
        }
        if !self.claimed.insert(right) {
            return false;
        }
        self.forward.insert(left, right);
        self.queue.push_back((left, right));
        true
    }
}

impl<S: PartialEq> PartialEq for CommandTree<S> {
    fn eq(&self, other: &Self) -> bool {
        let mut pairing = Pairing {
            forward: HashMap::new(),
            claimed: HashSet::new(),
            queue: VecDeque::new(),
        };
        pairing.pair(self.root, other.root);

        while let Some((left, right)) = pairing.queue.pop_front() {
            let (Some(a), Some(b)) = (self.get(left), other.get(right)) else {
                return false;
            };
            if a.stub != b.stub
                || a.executable != b.executable
                || a.children.len() != b.children.len()
            {
                return false;
            }
            for (&x, &y) in a.children.iter().zip(&b.children) {
                if !pairing.pair(x, y) {
                    return false;
                }
            }
            match (a.redirect, b.redirect) {
                (None, None) => {}
                (Some(x), Some(y)) if pairing.pair(x, y) => {}
                _ => return false,
            }
        }
        true
    }
}

impl<S: Eq> Eq for CommandTree<S> {}

impl<S> Index<NodeId> for CommandTree<S> {
    type Output = CommandNode<S>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}
