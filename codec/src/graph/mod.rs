//! Command graph codec.
//!
//! A command tree is a rooted graph of literal and argument nodes. Nodes have
//! ordered children and may carry one redirect edge to any other node,
//! including an ancestor. On the wire the graph is a flat entry array
//! addressed by index plus a root index.
//!
//! # Design Principles
//!
//! - **No recursion on untrusted input** - flattening, validation and
//!   resolution are all worklist driven, so graph depth never touches the
//!   stack.
//! - **Reject before building** - indices are range-checked while decoding and
//!   the resolvability fixpoint runs before a single node is allocated.
//! - **Arena addressed** - resolved nodes refer to each other by [`NodeId`].

mod flags;
mod flat;
mod resolve;
mod tree;

pub use flags::{NodeFlags, NodeKind};
pub use flat::{CommandGraphCodec, FlatGraph, GraphEntry, StubCodec};
pub use tree::{CommandNode, CommandTree, NodeId};
