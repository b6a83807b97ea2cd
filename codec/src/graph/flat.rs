//! Flat, index-addressed form of a command graph and its wire codec.

use std::collections::VecDeque;

use buffer::{ByteReader, ByteWriter};

use super::flags::{NodeFlags, NodeKind};
use super::tree::{CommandTree, NodeId};
use crate::codec::Codec;
use crate::error::{CodecError, CodecResult, LimitKind, ValueReason};

/// Payload codec for literal and argument nodes.
pub trait StubCodec {
    type Stub;

    /// Kind and custom-suggestion bits for `stub`.
    ///
    /// The kind must be [`NodeKind::Literal`] or [`NodeKind::Argument`].
    fn flags(&self, stub: &Self::Stub) -> NodeFlags;

    fn encode(&self, stub: &Self::Stub, buf: &mut ByteWriter) -> CodecResult<()>;

    /// Reads a stub whose node carries `flags`.
    fn decode(&self, flags: NodeFlags, buf: &mut ByteReader<'_>) -> CodecResult<Self::Stub>;
}

impl<SC: StubCodec + ?Sized> StubCodec for &SC {
    type Stub = SC::Stub;

    fn flags(&self, stub: &Self::Stub) -> NodeFlags {
        (**self).flags(stub)
    }

    fn encode(&self, stub: &Self::Stub, buf: &mut ByteWriter) -> CodecResult<()> {
        (**self).encode(stub, buf)
    }

    fn decode(&self, flags: NodeFlags, buf: &mut ByteReader<'_>) -> CodecResult<Self::Stub> {
        (**self).decode(flags, buf)
    }
}

/// One wire entry of a flattened graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEntry<S> {
    pub flags: NodeFlags,
    pub redirect: Option<u32>,
    pub children: Vec<u32>,
    pub stub: Option<S>,
}

/// A graph as an entry array plus the root's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatGraph<S> {
    pub entries: Vec<GraphEntry<S>>,
    pub root: u32,
}

impl<S> FlatGraph<S> {
    /// Checks that every child, redirect and root index is in range.
    pub fn check_indices(&self) -> CodecResult<()> {
        let len = self.entries.len();
        let check = |index: u32| {
            if (index as usize) < len {
                Ok(())
            } else {
                Err(CodecError::GraphIndexOutOfRange { index, len })
            }
        };
        check(self.root)?;
        for entry in &self.entries {
            if let Some(redirect) = entry.redirect {
                check(redirect)?;
            }
            for &child in &entry.children {
                check(child)?;
            }
        }
        Ok(())
    }
}

/// Codec for command graphs with node payloads written by `SC`.
///
/// Encodes both the flat form and, through [`flatten`](Self::flatten) and
/// [`FlatGraph::resolve`], the resolved [`CommandTree`].
///
/// # Wire layout
///
/// ```text
/// varint count | entry * count | varint root
/// entry := u8 flags | [varint redirect] | [stub] | varint n | varint child * n
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandGraphCodec<SC> {
    stubs: SC,
    max_nodes: usize,
}

impl<SC: StubCodec> CommandGraphCodec<SC> {
    #[must_use]
    pub const fn new(stubs: SC, max_nodes: usize) -> Self {
        Self { stubs, max_nodes }
    }

    /// Flattens `tree` in breadth-first discovery order from the root.
    ///
    /// Children are discovered before the redirect; a node's id is assigned
    /// the first time it is dequeued. Nodes unreachable from the root are
    /// left out.
    pub fn flatten(&self, tree: &CommandTree<SC::Stub>) -> CodecResult<FlatGraph<SC::Stub>>
    where
        SC::Stub: Clone,
    {
        let mut ids: Vec<Option<u32>> = vec![None; tree.len()];
        let mut order: Vec<NodeId> = Vec::new();
        let mut queue = VecDeque::from([tree.root()]);

        while let Some(node_id) = queue.pop_front() {
            if ids[node_id.index()].is_some() {
                continue;
            }
            ids[node_id.index()] = Some(order.len() as u32);
            order.push(node_id);
            let node = &tree[node_id];
            queue.extend(node.children().iter().copied());
            queue.extend(node.redirect());
        }

        let id_of = |node: NodeId| ids[node.index()].unwrap_or(u32::MAX);
        let mut entries = Vec::with_capacity(order.len());
        for node_id in order {
            let node = &tree[node_id];
            let mut flags = match node.stub() {
                Some(stub) => {
                    let flags = self.stubs.flags(stub);
                    if flags.kind() == NodeKind::Root {
                        return Err(CodecError::InvalidValue(ValueReason::InvalidNodeKind {
                            flags: flags.bits(),
                        }));
                    }
                    flags & (NodeFlags::LITERAL | NodeFlags::ARGUMENT | NodeFlags::CUSTOM_SUGGESTIONS)
                }
                None => NodeFlags::empty(),
            };
            flags.set(NodeFlags::EXECUTABLE, node.is_executable());
            flags.set(NodeFlags::REDIRECT, node.redirect().is_some());

            entries.push(GraphEntry {
                flags,
                redirect: node.redirect().map(id_of),
                children: node.children().iter().copied().map(id_of).collect(),
                stub: node.stub().cloned(),
            });
        }

        Ok(FlatGraph {
            entries,
            root: id_of(tree.root()),
        })
    }

    fn encode_entry(&self, entry: &GraphEntry<SC::Stub>, buf: &mut ByteWriter) -> CodecResult<()> {
        buf.write_u8(entry.flags.bits());
        if let Some(redirect) = entry.redirect {
            buf.write_var_u32(redirect);
        }
        if let Some(stub) = &entry.stub {
            self.stubs.encode(stub, buf)?;
        }
        buf.write_var_u32(entry.children.len() as u32);
        for &child in &entry.children {
            buf.write_var_u32(child);
        }
        Ok(())
    }

    fn decode_entry(&self, count: usize, buf: &mut ByteReader<'_>) -> CodecResult<GraphEntry<SC::Stub>> {
        let flags = NodeFlags::from_wire(buf.read_u8()?)?;
        let redirect = if flags.contains(NodeFlags::REDIRECT) {
            Some(buf.read_var_u32()?)
        } else {
            None
        };
        let stub = match flags.kind() {
            NodeKind::Root => None,
            NodeKind::Literal | NodeKind::Argument => Some(self.stubs.decode(flags, buf)?),
        };
        let child_count = buf
            .read_len(count)
            .map_err(CodecError::bounded(LimitKind::GraphChildren))?;
        let mut children = Vec::with_capacity(child_count.min(buf.remaining()));
        for _ in 0..child_count {
            children.push(buf.read_var_u32()?);
        }
        Ok(GraphEntry {
            flags,
            redirect,
            children,
            stub,
        })
    }
}

impl<SC: StubCodec> Codec<FlatGraph<SC::Stub>> for CommandGraphCodec<SC> {
    fn encode(&self, value: &FlatGraph<SC::Stub>, buf: &mut ByteWriter) -> CodecResult<()> {
        let count = value.entries.len();
        if count > self.max_nodes {
            return Err(CodecError::OversizedValue {
                kind: LimitKind::GraphNodes,
                limit: self.max_nodes,
                actual: count,
            });
        }
        value.check_indices()?;
        for entry in &value.entries {
            let stub_kind = entry.stub.is_some();
            if stub_kind == (entry.flags.kind() == NodeKind::Root)
                || entry.redirect.is_some() != entry.flags.contains(NodeFlags::REDIRECT)
                || !entry.flags.is_consistent()
            {
                return Err(CodecError::InvalidValue(ValueReason::InvalidNodeKind {
                    flags: entry.flags.bits(),
                }));
            }
        }

        buf.write_var_u32(count as u32);
        for entry in &value.entries {
            self.encode_entry(entry, buf)?;
        }
        buf.write_var_u32(value.root);
        Ok(())
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<FlatGraph<SC::Stub>> {
        let count = buf
            .read_len(self.max_nodes)
            .map_err(CodecError::bounded(LimitKind::GraphNodes))?;
        let mut entries = Vec::with_capacity(count.min(buf.remaining()));
        for _ in 0..count {
            entries.push(self.decode_entry(count, buf)?);
        }
        let root = buf.read_var_u32()?;
        let graph = FlatGraph { entries, root };
        graph.check_indices()?;
        Ok(graph)
    }
}

impl<SC> Codec<CommandTree<SC::Stub>> for CommandGraphCodec<SC>
where
    SC: StubCodec,
    SC::Stub: Clone,
{
    fn encode(&self, value: &CommandTree<SC::Stub>, buf: &mut ByteWriter) -> CodecResult<()> {
        let flat = self.flatten(value)?;
        Codec::<FlatGraph<SC::Stub>>::encode(self, &flat, buf)
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<CommandTree<SC::Stub>> {
        Codec::<FlatGraph<SC::Stub>>::decode(self, buf)?.resolve()
    }
}
