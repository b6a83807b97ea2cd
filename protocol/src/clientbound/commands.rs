//! The command tree sent to clients for parsing and completion.

use buffer::{ByteReader, ByteWriter};
use codec::{Codec, CodecResult, CommandGraphCodec, CommandTree};
use tracing::debug;
use wire::{Packet, PacketType, WireContext};

use super::ClientboundHandler;
use crate::argument::{CommandStubs, NodeStub};
use crate::registries::COMMAND_ARGUMENT_TYPE;

/// The full command tree available to the receiving player.
#[derive(Debug, Clone, PartialEq)]
pub struct Commands {
    pub tree: CommandTree<NodeStub>,
}

impl Commands {
    fn with_codec<T>(
        cx: &WireContext,
        f: impl FnOnce(CommandGraphCodec<CommandStubs<'_>>) -> CodecResult<T>,
    ) -> CodecResult<T> {
        let argument_types = cx.registries().require(COMMAND_ARGUMENT_TYPE)?;
        f(CommandGraphCodec::new(
            CommandStubs::new(argument_types),
            cx.codec_limits().max_graph_nodes,
        ))
    }
}

impl Packet for Commands {
    type Handler = dyn ClientboundHandler;
    const TYPE: PacketType = PacketType::to_client(0x06);
    const NAME: &'static str = "commands";

    fn write(&self, cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()> {
        Self::with_codec(cx, |codec| codec.encode(&self.tree, buf))
    }

    fn read(cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        let tree = Self::with_codec(cx, |codec| {
            Codec::<CommandTree<NodeStub>>::decode(&codec, buf)
        })?;
        debug!(nodes = tree.len(), "resolved command tree");
        Ok(Self { tree })
    }

    fn handle(self, handler: &mut Self::Handler) {
        handler.commands(self);
    }
}
