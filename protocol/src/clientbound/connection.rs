//! Connection upkeep packets.

use buffer::{ByteReader, ByteWriter};
use codec::{Codec, CodecResult, StringCodec, I64};
use wire::{Packet, PacketType, WireContext};

use super::ClientboundHandler;

/// Longest disconnect reason, in characters.
pub const MAX_REASON_CHARS: usize = 32_767;

/// Liveness probe; the client echoes `id` back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlive {
    pub id: i64,
}

impl Packet for KeepAlive {
    type Handler = dyn ClientboundHandler;
    const TYPE: PacketType = PacketType::to_client(0x00);
    const NAME: &'static str = "keep_alive";

    fn write(&self, _cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()> {
        I64.encode(&self.id, buf)
    }

    fn read(_cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            id: I64.decode(buf)?,
        })
    }

    fn handle(self, handler: &mut Self::Handler) {
        handler.keep_alive(self);
    }
}

/// Final packet before the server closes the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnect {
    pub reason: String,
}

impl Packet for Disconnect {
    type Handler = dyn ClientboundHandler;
    const TYPE: PacketType = PacketType::to_client(0x09);
    const NAME: &'static str = "disconnect";

    fn write(&self, _cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()> {
        StringCodec::new(MAX_REASON_CHARS).encode(&self.reason, buf)
    }

    fn read(_cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            reason: StringCodec::new(MAX_REASON_CHARS).decode(buf)?,
        })
    }

    fn handle(self, handler: &mut Self::Handler) {
        handler.disconnect(self);
    }
}
