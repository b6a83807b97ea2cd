//! Packets sent from the client to the server.

use buffer::{ByteReader, ByteWriter};
use codec::{composite2, Codec, CodecResult, StringCodec, VarInt, F64, I64};
use glam::DVec3;
use wire::{Direction, Packet, PacketSet, PacketType, WireContext, WireResult};

use crate::flags::{read_flags, write_flags, MovePlayerFlags};

/// Longest command line a client may send, in characters.
pub const MAX_COMMAND_CHARS: usize = 256;

/// Longest partial command sent for completion, in characters.
pub const MAX_SUGGESTION_TEXT_CHARS: usize = 32_500;

/// Receives every serverbound packet, one method per packet.
pub trait ServerboundHandler {
    fn keep_alive(&mut self, packet: KeepAlive);
    fn chat_command(&mut self, packet: ChatCommand);
    fn command_suggestion(&mut self, packet: CommandSuggestion);
    fn move_player_pos(&mut self, packet: MovePlayerPos);
}

/// Echo of a clientbound keep-alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlive {
    pub id: i64,
}

impl Packet for KeepAlive {
    type Handler = dyn ServerboundHandler;
    const TYPE: PacketType = PacketType::to_server(0x00);
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

/// A command line typed by the player, without the leading slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCommand {
    pub command: String,
}

impl Packet for ChatCommand {
    type Handler = dyn ServerboundHandler;
    const TYPE: PacketType = PacketType::to_server(0x01);
    const NAME: &'static str = "chat_command";

    fn write(&self, _cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()> {
        StringCodec::new(MAX_COMMAND_CHARS).encode(&self.command, buf)
    }

    fn read(_cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            command: StringCodec::new(MAX_COMMAND_CHARS).decode(buf)?,
        })
    }

    fn handle(self, handler: &mut Self::Handler) {
        handler.chat_command(self);
    }
}

/// Asks for completions of a partial command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSuggestion {
    /// Echoed in the response so the client can match it to this request.
    pub transaction_id: i32,
    pub text: String,
}

impl CommandSuggestion {
    fn codec() -> impl Codec<Self> {
        composite2(
            VarInt,
            |p: &Self| &p.transaction_id,
            StringCodec::new(MAX_SUGGESTION_TEXT_CHARS),
            |p: &Self| &p.text,
            |transaction_id, text| Self {
                transaction_id,
                text,
            },
        )
    }
}

impl Packet for CommandSuggestion {
    type Handler = dyn ServerboundHandler;
    const TYPE: PacketType = PacketType::to_server(0x02);
    const NAME: &'static str = "command_suggestion";

    fn write(&self, _cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()> {
        Self::codec().encode(self, buf)
    }

    fn read(_cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        Self::codec().decode(buf)
    }

    fn handle(self, handler: &mut Self::Handler) {
        handler.command_suggestion(self);
    }
}

/// Absolute player position reported by the client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovePlayerPos {
    pub position: DVec3,
    pub flags: MovePlayerFlags,
}

impl Packet for MovePlayerPos {
    type Handler = dyn ServerboundHandler;
    const TYPE: PacketType = PacketType::to_server(0x03);
    const NAME: &'static str = "move_player_pos";

    fn write(&self, _cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()> {
        F64.encode(&self.position.x, buf)?;
        F64.encode(&self.position.y, buf)?;
        F64.encode(&self.position.z, buf)?;
        write_flags(self.flags, buf);
        Ok(())
    }

    fn read(_cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        let x = F64.decode(buf)?;
        let y = F64.decode(buf)?;
        let z = F64.decode(buf)?;
        Ok(Self {
            position: DVec3::new(x, y, z),
            flags: read_flags("move player flags", buf)?,
        })
    }

    fn handle(self, handler: &mut Self::Handler) {
        handler.move_player_pos(self);
    }
}

/// Builds the serverbound packet table.
pub fn serverbound_packets() -> WireResult<PacketSet<dyn ServerboundHandler>> {
    Ok(PacketSet::builder(Direction::ToServer)
        .register::<KeepAlive>()?
        .register::<ChatCommand>()?
        .register::<CommandSuggestion>()?
        .register::<MovePlayerPos>()?
        .build())
}
