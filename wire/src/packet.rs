//! Packet identity and the packet trait.

use std::fmt;

use buffer::{ByteReader, ByteWriter};
use codec::CodecResult;

use crate::context::WireContext;

/// Which endpoint a packet travels towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// Sent by clients, handled by the server.
    ToServer,
    /// Sent by the server, handled by clients.
    ToClient,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToServer => "to_server",
            Self::ToClient => "to_client",
        }
    }

    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::ToServer => 0,
            Self::ToClient => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A packet's direction plus its id within that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PacketType {
    pub direction: Direction,
    pub id: u32,
}

impl PacketType {
    #[must_use]
    pub const fn new(direction: Direction, id: u32) -> Self {
        Self { direction, id }
    }

    #[must_use]
    pub const fn to_server(id: u32) -> Self {
        Self::new(Direction::ToServer, id)
    }

    #[must_use]
    pub const fn to_client(id: u32) -> Self {
        Self::new(Direction::ToClient, id)
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:#04x}", self.direction, self.id)
    }
}

/// A concrete message.
///
/// Each packet knows its own wire identity, how to read and write its body,
/// and which method of its direction's handler receives it. Dispatch is
/// therefore one indirect call per frame, with no central match over packet
/// kinds.
pub trait Packet: Sized + 'static {
    /// Handler for this packet's direction, usually a `dyn` trait.
    type Handler: ?Sized;

    const TYPE: PacketType;

    /// Stable `snake_case` name used in logs and fingerprints.
    const NAME: &'static str;

    /// Whether a receiver may drop this packet unread while shedding load.
    const SKIPPABLE: bool = false;

    /// Writes the body, without the packet id.
    fn write(&self, cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()>;

    /// Reads the body, without the packet id.
    fn read(cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self>;

    /// Hands this packet to the matching handler method.
    fn handle(self, handler: &mut Self::Handler);
}
