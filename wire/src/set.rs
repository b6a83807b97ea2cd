//! Per-direction packet tables and dispatch.

use std::collections::BTreeMap;
use std::fmt;

use buffer::ByteReader;
use tracing::{debug, trace, warn};

use crate::context::WireContext;
use crate::error::{WireError, WireResult};
use crate::frame::{encode_packet, read_body};
use crate::packet::{Direction, Packet, PacketType};

/// Receiver load, as judged by the connection driving dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Load {
    /// Every packet is decoded and handled.
    #[default]
    Normal,
    /// Skippable packets are dropped unread.
    Shedding,
}

/// Outcome of a successful [`PacketSet::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Exactly one handler method ran.
    Handled { id: u32, name: &'static str },
    /// A skippable packet was dropped under load.
    Shed { id: u32, name: &'static str },
}

impl Dispatched {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Handled { name, .. } | Self::Shed { name, .. } => name,
        }
    }
}

type HandleFn<H> = fn(&WireContext, &[u8], &mut H) -> WireResult<()>;

struct Entry<H: ?Sized> {
    name: &'static str,
    skippable: bool,
    handle: HandleFn<H>,
}

// Manual impls: `H` is usually an unsized trait object.
impl<H: ?Sized> Clone for Entry<H> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            skippable: self.skippable,
            handle: self.handle,
        }
    }
}

fn decode_and_handle<P: Packet>(
    cx: &WireContext,
    body: &[u8],
    handler: &mut P::Handler,
) -> WireResult<()> {
    let packet = read_body::<P>(cx, body)?;
    packet.handle(handler);
    Ok(())
}

/// One row of a packet table, as exposed for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketInfo {
    pub packet_type: PacketType,
    pub name: &'static str,
    pub skippable: bool,
}

/// Collects packets for one direction.
pub struct PacketSetBuilder<H: ?Sized> {
    direction: Direction,
    entries: BTreeMap<u32, Entry<H>>,
}

impl<H: ?Sized> fmt::Debug for PacketSetBuilder<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketSetBuilder")
            .field("direction", &self.direction)
            .field("packets", &self.entries.len())
            .finish()
    }
}

impl<H: ?Sized> PacketSetBuilder<H> {
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            entries: BTreeMap::new(),
        }
    }

    /// Adds `P`, rejecting a taken id or a packet of the other direction.
    pub fn register<P: Packet<Handler = H>>(mut self) -> WireResult<Self> {
        if P::TYPE.direction != self.direction {
            return Err(WireError::DirectionMismatch {
                name: P::NAME,
                expected: self.direction,
                found: P::TYPE.direction,
            });
        }
        if let Some(existing) = self.entries.get(&P::TYPE.id) {
            return Err(WireError::DuplicatePacket {
                name: P::NAME,
                existing: existing.name,
                packet_type: P::TYPE,
            });
        }
        self.entries.insert(
            P::TYPE.id,
            Entry {
                name: P::NAME,
                skippable: P::SKIPPABLE,
                handle: decode_and_handle::<P>,
            },
        );
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> PacketSet<H> {
        PacketSet {
            direction: self.direction,
            entries: self.entries,
        }
    }
}

/// An immutable packet table for one direction.
///
/// Built once at startup and shared by every connection.
pub struct PacketSet<H: ?Sized> {
    direction: Direction,
    entries: BTreeMap<u32, Entry<H>>,
}

impl<H: ?Sized> Clone for PacketSet<H> {
    fn clone(&self) -> Self {
        Self {
            direction: self.direction,
            entries: self.entries.clone(),
        }
    }
}

impl<H: ?Sized> fmt::Debug for PacketSet<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketSet")
            .field("direction", &self.direction)
            .field("packets", &self.entries.len())
            .finish()
    }
}

impl<H: ?Sized> PacketSet<H> {
    #[must_use]
    pub fn builder(direction: Direction) -> PacketSetBuilder<H> {
        PacketSetBuilder::new(direction)
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Packets in id order.
    pub fn iter(&self) -> impl Iterator<Item = PacketInfo> + '_ {
        self.entries.iter().map(|(&id, entry)| PacketInfo {
            packet_type: PacketType::new(self.direction, id),
            name: entry.name,
            skippable: entry.skippable,
        })
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<PacketInfo> {
        self.entries.get(&id).map(|entry| PacketInfo {
            packet_type: PacketType::new(self.direction, id),
            name: entry.name,
            skippable: entry.skippable,
        })
    }

    fn is_registered<P: Packet>(&self) -> bool {
        P::TYPE.direction == self.direction
            && self
                .entries
                .get(&P::TYPE.id)
                .is_some_and(|entry| entry.name == P::NAME)
    }

    /// Encodes `packet` as a frame: varint id, then body.
    pub fn encode<P: Packet<Handler = H>>(&self, cx: &WireContext, packet: &P) -> WireResult<Vec<u8>> {
        if !self.is_registered::<P>() {
            return Err(WireError::UnregisteredPacket {
                name: P::NAME,
                packet_type: P::TYPE,
            });
        }
        encode_packet(cx, packet)
    }

    /// Decodes one frame and calls exactly one handler method.
    ///
    /// Under [`Load::Shedding`], skippable packets are dropped before their
    /// body is read; that is not an error.
    pub fn dispatch(
        &self,
        cx: &WireContext,
        frame: &[u8],
        handler: &mut H,
        load: Load,
    ) -> WireResult<Dispatched> {
        cx.limits()
            .check_frame(frame.len())
            .map_err(|actual| WireError::FrameTooLarge {
                limit: cx.limits().max_frame_bytes,
                actual,
            })?;

        let mut reader = ByteReader::new(frame);
        let id = reader.read_var_u32().map_err(WireError::MissingPacketId)?;
        let entry = self.entries.get(&id).ok_or(WireError::UnknownPacket {
            direction: self.direction,
            id,
        })?;

        if load == Load::Shedding && entry.skippable {
            debug!(id, packet = entry.name, "shed skippable packet");
            return Ok(Dispatched::Shed {
                id,
                name: entry.name,
            });
        }

        let body = &frame[reader.position()..];
        if let Err(err) = (entry.handle)(cx, body, handler) {
            match err.class() {
                codec::ErrorClass::Semantic => {
                    warn!(id, packet = entry.name, error = %err, "rejected packet");
                }
                _ => debug!(id, packet = entry.name, error = %err, "malformed packet"),
            }
            return Err(err);
        }
        trace!(id, packet = entry.name, bytes = frame.len(), "dispatched packet");
        Ok(Dispatched::Handled {
            id,
            name: entry.name,
        })
    }
}
