//! Flag bytes carried by packets.
//!
//! Unassigned bits are reserved: they are never written and a peer that sets
//! them is rejected.

use bitflags::{bitflags, Flags};
use buffer::{ByteReader, ByteWriter};
use codec::{CodecError, CodecResult, ValueReason};

bitflags! {
    /// Flags of a relative entity move.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MoveFlags: u8 {
        const ON_GROUND = 0x01;
    }
}

bitflags! {
    /// Flags of a client position update.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MovePlayerFlags: u8 {
        const ON_GROUND = 0x01;
        const HORIZONTAL_COLLISION = 0x02;
    }
}

bitflags! {
    /// Which bounds a numeric command argument carries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RangeFlags: u8 {
        const MIN = 0x01;
        const MAX = 0x02;
    }
}

bitflags! {
    /// Restrictions of an entity selector argument.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntitySelectorFlags: u8 {
        const SINGLE = 0x01;
        const PLAYERS_ONLY = 0x02;
    }
}

pub(crate) fn write_flags<F: Flags<Bits = u8>>(flags: F, buf: &mut ByteWriter) {
    buf.write_u8(flags.bits());
}

/// Reads a flag byte, rejecting bits outside `F`.
pub(crate) fn read_flags<F: Flags<Bits = u8>>(
    field: &'static str,
    buf: &mut ByteReader<'_>,
) -> CodecResult<F> {
    let byte = buf.read_u8()?;
    F::from_bits(byte).ok_or(CodecError::InvalidValue(ValueReason::ReservedBits {
        field,
        bits: byte & !F::all().bits(),
    }))
}
