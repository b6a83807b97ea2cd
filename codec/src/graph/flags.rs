//! Command node flag byte.

use bitflags::bitflags;

use crate::error::{CodecError, CodecResult, ValueReason};

bitflags! {
    /// Per-node flags: bits 0..1 kind, then executable, redirect and
    /// custom-suggestion markers. Bits 5..7 are reserved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        const LITERAL = 0x01;
        const ARGUMENT = 0x02;
        const EXECUTABLE = 0x04;
        const REDIRECT = 0x08;
        const CUSTOM_SUGGESTIONS = 0x10;
    }
}

/// The kind encoded in the low two flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Literal,
    Argument,
}

impl NodeFlags {
    /// Mask of the node kind bits.
    pub const KIND_MASK: u8 = 0x03;
    /// Bits that must be zero on the wire.
    pub const RESERVED_MASK: u8 = 0xE0;

    /// Parses a wire flag byte, rejecting reserved bits, the unused kind and
    /// a suggestion marker on anything but an argument.
    pub fn from_wire(byte: u8) -> CodecResult<Self> {
        let reserved = byte & Self::RESERVED_MASK;
        if reserved != 0 {
            return Err(CodecError::InvalidValue(ValueReason::ReservedBits {
                field: "command node flags",
                bits: reserved,
            }));
        }
        let flags = Self::from_bits_truncate(byte);
        if byte & Self::KIND_MASK == Self::KIND_MASK || !flags.is_consistent() {
            return Err(CodecError::InvalidValue(ValueReason::InvalidNodeKind {
                flags: byte,
            }));
        }
        Ok(flags)
    }

    /// Only argument nodes may carry custom suggestions.
    #[must_use]
    pub const fn is_consistent(self) -> bool {
        !self.contains(Self::CUSTOM_SUGGESTIONS) || matches!(self.kind(), NodeKind::Argument)
    }

    #[must_use]
    pub const fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Root => Self::empty(),
            NodeKind::Literal => Self::LITERAL,
            NodeKind::Argument => Self::ARGUMENT,
        }
    }

    #[must_use]
    pub const fn kind(self) -> NodeKind {
        match self.bits() & Self::KIND_MASK {
            0 => NodeKind::Root,
            1 => NodeKind::Literal,
            _ => NodeKind::Argument,
        }
    }
}
