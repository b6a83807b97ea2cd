//! Error types for packet encoding and dispatch.

use buffer::BufError;
use codec::{CodecError, ErrorClass};
use thiserror::Error;

use crate::packet::{Direction, PacketType};

/// Result type for wire operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors raised while building packet tables, encoding frames or
/// dispatching them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum WireError {
    /// An inbound frame exceeds the frame limit.
    #[error("frame of {actual} bytes exceeds limit of {limit}")]
    FrameTooLarge { limit: usize, actual: usize },

    /// An outbound frame exceeds the frame limit.
    #[error("encoded {name} frame of {actual} bytes exceeds limit of {limit}")]
    OversizedFrame {
        name: &'static str,
        limit: usize,
        actual: usize,
    },

    /// The frame ends before its packet id.
    #[error("frame has no packet id: {0}")]
    MissingPacketId(#[source] BufError),

    /// No packet is registered under this id.
    #[error("unknown {direction} packet id {id:#04x}")]
    UnknownPacket { direction: Direction, id: u32 },

    /// The frame carries a different packet than the caller asked for.
    #[error("expected packet {expected}, found id {found:#04x}")]
    PacketIdMismatch { expected: PacketType, found: u32 },

    /// The packet body failed to decode.
    #[error("failed to decode {name}: {source}")]
    Decode {
        name: &'static str,
        #[source]
        source: CodecError,
    },

    /// The packet body failed to encode.
    #[error("failed to encode {name}: {source}")]
    Encode {
        name: &'static str,
        #[source]
        source: CodecError,
    },

    /// Bytes remained after the packet body was decoded.
    #[error("{remaining} trailing bytes after {name}")]
    TrailingBytes { name: &'static str, remaining: usize },

    /// The packet is not part of this packet table.
    #[error("{name} ({packet_type}) is not registered")]
    UnregisteredPacket {
        name: &'static str,
        packet_type: PacketType,
    },

    /// Two packets were registered under one id.
    #[error("{name} reuses {packet_type} already taken by {existing}")]
    DuplicatePacket {
        name: &'static str,
        existing: &'static str,
        packet_type: PacketType,
    },

    /// A packet was registered in the table for the other direction.
    #[error("{name} is {found} but the table is {expected}")]
    DirectionMismatch {
        name: &'static str,
        expected: Direction,
        found: Direction,
    },
}

impl WireError {
    /// Classifies this error for connection handling.
    ///
    /// Decode failures keep the class of the underlying codec error, so an
    /// impossible command graph stays distinguishable from corrupt bytes.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::FrameTooLarge { .. }
            | Self::MissingPacketId(_)
            | Self::UnknownPacket { .. }
            | Self::PacketIdMismatch { .. }
            | Self::TrailingBytes { .. } => ErrorClass::Structural,
            Self::Decode { source, .. } => source.class(),
            Self::OversizedFrame { .. }
            | Self::Encode { .. }
            | Self::UnregisteredPacket { .. }
            | Self::DuplicatePacket { .. }
            | Self::DirectionMismatch { .. } => ErrorClass::Invariant,
        }
    }

    /// Returns `true` when the peer sent something this endpoint must not
    /// accept, so the connection should be closed.
    #[must_use]
    pub const fn is_fatal_to_connection(&self) -> bool {
        !matches!(self.class(), ErrorClass::Invariant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::LimitKind;

    const TYPE: PacketType = PacketType::new(Direction::ToClient, 0x2a);

    #[test]
    fn decode_error_keeps_codec_class() {
        let semantic = WireError::Decode {
            name: "commands",
            source: CodecError::ImpossibleGraph {
                unresolved: 2,
                total: 5,
            },
        };
        assert_eq!(semantic.class(), ErrorClass::Semantic);

        let structural = WireError::Decode {
            name: "chunk_biomes",
            source: CodecError::LimitExceeded {
                kind: LimitKind::Blob,
                limit: 16,
                actual: 17,
            },
        };
        assert_eq!(structural.class(), ErrorClass::Structural);
        assert!(structural.is_fatal_to_connection());
    }

    #[test]
    fn encode_errors_are_invariants() {
        let err = WireError::OversizedFrame {
            name: "chunk_biomes",
            limit: 8,
            actual: 9,
        };
        assert_eq!(err.class(), ErrorClass::Invariant);
        assert!(!err.is_fatal_to_connection());
    }

    #[test]
    fn error_display_unknown_packet() {
        let err = WireError::UnknownPacket {
            direction: Direction::ToServer,
            id: 0x7f,
        };
        let msg = err.to_string();
        assert!(msg.contains("to_server"), "msg: {msg}");
        assert!(msg.contains("0x7f"), "msg: {msg}");
    }

    #[test]
    fn error_display_duplicate() {
        let err = WireError::DuplicatePacket {
            name: "b",
            existing: "a",
            packet_type: TYPE,
        };
        let msg = err.to_string();
        assert!(msg.contains("to_client/0x2a"), "msg: {msg}");
        assert!(msg.contains("taken by a"), "msg: {msg}");
    }

    #[test]
    fn error_source_is_codec_error() {
        use std::error::Error;

        let err = WireError::Decode {
            name: "keep_alive",
            source: CodecError::TrailingBytes { remaining: 1 },
        };
        assert!(err.source().is_some());
    }
}
