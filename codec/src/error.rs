//! Error types for codec operations.

use std::fmt;

use buffer::BufError;
use thiserror::Error;

use crate::identifier::Identifier;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// How an error should be treated by the connection that hit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Corrupt or hostile bytes: truncation, bounds, unknown ids.
    Structural,
    /// Well-formed bytes describing something impossible.
    Semantic,
    /// The local side tried to encode a value that breaks its own invariants.
    Invariant,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Structural => "structural",
            Self::Semantic => "semantic",
            Self::Invariant => "invariant",
        };
        write!(f, "{name}")
    }
}

/// Errors that can occur while encoding or decoding values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Primitive buffer error (truncation, malformed varint, bad UTF-8).
    #[error("buffer error: {0}")]
    Buffer(#[from] BufError),

    /// A decoded length or count is over its bound.
    #[error("{kind} limit exceeded: {actual} > {limit}")]
    LimitExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// A value handed to an encoder is over its bound.
    #[error("cannot encode {kind} of {actual}: maximum is {limit}")]
    OversizedValue {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// A registry id on the wire is not in the local snapshot.
    #[error("unknown id {id} in registry {registry}")]
    UnknownRegistryId { registry: Identifier, id: u32 },

    /// Tried to encode a name the registry does not contain.
    #[error("{value} is not registered in {registry}")]
    UnregisteredValue {
        registry: Identifier,
        value: Identifier,
    },

    /// Registry snapshot was built with the same name twice.
    #[error("{value} is registered twice in {registry}")]
    DuplicateRegistryEntry {
        registry: Identifier,
        value: Identifier,
    },

    /// No registry with this key in the snapshot.
    #[error("registry {registry} is not available")]
    MissingRegistry { registry: String },

    /// The wire action set has a bit this build does not know.
    #[error("unknown action bit {bit}")]
    UnknownAction { bit: u8 },

    /// A record lacks fields for an action in the set.
    #[error("record is missing fields for action {action}")]
    MissingActionFields { action: &'static str },

    /// A record carries fields for an action not in the set.
    #[error("record carries fields for action {action} outside the action set")]
    UnexpectedActionFields { action: &'static str },

    /// A decoded value is not acceptable for its field.
    #[error("invalid value: {0}")]
    InvalidValue(ValueReason),

    /// A command graph index points past the entry list.
    #[error("command graph index {index} out of range for {len} entries")]
    GraphIndexOutOfRange { index: u32, len: usize },

    /// Input remained after a complete value was decoded.
    #[error("{remaining} trailing bytes after value")]
    TrailingBytes { remaining: usize },

    /// The command graph cannot be resolved into a consistent tree.
    #[error("impossible command graph: {unresolved} of {total} entries cannot be resolved")]
    ImpossibleGraph { unresolved: usize, total: usize },
}

impl CodecError {
    /// Classifies this error for connection handling.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Buffer(_)
            | Self::LimitExceeded { .. }
            | Self::UnknownRegistryId { .. }
            | Self::UnknownAction { .. }
            | Self::InvalidValue(_)
            | Self::TrailingBytes { .. }
            | Self::GraphIndexOutOfRange { .. } => ErrorClass::Structural,
            Self::ImpossibleGraph { .. } => ErrorClass::Semantic,
            Self::OversizedValue { .. }
            | Self::UnregisteredValue { .. }
            | Self::DuplicateRegistryEntry { .. }
            | Self::MissingRegistry { .. }
            | Self::MissingActionFields { .. }
            | Self::UnexpectedActionFields { .. } => ErrorClass::Invariant,
        }
    }

    /// Maps a buffer length error to a codec limit error of `kind`.
    pub(crate) fn bounded(kind: LimitKind) -> impl Fn(BufError) -> Self {
        move |err| match err {
            BufError::LengthExceeded { length, max } => Self::LimitExceeded {
                kind,
                limit: max,
                actual: length,
            },
            other => Self::Buffer(other),
        }
    }
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitKind {
    String,
    List,
    Blob,
    GraphNodes,
    GraphChildren,
    ActionRecords,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string length",
            Self::List => "list length",
            Self::Blob => "blob length",
            Self::GraphNodes => "command graph nodes",
            Self::GraphChildren => "command graph children",
            Self::ActionRecords => "action records",
        };
        write!(f, "{name}")
    }
}

/// Details for invalid value errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueReason {
    /// Bits outside the assigned mask were set in a flag byte.
    ReservedBits { field: &'static str, bits: u8 },
    /// A discriminant this build does not understand.
    UnknownVariant { kind: &'static str, value: u32 },
    /// A registered kind with no payload codec in this build.
    UnsupportedKind { kind: &'static str, name: Identifier },
    /// Text that is not a valid `namespace:path` identifier.
    InvalidIdentifier { text: String },
    /// A command node flag byte with the unused kind value.
    InvalidNodeKind { flags: u8 },
}

impl fmt::Display for ValueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservedBits { field, bits } => {
                write!(f, "reserved bits 0x{bits:02X} set in {field}")
            }
            Self::UnknownVariant { kind, value } => {
                write!(f, "unknown {kind} variant {value}")
            }
            Self::UnsupportedKind { kind, name } => {
                write!(f, "{kind} {name} is not supported")
            }
            Self::InvalidIdentifier { text } => {
                write!(f, "invalid identifier {text:?}")
            }
            Self::InvalidNodeKind { flags } => {
                write!(f, "invalid command node kind in flags 0x{flags:02X}")
            }
        }
    }
}
