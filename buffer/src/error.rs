//! Error types for buffer operations.

use thiserror::Error;

/// Result type for buffer operations.
pub type BufResult<T> = Result<T, BufError>;

/// Errors that can occur while reading primitives from a byte buffer.
///
/// Writes never fail: the writer grows its backing `Vec` as needed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufError {
    /// Attempted to read past the end of the buffer.
    #[error("attempted to read {requested} bytes but only {available} bytes available")]
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// A variable-length integer ran past its maximum encoded size.
    #[error("varint longer than {max_bytes} bytes")]
    InvalidVarint {
        /// Maximum number of bytes allowed for this varint width.
        max_bytes: usize,
    },

    /// A boolean byte held something other than 0 or 1.
    #[error("invalid bool byte 0x{value:02X}")]
    InvalidBool {
        /// The byte that was read.
        value: u8,
    },

    /// A string payload was not valid UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    /// A declared length exceeds the caller's bound.
    ///
    /// Raised before any bytes of the payload are inspected.
    #[error("declared length {length} exceeds maximum {max}")]
    LengthExceeded {
        /// The length read from the wire.
        length: usize,
        /// Maximum permitted length.
        max: usize,
    },
}
