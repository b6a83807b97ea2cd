//! Leaf codecs for primitive wire values.

use buffer::{ByteReader, ByteWriter};
use uuid::Uuid;

use crate::codec::Codec;
use crate::error::{CodecError, CodecResult, LimitKind};
use crate::identifier::Identifier;

/// Longest string the protocol carries, in characters.
pub const MAX_STRING_CHARS: usize = 32_767;

macro_rules! fixed_codec {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $read:ident, $write:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl Codec<$ty> for $name {
            fn encode(&self, value: &$ty, buf: &mut ByteWriter) -> CodecResult<()> {
                buf.$write(*value);
                Ok(())
            }

            fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<$ty> {
                Ok(buf.$read()?)
            }
        }
    };
}

fixed_codec!(
    /// One byte, `0` or `1`.
    Bool, bool, read_bool, write_bool
);
fixed_codec!(U8, u8, read_u8, write_u8);
fixed_codec!(I8, i8, read_i8, write_i8);
fixed_codec!(U16, u16, read_u16, write_u16);
fixed_codec!(I16, i16, read_i16, write_i16);
fixed_codec!(I32, i32, read_i32, write_i32);
fixed_codec!(I64, i64, read_i64, write_i64);
fixed_codec!(F32, f32, read_f32, write_f32);
fixed_codec!(F64, f64, read_f64, write_f64);
fixed_codec!(
    /// Signed 32-bit varint. Negative values always take five bytes.
    VarInt, i32, read_var_i32, write_var_i32
);
fixed_codec!(
    /// Unsigned 32-bit varint, used for counts and ids.
    VarU32, u32, read_var_u32, write_var_u32
);
fixed_codec!(
    /// Signed 64-bit varint.
    VarLong, i64, read_var_i64, write_var_i64
);

/// A UUID as a big-endian 128-bit integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UuidCodec;

impl Codec<Uuid> for UuidCodec {
    fn encode(&self, value: &Uuid, buf: &mut ByteWriter) -> CodecResult<()> {
        buf.write_u128(value.as_u128());
        Ok(())
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<Uuid> {
        Ok(Uuid::from_u128(buf.read_u128()?))
    }
}

/// A length-prefixed UTF-8 string of at most `max_chars` characters.
///
/// The byte length is bounded by `max_chars * 3` before the payload is read;
/// the character count is checked after decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringCodec {
    max_chars: usize,
}

impl StringCodec {
    #[must_use]
    pub const fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    #[must_use]
    pub const fn max_chars(&self) -> usize {
        self.max_chars
    }

    const fn max_bytes(&self) -> usize {
        self.max_chars.saturating_mul(3)
    }
}

impl Default for StringCodec {
    fn default() -> Self {
        Self::new(MAX_STRING_CHARS)
    }
}

impl Codec<String> for StringCodec {
    fn encode(&self, value: &String, buf: &mut ByteWriter) -> CodecResult<()> {
        let chars = value.chars().count();
        if chars > self.max_chars || value.len() > self.max_bytes() {
            return Err(CodecError::OversizedValue {
                kind: LimitKind::String,
                limit: self.max_chars,
                actual: chars,
            });
        }
        buf.write_str(value);
        Ok(())
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<String> {
        let text = buf
            .read_str(self.max_bytes())
            .map_err(CodecError::bounded(LimitKind::String))?;
        let chars = text.chars().count();
        if chars > self.max_chars {
            return Err(CodecError::LimitExceeded {
                kind: LimitKind::String,
                limit: self.max_chars,
                actual: chars,
            });
        }
        Ok(text.to_owned())
    }
}

/// A [`Identifier`] carried as a string of at most [`MAX_STRING_CHARS`]
/// bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentifierCodec;

impl Codec<Identifier> for IdentifierCodec {
    fn encode(&self, value: &Identifier, buf: &mut ByteWriter) -> CodecResult<()> {
        let len = value.as_str().len();
        if len > MAX_STRING_CHARS {
            return Err(CodecError::OversizedValue {
                kind: LimitKind::String,
                limit: MAX_STRING_CHARS,
                actual: len,
            });
        }
        buf.write_str(value.as_str());
        Ok(())
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<Identifier> {
        let text = buf
            .read_str(MAX_STRING_CHARS)
            .map_err(CodecError::bounded(LimitKind::String))?;
        Identifier::parse(text)
    }
}
