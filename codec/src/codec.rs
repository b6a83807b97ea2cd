//! The core codec trait and its adapters.

use std::marker::PhantomData;

use buffer::{ByteReader, ByteWriter};

use crate::error::CodecResult;

/// A bidirectional transform between a typed value and bytes.
///
/// Codecs are immutable values: building one is cheap, and a single instance
/// can be shared by every connection. A shared reference to a codec is itself
/// a codec.
pub trait Codec<T> {
    /// Writes `value` to `buf`.
    fn encode(&self, value: &T, buf: &mut ByteWriter) -> CodecResult<()>;

    /// Reads a value from `buf`.
    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<T>;
}

impl<T, C: Codec<T> + ?Sized> Codec<T> for &C {
    fn encode(&self, value: &T, buf: &mut ByteWriter) -> CodecResult<()> {
        (**self).encode(value, buf)
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<T> {
        (**self).decode(buf)
    }
}

/// Adapter methods available on every codec.
pub trait CodecExt<T>: Codec<T> + Sized {
    /// Adapts this codec to a different value type.
    ///
    /// `decode` validates and converts the wire value; `encode` projects the
    /// outer value back onto the wire type.
    fn map<U, D, E>(self, decode: D, encode: E) -> Mapped<Self, T, D, E>
    where
        D: Fn(T) -> CodecResult<U>,
        E: Fn(&U) -> T,
    {
        Mapped {
            inner: self,
            decode,
            encode,
            _marker: PhantomData,
        }
    }
}

impl<T, C: Codec<T>> CodecExt<T> for C {}

/// Codec produced by [`CodecExt::map`].
pub struct Mapped<C, T, D, E> {
    inner: C,
    decode: D,
    encode: E,
    _marker: PhantomData<fn() -> T>,
}

impl<T, U, C, D, E> Codec<U> for Mapped<C, T, D, E>
where
    C: Codec<T>,
    D: Fn(T) -> CodecResult<U>,
    E: Fn(&U) -> T,
{
    fn encode(&self, value: &U, buf: &mut ByteWriter) -> CodecResult<()> {
        self.inner.encode(&(self.encode)(value), buf)
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<U> {
        (self.decode)(self.inner.decode(buf)?)
    }
}

/// Encodes a single value with `codec` into a fresh byte vector.
pub fn encode_to_vec<T, C: Codec<T>>(codec: &C, value: &T) -> CodecResult<Vec<u8>> {
    let mut writer = ByteWriter::new();
    codec.encode(value, &mut writer)?;
    Ok(writer.finish())
}
