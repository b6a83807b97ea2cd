//! Codecs wrapping an element codec.

use buffer::{ByteReader, ByteWriter};

use crate::codec::Codec;
use crate::error::{CodecError, CodecResult, LimitKind};

/// A varint count followed by that many elements.
///
/// The count is checked against `max` before anything is allocated for the
/// elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCodec<C> {
    inner: C,
    max: usize,
}

impl<C> ListCodec<C> {
    #[must_use]
    pub const fn new(inner: C, max: usize) -> Self {
        Self { inner, max }
    }

    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }
}

impl<T, C: Codec<T>> Codec<Vec<T>> for ListCodec<C> {
    fn encode(&self, value: &Vec<T>, buf: &mut ByteWriter) -> CodecResult<()> {
        let count = u32::try_from(value.len())
            .ok()
            .filter(|_| value.len() <= self.max)
            .ok_or(CodecError::OversizedValue {
                kind: LimitKind::List,
                limit: self.max,
                actual: value.len(),
            })?;
        buf.write_var_u32(count);
        for item in value {
            self.inner.encode(item, buf)?;
        }
        Ok(())
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<Vec<T>> {
        let count = buf
            .read_len(self.max)
            .map_err(CodecError::bounded(LimitKind::List))?;
        let mut items = Vec::with_capacity(count.min(buf.remaining()));
        for _ in 0..count {
            items.push(self.inner.decode(buf)?);
        }
        Ok(items)
    }
}

/// A presence byte followed by the value when present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionCodec<C> {
    inner: C,
}

impl<C> OptionCodec<C> {
    #[must_use]
    pub const fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<T, C: Codec<T>> Codec<Option<T>> for OptionCodec<C> {
    fn encode(&self, value: &Option<T>, buf: &mut ByteWriter) -> CodecResult<()> {
        buf.write_bool(value.is_some());
        if let Some(inner) = value {
            self.inner.encode(inner, buf)?;
        }
        Ok(())
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<Option<T>> {
        if buf.read_bool()? {
            Ok(Some(self.inner.decode(buf)?))
        } else {
            Ok(None)
        }
    }
}
