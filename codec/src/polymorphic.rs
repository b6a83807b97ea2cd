//! Codecs for values whose payload shape depends on a discriminant.

use buffer::{ByteReader, ByteWriter};

use crate::codec::Codec;
use crate::error::CodecResult;

/// A value that is one of several kinds, each with its own payload.
pub trait Polymorphic: Sized {
    /// The discriminant written ahead of the payload.
    type Kind;

    fn kind(&self) -> Self::Kind;

    /// Writes the payload for `self.kind()`.
    fn encode_payload(&self, buf: &mut ByteWriter) -> CodecResult<()>;

    /// Reads the payload for `kind`.
    fn decode_payload(kind: &Self::Kind, buf: &mut ByteReader<'_>) -> CodecResult<Self>;
}

/// Writes the kind through `KC`, then the kind-specific payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolymorphicCodec<KC> {
    kind_codec: KC,
}

impl<KC> PolymorphicCodec<KC> {
    #[must_use]
    pub const fn new(kind_codec: KC) -> Self {
        Self { kind_codec }
    }
}

impl<T, KC> Codec<T> for PolymorphicCodec<KC>
where
    T: Polymorphic,
    KC: Codec<T::Kind>,
{
    fn encode(&self, value: &T, buf: &mut ByteWriter) -> CodecResult<()> {
        self.kind_codec.encode(&value.kind(), buf)?;
        value.encode_payload(buf)
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<T> {
        let kind = self.kind_codec.decode(buf)?;
        T::decode_payload(&kind, buf)
    }
}
