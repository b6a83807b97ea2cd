//! Length-prefixed byte payloads with a hard maximum.

use buffer::{ByteReader, ByteWriter};

use crate::codec::Codec;
use crate::error::{CodecError, CodecResult, LimitKind};

/// A byte payload of at most `MAX` bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BoundedBlob<const MAX: usize> {
    bytes: Vec<u8>,
}

impl<const MAX: usize> BoundedBlob<MAX> {
    /// Wraps `bytes`, rejecting payloads longer than `MAX`.
    pub fn try_new(bytes: Vec<u8>) -> CodecResult<Self> {
        if bytes.len() > MAX {
            return Err(CodecError::OversizedValue {
                kind: LimitKind::Blob,
                limit: MAX,
                actual: bytes.len(),
            });
        }
        Ok(Self { bytes })
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl<const MAX: usize> TryFrom<Vec<u8>> for BoundedBlob<MAX> {
    type Error = CodecError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_new(bytes)
    }
}

impl<const MAX: usize> AsRef<[u8]> for BoundedBlob<MAX> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Codec for [`BoundedBlob`]: varint length, then the bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlobCodec<const MAX: usize>;

impl<const MAX: usize> Codec<BoundedBlob<MAX>> for BlobCodec<MAX> {
    fn encode(&self, value: &BoundedBlob<MAX>, buf: &mut ByteWriter) -> CodecResult<()> {
        buf.write_byte_array(value.as_bytes());
        Ok(())
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<BoundedBlob<MAX>> {
        let bytes = buf
            .read_byte_array(MAX)
            .map_err(CodecError::bounded(LimitKind::Blob))?;
        Ok(BoundedBlob {
            bytes: bytes.to_vec(),
        })
    }
}
