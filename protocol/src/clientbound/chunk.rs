//! Chunk biome data.

use buffer::{ByteReader, ByteWriter};
use codec::{composite3, BlobCodec, BoundedBlob, Codec, CodecResult, ListCodec, I32};
use wire::{Packet, PacketType, WireContext};

use super::ClientboundHandler;

/// Largest biome payload of a single chunk.
pub const MAX_BIOME_BYTES: usize = 2 * 1024 * 1024;

/// Most chunks one packet may update.
pub const MAX_BIOME_CHUNKS: usize = 1024;

/// Packed biome palette data of one chunk.
pub type BiomeBlob = BoundedBlob<MAX_BIOME_BYTES>;

/// Biome data for the chunk at (`x`, `z`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkBiomeData {
    pub x: i32,
    pub z: i32,
    pub data: BiomeBlob,
}

impl ChunkBiomeData {
    fn codec() -> impl Codec<Self> {
        composite3(
            I32,
            |c: &Self| &c.x,
            I32,
            |c: &Self| &c.z,
            BlobCodec::<MAX_BIOME_BYTES>,
            |c: &Self| &c.data,
            |x, z, data| Self { x, z, data },
        )
    }
}

/// Replaces the biomes of already loaded chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkBiomes {
    pub chunks: Vec<ChunkBiomeData>,
}

impl ChunkBiomes {
    fn codec(cx: &WireContext) -> impl Codec<Vec<ChunkBiomeData>> {
        ListCodec::new(
            ChunkBiomeData::codec(),
            cx.codec_limits().list_bound(MAX_BIOME_CHUNKS),
        )
    }
}

impl Packet for ChunkBiomes {
    type Handler = dyn ClientboundHandler;
    const TYPE: PacketType = PacketType::to_client(0x05);
    const NAME: &'static str = "chunk_biomes";

    fn write(&self, cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()> {
        Self::codec(cx).encode(&self.chunks, buf)
    }

    fn read(cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            chunks: Self::codec(cx).decode(buf)?,
        })
    }

    fn handle(self, handler: &mut Self::Handler) {
        handler.chunk_biomes(self);
    }
}
