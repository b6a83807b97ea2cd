//! Entity spawn and movement packets.
//!
//! Velocities and relative moves are quantized to `i16` per axis and angles
//! to one byte, so values read back are the nearest representable ones.

use buffer::{ByteReader, ByteWriter};
use codec::{
    composite2, composite3, AngleCodec, Codec, CodecResult, Identifier, QuantizedVec3Codec,
    Quantizer, UuidCodec, VarInt, F64,
};
use glam::DVec3;
use uuid::Uuid;
use wire::{Packet, PacketType, WireContext};

use super::ClientboundHandler;
use crate::flags::{read_flags, write_flags, MoveFlags};
use crate::registries::ENTITY_TYPE;

const VELOCITY: QuantizedVec3Codec = QuantizedVec3Codec::new(Quantizer::VELOCITY);
const POSITION_DELTA: QuantizedVec3Codec = QuantizedVec3Codec::new(Quantizer::POSITION_DELTA);

fn position_codec() -> impl Codec<DVec3> {
    composite3(
        F64,
        |v: &DVec3| &v.x,
        F64,
        |v: &DVec3| &v.y,
        F64,
        |v: &DVec3| &v.z,
        DVec3::new,
    )
}

/// Spawns a non-player or player entity on the client.
#[derive(Debug, Clone, PartialEq)]
pub struct AddEntity {
    pub entity_id: i32,
    pub uuid: Uuid,
    /// Entry of the entity type registry.
    pub kind: Identifier,
    pub position: DVec3,
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
    /// Kind-specific spawn data.
    pub data: i32,
    /// Blocks per tick, clamped to the velocity range.
    pub velocity: DVec3,
}

impl Packet for AddEntity {
    type Handler = dyn ClientboundHandler;
    const TYPE: PacketType = PacketType::to_client(0x01);
    const NAME: &'static str = "add_entity";

    fn write(&self, cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()> {
        VarInt.encode(&self.entity_id, buf)?;
        UuidCodec.encode(&self.uuid, buf)?;
        cx.registry(ENTITY_TYPE)?.encode(&self.kind, buf)?;
        position_codec().encode(&self.position, buf)?;
        AngleCodec.encode(&self.pitch, buf)?;
        AngleCodec.encode(&self.yaw, buf)?;
        AngleCodec.encode(&self.head_yaw, buf)?;
        VarInt.encode(&self.data, buf)?;
        VELOCITY.encode(&self.velocity, buf)
    }

    fn read(cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            entity_id: VarInt.decode(buf)?,
            uuid: UuidCodec.decode(buf)?,
            kind: cx.registry(ENTITY_TYPE)?.decode(buf)?,
            position: position_codec().decode(buf)?,
            pitch: AngleCodec.decode(buf)?,
            yaw: AngleCodec.decode(buf)?,
            head_yaw: AngleCodec.decode(buf)?,
            data: VarInt.decode(buf)?,
            velocity: VELOCITY.decode(buf)?,
        })
    }

    fn handle(self, handler: &mut Self::Handler) {
        handler.add_entity(self);
    }
}

/// Replaces an entity's velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetEntityMotion {
    pub entity_id: i32,
    pub velocity: DVec3,
}

impl SetEntityMotion {
    fn codec() -> impl Codec<Self> {
        composite2(
            VarInt,
            |p: &Self| &p.entity_id,
            VELOCITY,
            |p: &Self| &p.velocity,
            |entity_id, velocity| Self {
                entity_id,
                velocity,
            },
        )
    }
}

impl Packet for SetEntityMotion {
    type Handler = dyn ClientboundHandler;
    const TYPE: PacketType = PacketType::to_client(0x02);
    const NAME: &'static str = "set_entity_motion";

    fn write(&self, _cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()> {
        Self::codec().encode(self, buf)
    }

    fn read(_cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        Self::codec().decode(buf)
    }

    fn handle(self, handler: &mut Self::Handler) {
        handler.set_entity_motion(self);
    }
}

/// Moves an entity relative to its last position.
///
/// Each axis of `delta` is limited to just under eight blocks; larger moves
/// need an absolute teleport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEntityPos {
    pub entity_id: i32,
    pub delta: DVec3,
    pub flags: MoveFlags,
}

impl Packet for MoveEntityPos {
    type Handler = dyn ClientboundHandler;
    const TYPE: PacketType = PacketType::to_client(0x03);
    const NAME: &'static str = "move_entity_pos";

    fn write(&self, _cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()> {
        VarInt.encode(&self.entity_id, buf)?;
        POSITION_DELTA.encode(&self.delta, buf)?;
        write_flags(self.flags, buf);
        Ok(())
    }

    fn read(_cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            entity_id: VarInt.decode(buf)?,
            delta: POSITION_DELTA.decode(buf)?,
            flags: read_flags("move entity flags", buf)?,
        })
    }

    fn handle(self, handler: &mut Self::Handler) {
        handler.move_entity_pos(self);
    }
}

/// Cosmetic head rotation. Dropped first when a client falls behind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateHead {
    pub entity_id: i32,
    pub head_yaw: f32,
}

impl RotateHead {
    fn codec() -> impl Codec<Self> {
        composite2(
            VarInt,
            |p: &Self| &p.entity_id,
            AngleCodec,
            |p: &Self| &p.head_yaw,
            |entity_id, head_yaw| Self {
                entity_id,
                head_yaw,
            },
        )
    }
}

impl Packet for RotateHead {
    type Handler = dyn ClientboundHandler;
    const TYPE: PacketType = PacketType::to_client(0x04);
    const NAME: &'static str = "rotate_head";
    const SKIPPABLE: bool = true;

    fn write(&self, _cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()> {
        Self::codec().encode(self, buf)
    }

    fn read(_cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        Self::codec().decode(buf)
    }

    fn handle(self, handler: &mut Self::Handler) {
        handler.rotate_head(self);
    }
}
