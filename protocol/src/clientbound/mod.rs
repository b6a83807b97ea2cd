//! Packets sent from the server to the client.

mod chunk;
mod commands;
mod connection;
mod entity;
mod player_info;

pub use chunk::{BiomeBlob, ChunkBiomeData, ChunkBiomes, MAX_BIOME_BYTES, MAX_BIOME_CHUNKS};
pub use commands::Commands;
pub use connection::{Disconnect, KeepAlive, MAX_REASON_CHARS};
pub use entity::{AddEntity, MoveEntityPos, RotateHead, SetEntityMotion};
pub use player_info::{
    GameMode, PlayerInfoAction, PlayerInfoField, PlayerInfoRemove, PlayerInfoUpdate, Property,
    MAX_PLAYER_NAME_CHARS, MAX_PROPERTIES,
};

use wire::{Direction, PacketSet, WireResult};

/// Receives every clientbound packet, one method per packet.
pub trait ClientboundHandler {
    fn keep_alive(&mut self, packet: KeepAlive);
    fn disconnect(&mut self, packet: Disconnect);
    fn add_entity(&mut self, packet: AddEntity);
    fn set_entity_motion(&mut self, packet: SetEntityMotion);
    fn move_entity_pos(&mut self, packet: MoveEntityPos);
    fn rotate_head(&mut self, packet: RotateHead);
    fn chunk_biomes(&mut self, packet: ChunkBiomes);
    fn commands(&mut self, packet: Commands);
    fn player_info_update(&mut self, packet: PlayerInfoUpdate);
    fn player_info_remove(&mut self, packet: PlayerInfoRemove);
}

/// Builds the clientbound packet table.
pub fn clientbound_packets() -> WireResult<PacketSet<dyn ClientboundHandler>> {
    Ok(PacketSet::builder(Direction::ToClient)
        .register::<KeepAlive>()?
        .register::<AddEntity>()?
        .register::<SetEntityMotion>()?
        .register::<MoveEntityPos>()?
        .register::<RotateHead>()?
        .register::<ChunkBiomes>()?
        .register::<Commands>()?
        .register::<PlayerInfoUpdate>()?
        .register::<PlayerInfoRemove>()?
        .register::<Disconnect>()?
        .build())
}
