#![no_main]

use libfuzzer_sys::fuzz_target;
use protocol::clientbound::{
    AddEntity, ChunkBiomes, Commands, Disconnect, KeepAlive, MoveEntityPos, PlayerInfoRemove,
    PlayerInfoUpdate, RotateHead, SetEntityMotion,
};
use protocol::{builtin_registries, clientbound_packets, ClientboundHandler};
use wire::{Load, WireContext};

/// Re-encodes every packet it receives; a decoded packet must encode.
struct Echo {
    cx: WireContext,
}

impl Echo {
    fn echo<P: wire::Packet>(&self, packet: &P) {
        wire::encode_packet(&self.cx, packet).expect("decoded packet re-encodes");
    }
}

impl ClientboundHandler for Echo {
    fn keep_alive(&mut self, packet: KeepAlive) {
        self.echo(&packet);
    }
    fn disconnect(&mut self, packet: Disconnect) {
        self.echo(&packet);
    }
    fn add_entity(&mut self, packet: AddEntity) {
        self.echo(&packet);
    }
    fn set_entity_motion(&mut self, packet: SetEntityMotion) {
        self.echo(&packet);
    }
    fn move_entity_pos(&mut self, packet: MoveEntityPos) {
        self.echo(&packet);
    }
    fn rotate_head(&mut self, packet: RotateHead) {
        self.echo(&packet);
    }
    fn chunk_biomes(&mut self, packet: ChunkBiomes) {
        self.echo(&packet);
    }
    fn commands(&mut self, packet: Commands) {
        self.echo(&packet);
    }
    fn player_info_update(&mut self, packet: PlayerInfoUpdate) {
        self.echo(&packet);
    }
    fn player_info_remove(&mut self, packet: PlayerInfoRemove) {
        self.echo(&packet);
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(registries) = builtin_registries() else {
        return;
    };
    let cx = WireContext::new(registries)
        .with_codec_limits(codec::CodecLimits::for_testing())
        .with_limits(wire::Limits::for_testing());
    let Ok(table) = clientbound_packets() else {
        return;
    };
    let mut echo = Echo { cx: cx.clone() };

    // Split the input into length-prefixed frames.
    let mut idx = 0usize;
    while idx < data.len() && idx < 4096 {
        let len = (data[idx] as usize % 120).saturating_add(1);
        idx += 1;
        let end = (idx + len).min(data.len());
        let frame = &data[idx..end];
        idx = end;

        let load = if len % 2 == 0 { Load::Shedding } else { Load::Normal };
        let _ = table.dispatch(&cx, frame, &mut echo, load);
    }
});
