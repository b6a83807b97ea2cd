//! Frame inspection: identify, decode and describe a single frame.

use std::fmt::Debug;

use anyhow::{Context, Result};
use buffer::ByteReader;
use protocol::clientbound::{
    AddEntity, ChunkBiomes, Commands, Disconnect, KeepAlive, MoveEntityPos, PlayerInfoRemove,
    PlayerInfoUpdate, RotateHead, SetEntityMotion,
};
use protocol::serverbound::{self, ChatCommand, CommandSuggestion, MovePlayerPos};
use protocol::{clientbound_packets, serverbound_packets, ClientboundHandler, ServerboundHandler};
use serde::Serialize;
use wire::{
    packet_set_fingerprint, registries_fingerprint, Direction, Load, PacketInfo, WireContext,
    WireError,
};

/// What happened when the frame's body was decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Decoded { packet: String },
    Failed { class: String, error: String },
    UnknownPacket,
}

/// Description of one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub direction: &'static str,
    pub id: u32,
    pub name: Option<&'static str>,
    pub skippable: bool,
    pub frame_len: usize,
    pub body_len: usize,
    pub outcome: Outcome,
}

/// One row of a packet table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacketRow {
    pub id: u32,
    pub name: &'static str,
    pub skippable: bool,
}

impl From<PacketInfo> for PacketRow {
    fn from(info: PacketInfo) -> Self {
        Self {
            id: info.packet_type.id,
            name: info.name,
            skippable: info.skippable,
        }
    }
}

/// Fingerprints peers compare before talking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fingerprints {
    pub clientbound: u64,
    pub serverbound: u64,
    pub registries: u64,
}

/// Keeps the pretty `Debug` form of whatever packet it receives.
#[derive(Default)]
struct Capture {
    packet: Option<String>,
}

impl Capture {
    fn keep(&mut self, packet: &impl Debug) {
        self.packet = Some(format!("{packet:#?}"));
    }
}

impl ClientboundHandler for Capture {
    fn keep_alive(&mut self, packet: KeepAlive) {
        self.keep(&packet);
    }
    fn disconnect(&mut self, packet: Disconnect) {
        self.keep(&packet);
    }
    fn add_entity(&mut self, packet: AddEntity) {
        self.keep(&packet);
    }
    fn set_entity_motion(&mut self, packet: SetEntityMotion) {
        self.keep(&packet);
    }
    fn move_entity_pos(&mut self, packet: MoveEntityPos) {
        self.keep(&packet);
    }
    fn rotate_head(&mut self, packet: RotateHead) {
        self.keep(&packet);
    }
    fn chunk_biomes(&mut self, packet: ChunkBiomes) {
        self.keep(&packet);
    }
    fn commands(&mut self, packet: Commands) {
        self.keep(&packet);
    }
    fn player_info_update(&mut self, packet: PlayerInfoUpdate) {
        self.keep(&packet);
    }
    fn player_info_remove(&mut self, packet: PlayerInfoRemove) {
        self.keep(&packet);
    }
}

impl ServerboundHandler for Capture {
    fn keep_alive(&mut self, packet: serverbound::KeepAlive) {
        self.keep(&packet);
    }
    fn chat_command(&mut self, packet: ChatCommand) {
        self.keep(&packet);
    }
    fn command_suggestion(&mut self, packet: CommandSuggestion) {
        self.keep(&packet);
    }
    fn move_player_pos(&mut self, packet: MovePlayerPos) {
        self.keep(&packet);
    }
}

fn outcome(result: Result<(), WireError>, capture: Capture) -> Outcome {
    match result {
        Err(WireError::UnknownPacket { .. }) => Outcome::UnknownPacket,
        Err(err) => Outcome::Failed {
            class: err.class().to_string(),
            error: err.to_string(),
        },
        Ok(()) => Outcome::Decoded {
            packet: capture.packet.unwrap_or_default(),
        },
    }
}

/// Decodes `frame` against the `direction` table and describes it.
///
/// Decode failures are part of the report; only a frame too short to hold
/// a packet id is an error.
pub fn inspect_frame(cx: &WireContext, direction: Direction, frame: &[u8]) -> Result<InspectReport> {
    let mut reader = ByteReader::new(frame);
    let id = reader.read_var_u32().context("frame has no packet id")?;
    let body_len = reader.remaining();

    let mut capture = Capture::default();
    let (info, result) = match direction {
        Direction::ToClient => {
            let set = clientbound_packets()?;
            let result = set.dispatch(cx, frame, &mut capture, Load::Normal).map(|_| ());
            (set.get(id), result)
        }
        Direction::ToServer => {
            let set = serverbound_packets()?;
            let result = set.dispatch(cx, frame, &mut capture, Load::Normal).map(|_| ());
            (set.get(id), result)
        }
    };

    Ok(InspectReport {
        direction: direction.as_str(),
        id,
        name: info.map(|info| info.name),
        skippable: info.is_some_and(|info| info.skippable),
        frame_len: frame.len(),
        body_len,
        outcome: outcome(result, capture),
    })
}

/// Lists the packet table of `direction` in id order.
pub fn packet_rows(direction: Direction) -> Result<Vec<PacketRow>> {
    Ok(match direction {
        Direction::ToClient => clientbound_packets()?.iter().map(PacketRow::from).collect(),
        Direction::ToServer => serverbound_packets()?.iter().map(PacketRow::from).collect(),
    })
}

pub fn fingerprints(cx: &WireContext) -> Result<Fingerprints> {
    Ok(Fingerprints {
        clientbound: packet_set_fingerprint(&clientbound_packets()?),
        serverbound: packet_set_fingerprint(&serverbound_packets()?),
        registries: registries_fingerprint(cx.registries()),
    })
}

/// Human-readable form of `report`.
pub fn format_report(report: &InspectReport) -> String {
    let mut out = format!(
        "{} 0x{:02x} {} ({} bytes, body {} bytes){}\n",
        report.direction,
        report.id,
        report.name.unwrap_or("<unknown>"),
        report.frame_len,
        report.body_len,
        if report.skippable { " [skippable]" } else { "" },
    );
    match &report.outcome {
        Outcome::Decoded { packet } => {
            out.push_str(packet);
            out.push('\n');
        }
        Outcome::Failed { class, error } => {
            out.push_str(&format!("{class} error: {error}\n"));
        }
        Outcome::UnknownPacket => out.push_str("no packet registered under this id\n"),
    }
    out
}

#[cfg(test)]
mod tests {
    use codec::CodecLimits;
    use glam::DVec3;
    use protocol::MovePlayerFlags;
    use wire::encode_packet;

    use super::*;

    fn context() -> WireContext {
        WireContext::new(protocol::builtin_registries().unwrap())
    }

    #[test]
    fn decoded_frame_is_described() {
        let cx = context();
        let frame = encode_packet(&cx, &KeepAlive { id: 5 }).unwrap();
        let report = inspect_frame(&cx, Direction::ToClient, &frame).unwrap();
        assert_eq!(report.name, Some("keep_alive"));
        assert_eq!(report.frame_len, 9);
        assert_eq!(report.body_len, 8);
        let Outcome::Decoded { packet } = &report.outcome else {
            panic!("expected decoded outcome, got {:?}", report.outcome);
        };
        assert!(packet.contains("id: 5"));
        assert!(format_report(&report).starts_with("to_client 0x00 keep_alive"));
    }

    #[test]
    fn failures_are_reported_with_their_class() {
        let cx = context();
        let mut frame = encode_packet(
            &cx,
            &MovePlayerPos {
                position: DVec3::ZERO,
                flags: MovePlayerFlags::empty(),
            },
        )
        .unwrap();
        frame.push(0xff);
        let report = inspect_frame(&cx, Direction::ToServer, &frame).unwrap();
        let Outcome::Failed { class, .. } = &report.outcome else {
            panic!("expected failure, got {:?}", report.outcome);
        };
        assert_eq!(class, "structural");
    }

    #[test]
    fn unknown_ids_are_not_errors() {
        let report = inspect_frame(&context(), Direction::ToServer, &[0x7f]).unwrap();
        assert_eq!(report.outcome, Outcome::UnknownPacket);
        assert_eq!(report.name, None);
    }

    #[test]
    fn empty_frame_is_an_error() {
        assert!(inspect_frame(&context(), Direction::ToClient, &[]).is_err());
    }

    #[test]
    fn report_serializes_with_status_tag() {
        let report = inspect_frame(&context(), Direction::ToServer, &[0x7f]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"]["status"], "unknown_packet");
        assert_eq!(json["direction"], "to_server");
    }

    #[test]
    fn rows_follow_id_order() {
        let rows = packet_rows(Direction::ToClient).unwrap();
        assert!(rows.windows(2).all(|pair| pair[0].id < pair[1].id));
        assert!(rows.iter().any(|row| row.name == "rotate_head" && row.skippable));
    }

    #[test]
    fn registry_fingerprint_follows_snapshot_only() {
        let default = fingerprints(&context()).unwrap();
        let limited = fingerprints(&context().with_codec_limits(CodecLimits::for_testing())).unwrap();
        assert_eq!(default, limited);

        let other = WireContext::new(codec::Registries::new());
        let changed = fingerprints(&other).unwrap();
        assert_eq!(changed.clientbound, default.clientbound);
        assert_ne!(changed.registries, default.registries);
    }
}
