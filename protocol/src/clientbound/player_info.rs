//! Tab-list player info.
//!
//! Updates are sparse: a packet names the set of actions it carries and
//! every listed player has one field bundle per action in that set.

use buffer::{ByteReader, ByteWriter};
use codec::{
    composite3, Action, ActionField, ActionSetCodec, ActionUpdate, Bool, Codec, CodecError,
    CodecResult, ListCodec, OptionCodec, StringCodec, UuidCodec, ValueReason, VarInt,
};
use uuid::Uuid;
use wire::{Packet, PacketType, WireContext};

use super::ClientboundHandler;

/// Longest player name, in characters.
pub const MAX_PLAYER_NAME_CHARS: usize = 16;

/// Most profile properties per player.
pub const MAX_PROPERTIES: usize = 16;

const MAX_PROPERTY_NAME_CHARS: usize = 64;
const MAX_PROPERTY_VALUE_CHARS: usize = 32_767;
const MAX_SIGNATURE_CHARS: usize = 1024;
const MAX_DISPLAY_NAME_CHARS: usize = 256;

/// Actions of a player info update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerInfoAction {
    AddPlayer,
    UpdateGameMode,
    UpdateListed,
    UpdateLatency,
    UpdateDisplayName,
}

impl Action for PlayerInfoAction {
    const DECLARED: &'static [Self] = &[
        Self::AddPlayer,
        Self::UpdateGameMode,
        Self::UpdateListed,
        Self::UpdateLatency,
        Self::UpdateDisplayName,
    ];
    const WIRE_BITS: usize = 8;

    fn bit(self) -> u8 {
        match self {
            Self::AddPlayer => 0,
            Self::UpdateGameMode => 1,
            Self::UpdateListed => 2,
            Self::UpdateLatency => 3,
            Self::UpdateDisplayName => 4,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::AddPlayer => "add_player",
            Self::UpdateGameMode => "update_game_mode",
            Self::UpdateListed => "update_listed",
            Self::UpdateLatency => "update_latency",
            Self::UpdateDisplayName => "update_display_name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl GameMode {
    const fn id(self) -> i32 {
        match self {
            Self::Survival => 0,
            Self::Creative => 1,
            Self::Adventure => 2,
            Self::Spectator => 3,
        }
    }

    fn from_id(id: i32) -> CodecResult<Self> {
        match id {
            0 => Ok(Self::Survival),
            1 => Ok(Self::Creative),
            2 => Ok(Self::Adventure),
            3 => Ok(Self::Spectator),
            other => Err(CodecError::InvalidValue(ValueReason::UnknownVariant {
                kind: "game mode",
                value: other as u32,
            })),
        }
    }
}

/// A signed profile property, such as textures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
    pub signature: Option<String>,
}

impl Property {
    fn codec() -> impl Codec<Self> {
        composite3(
            StringCodec::new(MAX_PROPERTY_NAME_CHARS),
            |p: &Self| &p.name,
            StringCodec::new(MAX_PROPERTY_VALUE_CHARS),
            |p: &Self| &p.value,
            OptionCodec::new(StringCodec::new(MAX_SIGNATURE_CHARS)),
            |p: &Self| &p.signature,
            |name, value, signature| Self {
                name,
                value,
                signature,
            },
        )
    }
}

/// One action's fields for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInfoField {
    AddPlayer {
        name: String,
        properties: Vec<Property>,
    },
    UpdateGameMode(GameMode),
    UpdateListed(bool),
    /// Round-trip time in milliseconds.
    UpdateLatency(i32),
    UpdateDisplayName(Option<String>),
}

fn properties_codec() -> ListCodec<impl Codec<Property>> {
    ListCodec::new(Property::codec(), MAX_PROPERTIES)
}

const fn display_name_codec() -> OptionCodec<StringCodec> {
    OptionCodec::new(StringCodec::new(MAX_DISPLAY_NAME_CHARS))
}

impl ActionField for PlayerInfoField {
    type Action = PlayerInfoAction;

    fn action(&self) -> PlayerInfoAction {
        match self {
            Self::AddPlayer { .. } => PlayerInfoAction::AddPlayer,
            Self::UpdateGameMode(_) => PlayerInfoAction::UpdateGameMode,
            Self::UpdateListed(_) => PlayerInfoAction::UpdateListed,
            Self::UpdateLatency(_) => PlayerInfoAction::UpdateLatency,
            Self::UpdateDisplayName(_) => PlayerInfoAction::UpdateDisplayName,
        }
    }

    fn encode_fields(&self, buf: &mut ByteWriter) -> CodecResult<()> {
        match self {
            Self::AddPlayer { name, properties } => {
                StringCodec::new(MAX_PLAYER_NAME_CHARS).encode(name, buf)?;
                properties_codec().encode(properties, buf)
            }
            Self::UpdateGameMode(mode) => VarInt.encode(&mode.id(), buf),
            Self::UpdateListed(listed) => Bool.encode(listed, buf),
            Self::UpdateLatency(latency) => VarInt.encode(latency, buf),
            Self::UpdateDisplayName(display) => display_name_codec().encode(display, buf),
        }
    }

    fn decode_fields(action: PlayerInfoAction, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(match action {
            PlayerInfoAction::AddPlayer => Self::AddPlayer {
                name: StringCodec::new(MAX_PLAYER_NAME_CHARS).decode(buf)?,
                properties: properties_codec().decode(buf)?,
            },
            PlayerInfoAction::UpdateGameMode => {
                Self::UpdateGameMode(GameMode::from_id(VarInt.decode(buf)?)?)
            }
            PlayerInfoAction::UpdateListed => Self::UpdateListed(Bool.decode(buf)?),
            PlayerInfoAction::UpdateLatency => Self::UpdateLatency(VarInt.decode(buf)?),
            PlayerInfoAction::UpdateDisplayName => {
                Self::UpdateDisplayName(display_name_codec().decode(buf)?)
            }
        })
    }
}

/// Adds or changes tab-list entries, keyed by profile id.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInfoUpdate {
    pub update: ActionUpdate<Uuid, PlayerInfoField>,
}

impl Packet for PlayerInfoUpdate {
    type Handler = dyn ClientboundHandler;
    const TYPE: PacketType = PacketType::to_client(0x07);
    const NAME: &'static str = "player_info_update";

    fn write(&self, cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()> {
        ActionSetCodec::new(UuidCodec, cx.codec_limits().max_action_records)
            .encode(&self.update, buf)
    }

    fn read(cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            update: ActionSetCodec::new(UuidCodec, cx.codec_limits().max_action_records)
                .decode(buf)?,
        })
    }

    fn handle(self, handler: &mut Self::Handler) {
        handler.player_info_update(self);
    }
}

/// Removes tab-list entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfoRemove {
    pub players: Vec<Uuid>,
}

impl Packet for PlayerInfoRemove {
    type Handler = dyn ClientboundHandler;
    const TYPE: PacketType = PacketType::to_client(0x08);
    const NAME: &'static str = "player_info_remove";

    fn write(&self, cx: &WireContext, buf: &mut ByteWriter) -> CodecResult<()> {
        ListCodec::new(UuidCodec, cx.codec_limits().max_action_records)
            .encode(&self.players, buf)
    }

    fn read(cx: &WireContext, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            players: ListCodec::new(UuidCodec, cx.codec_limits().max_action_records)
                .decode(buf)?,
        })
    }

    fn handle(self, handler: &mut Self::Handler) {
        handler.player_info_remove(self);
    }
}

#[cfg(test)]
mod tests {
    use codec::{ActionRecord, ActionSet};

    use super::*;

    fn roundtrip(packet: &PlayerInfoUpdate) -> PlayerInfoUpdate {
        let cx = WireContext::default();
        let mut writer = ByteWriter::new();
        packet.write(&cx, &mut writer).unwrap();
        let bytes = writer.finish();
        let mut reader = ByteReader::new(&bytes);
        let decoded = PlayerInfoUpdate::read(&cx, &mut reader).unwrap();
        assert!(reader.is_empty());
        decoded
    }

    #[test]
    fn latency_only_update_is_compact() {
        let player = Uuid::from_u128(7);
        let packet = PlayerInfoUpdate {
            update: ActionUpdate::single(
                ActionRecord::new(player).with(PlayerInfoField::UpdateLatency(42)),
            ),
        };
        let mut writer = ByteWriter::new();
        packet.write(&WireContext::default(), &mut writer).unwrap();
        let bytes = writer.finish();
        // bitset, count, 16-byte uuid, varint latency
        assert_eq!(bytes.len(), 1 + 1 + 16 + 1);
        assert_eq!(bytes[0], 0b0000_1000);
        assert_eq!(roundtrip(&packet), packet);
    }

    #[test]
    fn full_add_roundtrip() {
        let record = ActionRecord::new(Uuid::from_u128(1))
            .with(PlayerInfoField::UpdateDisplayName(Some("Steve the Great".into())))
            .with(PlayerInfoField::AddPlayer {
                name: "Steve".into(),
                properties: vec![Property {
                    name: "textures".into(),
                    value: "e30=".into(),
                    signature: None,
                }],
            })
            .with(PlayerInfoField::UpdateGameMode(GameMode::Creative))
            .with(PlayerInfoField::UpdateListed(true));
        let packet = PlayerInfoUpdate {
            update: ActionUpdate::single(record),
        };
        assert_eq!(roundtrip(&packet), packet);
    }

    #[test]
    fn unknown_game_mode_is_rejected() {
        let actions: ActionSet<PlayerInfoAction> =
            [PlayerInfoAction::UpdateGameMode].into_iter().collect();
        let mut writer = ByteWriter::new();
        writer.write_u8(actions.bits() as u8);
        writer.write_var_u32(1);
        writer.write_bytes(Uuid::nil().as_bytes());
        writer.write_var_i32(9);
        let bytes = writer.finish();

        let err = PlayerInfoUpdate::read(&WireContext::default(), &mut ByteReader::new(&bytes))
            .unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidValue(ValueReason::UnknownVariant {
                kind: "game mode",
                value: 9
            })
        );
        assert_eq!(err.class(), codec::ErrorClass::Structural);
    }

    #[test]
    fn overlong_player_name_is_refused_on_encode() {
        let packet = PlayerInfoUpdate {
            update: ActionUpdate::single(ActionRecord::new(Uuid::nil()).with(
                PlayerInfoField::AddPlayer {
                    name: "x".repeat(MAX_PLAYER_NAME_CHARS + 1),
                    properties: Vec::new(),
                },
            )),
        };
        let err = packet
            .write(&WireContext::default(), &mut ByteWriter::new())
            .unwrap_err();
        assert!(matches!(err, CodecError::OversizedValue { .. }));
    }

    #[test]
    fn remove_roundtrip() {
        let packet = PlayerInfoRemove {
            players: vec![Uuid::from_u128(1), Uuid::from_u128(2)],
        };
        let cx = WireContext::default();
        let mut writer = ByteWriter::new();
        packet.write(&cx, &mut writer).unwrap();
        let bytes = writer.finish();
        assert_eq!(bytes.len(), 1 + 32);
        assert_eq!(
            PlayerInfoRemove::read(&cx, &mut ByteReader::new(&bytes)).unwrap(),
            packet
        );
    }
}
