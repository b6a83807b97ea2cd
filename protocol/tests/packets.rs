use codec::graph::FlatGraph;
use codec::{
    ActionRecord, ActionUpdate, Codec, CodecError, CommandGraphCodec, CommandTree, Identifier,
    LimitKind,
};
use glam::DVec3;
use proptest::prelude::*;
use protocol::clientbound::{
    AddEntity, BiomeBlob, ChunkBiomeData, ChunkBiomes, Commands, Disconnect, GameMode, KeepAlive,
    MoveEntityPos, PlayerInfoField, PlayerInfoRemove, PlayerInfoUpdate, RotateHead,
    SetEntityMotion,
};
use protocol::serverbound::{self, ChatCommand, CommandSuggestion, MovePlayerPos};
use protocol::{
    builtin_registries, clientbound_packets, serverbound_packets, ArgumentType, ClientboundHandler,
    CommandStubs, MoveFlags, MovePlayerFlags, NodeStub, NumberRange, ServerboundHandler,
    StringKind, COMMAND_ARGUMENT_TYPE,
};
use uuid::Uuid;
use wire::{Dispatched, Load, Packet, PacketSet, WireContext, WireError};

/// Records every packet it receives, in order.
#[derive(Debug, Default)]
struct Client {
    received: Vec<Received>,
}

#[derive(Debug, Clone, PartialEq)]
enum Received {
    KeepAlive(KeepAlive),
    Disconnect(Disconnect),
    AddEntity(AddEntity),
    SetEntityMotion(SetEntityMotion),
    MoveEntityPos(MoveEntityPos),
    RotateHead(RotateHead),
    ChunkBiomes(ChunkBiomes),
    Commands(Commands),
    PlayerInfoUpdate(PlayerInfoUpdate),
    PlayerInfoRemove(PlayerInfoRemove),
}

impl ClientboundHandler for Client {
    fn keep_alive(&mut self, packet: KeepAlive) {
        self.received.push(Received::KeepAlive(packet));
    }
    fn disconnect(&mut self, packet: Disconnect) {
        self.received.push(Received::Disconnect(packet));
    }
    fn add_entity(&mut self, packet: AddEntity) {
        self.received.push(Received::AddEntity(packet));
    }
    fn set_entity_motion(&mut self, packet: SetEntityMotion) {
        self.received.push(Received::SetEntityMotion(packet));
    }
    fn move_entity_pos(&mut self, packet: MoveEntityPos) {
        self.received.push(Received::MoveEntityPos(packet));
    }
    fn rotate_head(&mut self, packet: RotateHead) {
        self.received.push(Received::RotateHead(packet));
    }
    fn chunk_biomes(&mut self, packet: ChunkBiomes) {
        self.received.push(Received::ChunkBiomes(packet));
    }
    fn commands(&mut self, packet: Commands) {
        self.received.push(Received::Commands(packet));
    }
    fn player_info_update(&mut self, packet: PlayerInfoUpdate) {
        self.received.push(Received::PlayerInfoUpdate(packet));
    }
    fn player_info_remove(&mut self, packet: PlayerInfoRemove) {
        self.received.push(Received::PlayerInfoRemove(packet));
    }
}

#[derive(Debug, Default)]
struct Server {
    commands: Vec<String>,
    moves: Vec<MovePlayerPos>,
    other: usize,
}

impl ServerboundHandler for Server {
    fn keep_alive(&mut self, _packet: serverbound::KeepAlive) {
        self.other += 1;
    }
    fn chat_command(&mut self, packet: ChatCommand) {
        self.commands.push(packet.command);
    }
    fn command_suggestion(&mut self, _packet: CommandSuggestion) {
        self.other += 1;
    }
    fn move_player_pos(&mut self, packet: MovePlayerPos) {
        self.moves.push(packet);
    }
}

fn context() -> WireContext {
    WireContext::new(builtin_registries().unwrap())
}

/// Encodes through the table, dispatches the frame and returns what arrived.
fn through_client<P>(table: &PacketSet<dyn ClientboundHandler>, packet: &P) -> Received
where
    P: Packet<Handler = dyn ClientboundHandler>,
{
    let cx = context();
    let frame = table.encode(&cx, packet).unwrap();
    let mut client = Client::default();
    let outcome = table
        .dispatch(&cx, &frame, &mut client, Load::Normal)
        .unwrap();
    assert_eq!(outcome.name(), P::NAME);
    assert_eq!(client.received.len(), 1);
    client.received.remove(0)
}

/// root -> "foo" -> <bar> with <bar> redirecting to root.
fn foo_bar_tree() -> CommandTree<NodeStub> {
    let mut tree = CommandTree::new();
    let root = tree.root();
    let foo = tree.add_child(root, NodeStub::literal("foo"));
    let bar = tree.add_child(
        foo,
        NodeStub::argument("bar", ArgumentType::Integer(NumberRange::new(Some(0), None))),
    );
    tree.set_executable(bar, true);
    tree.set_redirect(bar, root);
    tree
}

#[test]
fn connection_packets_roundtrip() {
    let table = clientbound_packets().unwrap();
    let keep_alive = KeepAlive { id: -42 };
    assert_eq!(
        through_client(&table, &keep_alive),
        Received::KeepAlive(keep_alive)
    );
    let disconnect = Disconnect {
        reason: "server closed".into(),
    };
    assert_eq!(
        through_client(&table, &disconnect),
        Received::Disconnect(disconnect)
    );
}

#[test]
fn add_entity_resolves_kind_through_registry() {
    let table = clientbound_packets().unwrap();
    let packet = AddEntity {
        entity_id: 12,
        uuid: Uuid::from_u128(0xfeed),
        kind: Identifier::parse("core:pig").unwrap(),
        position: DVec3::new(0.5, 70.0, -3.25),
        pitch: 0.0,
        yaw: 90.0,
        head_yaw: 180.0,
        data: 0,
        velocity: DVec3::new(0.25, 0.0, -0.125),
    };
    let Received::AddEntity(decoded) = through_client(&table, &packet) else {
        panic!("expected add_entity");
    };
    assert_eq!(decoded.kind, packet.kind);
    assert_eq!(decoded.position, packet.position);
    assert!((decoded.yaw - 90.0).abs() < 1.5);
    assert!((decoded.velocity - packet.velocity).length() < 1e-3);
}

#[test]
fn add_entity_with_unknown_kind_is_refused_on_encode() {
    let packet = AddEntity {
        entity_id: 1,
        uuid: Uuid::nil(),
        kind: Identifier::parse("core:dragon").unwrap(),
        position: DVec3::ZERO,
        pitch: 0.0,
        yaw: 0.0,
        head_yaw: 0.0,
        data: 0,
        velocity: DVec3::ZERO,
    };
    let err = clientbound_packets()
        .unwrap()
        .encode(&context(), &packet)
        .unwrap_err();
    let WireError::Encode { name, source } = &err else {
        panic!("expected encode error, got {err:?}");
    };
    assert_eq!(*name, "add_entity");
    assert!(matches!(source, CodecError::UnregisteredValue { .. }));
}

#[test]
fn velocity_scenario_end_to_end() {
    let table = clientbound_packets().unwrap();
    let packet = SetEntityMotion {
        entity_id: 5,
        velocity: DVec3::new(10.5, 0.0, -10.5),
    };
    let frame = table.encode(&context(), &packet).unwrap();
    // id, varint entity, then three big-endian i16
    assert_eq!(
        frame,
        [
            vec![0x02, 0x05],
            31_200i16.to_be_bytes().to_vec(),
            0i16.to_be_bytes().to_vec(),
            (-31_200i16).to_be_bytes().to_vec(),
        ]
        .concat()
    );

    let Received::SetEntityMotion(decoded) = through_client(&table, &packet) else {
        panic!("expected set_entity_motion");
    };
    assert!((decoded.velocity.x - 3.9).abs() <= 1.0 / 8000.0);
    assert_eq!(decoded.velocity.y, 0.0);
    assert!((decoded.velocity.z + 3.9).abs() <= 1.0 / 8000.0);
}

#[test]
fn relative_move_roundtrip() {
    let table = clientbound_packets().unwrap();
    let packet = MoveEntityPos {
        entity_id: 3,
        delta: DVec3::new(1.5, -0.25, 7.0),
        flags: MoveFlags::ON_GROUND,
    };
    let Received::MoveEntityPos(decoded) = through_client(&table, &packet) else {
        panic!("expected move_entity_pos");
    };
    assert_eq!(decoded.flags, MoveFlags::ON_GROUND);
    assert!((decoded.delta - packet.delta).length() < 1e-3);
}

#[test]
fn foo_bar_commands_scenario() {
    let cx = context();
    let registry = cx.registries().require(COMMAND_ARGUMENT_TYPE).unwrap();
    let graph = CommandGraphCodec::new(CommandStubs::new(registry), 64);

    let tree = foo_bar_tree();
    let flat: FlatGraph<NodeStub> = graph.flatten(&tree).unwrap();
    assert_eq!(flat.entries.len(), 3);
    assert_eq!(flat.root, 0);

    let table = clientbound_packets().unwrap();
    let Received::Commands(decoded) = through_client(&table, &Commands { tree }) else {
        panic!("expected commands");
    };
    let resolved = decoded.tree;
    let root = resolved.root();
    let foo = resolved[root].children()[0];
    assert_eq!(resolved[foo].stub(), Some(&NodeStub::literal("foo")));
    let bar = resolved[foo].children()[0];
    assert_eq!(resolved[bar].stub().map(NodeStub::name), Some("bar"));
    assert!(resolved[bar].is_executable());
    assert_eq!(resolved[bar].redirect(), Some(root));
}

#[test]
fn commands_without_argument_registry_fail() {
    let cx = WireContext::default();
    let err = Commands {
        tree: foo_bar_tree(),
    }
    .write(&cx, &mut buffer::ByteWriter::new())
    .unwrap_err();
    assert!(matches!(err, CodecError::MissingRegistry { .. }));
}

#[test]
fn string_argument_with_suggestions_roundtrip() {
    let mut tree = CommandTree::new();
    let root = tree.root();
    let say = tree.add_child(root, NodeStub::literal("say"));
    let message = tree.add_child(
        say,
        NodeStub::Argument {
            name: "message".into(),
            parser: ArgumentType::String(StringKind::GreedyPhrase),
            suggestions: Some(Identifier::parse("core:ask_server").unwrap()),
        },
    );
    tree.set_executable(message, true);

    let table = clientbound_packets().unwrap();
    let Received::Commands(decoded) = through_client(&table, &Commands { tree: tree.clone() })
    else {
        panic!("expected commands");
    };
    assert_eq!(decoded.tree, tree);
}

#[test]
fn depth_first_tree_roundtrip() {
    // root -> a -> c, root -> b: arena order differs from wire order.
    let mut tree = CommandTree::new();
    let root = tree.root();
    let a = tree.add_child(root, NodeStub::literal("a"));
    let c = tree.add_child(
        a,
        NodeStub::argument("c", ArgumentType::Integer(NumberRange::new(None, Some(9)))),
    );
    tree.add_child(root, NodeStub::literal("b"));
    tree.set_executable(c, true);

    let cx = context();
    let packet = Commands { tree };
    let frame = wire::encode_packet(&cx, &packet).unwrap();
    let decoded: Commands = wire::decode_packet(&cx, &frame).unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn chunk_biomes_roundtrip() {
    let table = clientbound_packets().unwrap();
    let packet = ChunkBiomes {
        chunks: vec![
            ChunkBiomeData {
                x: -1,
                z: 4,
                data: BiomeBlob::try_new(vec![1, 2, 3, 4]).unwrap(),
            },
            ChunkBiomeData {
                x: 0,
                z: 0,
                data: BiomeBlob::default(),
            },
        ],
    };
    assert_eq!(
        through_client(&table, &packet),
        Received::ChunkBiomes(packet)
    );
}

#[test]
fn player_info_roundtrip() {
    let table = clientbound_packets().unwrap();
    let player = Uuid::from_u128(99);
    let update = PlayerInfoUpdate {
        update: ActionUpdate::single(
            ActionRecord::new(player)
                .with(PlayerInfoField::UpdateGameMode(GameMode::Spectator))
                .with(PlayerInfoField::UpdateListed(false)),
        ),
    };
    assert_eq!(
        through_client(&table, &update),
        Received::PlayerInfoUpdate(update)
    );

    let remove = PlayerInfoRemove {
        players: vec![player],
    };
    assert_eq!(
        through_client(&table, &remove),
        Received::PlayerInfoRemove(remove)
    );
}

#[test]
fn head_rotation_is_shed_under_load() {
    let cx = context();
    let table = clientbound_packets().unwrap();
    let frame = table
        .encode(
            &cx,
            &RotateHead {
                entity_id: 1,
                head_yaw: 45.0,
            },
        )
        .unwrap();

    let mut client = Client::default();
    let outcome = table
        .dispatch(&cx, &frame, &mut client, Load::Shedding)
        .unwrap();
    assert!(matches!(outcome, Dispatched::Shed { id: 0x04, .. }));
    assert!(client.received.is_empty());

    // Non-skippable packets still arrive while shedding.
    let frame = table.encode(&cx, &KeepAlive { id: 1 }).unwrap();
    table
        .dispatch(&cx, &frame, &mut client, Load::Shedding)
        .unwrap();
    assert_eq!(client.received, vec![Received::KeepAlive(KeepAlive { id: 1 })]);
}

#[test]
fn oversized_biome_frame_fails_before_allocation() {
    let cx = context();
    let table = clientbound_packets().unwrap();
    // id 0x05, one chunk, x, z, then a blob length of 2^28 and nothing else
    let frame = [
        0x05, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0x80, 0x80, 0x80, 0x80, 0x01,
    ];
    let err = table
        .dispatch(&cx, &frame, &mut Client::default(), Load::Normal)
        .unwrap_err();
    let WireError::Decode { source, .. } = &err else {
        panic!("expected decode error, got {err:?}");
    };
    assert!(matches!(
        source,
        CodecError::LimitExceeded {
            kind: LimitKind::Blob,
            ..
        }
    ));
}

#[test]
fn serverbound_dispatch() {
    let cx = context();
    let table = serverbound_packets().unwrap();
    let mut server = Server::default();

    for frame in [
        table
            .encode(
                &cx,
                &ChatCommand {
                    command: "foo 3".into(),
                },
            )
            .unwrap(),
        table
            .encode(
                &cx,
                &MovePlayerPos {
                    position: DVec3::new(8.0, 65.0, 8.0),
                    flags: MovePlayerFlags::ON_GROUND,
                },
            )
            .unwrap(),
        table
            .encode(
                &cx,
                &CommandSuggestion {
                    transaction_id: 7,
                    text: "/fo".into(),
                },
            )
            .unwrap(),
    ] {
        table
            .dispatch(&cx, &frame, &mut server, Load::Normal)
            .unwrap();
    }

    assert_eq!(server.commands, ["foo 3"]);
    assert_eq!(server.moves.len(), 1);
    assert_eq!(server.moves[0].position, DVec3::new(8.0, 65.0, 8.0));
    assert_eq!(server.other, 1);
}

#[test]
fn clientbound_id_on_server_table_is_unknown() {
    let cx = context();
    // 0x09 is only assigned to the client direction.
    let err = serverbound_packets()
        .unwrap()
        .dispatch(&cx, &[0x09, 0x00], &mut Server::default(), Load::Normal)
        .unwrap_err();
    assert!(matches!(err, WireError::UnknownPacket { id: 0x09, .. }));
    assert!(err.is_fatal_to_connection());
}

proptest! {
    #[test]
    fn in_range_velocity_is_within_one_step(
        x in -3.9f64..3.9,
        y in -3.9f64..3.9,
        z in -3.9f64..3.9,
    ) {
        let cx = context();
        let packet = SetEntityMotion { entity_id: 0, velocity: DVec3::new(x, y, z) };
        let frame = wire::encode_packet(&cx, &packet).unwrap();
        let decoded: SetEntityMotion = wire::decode_packet(&cx, &frame).unwrap();
        let step = 1.0 / 8000.0;
        prop_assert!((decoded.velocity.x - x).abs() <= step);
        prop_assert!((decoded.velocity.y - y).abs() <= step);
        prop_assert!((decoded.velocity.z - z).abs() <= step);
    }

    #[test]
    fn chat_commands_roundtrip(command in "[a-z0-9 ]{0,64}") {
        let cx = context();
        let packet = ChatCommand { command };
        let frame = wire::encode_packet(&cx, &packet).unwrap();
        let decoded: ChatCommand = wire::decode_packet(&cx, &frame).unwrap();
        prop_assert_eq!(decoded, packet);
    }

    #[test]
    fn arbitrary_frames_never_panic(frame in proptest::collection::vec(any::<u8>(), 0..64)) {
        let cx = context();
        let table = clientbound_packets().unwrap();
        let _ = table.dispatch(&cx, &frame, &mut Client::default(), Load::Normal);
    }
}

#[test]
fn graph_node_bound_comes_from_context() {
    let cx = context().with_codec_limits(codec::CodecLimits {
        max_graph_nodes: 2,
        ..codec::CodecLimits::default()
    });
    let frame = wire::encode_packet(
        &context(),
        &Commands {
            tree: foo_bar_tree(),
        },
    )
    .unwrap();
    let err = wire::decode_packet::<Commands>(&cx, &frame).unwrap_err();
    let WireError::Decode { source, .. } = &err else {
        panic!("expected decode error, got {err:?}");
    };
    assert!(matches!(
        source,
        CodecError::LimitExceeded {
            kind: LimitKind::GraphNodes,
            limit: 2,
            actual: 3
        }
    ));
}

#[test]
fn decoded_tree_encodes_identically() {
    let cx = context();
    let frame = wire::encode_packet(
        &cx,
        &Commands {
            tree: foo_bar_tree(),
        },
    )
    .unwrap();
    let decoded: Commands = wire::decode_packet(&cx, &frame).unwrap();
    assert_eq!(wire::encode_packet(&cx, &decoded).unwrap(), frame);

    let registry = cx.registries().require(COMMAND_ARGUMENT_TYPE).unwrap();
    let graph = CommandGraphCodec::new(CommandStubs::new(registry), 64);
    let mut writer = buffer::ByteWriter::new();
    graph.encode(&decoded.tree, &mut writer).unwrap();
    assert_eq!(writer.finish(), frame[1..]);
}
