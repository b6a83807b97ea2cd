//! Benchmarks for frame encoding and dispatch.
//!
//! Run with: cargo bench --package simwire-protocol --bench protocol_bench

use codec::{ActionRecord, ActionSet, ActionUpdate, CommandTree};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use glam::DVec3;
use protocol::clientbound::{
    AddEntity, BiomeBlob, ChunkBiomeData, ChunkBiomes, Commands, Disconnect, KeepAlive,
    MoveEntityPos, PlayerInfoAction, PlayerInfoField, PlayerInfoRemove, PlayerInfoUpdate,
    RotateHead, SetEntityMotion,
};
use protocol::{
    builtin_registries, clientbound_packets, ArgumentType, ClientboundHandler, MoveFlags,
    NodeStub, NumberRange, StringKind,
};
use uuid::Uuid;
use wire::{encode_packet, Load, WireContext};

/// Counts packets without keeping them.
#[derive(Default)]
struct Sink {
    packets: usize,
}

impl ClientboundHandler for Sink {
    fn keep_alive(&mut self, _packet: KeepAlive) {
        self.packets += 1;
    }
    fn disconnect(&mut self, _packet: Disconnect) {
        self.packets += 1;
    }
    fn add_entity(&mut self, packet: AddEntity) {
        black_box(packet);
        self.packets += 1;
    }
    fn set_entity_motion(&mut self, packet: SetEntityMotion) {
        black_box(packet);
        self.packets += 1;
    }
    fn move_entity_pos(&mut self, packet: MoveEntityPos) {
        black_box(packet);
        self.packets += 1;
    }
    fn rotate_head(&mut self, _packet: RotateHead) {
        self.packets += 1;
    }
    fn chunk_biomes(&mut self, packet: ChunkBiomes) {
        black_box(packet);
        self.packets += 1;
    }
    fn commands(&mut self, packet: Commands) {
        black_box(packet);
        self.packets += 1;
    }
    fn player_info_update(&mut self, packet: PlayerInfoUpdate) {
        black_box(packet);
        self.packets += 1;
    }
    fn player_info_remove(&mut self, _packet: PlayerInfoRemove) {
        self.packets += 1;
    }
}

fn context() -> WireContext {
    WireContext::new(builtin_registries().unwrap())
}

/// A command tree with `commands` literals, each taking an integer and a
/// greedy string, plus one alias redirecting to the root.
fn wide_tree(commands: usize) -> CommandTree<NodeStub> {
    let mut tree = CommandTree::new();
    let root = tree.root();
    for i in 0..commands {
        let literal = tree.add_child(root, NodeStub::literal(format!("command{i}")));
        let amount = tree.add_child(
            literal,
            NodeStub::argument(
                "amount",
                ArgumentType::Integer(NumberRange::new(Some(0), Some(64))),
            ),
        );
        let text = tree.add_child(
            amount,
            NodeStub::argument("text", ArgumentType::String(StringKind::GreedyPhrase)),
        );
        tree.set_executable(text, true);
    }
    let execute = tree.add_child(root, NodeStub::literal("execute"));
    tree.set_redirect(execute, root);
    tree
}

fn benchmark_entity_motion(c: &mut Criterion) {
    let cx = context();
    let table = clientbound_packets().unwrap();
    let mut group = c.benchmark_group("entity_motion");
    group.throughput(Throughput::Elements(1024));

    group.bench_function("encode_1024", |b| {
        b.iter(|| {
            for i in 0..1024 {
                let packet = MoveEntityPos {
                    entity_id: i,
                    delta: DVec3::new(0.1, -0.05, 0.2),
                    flags: MoveFlags::ON_GROUND,
                };
                black_box(encode_packet(&cx, &packet).unwrap());
            }
        });
    });

    let frames: Vec<Vec<u8>> = (0..1024)
        .map(|i| {
            let packet = SetEntityMotion {
                entity_id: i,
                velocity: DVec3::new(0.5, 0.0, -0.5),
            };
            encode_packet(&cx, &packet).unwrap()
        })
        .collect();
    group.bench_function("dispatch_1024", |b| {
        b.iter(|| {
            let mut sink = Sink::default();
            for frame in &frames {
                table
                    .dispatch(&cx, frame, &mut sink, Load::Normal)
                    .unwrap();
            }
            black_box(sink.packets)
        });
    });

    group.finish();
}

fn benchmark_spawns(c: &mut Criterion) {
    let cx = context();
    let table = clientbound_packets().unwrap();
    let packet = AddEntity {
        entity_id: 7,
        uuid: Uuid::from_u128(7),
        kind: codec::Identifier::parse("core:zombie").unwrap(),
        position: DVec3::new(100.5, 64.0, -20.5),
        pitch: 0.0,
        yaw: 270.0,
        head_yaw: 270.0,
        data: 0,
        velocity: DVec3::ZERO,
    };
    let frame = encode_packet(&cx, &packet).unwrap();

    c.bench_function("add_entity_roundtrip", |b| {
        b.iter(|| {
            let frame = encode_packet(&cx, black_box(&packet)).unwrap();
            let mut sink = Sink::default();
            table
                .dispatch(&cx, &frame, &mut sink, Load::Normal)
                .unwrap();
        });
    });

    c.bench_function("add_entity_dispatch", |b| {
        let mut sink = Sink::default();
        b.iter(|| {
            table
                .dispatch(&cx, black_box(&frame), &mut sink, Load::Normal)
                .unwrap();
        });
    });
}

fn benchmark_command_graph(c: &mut Criterion) {
    let cx = context();
    let table = clientbound_packets().unwrap();
    let mut group = c.benchmark_group("command_graph");

    for commands in [16usize, 256] {
        let packet = Commands {
            tree: wide_tree(commands),
        };
        let frame = encode_packet(&cx, &packet).unwrap();
        group.throughput(Throughput::Bytes(frame.len() as u64));

        group.bench_function(format!("encode_{commands}"), |b| {
            b.iter(|| black_box(encode_packet(&cx, &packet).unwrap()));
        });
        group.bench_function(format!("decode_resolve_{commands}"), |b| {
            let mut sink = Sink::default();
            b.iter(|| {
                table
                    .dispatch(&cx, black_box(&frame), &mut sink, Load::Normal)
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn benchmark_bulk(c: &mut Criterion) {
    let cx = context();
    let table = clientbound_packets().unwrap();
    let mut group = c.benchmark_group("bulk");
    group.sample_size(20);

    let biomes = ChunkBiomes {
        chunks: (0..64)
            .map(|i| ChunkBiomeData {
                x: i % 8,
                z: i / 8,
                data: BiomeBlob::try_new(vec![0x11; 4096]).unwrap(),
            })
            .collect(),
    };
    let biome_frame = encode_packet(&cx, &biomes).unwrap();
    group.throughput(Throughput::Bytes(biome_frame.len() as u64));
    group.bench_function("chunk_biomes_64", |b| {
        let mut sink = Sink::default();
        b.iter(|| {
            table
                .dispatch(&cx, black_box(&biome_frame), &mut sink, Load::Normal)
                .unwrap();
        });
    });

    let actions: ActionSet<PlayerInfoAction> = [
        PlayerInfoAction::UpdateLatency,
        PlayerInfoAction::UpdateListed,
    ]
    .into_iter()
    .collect();
    let records = (0..256u128)
        .map(|i| {
            ActionRecord::new(Uuid::from_u128(i))
                .with(PlayerInfoField::UpdateLatency(40 + i as i32))
                .with(PlayerInfoField::UpdateListed(true))
        })
        .collect();
    let info = PlayerInfoUpdate {
        update: ActionUpdate::new(actions, records).unwrap(),
    };
    let info_frame = encode_packet(&cx, &info).unwrap();
    group.throughput(Throughput::Elements(256));
    group.bench_function("player_info_256", |b| {
        let mut sink = Sink::default();
        b.iter(|| {
            table
                .dispatch(&cx, black_box(&info_frame), &mut sink, Load::Normal)
                .unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_entity_motion,
    benchmark_spawns,
    benchmark_command_graph,
    benchmark_bulk
);
criterion_main!(benches);
