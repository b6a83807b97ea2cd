//! Concrete simwire packets and the handler traits that receive them.
//!
//! Packet tables are built once per direction with [`clientbound_packets`]
//! and [`serverbound_packets`]; a connection feeds frames to
//! [`PacketSet::dispatch`](wire::PacketSet::dispatch), which decodes each
//! packet and calls the matching handler method.
//!
//! ```
//! use protocol::{builtin_registries, clientbound::KeepAlive, serverbound_packets};
//! use wire::WireContext;
//!
//! let cx = WireContext::new(builtin_registries().unwrap());
//! let table = serverbound_packets().unwrap();
//! assert_eq!(table.len(), 4);
//! # let _ = (cx, KeepAlive { id: 1 });
//! ```
//!
//! # Design Principles
//!
//! - **Registry-typed fields** - entity kinds and argument parsers travel as
//!   ids of the connection's registry snapshot, never as fixed constants.
//! - **Quantized motion** - velocities, relative moves and angles use fixed
//!   wire scales shared by both endpoints.
//! - **Closed flag bytes** - unassigned bits in a flag byte fail decoding.

pub mod argument;
pub mod clientbound;
mod flags;
mod registries;
pub mod serverbound;

pub use argument::{
    ArgumentKind, ArgumentKindCodec, ArgumentType, CommandStubs, NodeStub, NumberRange,
    StringKind, MAX_NODE_NAME_CHARS,
};
pub use clientbound::{clientbound_packets, ClientboundHandler};
pub use flags::{EntitySelectorFlags, MoveFlags, MovePlayerFlags, RangeFlags};
pub use registries::{
    builtin_argument_registry, builtin_entity_registry, builtin_registries,
    COMMAND_ARGUMENT_TYPE, ENTITY_TYPE,
};
pub use serverbound::{serverbound_packets, ServerboundHandler};
