//! Packet identity, packet tables and handler dispatch for simwire.
//!
//! A frame is a varint packet id followed by the packet body. Each direction
//! has its own [`PacketSet`], built once at startup, which maps ids to
//! packets and hands every decoded packet to exactly one handler method.
//!
//! # Design Principles
//!
//! - **Double dispatch** - packets call their own handler method, so the
//!   transport boundary never matches on packet kinds.
//! - **Immutable tables** - duplicate ids and wrong-direction packets are
//!   rejected while building, never at runtime.
//! - **Bounded decoding** - frame size is checked before the id is read and
//!   trailing bytes after a body are an error.

mod context;
mod error;
mod frame;
mod hash;
mod limits;
mod packet;
mod set;

pub use context::WireContext;
pub use error::{WireError, WireResult};
pub use frame::{decode_packet, encode_packet};
pub use hash::{packet_set_fingerprint, registries_fingerprint};
pub use limits::Limits;
pub use packet::{Direction, Packet, PacketType};
pub use set::{Dispatched, Load, PacketInfo, PacketSet, PacketSetBuilder};
