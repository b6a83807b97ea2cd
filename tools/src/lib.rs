//! Inspection and fingerprinting tools for simwire frames.
//!
//! - Decode a captured frame and print the packet it carries
//! - List the packet tables of both directions
//! - Print the fingerprints peers compare before exchanging packets
//!
//! # Design Principles
//!
//! - **Same code path as a connection** - frames are decoded through the real
//!   packet tables, so a report shows exactly what a peer would see.
//! - **Human-readable output** - pretty text by default, JSON on request.

mod config;
mod inspect;

pub use config::{RegistryConfig, ToolConfig};
pub use inspect::{
    fingerprints, format_report, inspect_frame, packet_rows, Fingerprints, InspectReport, Outcome,
    PacketRow,
};
