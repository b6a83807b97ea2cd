//! Deterministic fingerprints of packet tables and registry snapshots.
//!
//! Two endpoints built from different protocol revisions disagree on at
//! least one fingerprint, which they can compare before exchanging packets.

use blake3::Hasher;
use codec::Registries;

use crate::set::PacketSet;

/// Hashes every packet's direction, id, name and skippability.
pub fn packet_set_fingerprint<H: ?Sized>(set: &PacketSet<H>) -> u64 {
    let mut hasher = Hasher::new();
    write_u8(&mut hasher, set.direction().tag());
    write_u32(&mut hasher, set.len() as u32);

    for info in set.iter() {
        write_u32(&mut hasher, info.packet_type.id);
        write_str(&mut hasher, info.name);
        write_u8(&mut hasher, u8::from(info.skippable));
    }

    finish(&hasher)
}

/// Hashes every registry key and its entries in id order.
pub fn registries_fingerprint(registries: &Registries) -> u64 {
    let mut hasher = Hasher::new();
    write_u32(&mut hasher, registries.len() as u32);

    for registry in registries.iter() {
        write_str(&mut hasher, registry.key().as_str());
        write_u32(&mut hasher, registry.len() as u32);
        for (id, name) in registry.iter() {
            write_u32(&mut hasher, id);
            write_str(&mut hasher, name.as_str());
        }
    }

    finish(&hasher)
}

fn finish(hasher: &Hasher) -> u64 {
    let hash = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}
