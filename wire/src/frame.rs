//! Single-packet frames: a varint packet id followed by the body.

use buffer::{ByteReader, ByteWriter};

use crate::context::WireContext;
use crate::error::{WireError, WireResult};
use crate::packet::Packet;

/// Encodes `packet` as `varint id | body`.
pub fn encode_packet<P: Packet>(cx: &WireContext, packet: &P) -> WireResult<Vec<u8>> {
    let mut writer = ByteWriter::new();
    writer.write_var_u32(P::TYPE.id);
    packet
        .write(cx, &mut writer)
        .map_err(|source| WireError::Encode {
            name: P::NAME,
            source,
        })?;

    cx.limits()
        .check_frame(writer.len())
        .map_err(|actual| WireError::OversizedFrame {
            name: P::NAME,
            limit: cx.limits().max_frame_bytes,
            actual,
        })?;
    Ok(writer.finish())
}

/// Decodes a frame that must carry `P`.
pub fn decode_packet<P: Packet>(cx: &WireContext, frame: &[u8]) -> WireResult<P> {
    cx.limits()
        .check_frame(frame.len())
        .map_err(|actual| WireError::FrameTooLarge {
            limit: cx.limits().max_frame_bytes,
            actual,
        })?;

    let mut reader = ByteReader::new(frame);
    let id = reader.read_var_u32().map_err(WireError::MissingPacketId)?;
    if id != P::TYPE.id {
        return Err(WireError::PacketIdMismatch {
            expected: P::TYPE,
            found: id,
        });
    }
    read_body(cx, &frame[reader.position()..])
}

/// Decodes a complete body, rejecting trailing bytes.
pub(crate) fn read_body<P: Packet>(cx: &WireContext, body: &[u8]) -> WireResult<P> {
    let mut reader = ByteReader::new(body);
    let packet = P::read(cx, &mut reader).map_err(|source| WireError::Decode {
        name: P::NAME,
        source,
    })?;
    if !reader.is_empty() {
        return Err(WireError::TrailingBytes {
            name: P::NAME,
            remaining: reader.remaining(),
        });
    }
    Ok(packet)
}
