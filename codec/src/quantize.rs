//! Fixed-point transforms for narrow numeric wire fields.
//!
//! Scales and clamp bounds are wire-format constants: both endpoints must use
//! the same values or decoded magnitudes drift.

use buffer::{ByteReader, ByteWriter};
use glam::DVec3;

use crate::codec::Codec;
use crate::error::CodecResult;

/// Clamp, scale and truncate a float into an `i16`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    scale: f64,
    limit: f64,
}

impl Quantizer {
    /// Entity velocity in blocks per tick.
    pub const VELOCITY: Self = Self {
        scale: 8000.0,
        limit: 3.9,
    };

    /// Relative entity movement in blocks.
    pub const POSITION_DELTA: Self = Self {
        scale: 4096.0,
        limit: 32_767.0 / 4096.0,
    };

    /// Creates a quantizer. `limit * scale` must fit in an `i16`.
    #[must_use]
    pub const fn new(scale: f64, limit: f64) -> Self {
        Self { scale, limit }
    }

    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub const fn limit(&self) -> f64 {
        self.limit
    }

    /// Clamps `value` to `[-limit, limit]`. NaN maps to zero.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            0.0
        } else {
            value.max(-self.limit).min(self.limit)
        }
    }

    #[must_use]
    pub fn quantize(&self, value: f64) -> i16 {
        (self.clamp(value) * self.scale) as i16
    }

    #[must_use]
    pub fn dequantize(&self, raw: i16) -> f64 {
        f64::from(raw) / self.scale
    }
}

/// A single quantized scalar carried as a big-endian `i16`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizedCodec {
    quantizer: Quantizer,
}

impl QuantizedCodec {
    #[must_use]
    pub const fn new(quantizer: Quantizer) -> Self {
        Self { quantizer }
    }
}

impl Codec<f64> for QuantizedCodec {
    fn encode(&self, value: &f64, buf: &mut ByteWriter) -> CodecResult<()> {
        buf.write_i16(self.quantizer.quantize(*value));
        Ok(())
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<f64> {
        Ok(self.quantizer.dequantize(buf.read_i16()?))
    }
}

/// Three quantized components, `x`, `y`, `z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizedVec3Codec {
    quantizer: Quantizer,
}

impl QuantizedVec3Codec {
    #[must_use]
    pub const fn new(quantizer: Quantizer) -> Self {
        Self { quantizer }
    }
}

impl Codec<DVec3> for QuantizedVec3Codec {
    fn encode(&self, value: &DVec3, buf: &mut ByteWriter) -> CodecResult<()> {
        for component in value.to_array() {
            buf.write_i16(self.quantizer.quantize(component));
        }
        Ok(())
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<DVec3> {
        let x = self.quantizer.dequantize(buf.read_i16()?);
        let y = self.quantizer.dequantize(buf.read_i16()?);
        let z = self.quantizer.dequantize(buf.read_i16()?);
        Ok(DVec3::new(x, y, z))
    }
}

/// Encodes an angle in degrees as one byte of `256` steps per turn.
#[must_use]
pub fn angle_to_byte(degrees: f32) -> u8 {
    // Saturate into i32 first, then keep the low byte to wrap full turns.
    ((degrees * 256.0 / 360.0).round() as i32) as u8
}

/// Decodes an angle byte into degrees in `[0, 360)`.
#[must_use]
pub fn byte_to_angle(byte: u8) -> f32 {
    f32::from(byte) * 360.0 / 256.0
}

/// A rotation angle in degrees carried as one byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AngleCodec;

impl Codec<f32> for AngleCodec {
    fn encode(&self, value: &f32, buf: &mut ByteWriter) -> CodecResult<()> {
        buf.write_u8(angle_to_byte(*value));
        Ok(())
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<f32> {
        Ok(byte_to_angle(buf.read_u8()?))
    }
}
