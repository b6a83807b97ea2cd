//! Byte reader with bounded operations.

use crate::error::{BufError, BufResult};

/// Maximum encoded size of a 32-bit varint.
pub const VARINT_MAX_BYTES: usize = 5;

/// Maximum encoded size of a 64-bit varint.
pub const VARLONG_MAX_BYTES: usize = 10;

/// A byte reader for decoding wire data.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input and never allocates: slices and
/// strings are borrowed from the underlying buffer.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Reads a `u8`.
    pub fn read_u8(&mut self) -> BufResult<u8> {
        let [value] = self.read_array::<1>()?;
        Ok(value)
    }

    /// Reads an `i8`.
    pub fn read_i8(&mut self) -> BufResult<i8> {
        Ok(i8::from_be_bytes(self.read_array::<1>()?))
    }

    /// Reads a boolean byte; only `0` and `1` are accepted.
    pub fn read_bool(&mut self) -> BufResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(BufError::InvalidBool { value }),
        }
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16(&mut self) -> BufResult<u16> {
        Ok(u16::from_be_bytes(self.read_array::<2>()?))
    }

    /// Reads a big-endian `i16`.
    pub fn read_i16(&mut self) -> BufResult<i16> {
        Ok(i16::from_be_bytes(self.read_array::<2>()?))
    }

    /// Reads a big-endian `i32`.
    pub fn read_i32(&mut self) -> BufResult<i32> {
        Ok(i32::from_be_bytes(self.read_array::<4>()?))
    }

    /// Reads a big-endian `i64`.
    pub fn read_i64(&mut self) -> BufResult<i64> {
        Ok(i64::from_be_bytes(self.read_array::<8>()?))
    }

    /// Reads a big-endian `u64`.
    pub fn read_u64(&mut self) -> BufResult<u64> {
        Ok(u64::from_be_bytes(self.read_array::<8>()?))
    }

    /// Reads a big-endian `u128`.
    pub fn read_u128(&mut self) -> BufResult<u128> {
        Ok(u128::from_be_bytes(self.read_array::<16>()?))
    }

    /// Reads a big-endian IEEE-754 `f32`.
    pub fn read_f32(&mut self) -> BufResult<f32> {
        Ok(f32::from_be_bytes(self.read_array::<4>()?))
    }

    /// Reads a big-endian IEEE-754 `f64`.
    pub fn read_f64(&mut self) -> BufResult<f64> {
        Ok(f64::from_be_bytes(self.read_array::<8>()?))
    }

    /// Reads a varint `u32` (at most 5 bytes).
    pub fn read_var_u32(&mut self) -> BufResult<u32> {
        let mut result = 0u32;
        for shift in (0..35).step_by(7) {
            let byte = self.read_u8()?;
            result |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(BufError::InvalidVarint {
            max_bytes: VARINT_MAX_BYTES,
        })
    }

    /// Reads a varint `i32`, reinterpreting the 32 payload bits as two's complement.
    pub fn read_var_i32(&mut self) -> BufResult<i32> {
        Ok(self.read_var_u32()? as i32)
    }

    /// Reads a varint `u64` (at most 10 bytes).
    pub fn read_var_u64(&mut self) -> BufResult<u64> {
        let mut result = 0u64;
        for shift in (0..70).step_by(7) {
            let byte = self.read_u8()?;
            result |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(BufError::InvalidVarint {
            max_bytes: VARLONG_MAX_BYTES,
        })
    }

    /// Reads a varint `i64`, reinterpreting the 64 payload bits as two's complement.
    pub fn read_var_i64(&mut self) -> BufResult<i64> {
        Ok(self.read_var_u64()? as i64)
    }

    /// Reads a varint length and checks it against `max`.
    ///
    /// The bound is checked before the payload is touched, so a hostile
    /// length never drives an allocation.
    pub fn read_len(&mut self, max: usize) -> BufResult<usize> {
        let length = self.read_var_u32()? as usize;
        if length > max {
            return Err(BufError::LengthExceeded { length, max });
        }
        Ok(length)
    }

    /// Reads exactly `len` bytes as a borrowed slice.
    pub fn read_bytes(&mut self, len: usize) -> BufResult<&'a [u8]> {
        self.ensure_bytes(len)?;
        let start = self.pos;
        self.pos += len;
        Ok(&self.data[start..self.pos])
    }

    /// Reads a varint-length-prefixed byte slice of at most `max` bytes.
    pub fn read_byte_array(&mut self, max: usize) -> BufResult<&'a [u8]> {
        let len = self.read_len(max)?;
        self.read_bytes(len)
    }

    /// Reads a varint-length-prefixed UTF-8 string of at most `max_bytes` bytes.
    pub fn read_str(&mut self, max_bytes: usize) -> BufResult<&'a str> {
        let bytes = self.read_byte_array(max_bytes)?;
        std::str::from_utf8(bytes).map_err(|_| BufError::InvalidUtf8)
    }

    /// Reads a fixed-width bit set of `bits` bits (at most 64).
    ///
    /// The set occupies `ceil(bits / 8)` bytes; bit `i` lives in byte `i / 8`
    /// at mask `1 << (i % 8)`. Bits at or beyond `bits` in the final byte are
    /// returned as-is so the caller can reject them.
    pub fn read_fixed_bitset(&mut self, bits: usize) -> BufResult<u64> {
        debug_assert!(bits <= 64, "fixed bit sets are limited to 64 bits");
        let bytes = self.read_bytes(bits.div_ceil(8))?;
        let mut value = 0u64;
        for (idx, byte) in bytes.iter().enumerate() {
            value |= u64::from(*byte) << (idx * 8);
        }
        Ok(value)
    }

    fn ensure_bytes(&self, len: usize) -> BufResult<()> {
        let available = self.remaining();
        if len > available {
            return Err(BufError::UnexpectedEof {
                requested: len,
                available,
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> BufResult<[u8; N]> {
        self.ensure_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }
}
