//! Bounded byte reader and writer primitives for the simwire protocol.
//!
//! This crate provides [`ByteWriter`] and [`ByteReader`]: fixed-width
//! integers and floats (big-endian), varints, length-prefixed strings and byte
//! arrays, and fixed-width bit sets.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked; declared lengths are
//!   checked against a caller bound before the payload is touched.
//! - **No allocation on read** - Slices and strings are borrowed from the input.
//! - **No domain knowledge** - This crate knows nothing about packets or game state.
//!
//! # Example
//!
//! ```
//! use buffer::{ByteReader, ByteWriter};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_var_u32(300);
//! writer.write_str("hello");
//!
//! let bytes = writer.finish();
//!
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_var_u32().unwrap(), 300);
//! assert_eq!(reader.read_str(16).unwrap(), "hello");
//! ```

mod error;
mod reader;
mod writer;

pub use error::{BufError, BufResult};
pub use reader::{ByteReader, VARINT_MAX_BYTES, VARLONG_MAX_BYTES};
pub use writer::{var_u32_len, ByteWriter};
