//! Composable wire codecs for the simwire protocol.
//!
//! Every packet body is built from a small algebra of codecs: primitive
//! leaves, composite records, lists and options, registry-backed names and
//! polymorphic values, plus three protocol mechanisms built on top of them.
//!
//! # Features
//!
//! - Primitive, composite, list and option codecs
//! - Registry codecs over an immutable [`Registries`] snapshot
//! - Polymorphic codecs dispatching on a registry kind
//! - Action-set codecs for sparse per-action field bundles
//! - Command graph flattening, validation and arena resolution
//! - Fixed-point quantization and bounded blobs
//!
//! # Design Principles
//!
//! - **Codecs are values** - immutable, `Send + Sync`, built once and shared.
//! - **Bounds before allocation** - every decoded length is compared with
//!   its limit before a buffer of that size exists.
//! - **Decode never panics** - hostile input yields a [`CodecError`] with an
//!   [`ErrorClass`] the connection layer can act on.

mod action_set;
mod blob;
mod codec;
mod collection;
mod composite;
mod error;
pub mod graph;
mod identifier;
mod limits;
mod polymorphic;
mod primitive;
mod quantize;
mod registry;

pub use action_set::{
    Action, ActionField, ActionRecord, ActionSet, ActionSetCodec, ActionUpdate,
};
pub use blob::{BlobCodec, BoundedBlob};
pub use codec::{encode_to_vec, Codec, CodecExt, Mapped};
pub use collection::{ListCodec, OptionCodec};
pub use composite::{
    composite1, composite2, composite3, composite4, composite5, composite6, composite7,
    composite8, Composite1, Composite2, Composite3, Composite4, Composite5, Composite6,
    Composite7, Composite8,
};
pub use error::{CodecError, CodecResult, ErrorClass, LimitKind, ValueReason};
pub use graph::{CommandGraphCodec, CommandTree, NodeId, StubCodec};
pub use identifier::{Identifier, DEFAULT_NAMESPACE};
pub use limits::CodecLimits;
pub use polymorphic::{Polymorphic, PolymorphicCodec};
pub use primitive::{
    Bool, IdentifierCodec, StringCodec, UuidCodec, VarInt, VarLong, VarU32, F32, F64, I16, I32,
    I64, I8, MAX_STRING_CHARS, U16, U8,
};
pub use quantize::{
    angle_to_byte, byte_to_angle, AngleCodec, QuantizedCodec, QuantizedVec3Codec, Quantizer,
};
pub use registry::{Registries, Registry, RegistryCodec};

/// Decodes one value from `bytes`, rejecting trailing input.
pub fn decode_exact<T, C: Codec<T>>(codec: &C, bytes: &[u8]) -> CodecResult<T> {
    let mut reader = buffer::ByteReader::new(bytes);
    let value = codec.decode(&mut reader)?;
    if !reader.is_empty() {
        return Err(CodecError::TrailingBytes {
            remaining: reader.remaining(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = CodecLimits::default();
        let _ = Registries::new();
        let _ = StringCodec::default();
        let _ = graph::NodeFlags::empty();
        let _: CodecResult<()> = Ok(());
    }

    #[test]
    fn decode_exact_rejects_trailing_bytes() {
        let err = decode_exact(&U8, &[1, 2]).unwrap_err();
        assert_eq!(err, CodecError::TrailingBytes { remaining: 1 });
        assert_eq!(err.class(), ErrorClass::Structural);
    }

    #[test]
    fn decode_exact_reads_whole_input() {
        let bytes = encode_to_vec(&VarInt, &-1).unwrap();
        assert_eq!(decode_exact(&VarInt, &bytes).unwrap(), -1);
    }
}
