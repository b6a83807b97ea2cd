//! Command argument types and command graph node payloads.
//!
//! Argument types are polymorphic over the
//! [`COMMAND_ARGUMENT_TYPE`](crate::COMMAND_ARGUMENT_TYPE)
//! registry: the registry id selects the kind, and the kind selects the
//! payload that follows.

use buffer::{ByteReader, ByteWriter};
use codec::graph::{NodeFlags, NodeKind};
use codec::{
    Codec, CodecError, CodecResult, Identifier, IdentifierCodec, Polymorphic, PolymorphicCodec,
    Registry, RegistryCodec, StringCodec, StubCodec, ValueReason, VarInt, F32, F64, I32, I64,
};

use crate::flags::{read_flags, write_flags, EntitySelectorFlags, RangeFlags};

/// Longest literal or argument name in a command graph.
pub const MAX_NODE_NAME_CHARS: usize = 32_767;

/// Argument kinds this build understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentKind {
    Bool,
    Float,
    Double,
    Integer,
    Long,
    String,
    Entity,
    Message,
    Resource,
}

impl ArgumentKind {
    /// Every kind, in registry order.
    pub const ALL: &'static [Self] = &[
        Self::Bool,
        Self::Float,
        Self::Double,
        Self::Integer,
        Self::Long,
        Self::String,
        Self::Entity,
        Self::Message,
        Self::Resource,
    ];

    /// Registry name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "core:bool",
            Self::Float => "core:float",
            Self::Double => "core:double",
            Self::Integer => "core:integer",
            Self::Long => "core:long",
            Self::String => "core:string",
            Self::Entity => "core:entity",
            Self::Message => "core:message",
            Self::Resource => "core:resource",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

/// Optional inclusive bounds of a numeric argument.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberRange<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> NumberRange<T> {
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub const fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    fn flags(&self) -> RangeFlags {
        let mut flags = RangeFlags::empty();
        flags.set(RangeFlags::MIN, self.min.is_some());
        flags.set(RangeFlags::MAX, self.max.is_some());
        flags
    }

    /// Writes `flags | [min] | [max]`.
    fn encode<C: Codec<T>>(&self, codec: &C, buf: &mut ByteWriter) -> CodecResult<()> {
        write_flags(self.flags(), buf);
        if let Some(min) = &self.min {
            codec.encode(min, buf)?;
        }
        if let Some(max) = &self.max {
            codec.encode(max, buf)?;
        }
        Ok(())
    }

    fn decode<C: Codec<T>>(codec: &C, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        let flags: RangeFlags = read_flags("number range flags", buf)?;
        let min = if flags.contains(RangeFlags::MIN) {
            Some(codec.decode(buf)?)
        } else {
            None
        };
        let max = if flags.contains(RangeFlags::MAX) {
            Some(codec.decode(buf)?)
        } else {
            None
        };
        Ok(Self { min, max })
    }
}

/// How much input a string argument consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    SingleWord,
    QuotablePhrase,
    GreedyPhrase,
}

impl StringKind {
    const fn to_wire(self) -> i32 {
        match self {
            Self::SingleWord => 0,
            Self::QuotablePhrase => 1,
            Self::GreedyPhrase => 2,
        }
    }

    fn from_wire(value: i32) -> CodecResult<Self> {
        match value {
            0 => Ok(Self::SingleWord),
            1 => Ok(Self::QuotablePhrase),
            2 => Ok(Self::GreedyPhrase),
            other => Err(CodecError::InvalidValue(ValueReason::UnknownVariant {
                kind: "string argument",
                value: other as u32,
            })),
        }
    }
}

/// A command argument parser and its properties.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentType {
    Bool,
    Float(NumberRange<f32>),
    Double(NumberRange<f64>),
    Integer(NumberRange<i32>),
    Long(NumberRange<i64>),
    String(StringKind),
    Entity(EntitySelectorFlags),
    Message,
    /// An entry of the registry named by `registry`.
    Resource { registry: Identifier },
}

impl Polymorphic for ArgumentType {
    type Kind = ArgumentKind;

    fn kind(&self) -> ArgumentKind {
        match self {
            Self::Bool => ArgumentKind::Bool,
            Self::Float(_) => ArgumentKind::Float,
            Self::Double(_) => ArgumentKind::Double,
            Self::Integer(_) => ArgumentKind::Integer,
            Self::Long(_) => ArgumentKind::Long,
            Self::String(_) => ArgumentKind::String,
            Self::Entity(_) => ArgumentKind::Entity,
            Self::Message => ArgumentKind::Message,
            Self::Resource { .. } => ArgumentKind::Resource,
        }
    }

    fn encode_payload(&self, buf: &mut ByteWriter) -> CodecResult<()> {
        match self {
            Self::Bool | Self::Message => Ok(()),
            Self::Float(range) => range.encode(&F32, buf),
            Self::Double(range) => range.encode(&F64, buf),
            Self::Integer(range) => range.encode(&I32, buf),
            Self::Long(range) => range.encode(&I64, buf),
            Self::String(kind) => VarInt.encode(&kind.to_wire(), buf),
            Self::Entity(flags) => {
                write_flags(*flags, buf);
                Ok(())
            }
            Self::Resource { registry } => IdentifierCodec.encode(registry, buf),
        }
    }

    fn decode_payload(kind: &ArgumentKind, buf: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(match kind {
            ArgumentKind::Bool => Self::Bool,
            ArgumentKind::Float => Self::Float(NumberRange::decode(&F32, buf)?),
            ArgumentKind::Double => Self::Double(NumberRange::decode(&F64, buf)?),
            ArgumentKind::Integer => Self::Integer(NumberRange::decode(&I32, buf)?),
            ArgumentKind::Long => Self::Long(NumberRange::decode(&I64, buf)?),
            ArgumentKind::String => Self::String(StringKind::from_wire(VarInt.decode(buf)?)?),
            ArgumentKind::Entity => Self::Entity(read_flags("entity selector flags", buf)?),
            ArgumentKind::Message => Self::Message,
            ArgumentKind::Resource => Self::Resource {
                registry: IdentifierCodec.decode(buf)?,
            },
        })
    }
}

/// Maps [`ArgumentKind`] to its id in one registry snapshot.
///
/// Ids are never assumed: a peer whose registry orders kinds differently
/// still decodes correctly as long as both sides share the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentKindCodec<'r> {
    registry: &'r Registry,
}

impl<'r> ArgumentKindCodec<'r> {
    #[must_use]
    pub const fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }
}

impl Codec<ArgumentKind> for ArgumentKindCodec<'_> {
    fn encode(&self, value: &ArgumentKind, buf: &mut ByteWriter) -> CodecResult<()> {
        let name = Identifier::parse(value.name())?;
        RegistryCodec::new(self.registry).encode(&name, buf)
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<ArgumentKind> {
        let name = RegistryCodec::new(self.registry).decode(buf)?;
        ArgumentKind::from_name(name.as_str()).ok_or(CodecError::InvalidValue(
            ValueReason::UnsupportedKind {
                kind: "command argument type",
                name,
            },
        ))
    }
}

/// Payload of a non-root command node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeStub {
    Literal(String),
    Argument {
        name: String,
        parser: ArgumentType,
        /// Suggestion provider asked for completions, if any.
        suggestions: Option<Identifier>,
    },
}

impl NodeStub {
    #[must_use]
    pub fn literal(name: impl Into<String>) -> Self {
        Self::Literal(name.into())
    }

    #[must_use]
    pub fn argument(name: impl Into<String>, parser: ArgumentType) -> Self {
        Self::Argument {
            name: name.into(),
            parser,
            suggestions: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Literal(name) | Self::Argument { name, .. } => name,
        }
    }
}

/// Stub codec for command graphs, resolving argument kinds through one
/// registry snapshot.
#[derive(Debug, Clone, Copy)]
pub struct CommandStubs<'r> {
    names: StringCodec,
    parsers: PolymorphicCodec<ArgumentKindCodec<'r>>,
}

impl<'r> CommandStubs<'r> {
    #[must_use]
    pub const fn new(argument_types: &'r Registry) -> Self {
        Self {
            names: StringCodec::new(MAX_NODE_NAME_CHARS),
            parsers: PolymorphicCodec::new(ArgumentKindCodec::new(argument_types)),
        }
    }
}

impl StubCodec for CommandStubs<'_> {
    type Stub = NodeStub;

    fn flags(&self, stub: &NodeStub) -> NodeFlags {
        match stub {
            NodeStub::Literal(_) => NodeFlags::LITERAL,
            NodeStub::Argument { suggestions, .. } => {
                let mut flags = NodeFlags::ARGUMENT;
                flags.set(NodeFlags::CUSTOM_SUGGESTIONS, suggestions.is_some());
                flags
            }
        }
    }

    fn encode(&self, stub: &NodeStub, buf: &mut ByteWriter) -> CodecResult<()> {
        match stub {
            NodeStub::Literal(name) => self.names.encode(name, buf),
            NodeStub::Argument {
                name,
                parser,
                suggestions,
            } => {
                self.names.encode(name, buf)?;
                self.parsers.encode(parser, buf)?;
                if let Some(suggestions) = suggestions {
                    IdentifierCodec.encode(suggestions, buf)?;
                }
                Ok(())
            }
        }
    }

    fn decode(&self, flags: NodeFlags, buf: &mut ByteReader<'_>) -> CodecResult<NodeStub> {
        let name = self.names.decode(buf)?;
        if flags.kind() == NodeKind::Literal {
            return Ok(NodeStub::Literal(name));
        }
        let parser = self.parsers.decode(buf)?;
        let suggestions = if flags.contains(NodeFlags::CUSTOM_SUGGESTIONS) {
            Some(IdentifierCodec.decode(buf)?)
        } else {
            None
        };
        Ok(NodeStub::Argument {
            name,
            parser,
            suggestions,
        })
    }
}
