//! Registry snapshots and the registry codec.
//!
//! A [`Registry`] maps an open set of names (entity kinds, argument parsers)
//! to compact ids. Snapshots are built explicitly and passed to codecs; there
//! is no process-wide registry state.

use std::collections::{BTreeMap, HashMap};

use buffer::{ByteReader, ByteWriter};

use crate::codec::Codec;
use crate::error::{CodecError, CodecResult};
use crate::identifier::Identifier;

/// An immutable, injective `name <-> id` mapping.
///
/// Ids are assigned densely in insertion order starting at `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    key: Identifier,
    entries: Vec<Identifier>,
    ids: HashMap<Identifier, u32>,
}

impl Registry {
    /// Builds a registry, rejecting duplicate names.
    pub fn new(key: Identifier, entries: impl IntoIterator<Item = Identifier>) -> CodecResult<Self> {
        let entries: Vec<Identifier> = entries.into_iter().collect();
        let mut ids = HashMap::with_capacity(entries.len());
        for (entry, id) in entries.iter().zip(0u32..) {
            if ids.insert(entry.clone(), id).is_some() {
                return Err(CodecError::DuplicateRegistryEntry {
                    registry: key,
                    value: entry.clone(),
                });
            }
        }
        Ok(Self { key, entries, ids })
    }

    /// Builds a registry from textual names.
    pub fn from_names<'a>(key: &str, names: impl IntoIterator<Item = &'a str>) -> CodecResult<Self> {
        let key = Identifier::parse(key)?;
        let entries = names
            .into_iter()
            .map(Identifier::parse)
            .collect::<CodecResult<Vec<_>>>()?;
        Self::new(key, entries)
    }

    #[must_use]
    pub const fn key(&self) -> &Identifier {
        &self.key
    }

    /// Returns the id of `name`, if registered.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    /// Returns the name registered under `id`.
    #[must_use]
    pub fn lookup(&self, id: u32) -> Option<&Identifier> {
        self.entries.get(id as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Identifier)> + '_ {
        self.entries.iter().zip(0u32..).map(|(name, id)| (id, name))
    }
}

/// A set of registries keyed by registry name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registries {
    by_key: BTreeMap<Identifier, Registry>,
}

impl Registries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `registry`, replacing any previous registry with the same key.
    #[must_use]
    pub fn with(mut self, registry: Registry) -> Self {
        self.insert(registry);
        self
    }

    pub fn insert(&mut self, registry: Registry) {
        self.by_key.insert(registry.key().clone(), registry);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Registry> {
        self.by_key.get(key)
    }

    /// Returns the registry for `key` or a [`CodecError::MissingRegistry`].
    pub fn require(&self, key: &str) -> CodecResult<&Registry> {
        self.get(key).ok_or_else(|| CodecError::MissingRegistry {
            registry: key.to_owned(),
        })
    }

    /// Iterates registries in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Registry> + '_ {
        self.by_key.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Encodes an [`Identifier`] as its varint id in one registry.
#[derive(Debug, Clone, Copy)]
pub struct RegistryCodec<'r> {
    registry: &'r Registry,
}

impl<'r> RegistryCodec<'r> {
    #[must_use]
    pub const fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Looks up `key` in `registries` and builds a codec for it.
    pub fn lookup(registries: &'r Registries, key: &str) -> CodecResult<Self> {
        registries.require(key).map(Self::new)
    }
}

impl Codec<Identifier> for RegistryCodec<'_> {
    fn encode(&self, value: &Identifier, buf: &mut ByteWriter) -> CodecResult<()> {
        let id = self
            .registry
            .id_of(value.as_str())
            .ok_or_else(|| CodecError::UnregisteredValue {
                registry: self.registry.key().clone(),
                value: value.clone(),
            })?;
        buf.write_var_u32(id);
        Ok(())
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<Identifier> {
        let id = buf.read_var_u32()?;
        self.registry
            .lookup(id)
            .cloned()
            .ok_or_else(|| CodecError::UnknownRegistryId {
                registry: self.registry.key().clone(),
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_to_vec;

    fn entity_types() -> Registry {
        Registry::from_names(
            "core:entity_type",
            ["core:player", "core:zombie", "core:arrow"],
        )
        .unwrap()
    }

    #[test]
    fn ids_follow_insertion_order() {
        let registry = entity_types();
        assert_eq!(registry.id_of("core:player"), Some(0));
        assert_eq!(registry.id_of("core:arrow"), Some(2));
        assert_eq!(registry.lookup(1).unwrap().as_str(), "core:zombie");
        assert_eq!(registry.lookup(3), None);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Registry::from_names("core:entity_type", ["core:a", "core:a"]).unwrap_err();
        assert!(matches!(err, CodecError::DuplicateRegistryEntry { .. }));
    }

    #[test]
    fn registry_codec_roundtrip() {
        let registry = entity_types();
        let codec = RegistryCodec::new(&registry);
        let zombie = Identifier::parse("core:zombie").unwrap();
        let bytes = encode_to_vec(&codec, &zombie).unwrap();
        assert_eq!(bytes, vec![1]);
        assert_eq!(codec.decode(&mut ByteReader::new(&bytes)).unwrap(), zombie);
    }

    #[test]
    fn unknown_id_is_a_decode_error() {
        let registry = entity_types();
        let codec = RegistryCodec::new(&registry);
        let err = codec.decode(&mut ByteReader::new(&[42])).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnknownRegistryId {
                registry: Identifier::parse("core:entity_type").unwrap(),
                id: 42
            }
        );
    }

    #[test]
    fn unregistered_value_is_an_encode_error() {
        let registry = entity_types();
        let codec = RegistryCodec::new(&registry);
        let err = encode_to_vec(&codec, &Identifier::parse("core:ghast").unwrap()).unwrap_err();
        assert!(matches!(err, CodecError::UnregisteredValue { .. }));
    }

    #[test]
    fn registries_lookup_by_key() {
        let registries = Registries::new().with(entity_types());
        assert!(RegistryCodec::lookup(&registries, "core:entity_type").is_ok());
        let err = RegistryCodec::lookup(&registries, "core:block").unwrap_err();
        assert!(matches!(err, CodecError::MissingRegistry { .. }));
    }
}
