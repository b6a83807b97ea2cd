//! Registry keys and the snapshots this build ships with.

use codec::{CodecResult, Registries, Registry};

use crate::argument::ArgumentKind;

/// Kinds of entity, referenced by [`AddEntity`](crate::clientbound::AddEntity).
pub const ENTITY_TYPE: &str = "core:entity_type";

/// Command argument parsers, referenced by command graph argument nodes.
pub const COMMAND_ARGUMENT_TYPE: &str = "core:command_argument_type";

const BUILTIN_ENTITY_TYPES: &[&str] = &[
    "core:player",
    "core:item",
    "core:arrow",
    "core:pig",
    "core:cow",
    "core:zombie",
    "core:minecart",
];

/// Registry of every command argument kind this build can decode, in
/// declaration order.
pub fn builtin_argument_registry() -> CodecResult<Registry> {
    Registry::from_names(
        COMMAND_ARGUMENT_TYPE,
        ArgumentKind::ALL.iter().map(|kind| kind.name()),
    )
}

/// Registry of the built-in entity kinds.
pub fn builtin_entity_registry() -> CodecResult<Registry> {
    Registry::from_names(ENTITY_TYPE, BUILTIN_ENTITY_TYPES.iter().copied())
}

/// Snapshot holding every built-in registry.
pub fn builtin_registries() -> CodecResult<Registries> {
    Ok(Registries::new()
        .with(builtin_argument_registry()?)
        .with(builtin_entity_registry()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_registry_matches_kinds() {
        let registry = builtin_argument_registry().unwrap();
        assert_eq!(registry.len(), ArgumentKind::ALL.len());
        for (id, kind) in (0u32..).zip(ArgumentKind::ALL) {
            assert_eq!(registry.id_of(kind.name()), Some(id));
        }
    }

    #[test]
    fn builtin_snapshot_has_both_registries() {
        let registries = builtin_registries().unwrap();
        assert!(registries.get(ENTITY_TYPE).is_some());
        assert!(registries.get(COMMAND_ARGUMENT_TYPE).is_some());
        assert_eq!(
            registries.require(ENTITY_TYPE).unwrap().id_of("core:pig"),
            Some(3)
        );
    }
}
