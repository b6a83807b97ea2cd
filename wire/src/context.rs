//! Shared state every packet codec reads from.

use std::sync::Arc;

use codec::{CodecLimits, CodecResult, Registries, RegistryCodec};

use crate::limits::Limits;

/// Registry snapshot and limits for one protocol session.
///
/// Built once, then cloned cheaply into every connection; the registries are
/// shared behind an [`Arc`] and never mutated.
#[derive(Debug, Clone, Default)]
pub struct WireContext {
    registries: Arc<Registries>,
    codec_limits: CodecLimits,
    limits: Limits,
}

impl WireContext {
    #[must_use]
    pub fn new(registries: impl Into<Arc<Registries>>) -> Self {
        Self {
            registries: registries.into(),
            codec_limits: CodecLimits::default(),
            limits: Limits::default(),
        }
    }

    #[must_use]
    pub fn with_codec_limits(mut self, codec_limits: CodecLimits) -> Self {
        self.codec_limits = codec_limits;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    #[must_use]
    pub const fn codec_limits(&self) -> &CodecLimits {
        &self.codec_limits
    }

    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Codec for the registry named `key`.
    pub fn registry(&self, key: &str) -> CodecResult<RegistryCodec<'_>> {
        RegistryCodec::lookup(&self.registries, key)
    }
}

#[cfg(test)]
mod tests {
    use codec::{encode_to_vec, CodecError, Identifier, Registry};

    use super::*;

    #[test]
    fn registry_lookup() {
        let registries =
            Registries::new().with(Registry::from_names("core:entity_type", ["core:pig"]).unwrap());
        let cx = WireContext::new(registries);

        let codec = cx.registry("core:entity_type").unwrap();
        let pig = Identifier::parse("pig").unwrap();
        assert_eq!(encode_to_vec(&codec, &pig).unwrap(), vec![0]);
    }

    #[test]
    fn missing_registry() {
        let cx = WireContext::default();
        assert!(matches!(
            cx.registry("core:block"),
            Err(CodecError::MissingRegistry { .. })
        ));
    }

    #[test]
    fn clones_share_registries() {
        let cx = WireContext::new(Registries::new());
        let other = cx.clone();
        assert!(Arc::ptr_eq(&cx.registries, &other.registries));
    }
}
