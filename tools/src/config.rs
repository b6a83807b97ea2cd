//! JSON configuration for the tools: limits plus an optional registry
//! snapshot.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use codec::{CodecLimits, Registries, Registry};
use serde::{Deserialize, Serialize};
use wire::{Limits, WireContext};

/// Everything a tool needs to build a [`WireContext`].
///
/// Every field is optional in JSON. Without `registries` the built-in
/// snapshot is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub limits: Limits,
    pub codec_limits: CodecLimits,
    pub registries: Vec<RegistryConfig>,
}

/// One registry, entries listed in id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub key: String,
    pub entries: Vec<String>,
}

impl ToolConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parse config json")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Builds the registry snapshot this config describes.
    pub fn registries(&self) -> Result<Registries> {
        if self.registries.is_empty() {
            return protocol::builtin_registries().context("build built-in registries");
        }
        let mut registries = Registries::new();
        for entry in &self.registries {
            let registry =
                Registry::from_names(&entry.key, entry.entries.iter().map(String::as_str))
                    .with_context(|| format!("registry {}", entry.key))?;
            registries.insert(registry);
        }
        Ok(registries)
    }

    pub fn context(&self) -> Result<WireContext> {
        Ok(WireContext::new(self.registries()?)
            .with_limits(self.limits.clone())
            .with_codec_limits(self.codec_limits.clone()))
    }
}
