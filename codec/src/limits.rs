//! Limits for codec-level decoding.

/// Codec-specific limits enforced while decoding packet bodies.
///
/// Per-field bounds (string lengths, blob sizes) are wire-format constants
/// carried by the field codecs themselves; these limits cap the
/// connection-wide counts that drive allocations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodecLimits {
    /// Maximum number of elements in a list field.
    pub max_list_len: usize,
    /// Maximum number of entries in a command graph.
    pub max_graph_nodes: usize,
    /// Maximum number of records in an action-set packet.
    pub max_action_records: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_list_len: 65_536,
            max_graph_nodes: 32_768,
            max_action_records: 4096,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_list_len: 64,
            max_graph_nodes: 64,
            max_action_records: 16,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_list_len: usize::MAX,
            max_graph_nodes: usize::MAX,
            max_action_records: usize::MAX,
        }
    }

    /// Returns the effective bound for a list field declared with `field_max`.
    #[must_use]
    pub fn list_bound(&self, field_max: usize) -> usize {
        field_max.min(self.max_list_len)
    }
}
