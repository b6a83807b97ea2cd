//! Namespaced resource identifiers.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{CodecError, CodecResult, ValueReason};

/// Namespace used when an identifier is written without one.
pub const DEFAULT_NAMESPACE: &str = "core";

/// A `namespace:path` resource name.
///
/// Namespaces use `[a-z0-9_.-]`; paths additionally allow `/`. The stored
/// form always carries an explicit namespace.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Identifier {
    full: String,
    split: usize,
}

impl Identifier {
    /// Creates an identifier from its two parts.
    pub fn new(namespace: &str, path: &str) -> CodecResult<Self> {
        if namespace.is_empty()
            || !namespace.bytes().all(valid_namespace_byte)
            || !path.bytes().all(valid_path_byte)
        {
            return Err(invalid(&format!("{namespace}:{path}")));
        }
        Ok(Self {
            full: format!("{namespace}:{path}"),
            split: namespace.len(),
        })
    }

    /// Parses `namespace:path`, or a bare `path` in the default namespace.
    pub fn parse(text: &str) -> CodecResult<Self> {
        match text.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path).map_err(|_| invalid(text)),
            None => Self::new(DEFAULT_NAMESPACE, text),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.full[..self.split]
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.full[self.split + 1..]
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

fn valid_namespace_byte(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-')
}

fn valid_path_byte(b: u8) -> bool {
    valid_namespace_byte(b) || b == b'/'
}

fn invalid(text: &str) -> CodecError {
    CodecError::InvalidValue(ValueReason::InvalidIdentifier {
        text: text.to_owned(),
    })
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

// Comparisons and hashing only look at `full` so that lookups by `&str`
// agree with lookups by `Identifier`.
impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.full == other.full
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full.hash(state);
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.full.cmp(&other.full)
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.full
    }
}

impl FromStr for Identifier {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.full
    }
}
