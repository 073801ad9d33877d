use serde::{Deserialize, Serialize};

use crate::set::{KeyValueTagSet, TagValue};

/// The neutral wire record: one key/value pair as remote tagging APIs speak
/// them. The per-service SDK type mapping lives in the adapter crates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTag {
    pub key: String,
    pub value: Option<String>,
}

impl WireTag {
    pub fn new(key: impl Into<String>, value: impl Into<Option<String>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl KeyValueTagSet {
    /// Decodes a wire tag list. Duplicate keys are last-write-wins: some
    /// backing APIs legally return duplicates during eventual-consistency
    /// windows, and the later entry is the fresher one. Entries with an
    /// empty key are dropped rather than failing the whole read.
    pub fn from_wire<I>(tags: I) -> Self
    where
        I: IntoIterator<Item = WireTag>,
    {
        let mut set = Self::default();
        for tag in tags {
            if tag.key.is_empty() {
                tracing::warn!("dropping wire tag with empty key");
                continue;
            }
            set.entries.insert(tag.key, TagValue::explicit(tag.value));
        }
        set
    }

    /// Encodes to one wire record per key, in map iteration order. Order is
    /// not semantically significant to remote APIs.
    pub fn to_wire(&self) -> Vec<WireTag> {
        self.entries
            .iter()
            .map(|(k, v)| WireTag::new(k.clone(), v.value.clone()))
            .collect()
    }
}
