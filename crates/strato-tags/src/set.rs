use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TagError;
use crate::policy::{DefaultTags, IgnoreTags};

/// Reserved prefix for system-managed tags on AWS resources.
pub const AWS_TAG_KEY_PREFIX: &str = "aws:";

/// Where a tag entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Declared directly on the resource.
    Explicit,
    /// Merged in from provider-level default tags.
    DefaultConfig,
}

/// A single tag entry. A key carrying no value is legal and distinct from
/// the key being absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagValue {
    pub value: Option<String>,
    pub provenance: Provenance,
}

impl TagValue {
    pub fn explicit(value: Option<String>) -> Self {
        Self {
            value,
            provenance: Provenance::Explicit,
        }
    }
}

/// Logical representation of a resource's tags: a mapping from unique,
/// non-empty, case-sensitive keys to optional values.
///
/// Never mutated in place; every operation returns a new set. Backed by a
/// `BTreeMap` so iteration order is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyValueTagSet {
    pub(crate) entries: BTreeMap<String, TagValue>,
}

impl KeyValueTagSet {
    /// Validated constructor. Rejects empty keys at the boundary; all entries
    /// are marked as explicitly declared.
    pub fn new<I>(pairs: I) -> Result<Self, TagError>
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        let mut entries = BTreeMap::new();
        for (key, value) in pairs {
            if key.is_empty() {
                return Err(TagError::EmptyKey);
            }
            entries.insert(key, TagValue::explicit(value));
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Projection to a plain key→value mapping. Entries without a value are
    /// omitted; filtering them out is the caller's responsibility.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.value.as_ref().map(|value| (k.clone(), value.clone())))
            .collect()
    }

    /// Entries of `self` whose key is absent from `other` or present with a
    /// different value. Carries `self`'s values.
    pub fn difference(&self, other: &Self) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(k, v)| other.entries.get(*k).map(|o| &o.value) != Some(&v.value))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { entries }
    }

    /// Entries of `self` whose key is absent from `new`.
    pub fn removed(&self, new: &Self) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(k, _)| !new.entries.contains_key(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { entries }
    }

    /// Entries of `new` that are absent from `self` or present with a
    /// different value. Carries the `new` values.
    pub fn updated(&self, new: &Self) -> Self {
        let entries = new
            .entries
            .iter()
            .filter(|(k, v)| self.entries.get(*k).map(|old| &old.value) != Some(&v.value))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { entries }
    }

    /// Drops entries carrying the reserved `aws:` system prefix.
    pub fn ignore_aws(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(k, _)| !k.starts_with(AWS_TAG_KEY_PREFIX))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { entries }
    }

    /// Drops entries matching the user-configured ignore rules.
    pub fn ignore_config(&self, config: &IgnoreTags) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(k, _)| !config.matches(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { entries }
    }

    /// Drops entries whose key and value both match the provider-level
    /// default tags, leaving only what was declared on the resource itself.
    pub fn remove_default_config(&self, defaults: &DefaultTags) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(k, v)| defaults.get(k).map(|d| &d.value) != Some(&v.value))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { entries }
    }
}

/// Value-for-value equality; provenance is not compared.
impl PartialEq for KeyValueTagSet {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.entries.get(k).map(|o| &o.value) == Some(&v.value))
    }
}

impl Eq for KeyValueTagSet {}
