use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::set::{KeyValueTagSet, Provenance, TagValue};

/// Provider-level default tags, merged into every resource's declared tags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultTags {
    tags: KeyValueTagSet,
}

impl DefaultTags {
    pub fn new(tags: KeyValueTagSet) -> Self {
        Self { tags }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    /// Overlays `explicit` on the defaults. On key collision the explicit
    /// entry wins; surviving default entries are marked with
    /// default-config provenance.
    pub fn merge(&self, explicit: &KeyValueTagSet) -> KeyValueTagSet {
        let mut entries: BTreeMap<String, TagValue> = self
            .tags
            .entries
            .iter()
            .map(|(k, v)| {
                (
                    k.clone(),
                    TagValue {
                        value: v.value.clone(),
                        provenance: Provenance::DefaultConfig,
                    },
                )
            })
            .collect();
        for (k, v) in &explicit.entries {
            entries.insert(k.clone(), v.clone());
        }
        KeyValueTagSet { entries }
    }
}

/// User-configured tag exclusions: exact keys and key prefixes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IgnoreTags {
    keys: BTreeSet<String>,
    key_prefixes: Vec<String>,
}

impl IgnoreTags {
    pub fn new<K, P>(keys: K, key_prefixes: P) -> Self
    where
        K: IntoIterator<Item = String>,
        P: IntoIterator<Item = String>,
    {
        Self {
            keys: keys.into_iter().collect(),
            key_prefixes: key_prefixes.into_iter().collect(),
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        self.keys.contains(key) || self.key_prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }
}

/// The layered tag policy a resource adapter applies before any set reaches
/// the reconciler: defaults merged on the way out, system and ignored keys
/// filtered on the way in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagPolicy {
    pub defaults: DefaultTags,
    pub ignore: IgnoreTags,
}

impl TagPolicy {
    pub fn new(defaults: DefaultTags, ignore: IgnoreTags) -> Self {
        Self { defaults, ignore }
    }

    /// Desired remote state: declared tags overlaid on the defaults.
    pub fn desired(&self, declared: &KeyValueTagSet) -> KeyValueTagSet {
        self.defaults.merge(declared)
    }

    /// Filters a freshly listed remote set through the system-prefix and
    /// user-configured exclusions.
    pub fn filter(&self, listed: &KeyValueTagSet) -> KeyValueTagSet {
        listed.ignore_aws().ignore_config(&self.ignore)
    }

    /// The declared-only view of a filtered set: default-config entries
    /// removed.
    pub fn declared(&self, filtered: &KeyValueTagSet) -> KeyValueTagSet {
        filtered.remove_default_config(&self.defaults)
    }
}
