//! Flat key/value design-token settings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One complete design-token configuration.
///
/// Keys follow naming conventions such as `color-<name>`, `<name>-<modifier>-s`
/// or `option-<feature>`; values are plain strings. Ordering is irrelevant to
/// equality, a `BTreeMap` just keeps serialized output stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsSnapshot {
    vars: BTreeMap<String, String>,
}

impl SettingsSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Stores a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(key.into(), value.into())
    }

    /// Number of settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true if there are no settings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy of `self` with every entry of `incoming` written over it.
    ///
    /// Incoming values win on collision; keys absent from `incoming` are kept.
    #[must_use]
    pub fn merged_with(&self, incoming: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in &incoming.vars {
            merged.vars.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Borrows the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<String, String> {
        &self.vars
    }
}

impl From<BTreeMap<String, String>> for SettingsSnapshot {
    fn from(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SettingsSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SettingsSnapshot {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}
