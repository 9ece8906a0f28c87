// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property bags and partial updates.

use std::collections::BTreeMap;
use std::collections::btree_map;

use super::value::PropValue;

/// A surface's properties, keyed by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    entries: BTreeMap<String, PropValue>,
}

impl PropertyBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    /// Returns whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.entries.remove(key)
    }

    /// Applies a partial update: `Some` replaces, `None` removes.
    pub fn merge(&mut self, delta: &PropertyDelta) {
        for (key, value) in &delta.entries {
            match value {
                Some(v) => {
                    self.entries.insert(key.clone(), v.clone());
                }
                None => {
                    self.entries.remove(key);
                }
            }
        }
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, PropValue> {
        self.entries.iter()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PropertyBag {
    type Item = (&'a String, &'a PropValue);
    type IntoIter = btree_map::Iter<'a, String, PropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A partial property update. `None` removes the key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyDelta {
    entries: BTreeMap<String, Option<PropValue>>,
}

impl PropertyDelta {
    /// Creates an empty delta.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.entries.insert(key.into(), Some(value.into()));
        self
    }

    /// Removes `key`.
    #[must_use]
    pub fn unset(mut self, key: impl Into<String>) -> Self {
        self.entries.insert(key.into(), None);
        self
    }

    /// Records an entry in place.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<PropValue>) {
        self.entries.insert(key.into(), value);
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Option<PropValue>> {
        self.entries.iter()
    }

    /// Number of touched keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the delta touches no key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the delta that turns `old` into `new`.
    #[must_use]
    pub fn between(old: &PropertyBag, new: &PropertyBag) -> Self {
        let mut delta = Self::new();
        for (key, value) in old {
            if !new.contains(key) {
                delta.insert(key.clone(), None);
            } else if new.get(key) != Some(value) {
                delta.insert(key.clone(), new.get(key).cloned());
            }
        }
        for (key, value) in new {
            if !old.contains(key) {
                delta.insert(key.clone(), Some(value.clone()));
            }
        }
        delta
    }
}

impl<K: Into<String>> FromIterator<(K, Option<PropValue>)> for PropertyDelta {
    fn from_iter<I: IntoIterator<Item = (K, Option<PropValue>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
