// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The property diff engine.
//!
//! [`diff`] compares two bags over one [`KeyClass`]. Handler values compare
//! by identity and every other value by value equality; both fall out of
//! [`PropValue`]'s `PartialEq`. The three result lists are disjoint and,
//! together with the unchanged keys, cover every key of that class in either
//! bag.

use std::cmp::Ordering;

use super::bag::PropertyBag;
use super::keys::KeyClass;
use super::value::PropValue;

/// Result of [`diff`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyDiff {
    /// Keys present only in the previous bag, with their old value.
    pub removed: Vec<(String, PropValue)>,
    /// Keys present only in the next bag, with their new value.
    pub added: Vec<(String, PropValue)>,
    /// Keys present in both with differing values: `(key, before, after)`.
    pub changed: Vec<(String, PropValue, PropValue)>,
}

impl PropertyDiff {
    /// Returns whether nothing differs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.changed.is_empty()
    }

    /// Every key that differs, in key order within each list.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.removed
            .iter()
            .map(|(k, _)| k.as_str())
            .chain(self.added.iter().map(|(k, _)| k.as_str()))
            .chain(self.changed.iter().map(|(k, _, _)| k.as_str()))
    }
}

/// Compares `prev` and `next` over the keys of `class`.
#[must_use]
pub fn diff(prev: &PropertyBag, next: &PropertyBag, class: KeyClass) -> PropertyDiff {
    let mut out = PropertyDiff::default();
    let mut a = prev.iter().filter(|(k, _)| KeyClass::of(k) == class).peekable();
    let mut b = next.iter().filter(|(k, _)| KeyClass::of(k) == class).peekable();
    loop {
        let order = match (a.peek(), b.peek()) {
            (None, None) => break,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some((ka, _)), Some((kb, _))) => ka.cmp(kb),
        };
        match order {
            Ordering::Less => {
                if let Some((k, v)) = a.next() {
                    out.removed.push((k.clone(), v.clone()));
                }
            }
            Ordering::Greater => {
                if let Some((k, v)) = b.next() {
                    out.added.push((k.clone(), v.clone()));
                }
            }
            Ordering::Equal => {
                if let (Some((k, before)), Some((_, after))) = (a.next(), b.next())
                    && before != after
                {
                    out.changed.push((k.clone(), before.clone(), after.clone()));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;
    use crate::props::EventHandler;

    #[test]
    fn classifies_value_changes() {
        let prev: PropertyBag = [("a", 1.0), ("b", 2.0), ("c", 3.0)].into_iter().collect();
        let next: PropertyBag = [("b", 2.0), ("c", 4.0), ("d", 5.0)].into_iter().collect();
        let d = diff(&prev, &next, KeyClass::Value);
        assert_eq!(d.removed, vec![("a".to_string(), PropValue::from(1.0))]);
        assert_eq!(d.added, vec![("d".to_string(), PropValue::from(5.0))]);
        assert_eq!(
            d.changed,
            vec![("c".to_string(), PropValue::from(3.0), PropValue::from(4.0))]
        );
    }

    #[test]
    fn handlers_diff_by_identity() {
        let h = EventHandler::new(|_| {});
        let mut prev = PropertyBag::new();
        prev.insert("onClick", h.clone());
        prev.insert("width", 1.0);
        let mut next = prev.clone();
        assert!(diff(&prev, &next, KeyClass::Handler).is_empty(), "same handler");
        next.insert("onClick", EventHandler::new(|_| {}));
        let d = diff(&prev, &next, KeyClass::Handler);
        assert_eq!(d.changed.len(), 1, "fresh closure is a change");
        assert!(diff(&prev, &next, KeyClass::Value).is_empty(), "class restricted");
    }

    fn bag() -> impl Strategy<Value = PropertyBag> {
        prop::collection::btree_map("[a-e]", 0_u8..3, 0..5)
            .prop_map(|m| m.into_iter().map(|(k, v)| (k, f64::from(v))).collect())
    }

    proptest! {
        #[test]
        fn diff_is_complete_and_disjoint(prev in bag(), next in bag()) {
            let d = diff(&prev, &next, KeyClass::Value);
            let removed: BTreeSet<_> = d.removed.iter().map(|(k, _)| k.clone()).collect();
            let added: BTreeSet<_> = d.added.iter().map(|(k, _)| k.clone()).collect();
            let changed: BTreeSet<_> = d.changed.iter().map(|(k, _, _)| k.clone()).collect();
            prop_assert!(removed.is_disjoint(&added));
            prop_assert!(removed.is_disjoint(&changed));
            prop_assert!(added.is_disjoint(&changed));

            let union: BTreeSet<String> = prev.iter().chain(next.iter()).map(|(k, _)| k.clone()).collect();
            for key in &union {
                let same = prev.get(key).is_some() && prev.get(key) == next.get(key);
                let listed = removed.contains(key) || added.contains(key) || changed.contains(key);
                prop_assert_eq!(same, !listed, "key {} misclassified", key);
            }

            let mut merged = prev.clone();
            for (k, _) in &d.removed {
                merged.remove(k);
            }
            for (k, v) in &d.added {
                merged.insert(k.clone(), v.clone());
            }
            for (k, _, after) in &d.changed {
                merged.insert(k.clone(), after.clone());
            }
            prop_assert_eq!(merged, next);
        }
    }
}
