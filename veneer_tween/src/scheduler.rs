// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-tree tween registry.
//!
//! A [`TweenScheduler`] holds non-owning references to the tweens currently
//! bound to owners (surfaces, in Veneer's case). Each [`tick`] advances every
//! distinct tween exactly once, even when several owners share it, and
//! reports which `(owner, property)` pairs changed.
//!
//! Entries whose tween has been dropped are pruned on the next tick. There is
//! no global instance; each tree owns its scheduler.
//!
//! [`tick`]: TweenScheduler::tick

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::time::Duration;

use crate::arith::Arithmetic;
use crate::tween::{SharedTween, Step, Tween, WeakTween};

/// A property whose value moved during a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TweenChange<K> {
    /// The owner the tween is bound to.
    pub owner: K,
    /// The property the tween drives.
    pub property: String,
    /// Whether the interpolation finished on this tick.
    pub completed: bool,
}

struct Entry<K, T> {
    owner: K,
    property: String,
    tween: WeakTween<T>,
}

/// Registry of `(owner, property) → tween` bindings.
pub struct TweenScheduler<K, T> {
    entries: Vec<Entry<K, T>>,
}

impl<K, T> Default for TweenScheduler<K, T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Clone + PartialEq, T: Arithmetic> TweenScheduler<K, T> {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `tween` to `(owner, property)`, replacing any previous binding.
    pub fn register(&mut self, owner: K, property: &str, tween: &SharedTween<T>) {
        let weak = tween.downgrade();
        if let Some(e) = self
            .entries
            .iter_mut()
            .find(|e| e.owner == owner && e.property == property)
        {
            e.tween = weak;
            return;
        }
        self.entries.push(Entry {
            owner,
            property: property.into(),
            tween: weak,
        });
    }

    /// Removes the binding for `(owner, property)`. Returns whether one
    /// existed.
    pub fn deregister(&mut self, owner: &K, property: &str) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.owner == *owner && e.property == property));
        self.entries.len() != before
    }

    /// Removes every binding of `owner`. Returns how many were removed.
    pub fn deregister_owner(&mut self, owner: &K) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.owner != *owner);
        before - self.entries.len()
    }

    /// Returns whether `owner` has at least one binding.
    #[must_use]
    pub fn is_registered(&self, owner: &K) -> bool {
        self.entries.iter().any(|e| e.owner == *owner)
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there are no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns whether any bound tween has an interpolation in flight.
    #[must_use]
    pub fn has_active(&self) -> bool {
        self.entries
            .iter()
            .filter_map(|e| e.tween.upgrade())
            .any(|t| t.is_active())
    }

    /// Advances every bound tween by `dt`.
    ///
    /// Completions settle after all tweens have advanced, in binding order,
    /// so a completion callback observes the whole tick's values.
    pub fn tick(&mut self, dt: Duration) -> Vec<TweenChange<K>> {
        self.entries.retain(|e| e.tween.upgrade().is_some());

        let mut seen: BTreeMap<*const RefCell<Tween<T>>, (bool, bool)> = BTreeMap::new();
        let mut steps: Vec<Step<T>> = Vec::new();
        let mut changes = Vec::new();
        for e in &self.entries {
            let Some(tween) = e.tween.upgrade() else {
                continue;
            };
            let (changed, completed) = *seen.entry(tween.as_ptr()).or_insert_with(|| {
                let step = tween.advance_deferred(dt);
                let flags = (step.changed, step.completed);
                steps.push(step);
                flags
            });
            if changed || completed {
                changes.push(TweenChange {
                    owner: e.owner.clone(),
                    property: e.property.clone(),
                    completed,
                });
            }
        }
        for step in steps {
            step.settle();
        }
        changes
    }
}

impl<K: fmt::Debug, T> fmt::Debug for TweenScheduler<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for e in &self.entries {
            list.entry(&(&e.owner, &e.property));
        }
        list.finish()
    }
}
