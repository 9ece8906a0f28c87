// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host handle ↔ node identity registry.

use std::collections::BTreeMap;

use super::id::{HostHandle, NodeId};

/// Two-way map between host handles and node ids.
///
/// Entries are added when a surface is created and released at the start of
/// its destruction; updates never touch the registry.
#[derive(Debug, Default)]
pub struct Registry {
    by_handle: BTreeMap<HostHandle, NodeId>,
    next: u64,
    released: usize,
}

impl Registry {
    /// Allocates a fresh handle for `node`.
    pub(crate) fn register(&mut self, node: NodeId) -> HostHandle {
        let handle = HostHandle(self.next);
        self.next += 1;
        self.by_handle.insert(handle, node);
        handle
    }

    /// Drops the entry for `handle`. Returns whether it existed.
    pub(crate) fn release(&mut self, handle: HostHandle) -> bool {
        let existed = self.by_handle.remove(&handle).is_some();
        if existed {
            self.released += 1;
        }
        existed
    }

    /// Resolves a handle to its node.
    #[must_use]
    pub fn resolve(&self, handle: HostHandle) -> Option<NodeId> {
        self.by_handle.get(&handle).copied()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_handle.len()
    }

    /// Returns whether no entries are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }

    /// Total number of releases since creation.
    #[must_use]
    pub fn released(&self) -> usize {
        self.released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_never_reused() {
        let mut r = Registry::default();
        let node = NodeId { idx: 0, generation: 0 };
        let a = r.register(node);
        assert!(r.release(a));
        assert!(!r.release(a), "second release is a no-op");
        let b = r.register(node);
        assert_ne!(a, b);
        assert_eq!(r.resolve(a), None);
        assert_eq!(r.resolve(b), Some(node));
        assert_eq!(r.released(), 1);
    }
}
