// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child iteration and paint-order traversal.

use super::id::{INVALID, NodeId};
use super::store::SurfaceTree;

/// Iterator over the direct children of a surface, in paint order.
#[derive(Clone, Debug)]
pub struct Children<'a> {
    next_sibling: &'a [u32],
    generation: &'a [u32],
    cur: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(next_sibling: &'a [u32], generation: &'a [u32], first: u32) -> Self {
        Self {
            next_sibling,
            generation,
            cur: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.cur == INVALID {
            return None;
        }
        let idx = self.cur;
        self.cur = self.next_sibling[idx as usize];
        Some(NodeId {
            idx,
            generation: self.generation[idx as usize],
        })
    }
}

impl<S, B> SurfaceTree<S, B> {
    /// Depth-first pre-order of the subtree at `idx`: parents before
    /// children, siblings in paint order.
    pub(crate) fn preorder(&self, idx: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(idx) = stack.pop() {
            out.push(idx);
            let first = stack.len();
            let mut kid = self.first_child[idx as usize];
            while kid != INVALID {
                stack.push(kid);
                kid = self.next_sibling[kid as usize];
            }
            // Visit the first child first.
            stack[first..].reverse();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::surface::SurfaceKind;
    use crate::testing::tree;

    #[test]
    fn preorder_visits_parents_first() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_node(SurfaceKind::View).unwrap();
        let b = tree.create_node(SurfaceKind::View).unwrap();
        let a1 = tree.create_node(SurfaceKind::View).unwrap();
        tree.append_child(root, a).unwrap();
        tree.append_child(root, b).unwrap();
        tree.append_child(a, a1).unwrap();

        let order: Vec<u32> = tree.preorder(root.index());
        assert_eq!(order, [root.index(), a.index(), a1.index(), b.index()]);
        let kids: Vec<_> = tree.children(root).collect();
        assert_eq!(kids, [a, b]);
    }
}
