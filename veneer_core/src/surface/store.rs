// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays surface storage with allocation, topology, and accessors.

use std::collections::BTreeMap;
use std::fmt;

use kurbo::{Rect, Size};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};
use veneer_tween::{AnimValue, SharedTween, TweenScheduler};

use super::id::{HostHandle, INVALID, NodeId, SurfaceKind};
use super::registry::Registry;
use super::traverse::Children;
use crate::backend::RenderBackend;
use crate::cascade::{CascadeEntry, TextStyle};
use crate::dirty;
use crate::effects::{EffectKind, Primitives};
use crate::error::{StructuralError, SurfaceError};
use crate::layout::{Dimension, LayoutCommand, LayoutNodeId, LayoutSolver, SizeProp, TextMeasure};
use crate::props::{Literal, PropertyBag};

/// How a tween came to drive a property.
#[derive(Clone, Debug)]
pub(crate) enum TweenSlot {
    /// Created by the tree from instructions. Stopped when released.
    Instructed(SharedTween<AnimValue>),
    /// An external tween adopted from a `Tween` value. Left running when
    /// unbound.
    Bound(SharedTween<AnimValue>),
}

impl TweenSlot {
    pub(crate) fn tween(&self) -> &SharedTween<AnimValue> {
        match self {
            Self::Instructed(t) | Self::Bound(t) => t,
        }
    }
}

/// Per-surface state that is not topology.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) kind: SurfaceKind,
    pub(crate) handle: HostHandle,
    pub(crate) props: PropertyBag,
    pub(crate) tweens: BTreeMap<String, TweenSlot>,
    pub(crate) layout: LayoutNodeId,
    pub(crate) prims: Primitives,
    pub(crate) interactive: bool,
    pub(crate) cascade: Option<CascadeEntry>,
    pub(crate) cascade_stale: bool,
    /// Content and style last pushed to the text primitive.
    pub(crate) text: Option<(String, TextStyle)>,
    /// Measure last installed in the solver.
    pub(crate) measure: Option<TextMeasure>,
    /// Box last applied to the root primitive, relative to the parent.
    pub(crate) local: Rect,
    /// Box in root coordinates, for hit testing.
    pub(crate) world: Rect,
    pub(crate) painted: bool,
}

/// Surfaces created and destroyed, and effects mounted and unmounted, since
/// the log was last taken.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LifecycleLog {
    /// Surfaces created, in order.
    pub created: Vec<NodeId>,
    /// Surfaces destroyed, in order (children before their parent).
    pub destroyed: Vec<NodeId>,
    /// Effects mounted, in order.
    pub mounted: Vec<(NodeId, EffectKind)>,
    /// Effects unmounted, in order.
    pub unmounted: Vec<(NodeId, EffectKind)>,
}

impl LifecycleLog {
    /// Returns whether nothing happened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
            && self.destroyed.is_empty()
            && self.mounted.is_empty()
            && self.unmounted.is_empty()
    }
}

/// The retained surface tree.
///
/// Surfaces are addressed by [`NodeId`] handles. Internally each surface
/// occupies a slot in parallel arrays; destroyed surfaces are recycled via a
/// free list, and generation counters make stale handles detectable.
///
/// Mutating operations return [`SurfaceError::StaleNode`] for a destroyed
/// id. Read accessors panic on a stale id, since holding one past
/// destruction is a host bug.
pub struct SurfaceTree<S, B> {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Surfaces --
    pub(crate) nodes: Vec<Option<Node>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Collaborators --
    pub(crate) solver: S,
    pub(crate) backend: B,
    pub(crate) scheduler: TweenScheduler<NodeId, AnimValue>,
    pub(crate) registry: Registry,

    pub(crate) root: NodeId,
    pub(crate) viewport: Size,

    // -- Paint-order cache (rebuilt by repaint) --
    pub(crate) paint_order: Vec<u32>,

    // -- Lifecycle tracking --
    pub(crate) lifecycle: LifecycleLog,
}

impl<S, B> fmt::Debug for SurfaceTree<S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceTree")
            .field("root", &self.root)
            .field("viewport", &self.viewport)
            .field("slots", &self.len)
            .field("free", &self.free_list.len())
            .field("registry", &self.registry)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl<S: LayoutSolver, B: RenderBackend> SurfaceTree<S, B> {
    /// Creates a tree holding only a root surface sized to `viewport`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Layout`] if the solver cannot create the root.
    pub fn new(solver: S, backend: B, viewport: Size) -> Result<Self, SurfaceError> {
        let mut tree = Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            nodes: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            solver,
            backend,
            scheduler: TweenScheduler::new(),
            registry: Registry::default(),
            root: NodeId {
                idx: INVALID,
                generation: 0,
            },
            viewport,
            paint_order: Vec::new(),
            lifecycle: LifecycleLog::default(),
        };
        tree.root = tree.alloc(SurfaceKind::Root)?;
        tree.apply_viewport()?;
        Ok(tree)
    }

    // -- Allocation API --

    /// Creates a detached surface and returns its handle.
    ///
    /// The surface starts with an empty property bag, a solver node with
    /// default constraints, and its root and children containers (plus a text
    /// primitive for [`SurfaceKind::Text`]). A surface created with
    /// [`SurfaceKind::Root`] can never be attached.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Layout`] if the solver cannot create a node.
    pub fn create_node(&mut self, kind: SurfaceKind) -> Result<NodeId, SurfaceError> {
        self.alloc(kind)
    }

    fn alloc(&mut self, kind: SurfaceKind) -> Result<NodeId, SurfaceError> {
        let layout = self.solver.create_node()?;
        let prims = Primitives::create(&mut self.backend, kind);
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot. Its generation was bumped on destroy.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.generation.push(0);
            self.nodes.push(None);
            idx
        };
        let id = self.id_at(idx);
        let handle = self.registry.register(id);
        self.nodes[idx as usize] = Some(Node {
            kind,
            handle,
            props: PropertyBag::new(),
            tweens: BTreeMap::new(),
            layout,
            prims,
            interactive: false,
            cascade: None,
            cascade_stale: true,
            text: None,
            measure: None,
            local: Rect::ZERO,
            world: Rect::ZERO,
            painted: false,
        });
        self.lifecycle.created.push(id);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        Ok(id)
    }

    /// Destroys a surface and its whole subtree.
    ///
    /// Each surface is detached, its registry entry released, its children
    /// destroyed, its tweens stopped and deregistered, its solver node reset
    /// and freed, and its primitives released. Destroying an already
    /// destroyed id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::RootNotRemovable`] for the root, and
    /// [`SurfaceError::Layout`] if the solver rejects a release.
    pub fn destroy_node(&mut self, id: NodeId) -> Result<(), SurfaceError> {
        if !self.is_alive(id) {
            return Ok(());
        }
        if id == self.root {
            return Err(StructuralError::RootNotRemovable.into());
        }
        self.destroy_at(id.idx)
    }

    fn destroy_at(&mut self, idx: u32) -> Result<(), SurfaceError> {
        let id = self.id_at(idx);
        if self.parent[idx as usize] != INVALID {
            self.detach(idx)?;
        }
        let handle = self.node(idx).handle;
        self.registry.release(handle);

        let mut kid = self.first_child[idx as usize];
        while kid != INVALID {
            // Destroying `kid` unlinks it, so the next child is always first.
            self.destroy_at(kid)?;
            kid = self.first_child[idx as usize];
        }

        let (layout, prims) = {
            let node = self.node(idx);
            for slot in node.tweens.values() {
                if let TweenSlot::Instructed(t) = slot {
                    t.stop();
                }
            }
            (node.layout, node.prims)
        };
        self.scheduler.deregister_owner(&id);
        self.solver.reset(layout)?;
        self.solver.release(layout)?;
        prims.release(&mut self.backend);

        self.nodes[idx as usize] = None;
        self.dirty.remove_key(idx);
        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] = self.generation[idx as usize].wrapping_add(1);
        self.free_list.push(idx);
        self.lifecycle.destroyed.push(id);
        Ok(())
    }

    /// Returns whether the given handle refers to a live surface.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.idx < self.len
            && self.generation[id.idx as usize] == id.generation
            && self.nodes[id.idx as usize].is_some()
    }

    /// Number of live surfaces, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Always `false`: the root is always alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    // -- Topology API --

    /// Appends `child` as the last child of `parent`, moving it if it is
    /// attached elsewhere.
    ///
    /// The surface child list, the solver child list, and the parent's
    /// children container are all updated before this returns.
    ///
    /// # Errors
    ///
    /// - [`SurfaceError::StaleNode`] if either id is destroyed.
    /// - [`StructuralError::RootNotRemovable`] if `child` is a root.
    /// - [`StructuralError::WouldCycle`] if `parent` is inside `child`'s
    ///   subtree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SurfaceError> {
        self.attach(parent, child, None)
    }

    /// Inserts `child` into `parent` before `reference`, moving it if it is
    /// attached elsewhere.
    ///
    /// # Errors
    ///
    /// As [`append_child`](Self::append_child), plus
    /// [`StructuralError::InvalidReference`] if `reference` is not a child of
    /// `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), SurfaceError> {
        self.attach(parent, child, Some(reference))
    }

    /// Detaches `child` from `parent` and destroys its subtree.
    ///
    /// # Errors
    ///
    /// - [`SurfaceError::StaleNode`] if either id is destroyed.
    /// - [`StructuralError::RootNotRemovable`] for the root.
    /// - [`StructuralError::NotAChild`] if `child`'s parent is not `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SurfaceError> {
        let p = self.check(parent)?;
        let c = self.check(child)?;
        if child == self.root {
            return Err(StructuralError::RootNotRemovable.into());
        }
        if self.parent[c as usize] != p {
            return Err(StructuralError::NotAChild.into());
        }
        self.destroy_at(c)
    }

    fn attach(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: Option<NodeId>,
    ) -> Result<(), SurfaceError> {
        let p = self.check(parent)?;
        let c = self.check(child)?;
        if self.node(c).kind == SurfaceKind::Root {
            return Err(StructuralError::RootNotRemovable.into());
        }
        let before = match before {
            Some(reference) => {
                let r = self.check(reference)?;
                if self.parent[r as usize] != p {
                    return Err(StructuralError::InvalidReference.into());
                }
                if r == c {
                    return Ok(());
                }
                Some(r)
            }
            None => None,
        };
        if self.is_ancestor_or_self(c, p) {
            return Err(StructuralError::WouldCycle.into());
        }

        // The solver moves first so a rejected edit leaves all three trees
        // as they were.
        let index = self.insertion_index(p, c, before);
        let (parent_layout, container) = {
            let n = self.node(p);
            (n.layout, n.prims.children)
        };
        let (child_layout, child_root) = {
            let n = self.node(c);
            (n.layout, n.prims.root)
        };
        let old = self.parent[c as usize];
        if old == INVALID {
            self.solver.insert_child_at(parent_layout, child_layout, index)?;
        } else {
            let old_layout = self.node(old).layout;
            self.solver.remove_child(old_layout, child_layout)?;
            if let Err(e) = self.solver.insert_child_at(parent_layout, child_layout, index) {
                let at = self.child_index(c);
                let _ = self.solver.insert_child_at(old_layout, child_layout, at);
                return Err(e.into());
            }
            self.release_from_parent(c);
        }
        match before {
            Some(r) => self.link_before(p, c, r),
            None => self.link_last(p, c),
        }
        self.backend.insert_child(container, child_root, index);

        // The child's effective text style depends on its parent's.
        let _ = self.dirty.add_dependency(c, p, dirty::CASCADE);
        self.dirty.mark_with(c, dirty::CASCADE, &EagerPolicy);
        self.dirty.mark(p, dirty::TOPOLOGY);
        Ok(())
    }

    /// Unlinks `c` from its parent in all three trees.
    fn detach(&mut self, c: u32) -> Result<(), SurfaceError> {
        let p = self.parent[c as usize];
        let parent_layout = self.node(p).layout;
        let child_layout = self.node(c).layout;
        self.solver.remove_child(parent_layout, child_layout)?;
        self.release_from_parent(c);
        Ok(())
    }

    /// Unlinks `c` from its parent's child list and container, once the
    /// solver has let go of it.
    fn release_from_parent(&mut self, c: u32) {
        let p = self.parent[c as usize];
        self.unlink_from_parent(c);
        let container = self.node(p).prims.children;
        let child_root = self.node(c).prims.root;
        self.backend.remove_child(container, child_root);

        self.dirty.remove_dependency(c, p, dirty::CASCADE);
        self.dirty.mark_with(c, dirty::CASCADE, &EagerPolicy);
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    // -- Getters (panic on a stale id) --

    /// The root surface.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The viewport the root is sized to.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Returns the kind of a surface.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> SurfaceKind {
        self.validate(id);
        self.node(id.idx).kind
    }

    /// Returns the host handle of a surface.
    #[must_use]
    pub fn handle(&self, id: NodeId) -> HostHandle {
        self.validate(id);
        self.node(id.idx).handle
    }

    /// Resolves a host handle to its live surface.
    #[must_use]
    pub fn resolve(&self, handle: HostHandle) -> Option<NodeId> {
        self.registry.resolve(handle)
    }

    /// The host handle registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the parent of a surface, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns an iterator over the direct children of a surface.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(
            &self.next_sibling,
            &self.generation,
            self.first_child[id.idx as usize],
        )
    }

    /// Returns the property bag of a surface, as last merged.
    #[must_use]
    pub fn props(&self, id: NodeId) -> &PropertyBag {
        self.validate(id);
        &self.node(id.idx).props
    }

    /// Returns the live value of `key`: the driving tween's current value if
    /// one exists, else the literal in the bag.
    ///
    /// Handler values and unbound instructions have no live value.
    #[must_use]
    pub fn live_value(&self, id: NodeId, key: &str) -> Option<Literal> {
        self.validate(id);
        self.live_at(id.idx, key)
    }

    /// Returns the tween driving `key`, if any.
    #[must_use]
    pub fn tween(&self, id: NodeId, key: &str) -> Option<SharedTween<AnimValue>> {
        self.validate(id);
        self.node(id.idx).tweens.get(key).map(|s| s.tween().clone())
    }

    /// Returns the render primitives of a surface.
    #[must_use]
    pub fn primitives(&self, id: NodeId) -> &Primitives {
        self.validate(id);
        &self.node(id.idx).prims
    }

    /// Returns the box applied at the last repaint, relative to the parent.
    #[must_use]
    pub fn computed_box(&self, id: NodeId) -> Rect {
        self.validate(id);
        self.node(id.idx).local
    }

    /// Returns the box applied at the last repaint, in root coordinates.
    #[must_use]
    pub fn world_box(&self, id: NodeId) -> Rect {
        self.validate(id);
        self.node(id.idx).world
    }

    /// Returns whether a surface has at least one event handler.
    #[must_use]
    pub fn is_interactive(&self, id: NodeId) -> bool {
        self.validate(id);
        self.node(id.idx).interactive
    }

    /// Returns whether any tween bound in this tree is mid-interpolation.
    #[must_use]
    pub fn has_active_tweens(&self) -> bool {
        self.scheduler.has_active()
    }

    /// The layout solver.
    #[must_use]
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// The render backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The render backend, mutably (for delivering input events).
    #[must_use]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Takes the lifecycle changes recorded since the last call.
    pub fn take_lifecycle(&mut self) -> LifecycleLog {
        core::mem::take(&mut self.lifecycle)
    }

    // -- Viewport --

    /// Resizes the root to `viewport` and marks layout dirty.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Layout`] if the solver rejects the size.
    pub fn set_viewport(&mut self, viewport: Size) -> Result<(), SurfaceError> {
        self.viewport = viewport;
        self.apply_viewport()
    }

    fn apply_viewport(&mut self) -> Result<(), SurfaceError> {
        let layout = self.node(self.root.idx).layout;
        let Size { width, height } = self.viewport;
        self.solver
            .apply(layout, &LayoutCommand::Size(SizeProp::Width, Dimension::Points(width)))?;
        self.solver
            .apply(layout, &LayoutCommand::Size(SizeProp::Height, Dimension::Points(height)))?;
        self.dirty.mark(self.root.idx, dirty::LAYOUT);
        Ok(())
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            self.is_alive(id),
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Returns the slot index of a live handle.
    pub(crate) fn check(&self, id: NodeId) -> Result<u32, SurfaceError> {
        if self.is_alive(id) {
            Ok(id.idx)
        } else {
            Err(SurfaceError::StaleNode)
        }
    }

    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn node(&self, idx: u32) -> &Node {
        match &self.nodes[idx as usize] {
            Some(node) => node,
            None => panic!("slot {idx} holds no surface"),
        }
    }

    pub(crate) fn node_mut(&mut self, idx: u32) -> &mut Node {
        match &mut self.nodes[idx as usize] {
            Some(node) => node,
            None => panic!("slot {idx} holds no surface"),
        }
    }

    /// Live value of `key` at slot `idx`.
    pub(crate) fn live_at(&self, idx: u32, key: &str) -> Option<Literal> {
        let node = self.node(idx);
        if let Some(slot) = node.tweens.get(key) {
            return Some(Literal::from_anim(&slot.tween().value()));
        }
        node.props.get(key).and_then(|v| v.as_literal()).cloned()
    }

    /// Returns whether `ancestor` is `idx` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: u32, mut idx: u32) -> bool {
        while idx != INVALID {
            if idx == ancestor {
                return true;
            }
            idx = self.parent[idx as usize];
        }
        false
    }

    /// Index `c` will take under `p`, inserted before `before` or last,
    /// counting siblings as if `c` were already unlinked.
    fn insertion_index(&self, p: u32, c: u32, before: Option<u32>) -> usize {
        let stop = before.unwrap_or(INVALID);
        let mut index = 0;
        let mut cur = self.first_child[p as usize];
        while cur != INVALID && cur != stop {
            if cur != c {
                index += 1;
            }
            cur = self.next_sibling[cur as usize];
        }
        index
    }

    /// Position of `idx` among its siblings.
    fn child_index(&self, idx: u32) -> usize {
        let mut index = 0;
        let mut prev = self.prev_sibling[idx as usize];
        while prev != INVALID {
            index += 1;
            prev = self.prev_sibling[prev as usize];
        }
        index
    }

    fn link_last(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
    }

    fn link_before(&mut self, p: u32, c: u32, s: u32) {
        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `s` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::error::LayoutError;
    use crate::layout::TaffySolver;
    use crate::testing::{RecordingBackend, tree};

    type Tree = SurfaceTree<TaffySolver, RecordingBackend>;

    fn view(tree: &mut Tree) -> NodeId {
        tree.create_node(SurfaceKind::View).unwrap()
    }

    /// Child surfaces' root primitives, as the backend sees them.
    fn backend_children<S: LayoutSolver>(
        tree: &SurfaceTree<S, RecordingBackend>,
        id: NodeId,
    ) -> Vec<crate::backend::PrimitiveId> {
        tree.backend().children(tree.primitives(id).children)
    }

    fn expected_prims<S: LayoutSolver>(
        tree: &SurfaceTree<S, RecordingBackend>,
        ids: &[NodeId],
    ) -> Vec<crate::backend::PrimitiveId> {
        ids.iter().map(|&id| tree.primitives(id).root).collect()
    }

    fn solver_children<S: LayoutSolver>(
        tree: &SurfaceTree<S, RecordingBackend>,
        id: NodeId,
    ) -> Vec<LayoutNodeId> {
        tree.solver()
            .children(tree.node(id.idx).layout)
            .unwrap()
    }

    fn expected_layout<S: LayoutSolver>(
        tree: &SurfaceTree<S, RecordingBackend>,
        ids: &[NodeId],
    ) -> Vec<LayoutNodeId> {
        ids.iter().map(|&id| tree.node(id.idx).layout).collect()
    }

    fn assert_in_sync<S: LayoutSolver>(
        tree: &SurfaceTree<S, RecordingBackend>,
        parent: NodeId,
        ids: &[NodeId],
    ) {
        let kids: Vec<_> = tree.children(parent).collect();
        assert_eq!(kids, ids, "surface order");
        assert_eq!(solver_children(tree, parent), expected_layout(tree, ids), "solver order");
        assert_eq!(backend_children(tree, parent), expected_prims(tree, ids), "container order");
    }

    #[test]
    fn create_and_destroy() {
        let mut tree = tree();
        let id = view(&mut tree);
        assert!(tree.is_alive(id));
        assert_eq!(tree.resolve(tree.handle(id)), Some(id));
        tree.destroy_node(id).unwrap();
        assert!(!tree.is_alive(id));
        tree.destroy_node(id).unwrap();
        assert_eq!(tree.len(), 1, "only the root remains");
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut tree = tree();
        let id1 = view(&mut tree);
        tree.destroy_node(id1).unwrap();
        let id2 = view(&mut tree);
        assert!(!tree.is_alive(id1));
        assert!(tree.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert_eq!(
            tree.update_props(id1, &crate::props::PropertyDelta::new()),
            Err(SurfaceError::StaleNode)
        );
    }

    #[test]
    fn append_insert_and_move_stay_in_sync() {
        let mut tree = tree();
        let root = tree.root();
        let a = view(&mut tree);
        let b = view(&mut tree);
        let c = view(&mut tree);

        tree.append_child(root, a).unwrap();
        tree.append_child(root, c).unwrap();
        tree.insert_before(root, b, c).unwrap();
        assert_in_sync(&tree, root, &[a, b, c]);

        // Appending an attached child moves it to the end.
        tree.append_child(root, a).unwrap();
        assert_in_sync(&tree, root, &[b, c, a]);

        // Moving into another parent.
        tree.append_child(b, c).unwrap();
        assert_in_sync(&tree, root, &[b, a]);
        assert_in_sync(&tree, b, &[c]);
        assert_eq!(tree.parent(c), Some(b));
    }

    #[test]
    fn structural_errors() {
        let mut tree = tree();
        let root = tree.root();
        let a = view(&mut tree);
        let b = view(&mut tree);
        let stray = view(&mut tree);
        tree.append_child(root, a).unwrap();
        tree.append_child(a, b).unwrap();

        assert_eq!(
            tree.append_child(b, a),
            Err(StructuralError::WouldCycle.into())
        );
        assert_eq!(
            tree.append_child(a, a),
            Err(StructuralError::WouldCycle.into())
        );
        assert_eq!(
            tree.insert_before(root, stray, b),
            Err(StructuralError::InvalidReference.into())
        );
        assert_eq!(
            tree.remove_child(root, b),
            Err(StructuralError::NotAChild.into())
        );
        assert_eq!(
            tree.append_child(a, root),
            Err(StructuralError::RootNotRemovable.into())
        );
        assert_eq!(
            tree.destroy_node(root),
            Err(StructuralError::RootNotRemovable.into())
        );
        // Failed calls leave the tree untouched.
        assert_in_sync(&tree, root, &[a]);
        assert_in_sync(&tree, a, &[b]);
    }

    #[test]
    fn remove_child_destroys_subtree() {
        let mut tree = tree();
        let root = tree.root();
        let a = view(&mut tree);
        let b = view(&mut tree);
        let c = view(&mut tree);
        tree.append_child(root, a).unwrap();
        tree.append_child(a, b).unwrap();
        tree.append_child(b, c).unwrap();
        let handles = [tree.handle(a), tree.handle(b), tree.handle(c)];
        let _ = tree.take_lifecycle();

        tree.remove_child(root, a).unwrap();
        for id in [a, b, c] {
            assert!(!tree.is_alive(id), "{id:?} destroyed");
        }
        for handle in handles {
            assert_eq!(tree.resolve(handle), None);
        }
        assert_eq!(tree.take_lifecycle().destroyed, [c, b, a]);
        assert_eq!(tree.registry().released(), 3);
        assert_eq!(tree.solver().node_count(), 1, "only the root's solver node");
        assert_in_sync(&tree, root, &[]);
    }

    #[test]
    fn destroyed_primitives_are_released() {
        let mut tree = tree();
        let root = tree.root();
        let live_before = tree.backend().live_count();
        let a = view(&mut tree);
        tree.append_child(root, a).unwrap();
        tree.destroy_node(a).unwrap();
        assert_eq!(tree.backend().live_count(), live_before);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_parent() {
        let mut tree = tree();
        let id = view(&mut tree);
        tree.destroy_node(id).unwrap();
        let _ = tree.parent(id);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_props() {
        let mut tree = tree();
        let id = view(&mut tree);
        tree.destroy_node(id).unwrap();
        let _ = tree.props(id);
    }

    #[test]
    fn mutations_on_stale_ids_fail() {
        let mut tree = tree();
        let root = tree.root();
        let id = view(&mut tree);
        tree.destroy_node(id).unwrap();
        assert_eq!(tree.append_child(root, id), Err(SurfaceError::StaleNode));
        assert_eq!(tree.remove_child(root, id), Err(SurfaceError::StaleNode));
    }

    /// Taffy, except that inserts fail while `refuse` is set.
    struct Refusing {
        inner: TaffySolver,
        refuse: Rc<Cell<bool>>,
    }

    impl LayoutSolver for Refusing {
        fn create_node(&mut self) -> Result<LayoutNodeId, LayoutError> {
            self.inner.create_node()
        }

        fn insert_child_at(
            &mut self,
            parent: LayoutNodeId,
            child: LayoutNodeId,
            index: usize,
        ) -> Result<(), LayoutError> {
            if self.refuse.get() {
                return Err(LayoutError("insert refused".into()));
            }
            self.inner.insert_child_at(parent, child, index)
        }

        fn remove_child(&mut self, parent: LayoutNodeId, child: LayoutNodeId) -> Result<(), LayoutError> {
            self.inner.remove_child(parent, child)
        }

        fn reset(&mut self, node: LayoutNodeId) -> Result<(), LayoutError> {
            self.inner.reset(node)
        }

        fn release(&mut self, node: LayoutNodeId) -> Result<(), LayoutError> {
            self.inner.release(node)
        }

        fn set_measure(
            &mut self,
            node: LayoutNodeId,
            measure: Option<TextMeasure>,
        ) -> Result<(), LayoutError> {
            self.inner.set_measure(node, measure)
        }

        fn apply(&mut self, node: LayoutNodeId, command: &LayoutCommand) -> Result<(), LayoutError> {
            self.inner.apply(node, command)
        }

        fn supports(&self, setter: &str) -> bool {
            self.inner.supports(setter)
        }

        fn calculate(&mut self, root: LayoutNodeId, available: Size) -> Result<(), LayoutError> {
            self.inner.calculate(root, available)
        }

        fn computed_box(&self, node: LayoutNodeId) -> Result<Rect, LayoutError> {
            self.inner.computed_box(node)
        }

        fn children(&self, node: LayoutNodeId) -> Result<Vec<LayoutNodeId>, LayoutError> {
            self.inner.children(node)
        }
    }

    #[test]
    fn rejected_solver_inserts_leave_every_tree_alone() {
        let refuse = Rc::new(Cell::new(false));
        let solver = Refusing {
            inner: TaffySolver::new(),
            refuse: Rc::clone(&refuse),
        };
        let mut tree =
            SurfaceTree::new(solver, RecordingBackend::default(), Size::new(100.0, 100.0)).unwrap();
        let root = tree.root();
        let a = tree.create_node(SurfaceKind::View).unwrap();
        let b = tree.create_node(SurfaceKind::View).unwrap();
        let stray = tree.create_node(SurfaceKind::View).unwrap();
        tree.append_child(root, a).unwrap();
        tree.append_child(root, b).unwrap();

        refuse.set(true);
        // A fresh attach, a move to a new parent, and a reorder all fail.
        assert!(matches!(tree.append_child(root, stray), Err(SurfaceError::Layout(_))));
        assert!(matches!(tree.append_child(a, b), Err(SurfaceError::Layout(_))));
        assert!(matches!(tree.insert_before(root, b, a), Err(SurfaceError::Layout(_))));
        assert_in_sync(&tree, root, &[a, b]);
        assert_in_sync(&tree, a, &[]);
        assert_eq!(tree.parent(stray), None);
        assert_eq!(tree.parent(b), Some(root));

        refuse.set(false);
        tree.insert_before(root, b, a).unwrap();
        assert_in_sync(&tree, root, &[b, a]);
    }
}
