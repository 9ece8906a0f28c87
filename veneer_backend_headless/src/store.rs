// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The in-memory primitive store.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use kurbo::{Affine, Size};
use veneer_core::backend::{
    EventKind, PaintOp, PrimitiveId, PrimitiveKind, RenderBackend, SurfaceEvent,
};
use veneer_core::props::EventHandler;

/// One live primitive.
#[derive(Debug)]
struct Primitive {
    kind: PrimitiveKind,
    parent: Option<PrimitiveId>,
    children: Vec<PrimitiveId>,
    mask: Option<PrimitiveId>,
    /// Last op applied; each primitive kind only ever receives one op kind.
    paint: Option<PaintOp>,
    interactive: bool,
    listeners: BTreeMap<EventKind, EventHandler>,
}

/// A [`RenderBackend`] that keeps primitives in memory and exposes them for
/// inspection.
///
/// Ids are never reused, so a released id stays detectably dead.
#[derive(Default)]
pub struct HeadlessBackend {
    slots: Vec<Option<Primitive>>,
    released: usize,
    paint_ops: usize,
    emitted: usize,
}

impl core::fmt::Debug for HeadlessBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HeadlessBackend")
            .field("live", &self.live_count())
            .field("released", &self.released)
            .field("paint_ops", &self.paint_ops)
            .field("emitted", &self.emitted)
            .finish_non_exhaustive()
    }
}

impl HeadlessBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: PrimitiveId) -> Option<&mut Primitive> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Returns whether `id` is live.
    #[must_use]
    pub fn is_alive(&self, id: PrimitiveId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live primitives.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Number of primitives released so far.
    #[must_use]
    pub fn released_count(&self) -> usize {
        self.released
    }

    /// Number of paint ops applied so far.
    #[must_use]
    pub fn paint_count(&self) -> usize {
        self.paint_ops
    }

    /// Number of events delivered to a handler so far.
    #[must_use]
    pub fn emitted_count(&self) -> usize {
        self.emitted
    }

    /// Returns the kind of a live primitive.
    #[must_use]
    pub fn kind_of(&self, id: PrimitiveId) -> Option<PrimitiveKind> {
        self.get(id).map(|p| p.kind)
    }

    /// Returns the container holding `id`.
    #[must_use]
    pub fn parent_of(&self, id: PrimitiveId) -> Option<PrimitiveId> {
        self.get(id).and_then(|p| p.parent)
    }

    /// Returns the children of `id`, in paint order.
    #[must_use]
    pub fn children_of(&self, id: PrimitiveId) -> &[PrimitiveId] {
        self.get(id).map_or(&[], |p| &p.children)
    }

    /// Returns the mask clipping `id`.
    #[must_use]
    pub fn mask_of(&self, id: PrimitiveId) -> Option<PrimitiveId> {
        self.get(id).and_then(|p| p.mask)
    }

    /// Returns the last op applied to `id`.
    #[must_use]
    pub fn paint_of(&self, id: PrimitiveId) -> Option<&PaintOp> {
        self.get(id).and_then(|p| p.paint.as_ref())
    }

    /// Returns the transform, size, and opacity last applied to a root
    /// container.
    #[must_use]
    pub fn frame_of(&self, id: PrimitiveId) -> Option<(Affine, Size, f64)> {
        match self.paint_of(id)? {
            PaintOp::Frame {
                transform,
                size,
                opacity,
            } => Some((*transform, *size, *opacity)),
            _ => None,
        }
    }

    /// Returns whether `id` is a hit-test target.
    #[must_use]
    pub fn is_interactive(&self, id: PrimitiveId) -> bool {
        self.get(id).is_some_and(|p| p.interactive)
    }

    /// Returns the events `id` listens for.
    #[must_use]
    pub fn listeners_of(&self, id: PrimitiveId) -> Vec<EventKind> {
        self.get(id)
            .map(|p| p.listeners.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Renders the primitive tree under `root` as indented text, one
    /// primitive per line.
    ///
    /// ```text
    /// Container #0 [0, 0, 800×600]
    ///   Container #1
    ///     Container #3 [10, 0, 100×50]
    ///       Background #5 fill
    ///       Container #4
    /// ```
    #[must_use]
    pub fn dump(&self, root: PrimitiveId) -> String {
        let mut out = String::new();
        self.dump_into(root, 0, &mut out);
        out
    }

    fn dump_into(&self, id: PrimitiveId, depth: usize, out: &mut String) {
        let Some(p) = self.get(id) else {
            return;
        };
        let _ = write!(out, "{:indent$}{:?} #{}", "", p.kind, id.0, indent = depth * 2);
        match &p.paint {
            Some(PaintOp::Frame {
                transform, size, ..
            }) => {
                let t = transform.translation();
                let _ = write!(out, " [{}, {}, {}×{}]", t.x, t.y, size.width, size.height);
            }
            Some(PaintOp::Fill { .. }) => out.push_str(" fill"),
            Some(PaintOp::Stroke { width, .. }) => {
                let _ = write!(out, " stroke {width}");
            }
            Some(PaintOp::Image { source, .. }) => {
                let _ = write!(out, " image {source:?}");
            }
            Some(PaintOp::Text { content, .. }) => {
                let _ = write!(out, " text {content:?}");
            }
            Some(PaintOp::Mask { .. }) => out.push_str(" mask"),
            None => {}
        }
        out.push('\n');
        for &child in &p.children {
            self.dump_into(child, depth + 1, out);
        }
    }
}

impl RenderBackend for HeadlessBackend {
    fn create(&mut self, kind: PrimitiveKind) -> PrimitiveId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "primitive counts stay far below u32::MAX"
        )]
        let id = PrimitiveId(self.slots.len() as u32);
        self.slots.push(Some(Primitive {
            kind,
            parent: None,
            children: Vec::new(),
            mask: None,
            paint: None,
            interactive: false,
            listeners: BTreeMap::new(),
        }));
        id
    }

    fn release(&mut self, id: PrimitiveId) {
        let Some(p) = self.slots.get_mut(id.0 as usize).and_then(Option::take) else {
            return;
        };
        self.released += 1;
        if let Some(parent) = p.parent.and_then(|parent| self.get_mut(parent)) {
            parent.children.retain(|c| *c != id);
        }
        for child in p.children {
            if let Some(c) = self.get_mut(child) {
                c.parent = None;
            }
        }
    }

    fn insert_child(&mut self, parent: PrimitiveId, child: PrimitiveId, index: usize) {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return;
        }
        if let Some(old) = self.parent_of(child) {
            self.remove_child(old, child);
        }
        if let Some(p) = self.get_mut(parent) {
            let index = index.min(p.children.len());
            p.children.insert(index, child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn remove_child(&mut self, parent: PrimitiveId, child: PrimitiveId) {
        let Some(p) = self.get_mut(parent) else {
            return;
        };
        let before = p.children.len();
        p.children.retain(|c| *c != child);
        if p.children.len() != before
            && let Some(c) = self.get_mut(child)
        {
            c.parent = None;
        }
    }

    fn children(&self, parent: PrimitiveId) -> Vec<PrimitiveId> {
        self.children_of(parent).to_vec()
    }

    fn paint(&mut self, id: PrimitiveId, op: PaintOp) {
        if let Some(p) = self.get_mut(id) {
            p.paint = Some(op);
            self.paint_ops += 1;
        }
    }

    fn set_mask(&mut self, target: PrimitiveId, mask: Option<PrimitiveId>) {
        if let Some(p) = self.get_mut(target) {
            p.mask = mask;
        }
    }

    fn set_interactive(&mut self, id: PrimitiveId, interactive: bool) {
        if let Some(p) = self.get_mut(id) {
            p.interactive = interactive;
        }
    }

    fn add_listener(&mut self, id: PrimitiveId, kind: EventKind, handler: EventHandler) {
        if let Some(p) = self.get_mut(id) {
            p.listeners.insert(kind, handler);
        }
    }

    fn remove_listener(&mut self, id: PrimitiveId, kind: EventKind) {
        if let Some(p) = self.get_mut(id) {
            p.listeners.remove(&kind);
        }
    }

    fn emit(&mut self, id: PrimitiveId, event: &SurfaceEvent) -> usize {
        let Some(handler) = self
            .get(id)
            .and_then(|p| p.listeners.get(&event.kind))
            .cloned()
        else {
            return 0;
        };
        handler.call(event);
        self.emitted += 1;
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_moves_between_parents() {
        let mut b = HeadlessBackend::new();
        let p1 = b.create(PrimitiveKind::Container);
        let p2 = b.create(PrimitiveKind::Container);
        let c = b.create(PrimitiveKind::Background);
        b.insert_child(p1, c, 0);
        b.insert_child(p2, c, 5);
        assert!(b.children_of(p1).is_empty());
        assert_eq!(b.children_of(p2), [c]);
        assert_eq!(b.parent_of(c), Some(p2));
    }

    #[test]
    fn release_detaches_both_ways() {
        let mut b = HeadlessBackend::new();
        let p = b.create(PrimitiveKind::Container);
        let c = b.create(PrimitiveKind::Container);
        let g = b.create(PrimitiveKind::Text);
        b.insert_child(p, c, 0);
        b.insert_child(c, g, 0);
        b.release(c);
        b.release(c);
        assert!(!b.is_alive(c));
        assert!(b.children_of(p).is_empty());
        assert_eq!(b.parent_of(g), None);
        assert_eq!(b.released_count(), 1, "double release counts once");
        assert_eq!(b.live_count(), 2);
    }

    #[test]
    fn dump_shows_structure() {
        let mut b = HeadlessBackend::new();
        let root = b.create(PrimitiveKind::Container);
        let fill = b.create(PrimitiveKind::Background);
        b.insert_child(root, fill, 0);
        b.paint(
            root,
            PaintOp::Frame {
                transform: Affine::translate((10.0, 0.0)),
                size: Size::new(100.0, 50.0),
                opacity: 1.0,
            },
        );
        assert_eq!(
            b.dump(root),
            "Container #0 [10, 0, 100×50]\n  Background #1\n"
        );
    }
}
