// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory backend for unit tests.

use std::collections::BTreeMap;

use kurbo::Size;

use crate::backend::{EventKind, PaintOp, PrimitiveId, PrimitiveKind, RenderBackend, SurfaceEvent};
use crate::layout::TaffySolver;
use crate::props::EventHandler;
use crate::surface::SurfaceTree;

#[derive(Debug)]
struct Prim {
    kind: PrimitiveKind,
    children: Vec<PrimitiveId>,
    mask: Option<PrimitiveId>,
    paint: Vec<PaintOp>,
    interactive: bool,
    listeners: BTreeMap<EventKind, EventHandler>,
}

/// Records every primitive and the last paint ops applied to it.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    prims: BTreeMap<PrimitiveId, Prim>,
    next: u32,
}

impl RecordingBackend {
    pub(crate) fn live_count(&self) -> usize {
        self.prims.len()
    }

    pub(crate) fn mask_of(&self, id: PrimitiveId) -> Option<PrimitiveId> {
        self.prims.get(&id).and_then(|p| p.mask)
    }

    pub(crate) fn kind_of(&self, id: PrimitiveId) -> Option<PrimitiveKind> {
        self.prims.get(&id).map(|p| p.kind)
    }

    /// Paint ops applied to `id` since it was last cleared.
    pub(crate) fn paint_of(&self, id: PrimitiveId) -> &[PaintOp] {
        self.prims.get(&id).map_or(&[], |p| &p.paint)
    }

    pub(crate) fn clear_paint(&mut self) {
        for p in self.prims.values_mut() {
            p.paint.clear();
        }
    }

    pub(crate) fn is_interactive(&self, id: PrimitiveId) -> bool {
        self.prims.get(&id).is_some_and(|p| p.interactive)
    }
}

impl RenderBackend for RecordingBackend {
    fn create(&mut self, kind: PrimitiveKind) -> PrimitiveId {
        let id = PrimitiveId(self.next);
        self.next += 1;
        self.prims.insert(
            id,
            Prim {
                kind,
                children: Vec::new(),
                mask: None,
                paint: Vec::new(),
                interactive: false,
                listeners: BTreeMap::new(),
            },
        );
        id
    }

    fn release(&mut self, id: PrimitiveId) {
        self.prims.remove(&id);
    }

    fn insert_child(&mut self, parent: PrimitiveId, child: PrimitiveId, index: usize) {
        let Some(p) = self.prims.get_mut(&parent) else {
            return;
        };
        p.children.retain(|c| *c != child);
        let index = index.min(p.children.len());
        p.children.insert(index, child);
    }

    fn remove_child(&mut self, parent: PrimitiveId, child: PrimitiveId) {
        if let Some(p) = self.prims.get_mut(&parent) {
            p.children.retain(|c| *c != child);
        }
    }

    fn children(&self, parent: PrimitiveId) -> Vec<PrimitiveId> {
        self.prims
            .get(&parent)
            .map(|p| p.children.clone())
            .unwrap_or_default()
    }

    fn paint(&mut self, id: PrimitiveId, op: PaintOp) {
        if let Some(p) = self.prims.get_mut(&id) {
            p.paint.push(op);
        }
    }

    fn set_mask(&mut self, target: PrimitiveId, mask: Option<PrimitiveId>) {
        if let Some(p) = self.prims.get_mut(&target) {
            p.mask = mask;
        }
    }

    fn set_interactive(&mut self, id: PrimitiveId, interactive: bool) {
        if let Some(p) = self.prims.get_mut(&id) {
            p.interactive = interactive;
        }
    }

    fn add_listener(&mut self, id: PrimitiveId, kind: EventKind, handler: EventHandler) {
        if let Some(p) = self.prims.get_mut(&id) {
            p.listeners.insert(kind, handler);
        }
    }

    fn remove_listener(&mut self, id: PrimitiveId, kind: EventKind) {
        if let Some(p) = self.prims.get_mut(&id) {
            p.listeners.remove(&kind);
        }
    }

    fn emit(&mut self, id: PrimitiveId, event: &SurfaceEvent) -> usize {
        let Some(handler) = self
            .prims
            .get(&id)
            .and_then(|p| p.listeners.get(&event.kind))
            .cloned()
        else {
            return 0;
        };
        handler.call(event);
        1
    }
}

/// An 800×600 tree over taffy and the recording backend.
pub(crate) fn tree() -> SurfaceTree<TaffySolver, RecordingBackend> {
    SurfaceTree::new(
        TaffySolver::new(),
        RecordingBackend::default(),
        Size::new(800.0, 600.0),
    )
    .unwrap()
}
