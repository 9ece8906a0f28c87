// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-surface render primitives and the effect mounter.
//!
//! Every surface owns a root container holding, in paint order:
//!
//! ```text
//! root ─┬─ background   (if backgroundColor)
//!       ├─ image        (if backgroundImage)
//!       ├─ border       (if borderColor and a border width > 0)
//!       ├─ text         (text surfaces only)
//!       ├─ children     (child surfaces' roots)
//!       └─ mask         (if overflow: hidden, an image, or a rounded background)
//! ```
//!
//! The mask clips the children container. Effects are mounted lazily when
//! their predicate turns true and unmounted when it turns false; both
//! directions are idempotent.

use crate::backend::{PrimitiveId, PrimitiveKind, RenderBackend};
use crate::props::Literal;
use crate::surface::SurfaceKind;

/// An optional per-surface primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EffectKind {
    /// Background fill.
    Background,
    /// Background image.
    Image,
    /// Border stroke.
    Border,
    /// Clip mask over the children.
    Mask,
}

impl EffectKind {
    /// Every effect, in slot order.
    pub const ALL: [Self; 4] = [Self::Background, Self::Image, Self::Border, Self::Mask];

    const fn primitive(self) -> PrimitiveKind {
        match self {
            Self::Background => PrimitiveKind::Background,
            Self::Image => PrimitiveKind::Image,
            Self::Border => PrimitiveKind::Border,
            Self::Mask => PrimitiveKind::Mask,
        }
    }
}

pub(crate) const BORDER_WIDTH_KEYS: [&str; 7] = [
    "borderWidth",
    "borderTopWidth",
    "borderRightWidth",
    "borderBottomWidth",
    "borderLeftWidth",
    "borderHorizontalWidth",
    "borderVerticalWidth",
];

/// Which effects a surface wants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EffectSet {
    /// Background fill wanted.
    pub background: bool,
    /// Background image wanted.
    pub image: bool,
    /// Border wanted.
    pub border: bool,
    /// Mask wanted.
    pub mask: bool,
}

impl EffectSet {
    /// Evaluates the effect predicates over a live property view.
    #[must_use]
    pub fn from_live(live: impl Fn(&str) -> Option<Literal>) -> Self {
        let number = |key: &str| live(key).and_then(|v| v.as_number());
        let background = live("backgroundColor").is_some();
        let image = live("backgroundImage").is_some();
        let border = live("borderColor").is_some()
            && BORDER_WIDTH_KEYS
                .into_iter()
                .any(|k| number(k).is_some_and(|w| w > 0.0));
        let hidden = live("overflow").as_ref().and_then(Literal::as_str) == Some("hidden");
        let rounded = number("borderRadius").is_some_and(|r| r > 0.0);
        Self {
            background,
            image,
            border,
            mask: hidden || image || (background && rounded),
        }
    }

    /// Returns whether `kind` is wanted.
    #[must_use]
    pub fn wants(&self, kind: EffectKind) -> bool {
        match kind {
            EffectKind::Background => self.background,
            EffectKind::Image => self.image,
            EffectKind::Border => self.border,
            EffectKind::Mask => self.mask,
        }
    }
}

/// The primitives a surface owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Primitives {
    /// The root container, inserted into the parent's children container.
    pub root: PrimitiveId,
    /// The container holding child surfaces.
    pub children: PrimitiveId,
    /// Text content, for text surfaces.
    pub text: Option<PrimitiveId>,
    effects: [Option<PrimitiveId>; 4],
}

const fn slot(kind: EffectKind) -> usize {
    match kind {
        EffectKind::Background => 0,
        EffectKind::Image => 1,
        EffectKind::Border => 2,
        EffectKind::Mask => 3,
    }
}

impl Primitives {
    /// Creates the containers (and the text primitive for text surfaces).
    pub(crate) fn create(backend: &mut impl RenderBackend, kind: SurfaceKind) -> Self {
        let root = backend.create(PrimitiveKind::Container);
        let children = backend.create(PrimitiveKind::Container);
        let text = (kind == SurfaceKind::Text).then(|| backend.create(PrimitiveKind::Text));
        let mut index = 0;
        if let Some(t) = text {
            backend.insert_child(root, t, index);
            index += 1;
        }
        backend.insert_child(root, children, index);
        Self {
            root,
            children,
            text,
            effects: [None; 4],
        }
    }

    /// Returns the primitive for `kind`, if mounted.
    #[must_use]
    pub fn effect(&self, kind: EffectKind) -> Option<PrimitiveId> {
        self.effects[slot(kind)]
    }

    /// Index `kind` takes among the root container's present children.
    fn index_of(&self, kind: EffectKind) -> usize {
        let before_effects = self.effects[..slot(kind).min(3)]
            .iter()
            .filter(|p| p.is_some())
            .count();
        match kind {
            // After the three fills, the text primitive, and the children.
            EffectKind::Mask => before_effects + usize::from(self.text.is_some()) + 1,
            _ => before_effects,
        }
    }

    /// Mounts `kind` if absent. Returns whether it was mounted now.
    pub(crate) fn mount(&mut self, backend: &mut impl RenderBackend, kind: EffectKind) -> bool {
        if self.effect(kind).is_some() {
            return false;
        }
        let prim = backend.create(kind.primitive());
        let index = self.index_of(kind);
        backend.insert_child(self.root, prim, index);
        if kind == EffectKind::Mask {
            backend.set_mask(self.children, Some(prim));
        }
        self.effects[slot(kind)] = Some(prim);
        true
    }

    /// Unmounts `kind` if present. Returns whether it was unmounted now.
    pub(crate) fn unmount(&mut self, backend: &mut impl RenderBackend, kind: EffectKind) -> bool {
        let Some(prim) = self.effects[slot(kind)].take() else {
            return false;
        };
        if kind == EffectKind::Mask {
            backend.set_mask(self.children, None);
        }
        backend.remove_child(self.root, prim);
        backend.release(prim);
        true
    }

    /// Brings mounted effects in line with `wanted`, reporting each change.
    pub(crate) fn sync(
        &mut self,
        backend: &mut impl RenderBackend,
        wanted: EffectSet,
        mut changed: impl FnMut(EffectKind, bool),
    ) {
        for kind in EffectKind::ALL {
            if wanted.wants(kind) {
                if self.mount(backend, kind) {
                    changed(kind, true);
                }
            } else if self.unmount(backend, kind) {
                changed(kind, false);
            }
        }
    }

    /// Releases every primitive.
    pub(crate) fn release(self, backend: &mut impl RenderBackend) {
        let all = [Some(self.root), Some(self.children), self.text]
            .into_iter()
            .chain(self.effects)
            .flatten();
        for prim in all {
            backend.release(prim);
        }
    }
}
