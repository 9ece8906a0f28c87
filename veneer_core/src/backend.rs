// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render backend contract.
//!
//! Veneer keeps each surface's drawing as a small retained tree of render
//! *primitives*: a root container, a children container, optional effect
//! primitives (background, image, border, mask) and, for text surfaces, a
//! text primitive. A backend crate implements [`RenderBackend`] to host that
//! tree on a real target (a scene graph, a GPU renderer, or an in-memory
//! model for tests).
//!
//! # Crate boundaries
//!
//! `veneer_core` owns the surface tree, layout, animation, and this contract.
//! Backend crates depend on `veneer_core` and provide the primitive store.
//! The tree drives the backend: it creates and orders primitives on every
//! structural mutation and issues [`PaintOp`]s during repaint.
//!
//! ```rust,ignore
//! let mut tree = SurfaceTree::new(TaffySolver::new(), HeadlessBackend::new(), viewport);
//! let node = tree.create_node(SurfaceKind::View)?;
//! tree.append_child(tree.root(), node)?;
//! tree.update_props(node, &PropertyDelta::new().set("backgroundColor", "#f00"))?;
//! driver.flush(&mut tree, &mut Tracer::none())?;
//! ```

use kurbo::{Affine, Point, Rect, RoundedRect, Size};
use veneer_tween::Color;

use crate::cascade::TextStyle;
use crate::props::EventHandler;
use crate::surface::NodeId;

/// A handle to a primitive owned by a [`RenderBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimitiveId(pub u32);

/// The role a primitive plays inside a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// A surface's root container or its children container.
    Container,
    /// A background fill.
    Background,
    /// A background image.
    Image,
    /// A border stroke.
    Border,
    /// Text content.
    Text,
    /// A clip mask.
    Mask,
}

/// How an image fills its box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageFit {
    /// Stretch to the box.
    #[default]
    Fill,
    /// Scale uniformly to fit inside the box.
    Contain,
    /// Scale uniformly to cover the box.
    Cover,
    /// Natural size.
    None,
}

impl ImageFit {
    /// Parses a fit keyword.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "fill" => Self::Fill,
            "contain" => Self::Contain,
            "cover" => Self::Cover,
            "none" => Self::None,
            _ => return None,
        })
    }
}

/// A drawing command applied to one primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintOp {
    /// Positions a surface's root container relative to its parent surface.
    Frame {
        /// Translation, rotation, scale, and skew about the box center.
        transform: Affine,
        /// The computed box size.
        size: Size,
        /// Opacity in `[0, 1]`.
        opacity: f64,
    },
    /// Fills a shape.
    Fill {
        /// The shape, in surface-local coordinates.
        shape: RoundedRect,
        /// Fill color.
        color: Color,
    },
    /// Strokes a shape's outline.
    Stroke {
        /// The shape, in surface-local coordinates.
        shape: RoundedRect,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f64,
    },
    /// Draws an image.
    Image {
        /// Image source, passed through to the backend untouched.
        source: String,
        /// Fit mode.
        fit: ImageFit,
        /// Alignment within the box, each axis in `[0, 1]`.
        position: Point,
        /// Destination shape.
        shape: RoundedRect,
    },
    /// Sets the clip shape of a mask primitive.
    Mask {
        /// The clip shape, in surface-local coordinates.
        shape: RoundedRect,
    },
    /// Lays out text.
    Text {
        /// Text content.
        content: String,
        /// Effective (cascaded) style.
        style: TextStyle,
        /// Layout bounds.
        bounds: Rect,
    },
}

/// Event categories a surface can listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    /// Primary button click.
    Click,
    /// Secondary button click.
    RightClick,
    /// Button press.
    MouseDown,
    /// Button release.
    MouseUp,
    /// Pointer entered the surface.
    MouseEnter,
    /// Pointer left the surface.
    MouseLeave,
    /// The surface's computed size changed.
    SizeChanged,
}

impl EventKind {
    /// Every event kind.
    pub const ALL: [Self; 7] = [
        Self::Click,
        Self::RightClick,
        Self::MouseDown,
        Self::MouseUp,
        Self::MouseEnter,
        Self::MouseLeave,
        Self::SizeChanged,
    ];

    /// Maps an `onXxx` handler key to its event kind.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    /// The handler key for this event.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Click => "onClick",
            Self::RightClick => "onRightClick",
            Self::MouseDown => "onMouseDown",
            Self::MouseUp => "onMouseUp",
            Self::MouseEnter => "onMouseEnter",
            Self::MouseLeave => "onMouseLeave",
            Self::SizeChanged => "onSizeChanged",
        }
    }

    /// The backend event name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::RightClick => "right-click",
            Self::MouseDown => "mouse-down",
            Self::MouseUp => "mouse-up",
            Self::MouseEnter => "mouse-enter",
            Self::MouseLeave => "mouse-leave",
            Self::SizeChanged => "size-changed",
        }
    }
}

/// An event delivered to a surface's handlers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceEvent {
    /// What happened.
    pub kind: EventKind,
    /// The surface the event targets.
    pub target: NodeId,
    /// Pointer position in root coordinates, for pointer events.
    pub position: Option<Point>,
    /// The surface's computed size at dispatch time.
    pub size: Size,
}

/// Hosts render primitives for a [`SurfaceTree`](crate::surface::SurfaceTree).
///
/// Child order inside a container is paint order: later children draw on top.
pub trait RenderBackend {
    /// Creates a detached primitive.
    fn create(&mut self, kind: PrimitiveKind) -> PrimitiveId;

    /// Destroys a primitive. Its children are not destroyed.
    fn release(&mut self, id: PrimitiveId);

    /// Inserts `child` into `parent` at `index`, clamped to the child count.
    /// A child already in `parent` is moved.
    fn insert_child(&mut self, parent: PrimitiveId, child: PrimitiveId, index: usize);

    /// Removes `child` from `parent`. Removing a non-child is a no-op.
    fn remove_child(&mut self, parent: PrimitiveId, child: PrimitiveId);

    /// Returns the children of `parent`, in paint order.
    fn children(&self, parent: PrimitiveId) -> Vec<PrimitiveId>;

    /// Applies a drawing command.
    fn paint(&mut self, id: PrimitiveId, op: PaintOp);

    /// Clips `target` with `mask`, or removes the clip.
    fn set_mask(&mut self, target: PrimitiveId, mask: Option<PrimitiveId>);

    /// Marks a primitive as a hit-test target.
    fn set_interactive(&mut self, id: PrimitiveId, interactive: bool);

    /// Registers `handler` for `kind`, replacing any previous handler.
    fn add_listener(&mut self, id: PrimitiveId, kind: EventKind, handler: EventHandler);

    /// Unregisters the handler for `kind`.
    fn remove_listener(&mut self, id: PrimitiveId, kind: EventKind);

    /// Delivers `event` to the handler registered on `id`. Returns the number
    /// of handlers invoked.
    fn emit(&mut self, id: PrimitiveId, event: &SurfaceEvent) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_keys_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(EventKind::from_key("onHover"), None);
        assert_eq!(EventKind::RightClick.name(), "right-click");
    }

    #[test]
    fn fit_keywords() {
        assert_eq!(ImageFit::parse("cover"), Some(ImageFit::Cover));
        assert_eq!(ImageFit::parse("stretch"), None);
    }
}
