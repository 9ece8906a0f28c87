// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-time evaluation: tween routing, text cascade, layout, and repaint.
//!
//! The [`FrameDriver`](crate::frame::FrameDriver) calls the three phases in
//! order. Each phase drains the dirty channels it owns:
//!
//! 1. [`advance_tweens`](SurfaceTree::advance_tweens) ticks the scheduler and
//!    routes every moved property exactly like a host update would.
//! 2. [`solve_layout`](SurfaceTree::solve_layout) settles the cascade,
//!    refreshes text measures, and solves once if `LAYOUT` or `TOPOLOGY`
//!    holds anything.
//! 3. [`repaint`](SurfaceTree::repaint) walks the attached tree in paint
//!    order and re-applies boxes and paint properties where needed.

use core::time::Duration;

use kurbo::{Affine, Point, Rect, RoundedRect};
use veneer_tween::TweenChange;

use super::id::{INVALID, NodeId, SurfaceKind};
use super::store::SurfaceTree;
use crate::backend::{EventKind, ImageFit, PaintOp, PrimitiveId, RenderBackend, SurfaceEvent};
use crate::cascade::{CascadeEntry, ROOT_FINGERPRINT, TextOverrides, TextStyle};
use crate::dirty;
use crate::effects::{BORDER_WIDTH_KEYS, EffectKind};
use crate::error::SurfaceError;
use crate::layout::{LayoutSolver, TextMeasure};
use crate::props::Literal;
use crate::props::keys::TEXT_CONTENT;

/// Image alignment when `imagePosition` is unset.
const CENTER: Point = Point::new(0.5, 0.5);

impl<S: LayoutSolver, B: RenderBackend> SurfaceTree<S, B> {
    /// Returns the effective text style of a surface: its own text fields
    /// over its parent's effective style.
    ///
    /// Styles are memoized per surface and recomputed only after an inherited
    /// field changed on the surface or one of its ancestors.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn text_style(&mut self, id: NodeId) -> TextStyle {
        self.validate(id);
        self.refresh_cascade();
        self.cascade_at(id.idx).0
    }

    /// Returns the topmost interactive surface whose last painted box
    /// contains `point` (root coordinates).
    ///
    /// Later siblings paint over earlier ones and children over their parent,
    /// so the walk runs the last repaint's order back to front.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        self.paint_order
            .iter()
            .rev()
            .copied()
            .find(|&idx| {
                self.nodes
                    .get(idx as usize)
                    .and_then(Option::as_ref)
                    .is_some_and(|n| n.interactive && n.world.contains(point))
            })
            .map(|idx| self.id_at(idx))
    }

    /// Delivers an event to the handler a surface registered for `kind`.
    /// Returns the number of handlers invoked.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::StaleNode`] if `id` is destroyed.
    pub fn dispatch(
        &mut self,
        id: NodeId,
        kind: EventKind,
        position: Option<Point>,
    ) -> Result<usize, SurfaceError> {
        let idx = self.check(id)?;
        let node = self.node(idx);
        let event = SurfaceEvent {
            kind,
            target: id,
            position,
            size: node.local.size(),
        };
        let root = node.prims.root;
        Ok(self.backend.emit(root, &event))
    }

    /// Advances every bound tween by `dt` and routes the properties that
    /// moved.
    pub(crate) fn advance_tweens(
        &mut self,
        dt: Duration,
    ) -> Result<Vec<TweenChange<NodeId>>, SurfaceError> {
        let changes = self.scheduler.tick(dt);
        for change in &changes {
            // An owner destroyed by a completion callback has nothing to route.
            let Ok(idx) = self.check(change.owner) else {
                continue;
            };
            self.route_changes(idx, &[change.property.as_str()])?;
        }
        Ok(changes)
    }

    /// Refreshes text measures and solves the tree if any constraint or the
    /// topology changed. Returns whether a solve ran.
    pub(crate) fn solve_layout(&mut self) -> Result<bool, SurfaceError> {
        self.refresh_cascade();
        self.sync_text()?;

        let layout: Vec<u32> = self
            .dirty
            .drain(dirty::LAYOUT)
            .deterministic()
            .run()
            .collect();
        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        if layout.is_empty() && topology.is_empty() {
            return Ok(false);
        }
        let root = self.node(self.root.idx).layout;
        self.solver.calculate(root, self.viewport)?;
        Ok(true)
    }

    /// Re-applies boxes and paint properties to every attached surface whose
    /// box moved, whose paint properties changed, or that was never painted.
    /// Returns the repainted surfaces in paint order.
    pub(crate) fn repaint(&mut self) -> Result<Vec<NodeId>, SurfaceError> {
        let mut marked = vec![false; self.len as usize];
        for idx in self.dirty.drain(dirty::PAINT).deterministic().run() {
            marked[idx as usize] = true;
        }

        let order = self.preorder(self.root.idx);
        let mut repainted = Vec::new();
        for &idx in &order {
            let local = self.solver.computed_box(self.node(idx).layout)?;
            let p = self.parent[idx as usize];
            let origin = if p == INVALID {
                Point::ZERO
            } else {
                self.node(p).world.origin()
            };
            let world = local + origin.to_vec2();

            let (stale, resized) = {
                let node = self.node(idx);
                (
                    marked[idx as usize] || !node.painted || node.local != local,
                    node.local.size() != local.size(),
                )
            };
            if stale {
                for (prim, op) in self.paint_ops(idx, local) {
                    self.backend.paint(prim, op);
                }
                repainted.push(self.id_at(idx));
            }

            let node = self.node_mut(idx);
            node.local = local;
            node.world = world;
            node.painted = true;
            if resized {
                let root = node.prims.root;
                let event = SurfaceEvent {
                    kind: EventKind::SizeChanged,
                    target: self.id_at(idx),
                    position: None,
                    size: local.size(),
                };
                self.backend.emit(root, &event);
            }
        }
        self.paint_order = order;
        Ok(repainted)
    }

    /// Flags every surface whose effective style may have moved.
    fn refresh_cascade(&mut self) {
        let affected: Vec<u32> = self
            .dirty
            .drain(dirty::CASCADE)
            .affected()
            .deterministic()
            .run()
            .collect();
        for idx in affected {
            if let Some(node) = self.nodes.get_mut(idx as usize).and_then(Option::as_mut) {
                node.cascade_stale = true;
            }
        }
    }

    /// Effective style and fingerprint at `idx`, resolving stale ancestors
    /// first.
    fn cascade_at(&mut self, idx: u32) -> (TextStyle, u64) {
        {
            let node = self.node(idx);
            if !node.cascade_stale
                && let Some(entry) = &node.cascade
            {
                return (entry.style.clone(), entry.fingerprint);
            }
        }
        let p = self.parent[idx as usize];
        let (parent_style, parent_fingerprint) = if p == INVALID {
            (TextStyle::default(), ROOT_FINGERPRINT)
        } else {
            self.cascade_at(p)
        };
        // Malformed fields never reach the bag, so defaults only cover
        // unset ones.
        let own = TextOverrides::read(|key: &str| self.live_at(idx, key)).unwrap_or_default();
        let (entry, _) = CascadeEntry::resolve(
            self.node(idx).cascade.as_ref(),
            &own,
            (&parent_style, parent_fingerprint),
        );
        let out = (entry.style.clone(), entry.fingerprint);
        let node = self.node_mut(idx);
        node.cascade = Some(entry);
        node.cascade_stale = false;
        out
    }

    /// Pushes content and style changes of text surfaces to their measure.
    fn sync_text(&mut self) -> Result<(), SurfaceError> {
        for idx in 0..self.len {
            let is_text = self.nodes[idx as usize]
                .as_ref()
                .is_some_and(|n| n.kind == SurfaceKind::Text);
            if !is_text {
                continue;
            }
            let content = self.text_content(idx);
            let (style, _) = self.cascade_at(idx);
            let measure = TextMeasure::new(content.clone(), &style);
            let text = Some((content, style));
            if self.node(idx).text != text {
                self.node_mut(idx).text = text;
                self.dirty.mark(idx, dirty::PAINT);
            }
            if self.node(idx).measure.as_ref() != Some(&measure) {
                let layout = self.node(idx).layout;
                self.solver.set_measure(layout, Some(measure.clone()))?;
                self.node_mut(idx).measure = Some(measure);
                self.dirty.mark(idx, dirty::LAYOUT);
            }
        }
        Ok(())
    }

    fn text_content(&self, idx: u32) -> String {
        match self.live_at(idx, TEXT_CONTENT) {
            Some(Literal::Number(n)) => n.to_string(),
            Some(Literal::Bool(b)) => b.to_string(),
            Some(literal) => literal.as_str().map(str::to_owned).unwrap_or_default(),
            None => String::new(),
        }
    }

    /// The paint ops for one surface laid out at `local`.
    fn paint_ops(&self, idx: u32, local: Rect) -> Vec<(PrimitiveId, PaintOp)> {
        let node = self.node(idx);
        let live = |key: &str| self.live_at(idx, key);
        let number = |key: &str| live(key).and_then(|v| v.as_number());
        let size = local.size();
        let mut ops = Vec::new();

        ops.push((
            node.prims.root,
            PaintOp::Frame {
                transform: frame_transform(local, &number),
                size,
                opacity: number("opacity").unwrap_or(1.0).clamp(0.0, 1.0),
            },
        ));

        let radius = number("borderRadius").unwrap_or(0.0).max(0.0);
        let shape = RoundedRect::from_rect(size.to_rect(), radius);
        if let Some(prim) = node.prims.effect(EffectKind::Background)
            && let Some(color) = live("backgroundColor").and_then(|v| v.as_color())
        {
            ops.push((prim, PaintOp::Fill { shape, color }));
        }
        if let Some(prim) = node.prims.effect(EffectKind::Image)
            && let Some(source) = live("backgroundImage").and_then(|v| v.as_str().map(str::to_owned))
        {
            let fit = live("imageFit")
                .and_then(|v| v.as_str().and_then(ImageFit::parse))
                .unwrap_or_default();
            ops.push((
                prim,
                PaintOp::Image {
                    source,
                    fit,
                    position: image_position(live("imagePosition")),
                    shape,
                },
            ));
        }
        if let Some(prim) = node.prims.effect(EffectKind::Border)
            && let Some(color) = live("borderColor").and_then(|v| v.as_color())
        {
            let width = BORDER_WIDTH_KEYS
                .into_iter()
                .filter_map(number)
                .fold(0.0, f64::max);
            ops.push((prim, PaintOp::Stroke { shape, color, width }));
        }
        if let (Some(prim), Some((content, style))) = (node.prims.text, &node.text) {
            ops.push((
                prim,
                PaintOp::Text {
                    content: content.clone(),
                    style: style.clone(),
                    bounds: size.to_rect(),
                },
            ));
        }
        if let Some(prim) = node.prims.effect(EffectKind::Mask) {
            ops.push((prim, PaintOp::Mask { shape }));
        }
        ops
    }
}

/// Places a box at its offset and applies rotation, skew, and scale about
/// its center. Angles are in degrees.
fn frame_transform(local: Rect, number: impl Fn(&str) -> Option<f64>) -> Affine {
    let scale = number("scale").unwrap_or(1.0);
    let scale_x = scale * number("scaleX").unwrap_or(1.0);
    let scale_y = scale * number("scaleY").unwrap_or(1.0);
    let rotation = number("rotation").unwrap_or(0.0).to_radians();
    let skew_x = number("skewX").unwrap_or(0.0).to_radians().tan();
    let skew_y = number("skewY").unwrap_or(0.0).to_radians().tan();
    let center = local.size().to_vec2() / 2.0;
    Affine::translate(local.origin().to_vec2() + center)
        * Affine::rotate(rotation)
        * Affine::skew(skew_x, skew_y)
        * Affine::scale_non_uniform(scale_x, scale_y)
        * Affine::translate(-center)
}

fn image_position(value: Option<Literal>) -> Point {
    let Some(Literal::Array(items)) = value else {
        return CENTER;
    };
    match items.as_slice() {
        [x, y] => Point::new(
            x.as_number().unwrap_or(CENTER.x),
            y.as_number().unwrap_or(CENTER.y),
        ),
        _ => CENTER,
    }
}
