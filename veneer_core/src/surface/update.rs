// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The property update pipeline.
//!
//! [`SurfaceTree::update_props`] merges a delta, diffs the bag twice (handler
//! keys by identity, everything else by value), reconciles listeners and
//! tween slots, and then routes every changed key to its consumers:
//!
//! - layout keys → [`translate`](crate::layout::translate::translate) →
//!   solver, marking `LAYOUT`;
//! - paint keys → `PAINT`, plus the effect mounter;
//! - inherited text keys → `CASCADE` (propagating to descendants);
//! - `text` content → `PAINT`, and a measure refresh before the next solve.
//!
//! Tween ticks reuse the same routing for the keys whose value moved.

use std::collections::BTreeMap;

use understory_dirty::EagerPolicy;
use veneer_tween::{AnimValue, SharedTween, TweenInstruction};

use super::id::NodeId;
use super::store::{SurfaceTree, TweenSlot};
use crate::backend::{EventKind, RenderBackend};
use crate::cascade::TextOverrides;
use crate::dirty;
use crate::effects::EffectSet;
use crate::error::SurfaceError;
use crate::layout::LayoutSolver;
use crate::layout::translate::translate;
use crate::props::keys::{TEXT_CONTENT, is_paint_key, is_text_key};
use crate::props::{
    KeyClass, Literal, PropValue, PropertyBag, PropertyDelta, PropertyDiff, diff, parse_anim,
};

/// Paint keys whose values must be colors.
const COLOR_KEYS: [&str; 2] = ["backgroundColor", "borderColor"];

impl<S: LayoutSolver, B: RenderBackend> SurfaceTree<S, B> {
    /// Applies a partial property update to a surface.
    ///
    /// `None` entries in `delta` remove their key. Instructions start or
    /// supersede tweens, `Tween` values bind external tweens, and literals
    /// stop whatever tween drove the key before.
    ///
    /// # Errors
    ///
    /// - [`SurfaceError::StaleNode`] if `id` is destroyed.
    /// - [`ConfigurationError`](crate::error::ConfigurationError) for an
    ///   unknown `on*` handler key, a value a layout or text property does not
    ///   accept, or an instruction with no resolvable duration.
    /// - [`SurfaceError::ArithmeticUnavailable`] when an instruction's values
    ///   cannot be interpolated.
    /// - [`SurfaceError::Layout`] if the solver rejects a constraint.
    ///
    /// A failed update leaves the bag as it was, so retrying it fails the
    /// same way.
    pub fn update_props(&mut self, id: NodeId, delta: &PropertyDelta) -> Result<(), SurfaceError> {
        let idx = self.check(id)?;
        let prev = self.node(idx).props.clone();
        let mut next = prev.clone();
        next.merge(delta);

        let handlers = diff(&prev, &next, KeyClass::Handler);
        for (key, _) in &handlers.added {
            EventKind::from_key(key).ok_or_else(|| SurfaceError::invalid(key, "unknown event"))?;
        }
        let values = diff(&prev, &next, KeyClass::Value);
        let has_handlers = next
            .iter()
            .any(|(k, v)| KeyClass::of(k) == KeyClass::Handler && matches!(v, PropValue::Handler(_)));

        // Values are applied against the merged bag, which only stays if
        // every key is accepted.
        let slots = self.node(idx).tweens.clone();
        self.node_mut(idx).props = next;
        if let Err(e) = self.apply_values(id, idx, &values) {
            self.roll_back(id, idx, prev, slots, &values);
            return Err(e);
        }

        self.apply_handlers(idx, &handlers, has_handlers);
        Ok(())
    }

    fn apply_values(&mut self, id: NodeId, idx: u32, values: &PropertyDiff) -> Result<(), SurfaceError> {
        for (key, _) in &values.removed {
            self.release_slot(id, idx, key);
        }
        for (key, value) in &values.added {
            self.apply_value(id, idx, key, value, None)?;
        }
        for (key, before, after) in &values.changed {
            self.apply_value(id, idx, key, after, Some(before))?;
        }

        let keys: Vec<&str> = values.keys().collect();
        self.route_changes(idx, &keys)
    }

    /// Restores the bag and tween slots a failed update started from, then
    /// re-routes the touched keys so the solver and primitives follow.
    ///
    /// Tweens the failed update created are stopped. A tween it already
    /// stopped or superseded stays that way.
    fn roll_back(
        &mut self,
        id: NodeId,
        idx: u32,
        props: PropertyBag,
        slots: BTreeMap<String, TweenSlot>,
        values: &PropertyDiff,
    ) {
        let current = core::mem::take(&mut self.node_mut(idx).tweens);
        for (key, slot) in &current {
            let kept = slots.get(key).is_some_and(|s| s.tween().ptr_eq(slot.tween()));
            if !kept {
                if let TweenSlot::Instructed(tween) = slot {
                    tween.stop();
                }
                self.scheduler.deregister(&id, key);
            }
        }
        for (key, slot) in &slots {
            self.scheduler.register(id, key, slot.tween());
        }
        let node = self.node_mut(idx);
        node.props = props;
        node.tweens = slots;

        // These values were accepted before the update, so routing them
        // again succeeds.
        let keys: Vec<&str> = values.keys().collect();
        let _ = self.route_changes(idx, &keys);
    }

    fn apply_handlers(&mut self, idx: u32, handlers: &PropertyDiff, interactive: bool) {
        let root = self.node(idx).prims.root;
        for (key, _) in &handlers.removed {
            if let Some(kind) = EventKind::from_key(key) {
                self.backend.remove_listener(root, kind);
            }
        }
        let installs = handlers
            .added
            .iter()
            .map(|(k, v)| (k, v))
            .chain(handlers.changed.iter().map(|(k, _, v)| (k, v)));
        for (key, value) in installs {
            match (EventKind::from_key(key), value) {
                (Some(kind), PropValue::Handler(handler)) => {
                    self.backend.add_listener(root, kind, handler.clone());
                }
                // A non-handler value under a handler key clears the listener.
                (Some(kind), _) => self.backend.remove_listener(root, kind),
                (None, _) => {}
            }
        }
        let node = self.node_mut(idx);
        if node.interactive != interactive {
            node.interactive = interactive;
            self.backend.set_interactive(root, interactive);
        }
    }

    fn apply_value(
        &mut self,
        id: NodeId,
        idx: u32,
        key: &str,
        value: &PropValue,
        before: Option<&PropValue>,
    ) -> Result<(), SurfaceError> {
        match value {
            PropValue::Instruction(instruction) => self.instruct_slot(id, idx, key, instruction, before),
            PropValue::Tween(tween) => {
                self.release_slot(id, idx, key);
                self.node_mut(idx)
                    .tweens
                    .insert(key.into(), TweenSlot::Bound(tween.clone()));
                self.scheduler.register(id, key, tween);
                Ok(())
            }
            PropValue::Literal(_) | PropValue::Handler(_) => {
                self.release_slot(id, idx, key);
                Ok(())
            }
        }
    }

    /// Applies an instruction to the slot for `key`, creating an
    /// instruction-driven tween when none exists or an external one is bound.
    fn instruct_slot(
        &mut self,
        id: NodeId,
        idx: u32,
        key: &str,
        instruction: &TweenInstruction<AnimValue>,
        before: Option<&PropValue>,
    ) -> Result<(), SurfaceError> {
        let tween_err = |e| SurfaceError::from_tween(key, e);
        if let Some(TweenSlot::Instructed(tween)) = self.node(idx).tweens.get(key) {
            if tween.last_instruction().as_ref() == Some(instruction) {
                return Ok(());
            }
            // Supersede. Pending completions carry over to the new target.
            let _completion = tween.instruct(instruction.clone()).map_err(tween_err)?;
            return Ok(());
        }

        // Without a target the tween eases back to the value the key held,
        // so `from` only seeds when nothing came before.
        let bound = self.node(idx).tweens.get(key).map(|s| s.tween().value());
        let seed = instruction
            .to
            .clone()
            .or(bound)
            .or_else(|| before.and_then(PropValue::as_literal).and_then(parse_anim))
            .or_else(|| instruction.from.clone())
            .ok_or_else(|| SurfaceError::ArithmeticUnavailable { key: key.into() })?;
        let tween = SharedTween::new(seed);
        let _completion = tween.instruct(instruction.clone()).map_err(tween_err)?;

        self.release_slot(id, idx, key);
        self.scheduler.register(id, key, &tween);
        self.node_mut(idx)
            .tweens
            .insert(key.into(), TweenSlot::Instructed(tween));
        Ok(())
    }

    /// Drops the tween slot for `key`: an instruction-driven tween is
    /// stopped, an external one is only unbound.
    pub(crate) fn release_slot(&mut self, id: NodeId, idx: u32, key: &str) {
        let Some(slot) = self.node_mut(idx).tweens.remove(key) else {
            return;
        };
        if let TweenSlot::Instructed(tween) = slot {
            tween.stop();
        }
        self.scheduler.deregister(&id, key);
    }

    /// Sends changed keys to layout, paint, effects, and the cascade.
    pub(crate) fn route_changes(&mut self, idx: u32, keys: &[&str]) -> Result<(), SurfaceError> {
        if keys.is_empty() {
            return Ok(());
        }

        let commands = {
            let live = |key: &str| self.live_at(idx, key);
            let supports = |setter: &str| self.solver.supports(setter);
            translate(keys.iter().copied(), &live, &supports)?
        };
        if !commands.is_empty() {
            let layout = self.node(idx).layout;
            for command in &commands {
                self.solver.apply(layout, command)?;
            }
            self.dirty.mark(idx, dirty::LAYOUT);
        }

        if keys.iter().any(|k| is_paint_key(k)) {
            for key in COLOR_KEYS {
                if keys.contains(&key)
                    && let Some(value) = self.live_at(idx, key)
                    && value.as_color().is_none()
                {
                    return Err(SurfaceError::invalid(key, value));
                }
            }
            self.dirty.mark(idx, dirty::PAINT);
            self.sync_effects(idx);
        }

        if keys.iter().any(|k| is_text_key(k)) {
            // Validate now so the cascade never sees a malformed field.
            TextOverrides::read(|key: &str| self.live_at(idx, key))?;
            self.dirty.mark_with(idx, dirty::CASCADE, &EagerPolicy);
        }

        if keys.contains(&TEXT_CONTENT) {
            if let Some(value) = self.live_at(idx, TEXT_CONTENT)
                && matches!(value, Literal::Array(_) | Literal::Color(_))
            {
                return Err(SurfaceError::invalid(TEXT_CONTENT, value));
            }
            self.dirty.mark(idx, dirty::PAINT);
        }
        Ok(())
    }

    /// Mounts and unmounts effect primitives to match the live properties.
    fn sync_effects(&mut self, idx: u32) {
        let wanted = EffectSet::from_live(|key: &str| self.live_at(idx, key));
        let id = self.id_at(idx);
        let mut prims = self.node(idx).prims;
        let lifecycle = &mut self.lifecycle;
        prims.sync(&mut self.backend, wanted, |kind, mounted| {
            if mounted {
                lifecycle.mounted.push((id, kind));
            } else {
                lifecycle.unmounted.push((id, kind));
            }
        });
        self.node_mut(idx).prims = prims;
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use core::time::Duration;
    use std::rc::Rc;

    use veneer_tween::{Color, TweenState};

    use crate::backend::{EventKind, RenderBackend, SurfaceEvent};
    use crate::effects::EffectKind;
    use crate::error::{ConfigurationError, SurfaceError};
    use crate::props::{EventHandler, Literal, PropertyDelta};
    use crate::surface::SurfaceKind;
    use crate::testing::tree;
    use veneer_tween::{AnimValue, SharedTween, TweenInstruction};

    fn scalar_to(to: f64, ms: u64) -> TweenInstruction<AnimValue> {
        TweenInstruction::to(AnimValue::Scalar(to)).with_duration(Duration::from_millis(ms))
    }

    #[test]
    fn background_mounts_and_unmounts() {
        let mut tree = tree();
        let id = tree.create_node(SurfaceKind::View).unwrap();
        tree.update_props(id, &PropertyDelta::new().set("backgroundColor", "#ff0000"))
            .unwrap();
        assert!(tree.primitives(id).effect(EffectKind::Background).is_some());
        tree.update_props(id, &PropertyDelta::new().unset("backgroundColor"))
            .unwrap();
        assert!(tree.primitives(id).effect(EffectKind::Background).is_none());
        let log = tree.take_lifecycle();
        assert_eq!(log.mounted, [(id, EffectKind::Background)]);
        assert_eq!(log.unmounted, [(id, EffectKind::Background)]);
    }

    #[test]
    fn bad_colors_are_rejected() {
        let mut tree = tree();
        let id = tree.create_node(SurfaceKind::View).unwrap();
        let err = tree
            .update_props(id, &PropertyDelta::new().set("backgroundColor", "plaid"))
            .unwrap_err();
        assert!(
            matches!(
                err,
                SurfaceError::Configuration(ConfigurationError::InvalidPropertyValue { .. })
            ),
            "{err:?}"
        );
    }

    #[test]
    fn handlers_toggle_interactivity() {
        let mut tree = tree();
        let id = tree.create_node(SurfaceKind::View).unwrap();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let handler = EventHandler::new(move |_| counter.set(counter.get() + 1));
        tree.update_props(id, &PropertyDelta::new().set("onClick", handler))
            .unwrap();
        assert!(tree.is_interactive(id));

        let event = SurfaceEvent {
            kind: EventKind::Click,
            target: id,
            position: None,
            size: kurbo::Size::ZERO,
        };
        let root = tree.primitives(id).root;
        assert_eq!(tree.backend_mut().emit(root, &event), 1);
        assert_eq!(hits.get(), 1);

        tree.update_props(id, &PropertyDelta::new().unset("onClick"))
            .unwrap();
        assert!(!tree.is_interactive(id));
        assert_eq!(tree.backend_mut().emit(root, &event), 0);
    }

    #[test]
    fn unknown_handler_keys_change_nothing() {
        let mut tree = tree();
        let id = tree.create_node(SurfaceKind::View).unwrap();
        let delta = PropertyDelta::new()
            .set("onHover", EventHandler::new(|_| {}))
            .set("opacity", 0.5);
        assert!(tree.update_props(id, &delta).is_err(), "onHover is not an event");
        assert!(tree.props(id).is_empty());
    }

    #[test]
    fn instructions_create_and_supersede_tweens() {
        let mut tree = tree();
        let id = tree.create_node(SurfaceKind::View).unwrap();
        let from_zero = scalar_to(100.0, 1000);
        let from_zero = TweenInstruction {
            from: Some(AnimValue::Scalar(0.0)),
            ..from_zero
        };
        tree.update_props(id, &PropertyDelta::new().set("opacity", from_zero.clone()))
            .unwrap();
        let tween = tree.tween(id, "opacity").expect("instruction creates a tween");
        assert_eq!(tween.state(), TweenState::Animating);
        assert_eq!(tree.live_value(id, "opacity"), Some(Literal::Number(0.0)));

        // The same instruction again does not restart the tween.
        tree.update_props(id, &PropertyDelta::new().set("opacity", from_zero))
            .unwrap();
        assert!(tree.tween(id, "opacity").unwrap().ptr_eq(&tween));

        // A literal stops and drops it.
        tree.update_props(id, &PropertyDelta::new().set("opacity", 0.25))
            .unwrap();
        assert!(tree.tween(id, "opacity").is_none());
        assert_eq!(tween.state(), TweenState::Idle, "stopped tweens freeze");
        assert_eq!(tree.live_value(id, "opacity"), Some(Literal::Number(0.25)));
    }

    #[test]
    fn instructions_need_a_duration() {
        let mut tree = tree();
        let id = tree.create_node(SurfaceKind::View).unwrap();
        let err = tree
            .update_props(
                id,
                &PropertyDelta::new().set("width", TweenInstruction::to(AnimValue::Scalar(10.0))),
            )
            .unwrap_err();
        assert_eq!(
            err,
            SurfaceError::Configuration(ConfigurationError::MissingDuration {
                key: "width".into()
            })
        );
    }

    #[test]
    fn bound_tweens_are_shared_not_stopped() {
        let mut tree = tree();
        let a = tree.create_node(SurfaceKind::View).unwrap();
        let b = tree.create_node(SurfaceKind::View).unwrap();
        let shared = SharedTween::new(AnimValue::Color(Color::BLACK));
        for id in [a, b] {
            tree.update_props(id, &PropertyDelta::new().set("backgroundColor", shared.clone()))
                .unwrap();
        }
        assert_eq!(
            tree.live_value(a, "backgroundColor"),
            Some(Literal::Color(Color::BLACK))
        );
        let _done = shared
            .to(
                AnimValue::Color(Color::rgb(255.0, 255.0, 255.0)),
                veneer_tween::TweenOptions::duration(Duration::from_millis(100)),
            )
            .unwrap();
        tree.update_props(a, &PropertyDelta::new().unset("backgroundColor"))
            .unwrap();
        assert!(shared.is_active(), "unbinding leaves an external tween running");
        assert!(tree.tween(b, "backgroundColor").unwrap().ptr_eq(&shared));
    }

    #[test]
    fn text_fields_are_validated() {
        let mut tree = tree();
        let id = tree.create_node(SurfaceKind::Text).unwrap();
        assert!(
            tree.update_props(id, &PropertyDelta::new().set("textAlign", "diagonal"))
                .is_err(),
            "unknown alignment"
        );
        tree.update_props(id, &PropertyDelta::new().set("textAlign", "center"))
            .unwrap();
    }

    #[test]
    fn from_instructions_ease_back_to_the_previous_value() {
        let mut tree = tree();
        let id = tree.create_node(SurfaceKind::View).unwrap();
        tree.update_props(id, &PropertyDelta::new().set("opacity", 1.0))
            .unwrap();
        let back = TweenInstruction::from_value(AnimValue::Scalar(0.0))
            .with_duration(Duration::from_millis(100));
        tree.update_props(id, &PropertyDelta::new().set("opacity", back))
            .unwrap();
        assert_eq!(tree.live_value(id, "opacity"), Some(Literal::Number(0.0)));

        let tween = tree.tween(id, "opacity").unwrap();
        assert!(tween.advance(Duration::from_millis(50)));
        assert_eq!(tree.live_value(id, "opacity"), Some(Literal::Number(0.5)));
        assert!(tween.advance(Duration::from_millis(100)));
        assert_eq!(tree.live_value(id, "opacity"), Some(Literal::Number(1.0)));
    }

    #[test]
    fn rejected_updates_leave_the_bag_as_it_was() {
        let mut tree = tree();
        let id = tree.create_node(SurfaceKind::View).unwrap();
        tree.update_props(id, &PropertyDelta::new().set("backgroundColor", "#ff0000"))
            .unwrap();
        let before = tree.props(id).clone();

        let fade = scalar_to(0.0, 100);
        // Neither end is given and the key had no value to start from.
        let nowhere = TweenInstruction::<AnimValue> {
            from: None,
            to: None,
            speed: None,
            options: veneer_tween::TweenOptions::NONE,
        }
        .with_duration(Duration::from_millis(100));
        let rejected = [
            PropertyDelta::new()
                .set("backgroundColor", "plaid")
                .set("opacity", fade.clone())
                .set("width", 40.0),
            PropertyDelta::new()
                .set("flexDirection", "sideways")
                .set("opacity", fade),
            PropertyDelta::new().set("width", 40.0).set("height", nowhere),
        ];
        for delta in &rejected {
            let first = tree.update_props(id, delta).unwrap_err();
            assert_eq!(tree.props(id), &before);
            assert!(tree.tween(id, "opacity").is_none(), "{first:?}");
            assert!(!tree.has_active_tweens(), "tweens the update created are stopped");
            assert_eq!(tree.live_value(id, "width"), None);

            let retry = tree.update_props(id, delta).unwrap_err();
            assert_eq!(retry, first, "a retry fails the same way");
        }
        assert!(tree.primitives(id).effect(EffectKind::Background).is_some());
    }
}
