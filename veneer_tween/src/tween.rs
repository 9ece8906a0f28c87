// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tween state machine.
//!
//! A [`Tween`] holds one animatable value and at most one active
//! interpolation:
//!
//! ```text
//!   Idle ──instruct──► Animating ──progress 1.0──► Idle   (completions: Ok)
//!                        │  ▲
//!                        │  └── instruct (superseded, restarts from value)
//!                        └──── stop / set / drop ──► Idle (completions: Cancelled)
//! ```
//!
//! `Tween` itself never settles a completion directly. State transitions
//! return a [`Step`] carrying the resolvers that became due; the caller
//! settles them once it no longer borrows the tween. [`SharedTween`] wraps
//! that protocol for the common `Rc<RefCell<_>>` case.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::time::Duration;

use crate::FRAME_BUDGET;
use crate::arith::Arithmetic;
use crate::completion::{Resolver, TweenCompletion};
use crate::easing::Easing;
use crate::error::{Cancelled, TweenError};
use crate::instruction::{TweenInstruction, TweenOptions};

/// Coarse state of a tween.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenState {
    /// No interpolation in flight.
    Idle,
    /// Waiting out the instruction's delay.
    Delayed,
    /// Interpolating towards a target.
    Animating,
}

#[derive(Debug)]
struct Active<T> {
    start: T,
    target: T,
    delay: Duration,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl<T: Arithmetic> Active<T> {
    /// Returns `(value, finished)` at the current elapsed time.
    fn sample(&self) -> (T, bool) {
        let Some(running) = self.elapsed.checked_sub(self.delay) else {
            return (self.start.clone(), false);
        };
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (running.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        if progress >= 1.0 {
            return (self.target.clone(), true);
        }
        // Weighted sum: clamped components (color alpha) must never pass
        // through a negative delta.
        let eased = self.easing.apply(progress);
        let value = self.start.scale(1.0 - eased).add(&self.target.scale(eased));
        (value, false)
    }
}

/// Outcome of a state transition.
///
/// Holds resolvers that became due. Call [`settle`](Self::settle) after
/// releasing any borrow of the tween; dropping a `Step` settles as well.
#[must_use = "a step must be settled to resolve completions"]
pub struct Step<T: Clone> {
    /// Whether the tween's value changed.
    pub changed: bool,
    /// Whether an interpolation finished.
    pub completed: bool,
    due: Vec<Resolver<T>>,
    outcome: Option<Result<T, Cancelled>>,
}

impl<T: Clone> Step<T> {
    fn new(changed: bool, completed: bool) -> Self {
        Self {
            changed,
            completed,
            due: Vec::new(),
            outcome: None,
        }
    }

    fn with_due(mut self, due: Vec<Resolver<T>>, outcome: Result<T, Cancelled>) -> Self {
        if !due.is_empty() {
            self.due = due;
            self.outcome = Some(outcome);
        }
        self
    }

    /// Settles every due resolver, in registration order.
    pub fn settle(mut self) {
        self.settle_due();
    }

    fn settle_due(&mut self) {
        let Some(outcome) = self.outcome.take() else {
            return;
        };
        for resolver in self.due.drain(..) {
            resolver.settle(outcome.clone());
        }
    }
}

impl<T: Clone> Drop for Step<T> {
    fn drop(&mut self) {
        self.settle_due();
    }
}

impl<T: Clone> fmt::Debug for Step<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("changed", &self.changed)
            .field("completed", &self.completed)
            .field("due", &self.due.len())
            .finish_non_exhaustive()
    }
}

/// A single animatable value.
pub struct Tween<T> {
    value: T,
    options: TweenOptions,
    active: Option<Active<T>>,
    resolvers: Vec<Resolver<T>>,
    last: Option<TweenInstruction<T>>,
}

impl<T: Arithmetic> Tween<T> {
    /// Creates an idle tween holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_options(value, TweenOptions::NONE)
    }

    /// Creates an idle tween with base options that every instruction is
    /// merged over.
    #[must_use]
    pub fn with_options(value: T, options: TweenOptions) -> Self {
        Self {
            value,
            options,
            active: None,
            resolvers: Vec::new(),
            last: None,
        }
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Base options.
    #[must_use]
    pub fn options(&self) -> TweenOptions {
        self.options
    }

    /// Target of the in-flight interpolation, if any.
    #[must_use]
    pub fn target(&self) -> Option<&T> {
        self.active.as_ref().map(|a| &a.target)
    }

    /// The last instruction accepted, whether or not it is still running.
    #[must_use]
    pub fn last_instruction(&self) -> Option<&TweenInstruction<T>> {
        self.last.as_ref()
    }

    /// Coarse state.
    #[must_use]
    pub fn state(&self) -> TweenState {
        match &self.active {
            None => TweenState::Idle,
            Some(a) if a.elapsed < a.delay => TweenState::Delayed,
            Some(_) => TweenState::Animating,
        }
    }

    /// Returns whether an interpolation is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Accepts an instruction, superseding any in-flight interpolation.
    ///
    /// The new interpolation starts from `instruction.from` or, if unset,
    /// from the current value (which is mid-flight when superseding).
    /// Pending completions carry over to the new instruction.
    ///
    /// # Errors
    ///
    /// - [`TweenError::MissingDuration`] if the instruction has no speed and
    ///   neither it nor the base options give a duration.
    /// - [`TweenError::ArithmeticUnavailable`] if the instruction's values
    ///   are of a different kind than the tween's value.
    pub fn instruct(
        &mut self,
        instruction: TweenInstruction<T>,
    ) -> Result<TweenCompletion<T>, TweenError> {
        self.begin(instruction)?;
        let (completion, resolver) = Resolver::future();
        self.resolvers.push(resolver);
        Ok(completion)
    }

    /// Like [`instruct`](Self::instruct), but settles by calling `f`.
    ///
    /// # Errors
    ///
    /// Same as [`instruct`](Self::instruct).
    pub fn instruct_then(
        &mut self,
        instruction: TweenInstruction<T>,
        f: impl FnOnce(Result<T, Cancelled>) + 'static,
    ) -> Result<(), TweenError> {
        self.begin(instruction)?;
        self.resolvers.push(Resolver::callback(f));
        Ok(())
    }

    fn check_kind(&self, other: &T) -> Result<(), TweenError> {
        if self.value.compatible(other) {
            Ok(())
        } else {
            Err(TweenError::ArithmeticUnavailable {
                expected: self.value.kind(),
                found: other.kind(),
            })
        }
    }

    fn begin(&mut self, instruction: TweenInstruction<T>) -> Result<(), TweenError> {
        for v in [&instruction.from, &instruction.to, &instruction.speed]
            .into_iter()
            .flatten()
        {
            self.check_kind(v)?;
        }
        let options = self.options.merged(&instruction.options);
        let start = instruction.from.clone().unwrap_or_else(|| self.value.clone());
        let target = instruction.to.clone().unwrap_or_else(|| self.value.clone());
        let duration = match &instruction.speed {
            Some(speed) => frames_to_duration(target.sub(&start).abs().ratio(&speed.abs()))?,
            None => options.duration.ok_or(TweenError::MissingDuration)?,
        };
        self.value = start.clone();
        self.active = Some(Active {
            start,
            target,
            delay: options.delay.unwrap_or(Duration::ZERO),
            duration,
            elapsed: Duration::ZERO,
            easing: options.easing.unwrap_or_default(),
        });
        self.last = Some(instruction);
        Ok(())
    }

    /// Advances the interpolation clock by `dt`.
    pub fn advance(&mut self, dt: Duration) -> Step<T> {
        let Some(active) = &mut self.active else {
            return Step::new(false, false);
        };
        active.elapsed = active.elapsed.saturating_add(dt);
        let (value, finished) = active.sample();
        let changed = value != self.value;
        self.value = value;
        if !finished {
            return Step::new(changed, false);
        }
        self.active = None;
        let resolvers = core::mem::take(&mut self.resolvers);
        Step::new(changed, true).with_due(resolvers, Ok(self.value.clone()))
    }

    /// Halts the interpolation, freezing the current value. Pending
    /// completions settle with [`Cancelled`].
    pub fn stop(&mut self) -> Step<T> {
        self.active = None;
        let resolvers = core::mem::take(&mut self.resolvers);
        Step::new(false, false).with_due(resolvers, Err(Cancelled))
    }

    /// Jumps to `value`, halting any interpolation. Pending completions
    /// settle with [`Cancelled`].
    pub fn set(&mut self, value: T) -> Step<T> {
        let changed = value != self.value;
        self.value = value;
        self.active = None;
        self.last = None;
        let resolvers = core::mem::take(&mut self.resolvers);
        Step::new(changed, false).with_due(resolvers, Err(Cancelled))
    }

    /// Moves to `target` from the current value.
    ///
    /// # Errors
    ///
    /// Same as [`instruct`](Self::instruct).
    pub fn to(
        &mut self,
        target: T,
        options: TweenOptions,
    ) -> Result<TweenCompletion<T>, TweenError> {
        self.instruct(TweenInstruction::to(target).with_options(options))
    }

    /// Jumps to `start` and eases back to the current value.
    ///
    /// # Errors
    ///
    /// Same as [`instruct`](Self::instruct).
    pub fn from(
        &mut self,
        start: T,
        options: TweenOptions,
    ) -> Result<TweenCompletion<T>, TweenError> {
        self.instruct(TweenInstruction::from_value(start).with_options(options))
    }

    /// Moves from `start` to `target`.
    ///
    /// # Errors
    ///
    /// Same as [`instruct`](Self::instruct).
    pub fn transition(
        &mut self,
        start: T,
        target: T,
        options: TweenOptions,
    ) -> Result<TweenCompletion<T>, TweenError> {
        self.instruct(TweenInstruction::between(start, target).with_options(options))
    }

    /// Moves towards `on` or `off`.
    ///
    /// The speed is chosen so that a full `off → on` traversal takes the
    /// configured duration, in either direction. When `off` and `on` are
    /// equal this degrades to a zero-duration move.
    ///
    /// # Errors
    ///
    /// [`TweenError::MissingDuration`] if neither `options` nor the base
    /// options give a duration, plus the errors of
    /// [`instruct`](Self::instruct).
    pub fn toggle(
        &mut self,
        off: T,
        on: T,
        is_on: bool,
        options: TweenOptions,
    ) -> Result<TweenCompletion<T>, TweenError> {
        if off.equals(&on) {
            let target = if is_on { on } else { off };
            return self.to(target, options.with_duration(Duration::ZERO));
        }
        let span = on.sub(&off).abs();
        let target = if is_on { on } else { off };
        let duration = options
            .duration
            .or(self.options.duration)
            .ok_or(TweenError::MissingDuration)?;
        let frames = nanos_f64(duration) / nanos_f64(FRAME_BUDGET);
        if frames == 0.0 {
            return self.to(target, options);
        }
        let speed = span.div_scalar(frames);
        self.instruct(
            TweenInstruction::to(target)
                .with_speed(speed)
                .with_options(options),
        )
    }
}

impl<T> Drop for Tween<T> {
    fn drop(&mut self) {
        for resolver in self.resolvers.drain(..) {
            resolver.settle(Err(Cancelled));
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Tween<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("value", &self.value)
            .field("options", &self.options)
            .field("active", &self.active.is_some())
            .field("pending", &self.resolvers.len())
            .field("last", &self.last)
            .finish()
    }
}

fn nanos_f64(d: Duration) -> f64 {
    d.as_nanos() as f64
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "range checked before the cast"
)]
fn frames_to_duration(frames: f64) -> Result<Duration, TweenError> {
    let nanos = nanos_f64(FRAME_BUDGET) * frames;
    if !nanos.is_finite() || nanos < 0.0 || nanos >= u64::MAX as f64 {
        return Err(TweenError::MissingDuration);
    }
    // Round half up.
    Ok(Duration::from_nanos((nanos + 0.5) as u64))
}

/// A reference-counted tween that several owners can bind to.
///
/// Equality is identity: two handles are equal when they point at the same
/// tween.
pub struct SharedTween<T>(Rc<RefCell<Tween<T>>>);

/// A non-owning [`SharedTween`] handle.
pub struct WeakTween<T>(Weak<RefCell<Tween<T>>>);

impl<T: Arithmetic> SharedTween<T> {
    /// Creates a shared idle tween holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::from_tween(Tween::new(value))
    }

    /// Wraps an existing tween.
    #[must_use]
    pub fn from_tween(tween: Tween<T>) -> Self {
        Self(Rc::new(RefCell::new(tween)))
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> T {
        self.0.borrow().value().clone()
    }

    /// Coarse state.
    #[must_use]
    pub fn state(&self) -> TweenState {
        self.0.borrow().state()
    }

    /// Returns whether an interpolation is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.borrow().is_active()
    }

    /// The last instruction accepted.
    #[must_use]
    pub fn last_instruction(&self) -> Option<TweenInstruction<T>> {
        self.0.borrow().last_instruction().cloned()
    }

    /// See [`Tween::instruct`].
    ///
    /// # Errors
    ///
    /// See [`Tween::instruct`].
    pub fn instruct(
        &self,
        instruction: TweenInstruction<T>,
    ) -> Result<TweenCompletion<T>, TweenError> {
        self.0.borrow_mut().instruct(instruction)
    }

    /// See [`Tween::instruct_then`].
    ///
    /// # Errors
    ///
    /// See [`Tween::instruct`].
    pub fn instruct_then(
        &self,
        instruction: TweenInstruction<T>,
        f: impl FnOnce(Result<T, Cancelled>) + 'static,
    ) -> Result<(), TweenError> {
        self.0.borrow_mut().instruct_then(instruction, f)
    }

    /// See [`Tween::to`].
    ///
    /// # Errors
    ///
    /// See [`Tween::instruct`].
    pub fn to(&self, target: T, options: TweenOptions) -> Result<TweenCompletion<T>, TweenError> {
        self.0.borrow_mut().to(target, options)
    }

    /// See [`Tween::from`].
    ///
    /// # Errors
    ///
    /// See [`Tween::instruct`].
    pub fn from(&self, start: T, options: TweenOptions) -> Result<TweenCompletion<T>, TweenError> {
        self.0.borrow_mut().from(start, options)
    }

    /// See [`Tween::transition`].
    ///
    /// # Errors
    ///
    /// See [`Tween::instruct`].
    pub fn transition(
        &self,
        start: T,
        target: T,
        options: TweenOptions,
    ) -> Result<TweenCompletion<T>, TweenError> {
        self.0.borrow_mut().transition(start, target, options)
    }

    /// See [`Tween::toggle`].
    ///
    /// # Errors
    ///
    /// See [`Tween::toggle`].
    pub fn toggle(
        &self,
        off: T,
        on: T,
        is_on: bool,
        options: TweenOptions,
    ) -> Result<TweenCompletion<T>, TweenError> {
        self.0.borrow_mut().toggle(off, on, is_on, options)
    }

    /// Halts the interpolation and cancels pending completions.
    pub fn stop(&self) {
        let step = self.0.borrow_mut().stop();
        step.settle();
    }

    /// Jumps to `value` and cancels pending completions.
    pub fn set(&self, value: T) {
        let step = self.0.borrow_mut().set(value);
        step.settle();
    }

    /// Advances the tween and settles whatever became due. Returns whether
    /// the value changed.
    pub fn advance(&self, dt: Duration) -> bool {
        let step = self.advance_deferred(dt);
        let changed = step.changed;
        step.settle();
        changed
    }

    /// Advances the tween without settling, for callers that batch
    /// settlement across tweens.
    pub(crate) fn advance_deferred(&self, dt: Duration) -> Step<T> {
        self.0.borrow_mut().advance(dt)
    }
}

impl<T> SharedTween<T> {
    /// Returns whether both handles point at the same tween.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Creates a non-owning handle.
    #[must_use]
    pub fn downgrade(&self) -> WeakTween<T> {
        WeakTween(Rc::downgrade(&self.0))
    }

    pub(crate) fn as_ptr(&self) -> *const RefCell<Tween<T>> {
        Rc::as_ptr(&self.0)
    }
}

impl<T> WeakTween<T> {
    /// Upgrades to a shared handle if the tween is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<SharedTween<T>> {
        self.0.upgrade().map(SharedTween)
    }
}

impl<T> Clone for SharedTween<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> Clone for WeakTween<T> {
    fn clone(&self) -> Self {
        Self(Weak::clone(&self.0))
    }
}

impl<T> PartialEq for SharedTween<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedTween<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(t) => f.debug_tuple("SharedTween").field(&*t).finish(),
            Err(_) => f.write_str("SharedTween(<borrowed>)"),
        }
    }
}

impl<T> fmt::Debug for WeakTween<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakTween")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::AnimValue;
    use crate::color::Color;
    use core::future::Future;
    use core::pin::Pin;
    use core::task::{Context, Poll, Waker};

    const FRAME: Duration = Duration::from_millis(16);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn poll<T>(c: &mut TweenCompletion<T>) -> Poll<Result<T, Cancelled>> {
        Pin::new(c).poll(&mut Context::from_waker(Waker::noop()))
    }

    /// Advances until idle, returning the number of frames taken.
    fn run(t: &mut Tween<f64>, limit: usize) -> usize {
        for frame in 1..=limit {
            let step = t.advance(FRAME);
            let done = step.completed;
            step.settle();
            if done {
                return frame;
            }
        }
        panic!("tween did not finish in {limit} frames");
    }

    #[test]
    fn duration_instruction_reaches_target() {
        let mut t = Tween::new(0.0);
        let mut done = t.to(100.0, TweenOptions::duration(ms(1000))).unwrap();
        for _ in 0..62 {
            t.advance(FRAME).settle();
            assert!(*t.value() <= 100.0, "overshoot: {}", t.value());
        }
        assert!(*t.value() >= 99.0, "value at frame 62 was {}", t.value());
        assert!(poll(&mut done).is_pending(), "not done before duration");
        t.advance(FRAME).settle();
        assert_eq!(poll(&mut done), Poll::Ready(Ok(100.0)));
        assert_eq!(t.state(), TweenState::Idle);
    }

    #[test]
    fn never_settles_synchronously() {
        let mut t = Tween::new(5.0);
        let mut done = t.to(5.0, TweenOptions::duration(Duration::ZERO)).unwrap();
        assert!(poll(&mut done).is_pending(), "settled inside the call");
        t.advance(Duration::ZERO).settle();
        assert_eq!(poll(&mut done), Poll::Ready(Ok(5.0)));
    }

    #[test]
    fn missing_duration_is_rejected() {
        let mut t = Tween::new(0.0);
        assert_eq!(
            t.instruct(TweenInstruction::to(1.0)).unwrap_err(),
            TweenError::MissingDuration
        );
        assert!(!t.is_active(), "rejected instruction must not start");
    }

    #[test]
    fn base_options_supply_duration() {
        let mut t = Tween::with_options(0.0, TweenOptions::duration(ms(160)));
        let _done = t.instruct(TweenInstruction::to(10.0)).unwrap();
        assert_eq!(run(&mut t, 20), 10);
    }

    #[test]
    fn speed_derives_duration() {
        let mut t = Tween::new(0.0);
        // 100 units at 10 per frame is ten frames.
        let _done = t
            .instruct(TweenInstruction::to(100.0).with_speed(10.0))
            .unwrap();
        assert_eq!(run(&mut t, 20), 10);
    }

    #[test]
    fn delay_holds_start_value() {
        let mut t = Tween::new(0.0);
        let _done = t
            .to(10.0, TweenOptions::duration(ms(160)).with_delay(ms(32)))
            .unwrap();
        t.advance(FRAME).settle();
        assert_eq!(t.state(), TweenState::Delayed);
        assert_eq!(*t.value(), 0.0);
        assert_eq!(run(&mut t, 20), 11);
    }

    #[test]
    fn supersession_starts_from_current_value() {
        let mut t = Tween::new(0.0);
        let mut first = t.to(100.0, TweenOptions::duration(ms(160))).unwrap();
        for _ in 0..5 {
            t.advance(FRAME).settle();
        }
        let mid = *t.value();
        assert!((mid - 50.0).abs() < 1e-9, "midpoint was {mid}");
        let mut second = t.to(0.0, TweenOptions::duration(ms(160))).unwrap();
        let mut prev = mid;
        for _ in 0..10 {
            t.advance(FRAME).settle();
            let v = *t.value();
            assert!((0.0..=mid).contains(&v), "{v} outside [0, {mid}]");
            assert!(v <= prev, "not monotonic towards new target");
            prev = v;
        }
        assert_eq!(poll(&mut first), Poll::Ready(Ok(0.0)));
        assert_eq!(poll(&mut second), Poll::Ready(Ok(0.0)));
    }

    #[test]
    fn stop_cancels_and_freezes() {
        let mut t = Tween::new(0.0);
        let mut done = t.to(100.0, TweenOptions::duration(ms(160))).unwrap();
        t.advance(FRAME).settle();
        let frozen = *t.value();
        t.stop().settle();
        assert_eq!(poll(&mut done), Poll::Ready(Err(Cancelled)));
        t.advance(FRAME).settle();
        assert_eq!(*t.value(), frozen);
    }

    #[test]
    fn dropping_cancels_pending() {
        let mut t = Tween::new(0.0);
        let mut done = t.to(1.0, TweenOptions::duration(ms(16))).unwrap();
        drop(t);
        assert_eq!(poll(&mut done), Poll::Ready(Err(Cancelled)));
    }

    #[test]
    fn callbacks_fire_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut t = Tween::new(0.0);
        for i in 0..3 {
            let order = Rc::clone(&order);
            t.instruct_then(
                TweenInstruction::to(1.0).with_duration(ms(16)),
                move |v| order.borrow_mut().push((i, v)),
            )
            .unwrap();
        }
        run(&mut t, 2);
        assert_eq!(*order.borrow(), [(0, Ok(1.0)), (1, Ok(1.0)), (2, Ok(1.0))]);
    }

    #[test]
    fn from_eases_back_to_current() {
        let mut t = Tween::new(10.0);
        let _done = t.from(0.0, TweenOptions::duration(ms(32))).unwrap();
        assert_eq!(*t.value(), 0.0);
        run(&mut t, 3);
        assert_eq!(*t.value(), 10.0);
    }

    #[test]
    fn toggle_is_duration_symmetric() {
        let opts = TweenOptions::duration(ms(160));
        for (off, on) in [(0.0, 10.0), (0.0, 1000.0), (-5.0, 5.0)] {
            let mut t = Tween::new(off);
            let _on = t.toggle(off, on, true, opts).unwrap();
            assert_eq!(run(&mut t, 20), 10, "off→on for span {off}..{on}");
            assert_eq!(*t.value(), on);
            let _off = t.toggle(off, on, false, opts).unwrap();
            assert_eq!(run(&mut t, 20), 10, "on→off for span {off}..{on}");
            assert_eq!(*t.value(), off);
        }
    }

    #[test]
    fn toggle_with_equal_endpoints_is_immediate() {
        let mut t = Tween::new(3.0);
        let mut done = t.toggle(3.0, 3.0, true, TweenOptions::NONE).unwrap();
        assert_eq!(run(&mut t, 1), 1);
        assert_eq!(poll(&mut done), Poll::Ready(Ok(3.0)));
    }

    #[test]
    fn mismatched_kind_is_rejected() {
        let mut t = Tween::new(AnimValue::Scalar(0.0));
        let err = t
            .to(AnimValue::Color(Color::WHITE), TweenOptions::duration(ms(16)))
            .unwrap_err();
        assert_eq!(
            err,
            TweenError::ArithmeticUnavailable {
                expected: "scalar",
                found: "color"
            }
        );
    }

    #[test]
    fn color_tween_interpolates_channels() {
        let mut t = Tween::new(Color::BLACK);
        let _done = t
            .to(Color::rgba(200.0, 100.0, 0.0, 0.5), TweenOptions::duration(ms(32)))
            .unwrap();
        t.advance(FRAME).settle();
        let mid = *t.value();
        assert!(mid.equals(&Color::rgba(100.0, 50.0, 0.0, 0.75)), "{mid:?}");
    }

    #[test]
    fn shared_tween_identity() {
        let a = SharedTween::new(0.0);
        let b = a.clone();
        let c = SharedTween::new(0.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
        let weak = a.downgrade();
        drop(a);
        drop(b);
        assert!(weak.upgrade().is_none(), "tween should be gone");
    }

    #[test]
    fn callback_may_reinstruct_shared_tween() {
        let shared = SharedTween::new(0.0);
        let again = shared.clone();
        shared
            .instruct_then(TweenInstruction::to(1.0).with_duration(FRAME), move |_| {
                let _next = again.to(2.0, TweenOptions::duration(FRAME)).unwrap();
            })
            .unwrap();
        assert!(shared.advance(FRAME), "first leg moves");
        assert!(shared.is_active(), "callback started the second leg");
        assert!(shared.advance(FRAME), "second leg moves");
        assert_eq!(shared.value(), 2.0);
    }
}
