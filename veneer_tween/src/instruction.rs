// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tween instructions and options.
//!
//! A [`TweenInstruction`] is an immutable request: "move to this value, maybe
//! starting from that one, at this speed or over this long." Instructions are
//! plain values; two instructions compare equal when every field does, which
//! lets a caller skip re-issuing an animation that is already in flight.

use core::time::Duration;

use crate::easing::Easing;

/// Timing options for a tween.
///
/// Every field is optional so that options can be layered: a tween's base
/// options are merged with an instruction's options, and the instruction wins
/// wherever it sets a field (see [`merged`](Self::merged)).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TweenOptions {
    /// Easing curve. Unset means [`Easing::Linear`].
    pub easing: Option<Easing>,
    /// Time to wait before interpolation starts. Unset means zero.
    pub delay: Option<Duration>,
    /// Interpolation length. Ignored when the instruction carries a speed.
    pub duration: Option<Duration>,
}

impl TweenOptions {
    /// Options with every field unset.
    pub const NONE: Self = Self {
        easing: None,
        delay: None,
        duration: None,
    };

    /// Options with only a duration set.
    #[must_use]
    pub const fn duration(duration: Duration) -> Self {
        Self {
            duration: Some(duration),
            ..Self::NONE
        }
    }

    /// Returns these options with the easing set.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Returns these options with the delay set.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns these options with the duration set.
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Layers `over` on top of `self`, field by field.
    #[must_use]
    pub fn merged(&self, over: &Self) -> Self {
        Self {
            easing: over.easing.or(self.easing),
            delay: over.delay.or(self.delay),
            duration: over.duration.or(self.duration),
        }
    }
}

/// A request to interpolate a value.
///
/// `to: None` means "towards the tween's value at the time the instruction is
/// applied", which is how a *from* animation is expressed: jump to `from`,
/// then ease back.
#[derive(Clone, Debug, PartialEq)]
pub struct TweenInstruction<T> {
    /// Start value. Unset means the tween's current value.
    pub from: Option<T>,
    /// Target value. Unset means the tween's current value.
    pub to: Option<T>,
    /// Per-frame speed. When set, the duration is derived from the distance
    /// to travel and `options.duration` is ignored.
    pub speed: Option<T>,
    /// Timing options.
    pub options: TweenOptions,
}

impl<T> TweenInstruction<T> {
    /// An instruction moving to `to` from the current value.
    #[must_use]
    pub fn to(to: T) -> Self {
        Self {
            from: None,
            to: Some(to),
            speed: None,
            options: TweenOptions::NONE,
        }
    }

    /// An instruction that jumps to `from` and eases back to the current
    /// value.
    #[must_use]
    pub fn from_value(from: T) -> Self {
        Self {
            from: Some(from),
            to: None,
            speed: None,
            options: TweenOptions::NONE,
        }
    }

    /// An instruction moving from `from` to `to`.
    #[must_use]
    pub fn between(from: T, to: T) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            speed: None,
            options: TweenOptions::NONE,
        }
    }

    /// Returns this instruction with a per-frame speed.
    #[must_use]
    pub fn with_speed(mut self, speed: T) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Returns this instruction with the given options.
    #[must_use]
    pub fn with_options(mut self, options: TweenOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns this instruction with a duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.options.duration = Some(duration);
        self
    }

    /// Returns this instruction with an easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.options.easing = Some(easing);
        self
    }

    /// Returns this instruction with a start delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.options.delay = Some(delay);
        self
    }

    /// Maps every value in the instruction through `f`.
    #[must_use]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> TweenInstruction<U> {
        TweenInstruction {
            from: self.from.map(&mut f),
            to: self.to.map(&mut f),
            speed: self.speed.map(&mut f),
            options: self.options,
        }
    }
}
