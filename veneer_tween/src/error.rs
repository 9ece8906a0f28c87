// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tween error types.

/// Errors raised when an instruction cannot be turned into an interpolation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TweenError {
    /// Neither a speed nor a duration could be resolved for the instruction.
    #[error("tween instruction has neither a speed nor a duration")]
    MissingDuration,
    /// The instruction's values are of a kind the tween cannot interpolate.
    #[error("cannot interpolate a {found} value on a {expected} tween")]
    ArithmeticUnavailable {
        /// Kind of the tween's current value.
        expected: &'static str,
        /// Kind of the offending value.
        found: &'static str,
    },
}

/// Outcome of a completion whose tween was stopped or dropped before
/// reaching its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("tween was stopped before completing")]
pub struct Cancelled;
