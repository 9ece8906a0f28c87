// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tweens and the arithmetic that drives them.
//!
//! `veneer_tween` is the animation leaf of Veneer. It is `no_std` compatible
//! (with `alloc`) and has no notion of surfaces, layout, or rendering: it
//! interpolates values and tells its caller which ones moved.
//!
//! # Architecture
//!
//! ```text
//!   TweenInstruction ──► Tween::instruct() ──► TweenCompletion (future)
//!                              │
//!                              ▼
//!   TweenScheduler::tick(dt) ──► Tween::advance(dt) ──► Vec<TweenChange>
//!                                                          │
//!                              settle completions ◄────────┘
//! ```
//!
//! **[`arith`]**: The [`Arithmetic`](arith::Arithmetic) trait and its
//! implementations for scalars, N-dimensional [`Vector`](arith::Vector)s,
//! [`Color`](color::Color)s, and the dynamic [`AnimValue`](arith::AnimValue).
//!
//! **[`easing`]**: Easing curves mapping linear progress to eased progress.
//!
//! **[`instruction`]**: Immutable [`TweenInstruction`](instruction::TweenInstruction)
//! values and the [`TweenOptions`](instruction::TweenOptions) they carry.
//!
//! **[`tween`]**: The [`Tween`](tween::Tween) state machine and the
//! [`SharedTween`](tween::SharedTween) handle used to bind one tween to
//! several owners.
//!
//! **[`completion`]**: Completion futures and callbacks.
//!
//! **[`scheduler`]**: [`TweenScheduler`](scheduler::TweenScheduler), the
//! per-tree registry of tween owners advanced once per frame.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod arith;
pub mod color;
pub mod completion;
pub mod easing;
pub mod error;
pub mod instruction;
pub mod scheduler;
pub mod tween;

pub use arith::{AnimValue, Arithmetic, Vector};
pub use color::Color;
pub use completion::TweenCompletion;
pub use easing::Easing;
pub use error::{Cancelled, TweenError};
pub use instruction::{TweenInstruction, TweenOptions};
pub use scheduler::{TweenChange, TweenScheduler};
pub use tween::{SharedTween, Step, Tween, TweenState, WeakTween};

/// The nominal frame budget used to convert speeds into durations (60fps).
pub const FRAME_BUDGET: core::time::Duration = core::time::Duration::from_millis(16);
