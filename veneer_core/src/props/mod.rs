// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The property model.
//!
//! A surface's state is a [`PropertyBag`]: string keys mapped to a closed
//! [`PropValue`] variant. Hosts update bags with partial [`PropertyDelta`]s,
//! and the [`diff`](diff::diff) engine tells the tree what actually changed,
//! separately for event-handler keys and for everything else.
//!
//! Literal values that can be animated are recognized by the
//! [`ValueKind`] registry, which turns them into
//! [`AnimValue`](veneer_tween::AnimValue)s for the tween subsystem.

mod bag;
pub mod diff;
pub mod keys;
mod value;

pub use bag::{PropertyBag, PropertyDelta};
pub use diff::{PropertyDiff, diff};
pub use keys::KeyClass;
pub use value::{EventHandler, Literal, PropValue, ValueKind, parse_anim};
