// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The surface tree records invalidation per category (via
//! [`understory_dirty`]) and consumes it once per frame.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`CASCADE`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) over dependency edges from
//!   child to parent. Changing an inherited text field on a surface marks its
//!   whole subtree, since every descendant's effective text style depends on
//!   it.
//!
//! - **Local-only**: [`LAYOUT`] and [`PAINT`] are marked with the default
//!   policy. [`LAYOUT`] means "a constraint reached the solver since the last
//!   solve"; the solver itself handles propagation inside its own tree.
//!   [`PAINT`] lists surfaces whose paint-time properties changed; surfaces
//!   whose computed box moved are found by comparison after the solve.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on attach, detach, create, and
//!   destroy. It forces a re-solve and a full repaint walk.

use understory_dirty::Channel;

/// A layout constraint changed; the tree must be re-solved.
pub const LAYOUT: Channel = Channel::new(0);

/// A paint-time property (fill, transform, opacity, text) changed.
pub const PAINT: Channel = Channel::new(1);

/// An inherited text-style field changed; propagates to descendants.
pub const CASCADE: Channel = Channel::new(2);

/// Tree topology changed.
pub const TOPOLOGY: Channel = Channel::new(3);
