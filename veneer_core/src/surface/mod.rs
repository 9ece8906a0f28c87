// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The surface tree.
//!
//! A *surface* is a node in the retained scene graph. Each surface has:
//!
//! - An identity ([`NodeId`], a generational handle that becomes stale when
//!   the surface is destroyed) and a [`HostHandle`] the host diff engine
//!   uses to address it.
//! - Topology: parent, first-child, and sibling links forming an ordered
//!   tree. Child order is paint order and hit-test order.
//! - A [`PropertyBag`](crate::props::PropertyBag) plus the tweens currently
//!   driving some of its properties.
//! - One layout solver node and a small tree of render primitives
//!   ([`Primitives`](crate::effects::Primitives)).
//!
//! [`SurfaceTree`] keeps the three trees (surfaces, solver nodes, primitive
//! containers) in lockstep: every structural call updates all of them before
//! returning.
//!
//! # Dirty tracking
//!
//! Mutations mark the channels in [`dirty`](crate::dirty); the frame pass
//! ([`FrameDriver`](crate::frame::FrameDriver)) drains them:
//!
//! - **LAYOUT** / **TOPOLOGY**: trigger one solve of the whole tree.
//! - **PAINT**: the surface's paint-time properties are re-applied.
//! - **CASCADE**: propagates to descendants; their effective text styles are
//!   recomputed lazily on the next read.

mod evaluate;
mod id;
mod registry;
mod store;
mod traverse;
mod update;

pub use id::{HostHandle, NodeId, SurfaceKind};
pub use registry::Registry;
pub use store::{LifecycleLog, SurfaceTree};
pub use traverse::Children;
