// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A retained surface tree that keeps layout, animation, and rendering in
//! lockstep.
//!
//! `veneer_core` sits between a declarative host (a reconciler producing
//! property bags) and a render backend. Each surface in the tree owns one
//! layout solver node and a small tree of render primitives; every structural
//! mutation updates all three trees before returning, and a once-per-frame
//! pass pushes tweened values, solved boxes, and paint properties down to the
//! primitives.
//!
//! # Architecture
//!
//! ```text
//!   Host diff engine
//!       │  handles + property bags
//!       ▼
//!   HostBridge ──► SurfaceTree::update_props() ──► diff ──► route
//!                        │                                   │
//!                        │ structure                 layout / paint / cascade
//!                        ▼                                   ▼
//!              LayoutSolver  RenderBackend          DirtyTracker channels
//!                        ▲                                   │
//!                        └──── FrameDriver::tick() ◄─────────┘
//!                              tweens → solve → repaint
//! ```
//!
//! **[`surface`]**: The [`SurfaceTree`](surface::SurfaceTree): struct-of-
//! arrays storage with generational [`NodeId`](surface::NodeId)s, topology
//! with a cycle guard, the property pipeline, and the frame phases.
//!
//! **[`props`]**: Property bags, partial deltas, the diff engine, and the
//! value-kind registry that makes literals animatable.
//!
//! **[`layout`]**: The [`LayoutSolver`](layout::LayoutSolver) contract, the
//! property-to-constraint translator, and the taffy-backed solver.
//!
//! **[`backend`]**: The [`RenderBackend`](backend::RenderBackend) contract
//! and the paint ops the tree issues.
//!
//! **[`effects`]**: Lazily mounted background, image, border, and mask
//! primitives.
//!
//! **[`cascade`]**: Inherited text styles with fingerprint memoization.
//!
//! **[`frame`]**: [`FrameDriver`](frame::FrameDriver), which runs the
//! per-frame pass and reports what it did.
//!
//! **[`host`]**: [`HostBridge`](host::HostBridge), the handle-based
//! protocol a reconciler drives.
//!
//! **[`dirty`]**: Dirty-tracking channels via `understory_dirty`.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-pass instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! **[`time`]**: Monotonic [`HostTime`](time::HostTime).
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-surface
//!   lifecycle events.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod backend;
pub mod cascade;
pub mod dirty;
pub mod effects;
pub mod error;
pub mod frame;
pub mod host;
pub mod layout;
pub mod props;
pub mod surface;
pub mod time;
pub mod trace;

#[cfg(test)]
mod testing;

pub use error::{ConfigurationError, LayoutError, StructuralError, SurfaceError};
pub use frame::{FrameDriver, FrameDriverConfig, FrameReport};
pub use host::HostBridge;
pub use surface::{HostHandle, NodeId, SurfaceKind, SurfaceTree};
