// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless backend for veneer.
//!
//! This crate runs a surface tree without a display:
//!
//! - [`HeadlessBackend`]: an in-memory [`RenderBackend`] whose primitives,
//!   paint ops, masks, and listeners can be inspected (and dumped as text)
//! - [`FixedClock`]: a deterministic tick source
//!
//! ```rust,ignore
//! let mut tree = SurfaceTree::new(TaffySolver::new(), HeadlessBackend::new(), viewport)?;
//! let mut driver = FrameDriver::new(FrameDriverConfig::headless(800.0, 600.0));
//! let mut clock = FixedClock::default();
//! driver.tick(&mut tree, clock.advance(), &mut Tracer::none())?;
//! println!("{}", tree.backend().dump(tree.primitives(tree.root()).root));
//! ```

mod clock;
mod store;

pub use clock::FixedClock;
pub use store::HeadlessBackend;
pub use veneer_core::backend::RenderBackend;
