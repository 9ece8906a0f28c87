// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame driver.
//!
//! A [`FrameDriver`] turns host ticks into frame passes over a
//! [`SurfaceTree`]. Each pass runs three phases in order:
//!
//! 1. **Tweens**: advance the scheduler by the elapsed time and route every
//!    property that moved (layout keys to the solver, text keys to the
//!    cascade, paint keys to the effect mounter).
//! 2. **Layout**: refresh text measures and solve the whole tree if any
//!    constraint or the topology changed.
//! 3. **Paint**: re-apply computed boxes, paint properties, and cascaded text
//!    styles to the primitives of every surface that needs it.
//!
//! [`flush`](FrameDriver::flush) runs the same pass with zero elapsed time;
//! hosts call it after every batch of mutations so the scene is consistent
//! before the next vsync.

use core::time::Duration;

use kurbo::Size;
use veneer_tween::TweenChange;

use crate::backend::RenderBackend;
use crate::error::SurfaceError;
use crate::layout::LayoutSolver;
use crate::surface::{LifecycleLog, NodeId, SurfaceTree};
use crate::time::HostTime;
#[cfg(feature = "trace-rich")]
use crate::trace::{Lifecycle, LifecycleEvent};
use crate::trace::{
    FrameSummary, FrameTickEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, Tracer,
    TweenCompletedEvent,
};

/// Configuration for a [`FrameDriver`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameDriverConfig {
    /// Longest elapsed time fed to the scheduler in one pass. Longer gaps
    /// (a suspended window, a debugger stop) are clamped so tweens do not
    /// jump to their end.
    pub max_step: Duration,
    /// Initial viewport the root surface is sized to.
    pub viewport: Size,
}

impl FrameDriverConfig {
    /// Interactive desktop defaults: a 1280×720 viewport and a 100 ms step
    /// limit.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            max_step: Duration::from_millis(100),
            viewport: Size::new(1280.0, 720.0),
        }
    }

    /// Headless defaults for tests and offline rendering: the given viewport
    /// and no step limit.
    #[must_use]
    pub const fn headless(width: f64, height: f64) -> Self {
        Self {
            max_step: Duration::MAX,
            viewport: Size::new(width, height),
        }
    }
}

impl Default for FrameDriverConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

/// What one frame pass did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Frame counter of this pass.
    pub frame_index: u64,
    /// Elapsed time fed to the scheduler.
    pub dt: Duration,
    /// Tweened properties whose value moved, in binding order.
    pub changed: Vec<TweenChange<NodeId>>,
    /// Whether the layout solver ran.
    pub layout_solved: bool,
    /// Surfaces whose primitives were repainted, in paint order.
    pub repainted: Vec<NodeId>,
    /// Surfaces created and destroyed, and effects mounted and unmounted,
    /// since the previous pass.
    pub lifecycle: LifecycleLog,
}

impl FrameReport {
    /// Returns whether the pass changed nothing visible.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.changed.is_empty() && !self.layout_solved && self.repainted.is_empty()
    }
}

/// Drives frame passes over a [`SurfaceTree`].
///
/// The driver only tracks time; the tree holds all state. One driver per
/// tree.
#[derive(Clone, Debug)]
pub struct FrameDriver {
    config: FrameDriverConfig,
    last: Option<HostTime>,
    frame_index: u64,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(FrameDriverConfig::default())
    }
}

impl FrameDriver {
    /// Creates a driver that has not ticked yet.
    #[must_use]
    pub const fn new(config: FrameDriverConfig) -> Self {
        Self {
            config,
            last: None,
            frame_index: 0,
        }
    }

    /// The driver's configuration.
    #[must_use]
    pub const fn config(&self) -> &FrameDriverConfig {
        &self.config
    }

    /// Number of passes run so far.
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Runs one pass for a host tick at `now`.
    ///
    /// The elapsed time is measured from the previous tick and clamped to
    /// [`max_step`](FrameDriverConfig::max_step). The first tick after
    /// creation or [`reset`](Self::reset) advances tweens by zero.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised while routing tweened values or
    /// solving layout. The pass stops at that point.
    pub fn tick<S: LayoutSolver, B: RenderBackend>(
        &mut self,
        tree: &mut SurfaceTree<S, B>,
        now: HostTime,
        tracer: &mut Tracer<'_>,
    ) -> Result<FrameReport, SurfaceError> {
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last).min(self.config.max_step),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        self.run(tree, now, dt, tracer)
    }

    /// Runs one pass with zero elapsed time.
    ///
    /// # Errors
    ///
    /// As [`tick`](Self::tick).
    pub fn flush<S: LayoutSolver, B: RenderBackend>(
        &mut self,
        tree: &mut SurfaceTree<S, B>,
        tracer: &mut Tracer<'_>,
    ) -> Result<FrameReport, SurfaceError> {
        let now = self.last.unwrap_or(HostTime::ZERO);
        self.run(tree, now, Duration::ZERO, tracer)
    }

    /// Forgets the previous tick, so the next one advances by zero.
    pub fn reset(&mut self) {
        self.last = None;
    }

    fn run<S: LayoutSolver, B: RenderBackend>(
        &mut self,
        tree: &mut SurfaceTree<S, B>,
        now: HostTime,
        dt: Duration,
        tracer: &mut Tracer<'_>,
    ) -> Result<FrameReport, SurfaceError> {
        let frame_index = self.frame_index;
        self.frame_index += 1;
        tracer.frame_tick(&FrameTickEvent {
            frame_index,
            now,
            dt,
        });

        // Phase 1: tweens.
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Tweens,
        });
        let changed = tree.advance_tweens(dt)?;
        for change in changed.iter().filter(|c| c.completed) {
            tracer.tween_completed(&TweenCompletedEvent {
                frame_index,
                node: change.owner,
                property: &change.property,
            });
        }
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Tweens,
            work: changed.len(),
        });

        // Phase 2: layout.
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Layout,
        });
        let layout_solved = tree.solve_layout()?;
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Layout,
            work: usize::from(layout_solved),
        });

        // Phase 3: paint.
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Paint,
        });
        let repainted = tree.repaint()?;
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Paint,
            work: repainted.len(),
        });

        let lifecycle = tree.take_lifecycle();
        #[cfg(feature = "trace-rich")]
        if tracer.is_enabled() && !lifecycle.is_empty() {
            let events = lifecycle_events(&lifecycle);
            tracer.lifecycle(frame_index, &events);
        }
        tracer.frame_summary(&FrameSummary {
            frame_index,
            now,
            dt,
            tweens_changed: changed.len(),
            tweens_completed: changed.iter().filter(|c| c.completed).count(),
            layout_solved,
            repainted: repainted.len(),
            created: lifecycle.created.len(),
            destroyed: lifecycle.destroyed.len(),
        });

        Ok(FrameReport {
            frame_index,
            dt,
            changed,
            layout_solved,
            repainted,
            lifecycle,
        })
    }
}

#[cfg(feature = "trace-rich")]
fn lifecycle_events(log: &LifecycleLog) -> Vec<LifecycleEvent> {
    let created = log.created.iter().map(|&node| LifecycleEvent {
        node,
        change: Lifecycle::Created,
    });
    let mounted = log.mounted.iter().map(|&(node, kind)| LifecycleEvent {
        node,
        change: Lifecycle::EffectMounted(kind),
    });
    let unmounted = log.unmounted.iter().map(|&(node, kind)| LifecycleEvent {
        node,
        change: Lifecycle::EffectUnmounted(kind),
    });
    let destroyed = log.destroyed.iter().map(|&node| LifecycleEvent {
        node,
        change: Lifecycle::Destroyed,
    });
    created.chain(mounted).chain(unmounted).chain(destroyed).collect()
}
