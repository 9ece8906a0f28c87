// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`TraceSink`] that forwards to `tracing`.
//!
//! Every event becomes one structured `tracing` event with target `veneer`.
//! Per-frame events are emitted at `TRACE` level; summaries, completions, and
//! lifecycle changes at `DEBUG`. Install any subscriber to collect them.

use tracing::{Level, event};
use veneer_core::trace::{
    FrameSummary, FrameTickEvent, Lifecycle, LifecycleEvent, PhaseBeginEvent, PhaseEndEvent,
    TraceSink, TweenCompletedEvent,
};

/// Forwards frame-pass events to the current `tracing` dispatcher.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates the sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TraceSink for TracingSink {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        event!(
            target: "veneer",
            Level::TRACE,
            frame = e.frame_index,
            now_ns = e.now.nanos(),
            dt_us = u64::try_from(e.dt.as_micros()).unwrap_or(u64::MAX),
            "frame tick"
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        event!(
            target: "veneer",
            Level::TRACE,
            frame = e.frame_index,
            phase = e.phase.name(),
            "phase begin"
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        event!(
            target: "veneer",
            Level::TRACE,
            frame = e.frame_index,
            phase = e.phase.name(),
            work = e.work,
            "phase end"
        );
    }

    fn on_tween_completed(&mut self, e: &TweenCompletedEvent<'_>) {
        event!(
            target: "veneer",
            Level::DEBUG,
            frame = e.frame_index,
            node = ?e.node,
            property = e.property,
            "tween completed"
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        event!(
            target: "veneer",
            Level::DEBUG,
            frame = s.frame_index,
            tweens_changed = s.tweens_changed,
            tweens_completed = s.tweens_completed,
            layout_solved = s.layout_solved,
            repainted = s.repainted,
            created = s.created,
            destroyed = s.destroyed,
            "frame summary"
        );
    }

    fn on_lifecycle(&mut self, frame_index: u64, events: &[LifecycleEvent]) {
        for e in events {
            match e.change {
                Lifecycle::Created => {
                    event!(target: "veneer", Level::DEBUG, frame = frame_index, node = ?e.node, "surface created");
                }
                Lifecycle::Destroyed => {
                    event!(target: "veneer", Level::DEBUG, frame = frame_index, node = ?e.node, "surface destroyed");
                }
                Lifecycle::EffectMounted(kind) => {
                    event!(
                        target: "veneer",
                        Level::DEBUG,
                        frame = frame_index,
                        node = ?e.node,
                        effect = ?kind,
                        "effect mounted"
                    );
                }
                Lifecycle::EffectUnmounted(kind) => {
                    event!(
                        target: "veneer",
                        Level::DEBUG,
                        frame = frame_index,
                        node = ?e.node,
                        effect = ?kind,
                        "effect unmounted"
                    );
                }
            }
        }
    }
}
