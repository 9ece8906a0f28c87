// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Host times
//! and elapsed times are printed in milliseconds.

use std::io::Write;

use veneer_core::time::HostTime;
use veneer_core::trace::{
    FrameSummary, FrameTickEvent, Lifecycle, LifecycleEvent, PhaseBeginEvent, PhaseEndEvent,
    TraceSink, TweenCompletedEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the destination, consuming the sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(t: HostTime) -> f64 {
    t.nanos() as f64 / 1e6
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        let _ = writeln!(
            self.writer,
            "[tick] frame={} now={:.3}ms dt={:.3}ms",
            e.frame_index,
            ms(e.now),
            e.dt.as_secs_f64() * 1e3,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {}",
            e.frame_index,
            e.phase.name(),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} work={}",
            e.frame_index,
            e.phase.name(),
            e.work,
        );
    }

    fn on_tween_completed(&mut self, e: &TweenCompletedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[tween] frame={} {:?}.{} completed",
            e.frame_index, e.node, e.property,
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let layout = if s.layout_solved { "solved" } else { "clean" };
        let _ = writeln!(
            self.writer,
            "[summary] frame={} tweens={}/{} layout={layout} repainted={} \
             created={} destroyed={}",
            s.frame_index,
            s.tweens_completed,
            s.tweens_changed,
            s.repainted,
            s.created,
            s.destroyed,
        );
    }

    fn on_lifecycle(&mut self, frame_index: u64, events: &[LifecycleEvent]) {
        for e in events {
            let change = match e.change {
                Lifecycle::Created => "created".to_owned(),
                Lifecycle::Destroyed => "destroyed".to_owned(),
                Lifecycle::EffectMounted(kind) => format!("mounted {kind:?}"),
                Lifecycle::EffectUnmounted(kind) => format!("unmounted {kind:?}"),
            };
            let _ = writeln!(
                self.writer,
                "[lifecycle] frame={frame_index} {:?} {change}",
                e.node,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::*;
    use veneer_core::trace::PhaseKind;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_tick() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_tick(&FrameTickEvent {
            frame_index: 1,
            now: HostTime::from_millis(32),
            dt: Duration::from_millis(16),
        });
        let output = output(sink);
        assert_eq!(output, "[tick] frame=1 now=32.000ms dt=16.000ms\n");
    }

    #[test]
    fn phases_print_their_work() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_phase_begin(&PhaseBeginEvent {
            frame_index: 3,
            phase: PhaseKind::Paint,
        });
        sink.on_phase_end(&PhaseEndEvent {
            frame_index: 3,
            phase: PhaseKind::Paint,
            work: 2,
        });
        let output = output(sink);
        assert!(output.contains("[phase:begin] frame=3 paint"), "got: {output}");
        assert!(output.contains("[phase:end] frame=3 paint work=2"), "got: {output}");
    }

    #[test]
    fn summary_marks_layout() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_summary(&FrameSummary {
            frame_index: 7,
            layout_solved: true,
            repainted: 4,
            ..FrameSummary::default()
        });
        let output = output(sink);
        assert!(output.contains("layout=solved"), "got: {output}");
        assert!(output.contains("repainted=4"), "got: {output}");
    }
}
