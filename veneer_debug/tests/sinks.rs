// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Both sinks attached to a live frame driver.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};
use veneer_backend_headless::{FixedClock, HeadlessBackend};
use veneer_core::layout::TaffySolver;
use veneer_core::props::PropertyBag;
use veneer_core::trace::Tracer;
use veneer_core::{FrameDriverConfig, HostBridge, SurfaceKind};
use veneer_debug::pretty::PrettyPrintSink;
use veneer_debug::tracing_sink::TracingSink;

fn scene() -> HostBridge<TaffySolver, HeadlessBackend> {
    let mut bridge = HostBridge::new(
        TaffySolver::new(),
        HeadlessBackend::new(),
        FrameDriverConfig::headless(200.0, 200.0),
    )
    .unwrap();
    let mut props = PropertyBag::new();
    props.insert("height", 20.0);
    props.insert("backgroundColor", "#000000");
    let card = bridge.create_instance(SurfaceKind::View, &props).unwrap();
    bridge.append_child_to_container(card).unwrap();
    bridge
}

#[test]
fn pretty_sink_prints_a_whole_frame() {
    let mut bridge = scene();
    let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
    bridge
        .tick(FixedClock::default().now(), &mut Tracer::new(&mut sink))
        .unwrap();

    let output = String::from_utf8(sink.into_inner()).unwrap();
    let tags: Vec<&str> = output
        .lines()
        .map(|l| l.split_once(' ').map_or(l, |(tag, _)| tag))
        .collect();
    assert_eq!(
        tags,
        [
            "[tick]",
            "[phase:begin]",
            "[phase:end]",
            "[phase:begin]",
            "[phase:end]",
            "[phase:begin]",
            "[phase:end]",
            // The root and the card are created, then the card's fill mounts.
            "[lifecycle]",
            "[lifecycle]",
            "[lifecycle]",
            "[summary]",
        ],
        "got:\n{output}"
    );
    assert!(output.contains("mounted Background"), "got:\n{output}");
    assert!(output.contains("layout=solved"), "got:\n{output}");
}

/// Collects `(target, message)` for every event.
#[derive(Clone, Default)]
struct Collector(Arc<Mutex<Vec<(String, String)>>>);

struct Message(String);

impl Visit for Message {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl Subscriber for Collector {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _: &Id, _: &Record<'_>) {}

    fn record_follows_from(&self, _: &Id, _: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut message = Message(String::new());
        event.record(&mut message);
        self.0
            .lock()
            .unwrap()
            .push((event.metadata().target().to_owned(), message.0));
    }

    fn enter(&self, _: &Id) {}

    fn exit(&self, _: &Id) {}
}

#[test]
fn tracing_sink_emits_under_the_veneer_target() {
    let collector = Collector::default();
    let seen = Arc::clone(&collector.0);
    tracing::subscriber::with_default(collector, || {
        let mut bridge = scene();
        let mut sink = TracingSink::new();
        bridge
            .tick(FixedClock::default().now(), &mut Tracer::new(&mut sink))
            .unwrap();
    });

    let seen = seen.lock().unwrap();
    assert!(seen.iter().all(|(target, _)| target == "veneer"), "{seen:?}");
    let messages: Vec<&str> = seen.iter().map(|(_, m)| m.as_str()).collect();
    assert_eq!(messages.first(), Some(&"frame tick"));
    assert_eq!(messages.last(), Some(&"frame summary"));
    assert!(messages.contains(&"surface created"), "{messages:?}");
    assert!(messages.contains(&"effect mounted"), "{messages:?}");
}
