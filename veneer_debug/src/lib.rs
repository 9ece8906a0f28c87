// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and `tracing` bridges for veneer diagnostics.
//!
//! This crate provides [`TraceSink`](veneer_core::trace::TraceSink)
//! implementations for development:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`tracing_sink::TracingSink`]: forwards every event to the `tracing`
//!   ecosystem as a structured event under the `veneer` target.

pub mod pretty;
pub mod tracing_sink;
