#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! Sink backends for the `siftlog` facade. The core only consumes the
//! narrow [`Sink`](siftlog::Sink) capability; this crate provides the
//! concrete ends of the pipe:
//!
//! - [`CaptureSink`] records rendered lines in memory — the workhorse for
//!   tests and tooling that asserts on routing decisions.
//! - [`TextSink`] writes human-readable lines to any writer.
//! - [`JsonSink`] writes one JSON object per emission.
//! - [`TracingSink`] forwards emissions into the `tracing` ecosystem.
//! - [`Settings`] composes a writer and format into a sink or a ready
//!   [`Context`](siftlog::Context).
//!
//! # Examples
//!
//! Capture routing output in memory:
//!
//! ```
//! use std::sync::Arc;
//! use siftlog::Context;
//! use siftlog_sink::CaptureSink;
//!
//! let sink = CaptureSink::new();
//! let buffer = sink.buffer();
//! let ctx = Context::new(Arc::new(sink));
//!
//! ctx.logger(&[]).info("ready", &[]);
//! assert_eq!(buffer.lines(), vec!["V[3] ready"]);
//! ```
//!
//! # Errors
//!
//! Sinks own output-side failure handling. Write errors on the underlying
//! writer are swallowed; emission never reports back into the core.

mod capture;
mod json;
mod render;
mod settings;
mod text;
mod tracing_bridge;

pub use capture::{CaptureBuffer, CaptureSink};
pub use json::JsonSink;
pub use settings::{default_context, Settings};
pub use text::TextSink;
pub use tracing_bridge::TracingSink;
