//! crates/siftlog/src/sink.rs
//! The consumed sink capability.
//!
//! The core routes emissions; it does not format or write them. Anything
//! able to answer an `enabled` query for a numeric verbosity, accept
//! `info`/`error` emissions, and return name/value-decorated variants of
//! itself can serve as a backend. Concrete backends (text, JSON, capture,
//! `tracing`) live in the `siftlog-sink` crate.

use std::error::Error;
use std::sync::Arc;

use crate::field::Value;

/// Call-site metadata handed to a sink when a context adopts it.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuntimeInfo {
    /// Number of call frames between a logging call and the sink,
    /// for backends that annotate output with caller locations.
    pub call_depth: usize,
}

/// A low-level output target with a numeric verbosity.
///
/// Verbosity is a single non-negative integer, higher = more verbose; a
/// sink is expected to emit a level-`L` message only when its verbosity is
/// at least `L`. Decoration (`with_name`, `with_values`) returns a new
/// sink sharing the same output; sinks are immutable handles and must be
/// freely shareable across threads.
pub trait Sink: Send + Sync {
    /// Receives runtime metadata when a context adopts this sink.
    fn init(&self, _info: &RuntimeInfo) {}

    /// Whether a message at `level` would currently be emitted.
    fn enabled(&self, level: i32) -> bool;

    /// Emits a message at `level` with a flat alternating key/value list.
    fn info(&self, level: i32, msg: &str, fields: &[Value]);

    /// Emits an error message, optionally carrying an error value.
    fn error(&self, err: Option<&dyn Error>, msg: &str, fields: &[Value]);

    /// Returns a sink with `name` appended to the name chain.
    fn with_name(&self, name: &str) -> Arc<dyn Sink>;

    /// Returns a sink whose name chain is exactly `name`.
    ///
    /// Backends that track a name chain should replace it; the default
    /// falls back to appending, which is all a narrow backend can do.
    fn reset_name(&self, name: &str) -> Arc<dyn Sink> {
        self.with_name(name)
    }

    /// Returns a sink with the given key/value fields attached.
    fn with_values(&self, fields: &[Value]) -> Arc<dyn Sink>;
}

/// A sink that discards everything and is enabled at no level.
///
/// The routing analogue of `/dev/null`; handy as a placeholder base sink
/// and in tests that only care about routing decisions.
#[derive(Clone, Copy, Debug, Default)]
pub struct NopSink;

impl Sink for NopSink {
    fn enabled(&self, _level: i32) -> bool {
        false
    }

    fn info(&self, _level: i32, _msg: &str, _fields: &[Value]) {}

    fn error(&self, _err: Option<&dyn Error>, _msg: &str, _fields: &[Value]) {}

    fn with_name(&self, _name: &str) -> Arc<dyn Sink> {
        Arc::new(NopSink)
    }

    fn with_values(&self, _fields: &[Value]) -> Arc<dyn Sink> {
        Arc::new(NopSink)
    }
}
