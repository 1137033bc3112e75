//! crates/siftlog/src/logger.rs
//! The logger facade.

use std::error::Error;
use std::sync::Arc;

use crate::adapt::wrap_sink;
use crate::field::{normalize, FieldArg, Value};
use crate::keys;
use crate::level;
use crate::sink::Sink;

/// A cheap, shareable handle emitting messages into a resolved sink.
///
/// Loggers returned by [`Context::logger`](crate::Context::logger) are
/// *bound*: they capture the sink resolved at that instant. Loggers from
/// [`Context::dynamic_logger`](crate::Context::dynamic_logger) carry a
/// self-refreshing sink and re-resolve when the owning context changes.
/// Either way the handle itself is immutable; decoration returns a new
/// logger.
///
/// Each severity method checks the sink's `enabled` gate before
/// normalising and forwarding, so disabled emissions cost one virtual
/// call.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn Sink>,
}

impl Logger {
    /// Builds a logger over a sink.
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }

    /// Whether a message at `level` would currently be emitted.
    pub fn enabled(&self, level: i32) -> bool {
        self.sink.enabled(level)
    }

    /// Emits at [`level::ERROR`].
    pub fn error(&self, msg: &str, kvs: &[FieldArg]) {
        self.emit(level::ERROR, msg, kvs);
    }

    /// Emits at [`level::WARN`].
    pub fn warn(&self, msg: &str, kvs: &[FieldArg]) {
        self.emit(level::WARN, msg, kvs);
    }

    /// Emits at [`level::INFO`].
    pub fn info(&self, msg: &str, kvs: &[FieldArg]) {
        self.emit(level::INFO, msg, kvs);
    }

    /// Emits at [`level::DEBUG`].
    pub fn debug(&self, msg: &str, kvs: &[FieldArg]) {
        self.emit(level::DEBUG, msg, kvs);
    }

    /// Emits at [`level::TRACE`].
    pub fn trace(&self, msg: &str, kvs: &[FieldArg]) {
        self.emit(level::TRACE, msg, kvs);
    }

    /// Emits at [`level::ERROR`] with the error value prepended as an
    /// `error` field.
    pub fn log_error(&self, err: &dyn Error, msg: &str, kvs: &[FieldArg]) {
        if !self.sink.enabled(level::ERROR) {
            return;
        }
        let mut fields = Vec::with_capacity(kvs.len() + 2);
        fields.push(Value::String(keys::ERROR.to_string()));
        fields.push(Value::String(err.to_string()));
        fields.extend(normalize(kvs));
        self.sink.info(level::ERROR, msg, &fields);
    }

    /// Returns a logger with a name segment appended.
    pub fn with_name(&self, name: &str) -> Logger {
        Logger {
            sink: self.sink.with_name(name),
        }
    }

    /// Returns a logger whose name chain is exactly `name`.
    pub(crate) fn reset_name(&self, name: &str) -> Logger {
        Logger {
            sink: self.sink.reset_name(name),
        }
    }

    /// Returns a logger with the given key/value fields attached.
    pub fn with_values(&self, kvs: &[FieldArg]) -> Logger {
        Logger {
            sink: self.sink.with_values(&normalize(kvs)),
        }
    }

    pub(crate) fn with_values_raw(&self, fields: &[Value]) -> Logger {
        Logger {
            sink: self.sink.with_values(fields),
        }
    }

    /// Returns a logger additionally capped at the given absolute
    /// verbosity.
    pub fn v(&self, level: i32) -> Logger {
        Logger {
            sink: wrap_sink(level, 0, self.sink.clone()),
        }
    }

    /// The underlying sink handle.
    pub fn sink(&self) -> Arc<dyn Sink> {
        self.sink.clone()
    }

    fn emit(&self, level: i32, msg: &str, kvs: &[FieldArg]) {
        if !self.sink.enabled(level) {
            return;
        }
        self.sink.info(level, msg, &normalize(kvs));
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Logger(..)")
    }
}
