//! An in-memory sink recording rendered lines.

use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};

use siftlog::{Sink, Value};

use crate::render::append_bare;

/// Handle onto the lines recorded by a [`CaptureSink`] family.
///
/// Decorated variants of a capture sink share the same buffer, so one
/// handle observes everything a context routed into the sink.
#[derive(Clone, Debug, Default)]
pub struct CaptureBuffer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureBuffer {
    /// The recorded lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The recorded lines joined with newlines (plus a trailing one),
    /// or an empty string when nothing was recorded.
    pub fn contents(&self) -> String {
        let lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        if lines.is_empty() {
            return String::new();
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Drops everything recorded so far.
    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}

/// A sink recording every emission as a line `V[level] <name> <msg>
/// <fields…>` (errors as `E …`).
///
/// Fully open by default; [`CaptureSink::with_verbosity`] produces a
/// pre-filtered sink, which is how tests exercise the context's verbosity
/// shifting. The name chain joins with `/` unless overridden.
#[derive(Clone)]
pub struct CaptureSink {
    buffer: CaptureBuffer,
    verbosity: i32,
    separator: String,
    names: Vec<String>,
    values: Vec<Value>,
}

impl CaptureSink {
    /// A fully open capture sink with a fresh buffer.
    pub fn new() -> Self {
        Self::with_verbosity(i32::MAX)
    }

    /// A capture sink enabled only up to `verbosity`.
    pub fn with_verbosity(verbosity: i32) -> Self {
        Self {
            buffer: CaptureBuffer::default(),
            verbosity,
            separator: "/".to_string(),
            names: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Overrides the name-chain separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// The buffer shared by this sink and all its decorated variants.
    pub fn buffer(&self) -> CaptureBuffer {
        self.buffer.clone()
    }

    fn render(&self, head: String, msg: &str, fields: &[Value]) -> String {
        let mut line = head;
        if !self.names.is_empty() {
            line.push(' ');
            line.push_str(&self.names.join(&self.separator));
        }
        line.push(' ');
        line.push_str(msg);
        append_bare(&mut line, &self.values);
        append_bare(&mut line, fields);
        line
    }
}

impl Default for CaptureSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for CaptureSink {
    fn enabled(&self, level: i32) -> bool {
        self.verbosity >= level
    }

    fn info(&self, level: i32, msg: &str, fields: &[Value]) {
        if !self.enabled(level) {
            return;
        }
        self.buffer
            .push(self.render(format!("V[{level}]"), msg, fields));
    }

    fn error(&self, err: Option<&dyn Error>, msg: &str, fields: &[Value]) {
        let mut head = String::from("E");
        if let Some(err) = err {
            head.push('[');
            head.push_str(&err.to_string());
            head.push(']');
        }
        self.buffer.push(self.render(head, msg, fields));
    }

    fn with_name(&self, name: &str) -> Arc<dyn Sink> {
        let mut next = self.clone();
        next.names.push(name.to_string());
        Arc::new(next)
    }

    fn reset_name(&self, name: &str) -> Arc<dyn Sink> {
        let mut next = self.clone();
        next.names = vec![name.to_string()];
        Arc::new(next)
    }

    fn with_values(&self, fields: &[Value]) -> Arc<dyn Sink> {
        let mut next = self.clone();
        next.values.extend_from_slice(fields);
        Arc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_level_names_message_and_fields() {
        let sink = CaptureSink::new();
        let buffer = sink.buffer();

        let named = sink.with_name("outer").with_name("inner");
        named.info(3, "hello", &[Value::from("k"), Value::from("v")]);

        assert_eq!(buffer.lines(), vec!["V[3] outer/inner hello k v"]);
    }

    #[test]
    fn reset_name_replaces_the_chain() {
        let sink = CaptureSink::new();
        let buffer = sink.buffer();

        let named = sink.with_name("a").with_name("b").reset_name("root");
        named.info(3, "m", &[]);

        assert_eq!(buffer.lines(), vec!["V[3] root m"]);
    }

    #[test]
    fn verbosity_gates_info_but_not_error() {
        let sink = CaptureSink::with_verbosity(2);
        let buffer = sink.buffer();

        sink.info(3, "dropped", &[]);
        sink.info(2, "kept", &[]);
        sink.error(None, "err", &[]);

        assert_eq!(buffer.lines(), vec!["V[2] kept", "E err"]);
    }

    #[test]
    fn contents_joins_lines() {
        let sink = CaptureSink::new();
        let buffer = sink.buffer();
        assert_eq!(buffer.contents(), "");

        sink.info(1, "a", &[]);
        sink.info(2, "b", &[]);
        assert_eq!(buffer.contents(), "V[1] a\nV[2] b\n");

        buffer.clear();
        assert_eq!(buffer.lines().len(), 0);
    }
}
