//! A human-readable writer sink.

use std::error::Error;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use siftlog::{level, Sink, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::render::append_pairs;

/// Writes emissions as single lines:
///
/// ```text
/// 2024-05-07T09:12:44Z info  db/pool connection established peer=10.0.0.1
/// ```
///
/// The writer is shared behind a mutex, so decorated variants and clones
/// interleave whole lines. Timestamps (RFC 3339, UTC) can be switched off
/// for deterministic output. Write errors are swallowed; an output
/// channel that fails has no one left to complain to.
pub struct TextSink<W> {
    out: Arc<Mutex<W>>,
    verbosity: i32,
    timestamps: bool,
    separator: String,
    names: Vec<String>,
    values: Vec<Value>,
}

impl<W: Write + Send> TextSink<W> {
    /// A fully open text sink with timestamps enabled.
    pub fn new(writer: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(writer)),
            verbosity: i32::MAX,
            timestamps: true,
            separator: "/".to_string(),
            names: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Limits the sink to the given verbosity.
    pub fn with_verbosity(mut self, verbosity: i32) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Enables or disables timestamps.
    pub fn timestamps(mut self, on: bool) -> Self {
        self.timestamps = on;
        self
    }

    /// Overrides the name-chain separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// The shared writer handle (for inspecting buffered output).
    pub fn writer(&self) -> Arc<Mutex<W>> {
        self.out.clone()
    }

    fn dup(&self) -> Self {
        Self {
            out: self.out.clone(),
            verbosity: self.verbosity,
            timestamps: self.timestamps,
            separator: self.separator.clone(),
            names: self.names.clone(),
            values: self.values.clone(),
        }
    }

    fn write_line(&self, level_text: &str, msg: &str, fields: &[Value]) {
        let mut line = String::new();
        if self.timestamps {
            if let Ok(ts) = OffsetDateTime::now_utc().format(&Rfc3339) {
                line.push_str(&ts);
                line.push(' ');
            }
        }
        line.push_str(&format!("{level_text:<5}"));
        if !self.names.is_empty() {
            line.push(' ');
            line.push_str(&self.names.join(&self.separator));
        }
        line.push(' ');
        line.push_str(msg);
        append_pairs(&mut line, &self.values);
        append_pairs(&mut line, fields);

        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{line}");
    }
}

impl<W: Write + Send + 'static> Sink for TextSink<W> {
    fn enabled(&self, level: i32) -> bool {
        self.verbosity >= level
    }

    fn info(&self, level: i32, msg: &str, fields: &[Value]) {
        if !self.enabled(level) {
            return;
        }
        let text = level::name(level).to_lowercase();
        self.write_line(&text, msg, fields);
    }

    fn error(&self, err: Option<&dyn Error>, msg: &str, fields: &[Value]) {
        match err {
            Some(err) => {
                let mut fields = fields.to_vec();
                fields.push(Value::String(siftlog::keys::ERROR.to_string()));
                fields.push(Value::String(err.to_string()));
                self.write_line("error", msg, &fields);
            }
            None => self.write_line("error", msg, fields),
        }
    }

    fn with_name(&self, name: &str) -> Arc<dyn Sink> {
        let mut next = self.dup();
        next.names.push(name.to_string());
        Arc::new(next)
    }

    fn reset_name(&self, name: &str) -> Arc<dyn Sink> {
        let mut next = self.dup();
        next.names = vec![name.to_string()];
        Arc::new(next)
    }

    fn with_values(&self, fields: &[Value]) -> Arc<dyn Sink> {
        let mut next = self.dup();
        next.values.extend_from_slice(fields);
        Arc::new(next)
    }
}
