//! A JSON-lines writer sink.

use std::error::Error;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{json, Map};
use siftlog::{display_value, level, Sink, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::render::MISSING;

/// Writes one JSON object per emission:
///
/// ```json
/// {"time":"…","level":"Info","logger":"db/pool","msg":"connected","peer":"10.0.0.1"}
/// ```
///
/// Key/value fields become object members; non-string keys are rendered
/// to strings, a trailing unpaired key gets the value `"!(missing)"`.
pub struct JsonSink<W> {
    out: Arc<Mutex<W>>,
    verbosity: i32,
    separator: String,
    names: Vec<String>,
    values: Vec<Value>,
}

impl<W: Write + Send> JsonSink<W> {
    /// A fully open JSON sink.
    pub fn new(writer: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(writer)),
            verbosity: i32::MAX,
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

    /// The shared writer handle (for inspecting buffered output).
    pub fn writer(&self) -> Arc<Mutex<W>> {
        self.out.clone()
    }

    fn dup(&self) -> Self {
        Self {
            out: self.out.clone(),
            verbosity: self.verbosity,
            separator: self.separator.clone(),
            names: self.names.clone(),
            values: self.values.clone(),
        }
    }

    fn write_record(&self, level_name: &str, msg: &str, fields: &[Value], err: Option<String>) {
        let mut record = Map::new();
        if let Ok(ts) = OffsetDateTime::now_utc().format(&Rfc3339) {
            record.insert("time".to_string(), json!(ts));
        }
        record.insert("level".to_string(), json!(level_name));
        if !self.names.is_empty() {
            record.insert("logger".to_string(), json!(self.names.join(&self.separator)));
        }
        record.insert("msg".to_string(), json!(msg));
        if let Some(err) = err {
            record.insert(siftlog::keys::ERROR.to_string(), json!(err));
        }
        insert_pairs(&mut record, &self.values);
        insert_pairs(&mut record, fields);

        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{}", Value::Object(record));
    }
}

fn insert_pairs(record: &mut Map<String, Value>, fields: &[Value]) {
    let mut chunks = fields.chunks_exact(2);
    for pair in chunks.by_ref() {
        record.insert(display_value(&pair[0]), pair[1].clone());
    }
    if let [key] = chunks.remainder() {
        record.insert(display_value(key), json!(MISSING));
    }
}

impl<W: Write + Send + 'static> Sink for JsonSink<W> {
    fn enabled(&self, level: i32) -> bool {
        self.verbosity >= level
    }

    fn info(&self, level: i32, msg: &str, fields: &[Value]) {
        if !self.enabled(level) {
            return;
        }
        self.write_record(&level::name(level), msg, fields, None);
    }

    fn error(&self, err: Option<&dyn Error>, msg: &str, fields: &[Value]) {
        self.write_record("Error", msg, fields, err.map(|e| e.to_string()));
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
