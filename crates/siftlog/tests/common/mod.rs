//! Shared recording sink for the integration tests.
//!
//! Records every emission as `V[level] <name> <msg> <fields…>` the way a
//! verbosity-printing backend would, so tests assert on complete routing
//! outcomes (level, name chain, attached values) in one string.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::error::Error;
use std::sync::{Arc, Mutex};

use siftlog::{display_value, Sink, Value};

#[derive(Clone, Debug, Default)]
pub struct Lines {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Lines {
    pub fn all(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap().clear();
    }

    fn push(&self, line: String) {
        self.lines.lock().unwrap().push(line);
    }
}

#[derive(Clone)]
pub struct RecordingSink {
    lines: Lines,
    verbosity: i32,
    names: Vec<String>,
    values: Vec<Value>,
}

impl RecordingSink {
    fn render(&self, head: String, msg: &str, fields: &[Value]) -> String {
        let mut line = head;
        if !self.names.is_empty() {
            line.push(' ');
            line.push_str(&self.names.join("/"));
        }
        line.push(' ');
        line.push_str(msg);
        for value in self.values.iter().chain(fields) {
            line.push(' ');
            line.push_str(&display_value(value));
        }
        line
    }
}

impl Sink for RecordingSink {
    fn enabled(&self, level: i32) -> bool {
        self.verbosity >= level
    }

    fn info(&self, level: i32, msg: &str, fields: &[Value]) {
        if !self.enabled(level) {
            return;
        }
        self.lines.push(self.render(format!("V[{level}]"), msg, fields));
    }

    fn error(&self, err: Option<&dyn Error>, msg: &str, fields: &[Value]) {
        let head = match err {
            Some(err) => format!("E[{err}]"),
            None => "E".to_string(),
        };
        self.lines.push(self.render(head, msg, fields));
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

/// A fully open recording sink plus the handle onto its lines.
pub fn recording() -> (Arc<dyn Sink>, Lines) {
    recording_at(i32::MAX)
}

/// A recording sink enabled only up to `verbosity`.
pub fn recording_at(verbosity: i32) -> (Arc<dyn Sink>, Lines) {
    let lines = Lines::default();
    (
        Arc::new(RecordingSink {
            lines: lines.clone(),
            verbosity,
            names: Vec::new(),
            values: Vec::new(),
        }),
        lines,
    )
}
