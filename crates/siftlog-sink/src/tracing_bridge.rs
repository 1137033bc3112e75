//! crates/siftlog-sink/src/tracing_bridge.rs
//! Bridge from the siftlog facade into the `tracing` ecosystem.
//!
//! The bridge lets rule-driven routing decide *what* gets emitted while a
//! `tracing` subscriber decides *where it goes and how it looks*. Each
//! emission becomes a `tracing` event at the mapped level, carrying the
//! logger name and the rendered fields.

use std::error::Error;
use std::sync::Arc;

use siftlog::{level, Sink, Value};
use tracing::Level;

use crate::render::append_pairs;

/// Forwards emissions as `tracing` events.
///
/// Severity maps onto the five `tracing` levels (everything above
/// [`level::TRACE`] stays trace). The sink reports itself enabled at
/// every level and leaves filtering to the subscriber — rule caps applied
/// by the context still gate what reaches the bridge.
#[derive(Clone, Debug, Default)]
pub struct TracingSink {
    names: Vec<String>,
    values: Vec<Value>,
}

impl TracingSink {
    /// Creates a bridge sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn detail(&self, fields: &[Value]) -> String {
        let mut text = String::new();
        append_pairs(&mut text, &self.values);
        append_pairs(&mut text, fields);
        text
    }

    fn forward(&self, bridged: Level, msg: &str, fields: &[Value]) {
        let logger = self.names.join("/");
        let detail = self.detail(fields);
        if bridged == Level::ERROR {
            tracing::error!(target: "siftlog", logger = %logger, "{msg}{detail}");
        } else if bridged == Level::WARN {
            tracing::warn!(target: "siftlog", logger = %logger, "{msg}{detail}");
        } else if bridged == Level::INFO {
            tracing::info!(target: "siftlog", logger = %logger, "{msg}{detail}");
        } else if bridged == Level::DEBUG {
            tracing::debug!(target: "siftlog", logger = %logger, "{msg}{detail}");
        } else {
            tracing::trace!(target: "siftlog", logger = %logger, "{msg}{detail}");
        }
    }
}

fn bridge_level(severity: i32) -> Level {
    if severity <= level::ERROR {
        Level::ERROR
    } else if severity == level::WARN {
        Level::WARN
    } else if severity == level::INFO {
        Level::INFO
    } else if severity == level::DEBUG {
        Level::DEBUG
    } else {
        Level::TRACE
    }
}

impl Sink for TracingSink {
    fn enabled(&self, _level: i32) -> bool {
        true
    }

    fn info(&self, level: i32, msg: &str, fields: &[Value]) {
        self.forward(bridge_level(level), msg, fields);
    }

    fn error(&self, err: Option<&dyn Error>, msg: &str, fields: &[Value]) {
        let logger = self.names.join("/");
        let detail = self.detail(fields);
        match err {
            Some(err) => {
                tracing::error!(target: "siftlog", logger = %logger, error = %err, "{msg}{detail}");
            }
            None => tracing::error!(target: "siftlog", logger = %logger, "{msg}{detail}"),
        }
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
