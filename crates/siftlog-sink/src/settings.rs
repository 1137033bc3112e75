//! Composition of writers and formats into sinks and contexts.

use std::io::{self, Write};
use std::sync::Arc;

use siftlog::{Context, Sink};

use crate::json::JsonSink;
use crate::text::TextSink;

#[derive(Clone, Copy, Debug)]
enum Format {
    Text,
    Json,
}

/// Builder composing an output format and writer into a sink or a ready
/// [`Context`].
///
/// ```no_run
/// use siftlog_sink::Settings;
///
/// let ctx = Settings::human().context();
/// ctx.logger(&[]).info("service starting", &[]);
/// ```
///
/// The default writer is standard error.
pub struct Settings {
    format: Format,
    writer: Option<Box<dyn Write + Send>>,
    timestamps: bool,
}

impl Settings {
    /// Human-readable text output.
    pub fn human() -> Self {
        Self {
            format: Format::Text,
            writer: None,
            timestamps: true,
        }
    }

    /// JSON-lines output.
    pub fn json() -> Self {
        Self {
            format: Format::Json,
            writer: None,
            timestamps: true,
        }
    }

    /// Directs output to the given writer instead of standard error.
    pub fn with_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    /// Enables or disables timestamps (text output only).
    pub fn timestamps(mut self, on: bool) -> Self {
        self.timestamps = on;
        self
    }

    /// Builds the configured sink.
    pub fn sink(self) -> Arc<dyn Sink> {
        let writer: Box<dyn Write + Send> = self
            .writer
            .unwrap_or_else(|| Box::new(io::stderr()));
        match self.format {
            Format::Text => Arc::new(TextSink::new(writer).timestamps(self.timestamps)),
            Format::Json => Arc::new(JsonSink::new(writer)),
        }
    }

    /// Builds a root [`Context`] over the configured sink.
    pub fn context(self) -> Context {
        Context::new(self.sink())
    }
}

/// A root context writing human-readable text to standard error — the
/// "just give me something sensible" entry point.
pub fn default_context() -> Context {
    Settings::human().context()
}
