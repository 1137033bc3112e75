//! crates/siftlog/src/adapt.rs
//! Level limiting and verbosity shifting over a base sink.
//!
//! Rules and default loggers both express "emit at most up to level L"
//! by wrapping the context's base sink in a level-limited view. When the
//! base sink was pre-filtered by the embedder (its verbosity is below
//! [`TRACE`](crate::level::TRACE)), a plain cap would silently swallow
//! everything a rule explicitly enabled; [`adapt_sink`] therefore probes
//! the sink's effective verbosity and installs a shift that maps the
//! five-level public scale onto the sink's own numeric scale.

use std::error::Error;
use std::sync::Arc;

use crate::field::Value;
use crate::level;
use crate::sink::{RuntimeInfo, Sink};

/// Wraps `inner` into a level-limited view.
///
/// The wrapper is enabled for `level ≤ cap`; enabled messages are
/// forwarded at `level + shift` (a shift of 0 leaves the numeric level
/// untouched). Errors bypass the gate and always forward. Decoration
/// propagates into `inner` and preserves `cap` and `shift`.
pub fn wrap_sink(cap: i32, shift: i32, inner: Arc<dyn Sink>) -> Arc<dyn Sink> {
    Arc::new(LevelSink { cap, shift, inner })
}

struct LevelSink {
    cap: i32,
    shift: i32,
    inner: Arc<dyn Sink>,
}

impl LevelSink {
    fn rewrap(&self, inner: Arc<dyn Sink>) -> Arc<dyn Sink> {
        Arc::new(LevelSink {
            cap: self.cap,
            shift: self.shift,
            inner,
        })
    }
}

impl Sink for LevelSink {
    fn init(&self, info: &RuntimeInfo) {
        self.inner.init(info);
    }

    fn enabled(&self, level: i32) -> bool {
        self.cap >= level
    }

    fn info(&self, level: i32, msg: &str, fields: &[Value]) {
        if !self.enabled(level) {
            return;
        }
        self.inner.info(level + self.shift, msg, fields);
    }

    fn error(&self, err: Option<&dyn Error>, msg: &str, fields: &[Value]) {
        self.inner.error(err, msg, fields);
    }

    fn with_name(&self, name: &str) -> Arc<dyn Sink> {
        self.rewrap(self.inner.with_name(name))
    }

    fn reset_name(&self, name: &str) -> Arc<dyn Sink> {
        self.rewrap(self.inner.reset_name(name))
    }

    fn with_values(&self, fields: &[Value]) -> Arc<dyn Sink> {
        self.rewrap(self.inner.with_values(fields))
    }
}

/// Probes the effective verbosity of a sink: the greatest level in
/// `0..=TRACE` the sink reports enabled, or 0 when it is enabled nowhere.
pub fn probe_verbosity(sink: &dyn Sink) -> i32 {
    (level::NONE..=level::TRACE)
        .rev()
        .find(|l| sink.enabled(*l))
        .unwrap_or(level::NONE)
}

/// Adapts a handed base sink for use under the five-level public scale.
///
/// An open sink (enabled at [`TRACE`](level::TRACE)) is used unchanged. A
/// pre-filtered sink of verbosity `s < TRACE` is wrapped with a shift of
/// `s − TRACE`, so the most verbose public severity lands exactly at the
/// sink's own ceiling: a sink filtered at verbosity 2 sees trace
/// emissions as level-2 emissions, with the severity ordering preserved
/// and errors mapping below the ceiling.
pub fn adapt_sink(sink: Arc<dyn Sink>) -> Arc<dyn Sink> {
    if sink.enabled(level::TRACE) {
        return sink;
    }
    let s = probe_verbosity(sink.as_ref());
    wrap_sink(level::TRACE, s - level::TRACE, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Records forwarded (level, msg) pairs; enabled up to `verbosity`.
    struct Probe {
        verbosity: i32,
        seen: Arc<Mutex<Vec<(i32, String)>>>,
    }

    impl Probe {
        fn new(verbosity: i32) -> (Arc<dyn Sink>, Arc<Mutex<Vec<(i32, String)>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (
                Arc::new(Probe {
                    verbosity,
                    seen: seen.clone(),
                }),
                seen,
            )
        }
    }

    impl Sink for Probe {
        fn enabled(&self, level: i32) -> bool {
            self.verbosity >= level
        }

        fn info(&self, level: i32, msg: &str, _fields: &[Value]) {
            self.seen.lock().unwrap().push((level, msg.to_string()));
        }

        fn error(&self, _err: Option<&dyn std::error::Error>, msg: &str, _fields: &[Value]) {
            self.seen.lock().unwrap().push((-1, msg.to_string()));
        }

        fn with_name(&self, _name: &str) -> Arc<dyn Sink> {
            Arc::new(Probe {
                verbosity: self.verbosity,
                seen: self.seen.clone(),
            })
        }

        fn with_values(&self, _fields: &[Value]) -> Arc<dyn Sink> {
            Arc::new(Probe {
                verbosity: self.verbosity,
                seen: self.seen.clone(),
            })
        }
    }

    #[test]
    fn cap_gates_info_but_not_error() {
        let (inner, seen) = Probe::new(level::TRACE);
        let wrapped = wrap_sink(level::WARN, 0, inner);

        assert!(wrapped.enabled(level::ERROR));
        assert!(wrapped.enabled(level::WARN));
        assert!(!wrapped.enabled(level::INFO));

        wrapped.info(level::WARN, "kept", &[]);
        wrapped.info(level::INFO, "dropped", &[]);
        wrapped.error(None, "always", &[]);

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![(level::WARN, "kept".into()), (-1, "always".into())]);
    }

    #[test]
    fn shift_is_applied_to_forwarded_levels() {
        let (inner, seen) = Probe::new(level::TRACE);
        let wrapped = wrap_sink(level::TRACE, -3, inner);
        wrapped.info(level::TRACE, "shifted", &[]);
        assert_eq!(seen.lock().unwrap()[0].0, level::TRACE - 3);
    }

    #[test]
    fn probing_finds_the_effective_verbosity() {
        let (open, _) = Probe::new(level::TRACE);
        let (filtered, _) = Probe::new(2);
        let (closed, _) = Probe::new(-1);
        assert_eq!(probe_verbosity(open.as_ref()), level::TRACE);
        assert_eq!(probe_verbosity(filtered.as_ref()), 2);
        assert_eq!(probe_verbosity(closed.as_ref()), level::NONE);
    }

    #[test]
    fn adapting_an_open_sink_is_the_identity() {
        let (open, seen) = Probe::new(level::TRACE);
        let adapted = adapt_sink(open);
        adapted.info(level::TRACE, "plain", &[]);
        assert_eq!(seen.lock().unwrap()[0].0, level::TRACE);
    }

    #[test]
    fn adapting_a_prefiltered_sink_shifts_onto_its_scale() {
        let (filtered, seen) = Probe::new(2);
        let adapted = adapt_sink(filtered);

        // The public scale stays fully available...
        assert!(adapted.enabled(level::TRACE));
        assert!(!adapted.enabled(level::TRACE + 1));

        // ...and trace lands exactly at the sink's own ceiling.
        adapted.info(level::TRACE, "trace", &[]);
        adapted.info(level::ERROR, "error", &[]);
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0, 2);
        assert_eq!(seen[1].0, 2 + level::ERROR - level::TRACE);
    }
}
