//! Integration tests wiring sinks into routing contexts.

use std::io::Write;
use std::sync::{Arc, Mutex};

use siftlog::{level, Condition, ConditionRule, Context, Realm, Tag};
use siftlog_sink::{CaptureSink, Settings};

#[derive(Clone, Default)]
struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl SharedWriter {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).expect("utf-8 output")
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn capture_sink_records_routing_outcomes() {
    let sink = CaptureSink::new();
    let buffer = sink.buffer();
    let ctx = Context::new(Arc::new(sink));
    ctx.add_rule(Arc::new(ConditionRule::new(
        level::DEBUG,
        [Condition::from(Realm::new("db"))],
    )));

    ctx.logger(&[]).debug("hidden", &[]);
    ctx.logger(&[Realm::new("db").into()]).debug("visible", &[]);

    assert_eq!(buffer.lines(), vec!["V[4] db visible"]);
}

#[test]
fn prefiltered_capture_sink_receives_shifted_levels() {
    let sink = CaptureSink::with_verbosity(2);
    let buffer = sink.buffer();
    let ctx = Context::new(Arc::new(sink));
    ctx.add_rule(Arc::new(ConditionRule::new(
        level::TRACE,
        [Condition::from(Tag::new("wire"))],
    )));

    ctx.logger(&[Tag::new("wire").into()]).trace("frame", &[]);

    assert_eq!(buffer.lines(), vec!["V[2] frame"]);
}

#[test]
fn settings_compose_a_text_context() {
    let writer = SharedWriter::default();
    let ctx = Settings::human()
        .with_writer(writer.clone())
        .timestamps(false)
        .context();

    ctx.logger(&[Realm::new("db").into()]).info("connected", &["peer".into(), "a".into()]);
    ctx.logger(&[]).debug("hidden", &[]);

    assert_eq!(writer.contents(), "info  db connected peer=a\n");
}

#[test]
fn settings_compose_a_json_context() {
    let writer = SharedWriter::default();
    let ctx = Settings::json().with_writer(writer.clone()).context();

    ctx.logger(&[Realm::new("db").into()]).warn("slow", &[]);

    let record: serde_json::Value =
        serde_json::from_str(writer.contents().lines().next().expect("one line"))
            .expect("valid json");
    assert_eq!(record["level"], "Warn");
    assert_eq!(record["logger"], "db");
    assert_eq!(record["msg"], "slow");
}
