//! crates/siftlog/src/dynamic.rs
//! Self-refreshing sinks behind dynamic loggers.

use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};

use crate::context::Context;
use crate::element::Element;
use crate::field::Value;
use crate::sink::Sink;

/// The sink behind [`Context::dynamic_logger`].
///
/// Holds the owning context, the message context, and any decorations
/// applied after the fact. Every operation compares the context's
/// effective watermark against the stamp of the cached resolution;
/// when the watermark has advanced, the sink re-resolves through the
/// full rule/fallback path, swaps the cache, and acknowledges the
/// watermark. Decoration returns a new dynamic sink, so a decorated
/// dynamic logger keeps refreshing.
pub(crate) struct DynamicSink {
    ctx: Context,
    mctx: Vec<Element>,
    names: Vec<String>,
    values: Vec<Value>,
    cache: Mutex<Cached>,
}

struct Cached {
    stamp: i64,
    sink: Arc<dyn Sink>,
}

impl DynamicSink {
    pub(crate) fn new(ctx: Context, mctx: Vec<Element>) -> Self {
        Self::decorated(ctx, mctx, Vec::new(), Vec::new())
    }

    fn decorated(ctx: Context, mctx: Vec<Element>, names: Vec<String>, values: Vec<Value>) -> Self {
        let stamp = ctx.updater().watermark();
        let sink = resolve(&ctx, &mctx, &names, &values);
        ctx.acknowledge(stamp);
        Self {
            ctx,
            mctx,
            names,
            values,
            cache: Mutex::new(Cached { stamp, sink }),
        }
    }

    fn current(&self) -> Arc<dyn Sink> {
        let watermark = self.ctx.updater().watermark();
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if watermark > cache.stamp {
            cache.sink = resolve(&self.ctx, &self.mctx, &self.names, &self.values);
            cache.stamp = watermark;
            self.ctx.acknowledge(watermark);
        }
        cache.sink.clone()
    }
}

fn resolve(ctx: &Context, mctx: &[Element], names: &[String], values: &[Value]) -> Arc<dyn Sink> {
    let mut sink = ctx.logger(mctx).sink();
    for name in names {
        sink = sink.with_name(name);
    }
    if !values.is_empty() {
        sink = sink.with_values(values);
    }
    sink
}

impl Sink for DynamicSink {
    fn enabled(&self, level: i32) -> bool {
        self.current().enabled(level)
    }

    fn info(&self, level: i32, msg: &str, fields: &[Value]) {
        self.current().info(level, msg, fields);
    }

    fn error(&self, err: Option<&dyn Error>, msg: &str, fields: &[Value]) {
        self.current().error(err, msg, fields);
    }

    fn with_name(&self, name: &str) -> Arc<dyn Sink> {
        let mut names = self.names.clone();
        names.push(name.to_string());
        Arc::new(Self::decorated(
            self.ctx.clone(),
            self.mctx.clone(),
            names,
            self.values.clone(),
        ))
    }

    fn reset_name(&self, name: &str) -> Arc<dyn Sink> {
        Arc::new(Self::decorated(
            self.ctx.clone(),
            self.mctx.clone(),
            vec![name.to_string()],
            self.values.clone(),
        ))
    }

    fn with_values(&self, fields: &[Value]) -> Arc<dyn Sink> {
        let mut values = self.values.clone();
        values.extend_from_slice(fields);
        Arc::new(Self::decorated(
            self.ctx.clone(),
            self.mctx.clone(),
            self.names.clone(),
            values,
        ))
    }
}
