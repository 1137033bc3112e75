//! crates/siftlog/src/context.rs
//! Hierarchical logging contexts.
//!
//! A context owns an ordered rule list, a base sink, and a default level.
//! Child contexts inherit whatever they do not override and delegate
//! unmatched evaluations upward, always evaluating against the innermost
//! effective base sink so a child can swap the output target while
//! keeping the parent's routing policy.
//!
//! Invalidation of cached loggers is pull-based: every mutation stamps
//! the context from a process-wide monotone sequence, and dynamic loggers
//! compare the effective watermark (own stamp joined with the ancestor
//! chain) against what they last consumed. Parents know nothing about
//! their children; a child holds the only reference, parent-ward.

use std::error::Error;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::adapt::adapt_sink;
use crate::element::Element;
use crate::field::{normalize, FieldArg, Value};
use crate::level;
use crate::logger::Logger;
use crate::rule::Rule;
use crate::sink::{RuntimeInfo, Sink};

/// Process-wide watermark sequence.
///
/// Stamps taken from a single sequence make every mutation anywhere in a
/// context tree strictly greater than everything observed before it, so
/// an ancestor mutation is always visible through the `max` join in
/// [`Updater::watermark`] no matter how often a descendant mutated.
static WATERMARK_SEQ: AtomicI64 = AtomicI64::new(0);

fn next_watermark() -> i64 {
    WATERMARK_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

const INHERITED: i32 = -1;

struct State {
    default_level: i32,
    base_sink: Option<Arc<dyn Sink>>,
    rules: Arc<Vec<Arc<dyn Rule>>>,
}

struct ContextData {
    parent: Option<Context>,
    state: RwLock<State>,
    watermark: AtomicI64,
    seen: AtomicI64,
}

/// A hierarchical, rule-driven logging context.
///
/// `Context` is a cheap handle (`Clone` shares the same context). A root
/// context always carries a concrete sink and default level; children
/// created with [`Context::with_parent`] inherit both until overridden.
///
/// All operations are safe to call from any thread. Readers take the
/// context's read lock and may recurse into the parent's; mutators take
/// the write lock of their own context only, so the lock order is
/// strictly child-before-parent.
///
/// ```
/// use std::sync::Arc;
/// use siftlog::{level, Condition, ConditionRule, Context, NopSink, Realm};
///
/// let ctx = Context::new(Arc::new(NopSink));
/// ctx.add_rule(Arc::new(ConditionRule::new(
///     level::DEBUG,
///     [Condition::from(Realm::new("db"))],
/// )));
///
/// let logger = ctx.logger(&[Realm::new("db").into()]);
/// assert!(logger.enabled(level::DEBUG));
/// ```
#[derive(Clone)]
pub struct Context {
    data: Arc<ContextData>,
}

impl Context {
    /// Creates a root context over the given sink, at default level
    /// [`level::INFO`].
    ///
    /// The sink is adapted first: a pre-filtered sink gets a verbosity
    /// shift so the public severity scale maps onto its own numeric
    /// scale (see [`adapt_sink`]).
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        sink.init(&RuntimeInfo::default());
        Self::build(None, Some(adapt_sink(sink)), level::INFO)
    }

    /// Creates a child context inheriting rules, base sink, and default
    /// level from `parent`.
    pub fn with_parent(parent: &Context) -> Self {
        Self::build(Some(parent.clone()), None, INHERITED)
    }

    /// Creates a child context with its own base sink, delegating rule
    /// evaluation and default level to `parent`.
    pub fn with_parent_and_sink(parent: &Context, sink: Arc<dyn Sink>) -> Self {
        sink.init(&RuntimeInfo::default());
        Self::build(Some(parent.clone()), Some(adapt_sink(sink)), INHERITED)
    }

    fn build(parent: Option<Context>, base_sink: Option<Arc<dyn Sink>>, default_level: i32) -> Self {
        let inherited = parent
            .as_ref()
            .map_or(0, |p| p.updater().watermark());
        Context {
            data: Arc::new(ContextData {
                parent,
                state: RwLock::new(State {
                    default_level,
                    base_sink,
                    rules: Arc::new(Vec::new()),
                }),
                watermark: AtomicI64::new(0),
                seen: AtomicI64::new(inherited),
            }),
        }
    }

    /// The parent context, if any.
    pub fn parent(&self) -> Option<&Context> {
        self.data.parent.as_ref()
    }

    /// The effective default level: the context's own, or the nearest
    /// ancestor's when inheriting.
    pub fn default_level(&self) -> i32 {
        let own = self.read_state().default_level;
        if own >= 0 {
            return own;
        }
        match &self.data.parent {
            Some(parent) => parent.default_level(),
            None => level::INFO,
        }
    }

    /// The effective base sink: the context's own, or the nearest
    /// ancestor's.
    pub fn base_sink(&self) -> Arc<dyn Sink> {
        if let Some(sink) = self.read_state().base_sink.clone() {
            return sink;
        }
        match &self.data.parent {
            Some(parent) => parent.base_sink(),
            None => Arc::new(crate::sink::NopSink),
        }
    }

    /// Sets the default level used when no rule matches.
    ///
    /// A negative level puts a child context back into inheriting from
    /// its parent.
    pub fn set_default_level(&self, level: i32) {
        let mut state = self.write_state();
        state.default_level = level;
        self.stamp();
    }

    /// Replaces the base sink (adapted like the constructor argument).
    pub fn set_base_sink(&self, sink: Arc<dyn Sink>) {
        sink.init(&RuntimeInfo::default());
        let adapted = adapt_sink(sink);
        let mut state = self.write_state();
        state.base_sink = Some(adapted);
        self.stamp();
    }

    /// Adds a rule at highest priority.
    ///
    /// Every existing rule the new rule [`replaces`](Rule::replaces) is
    /// removed first; by default that means older `ConditionRule`s with a
    /// structurally equal condition list.
    pub fn add_rule(&self, rule: Arc<dyn Rule>) {
        self.add_rules([rule]);
    }

    /// Adds several rules in order; each ends up in front of the ones
    /// added before it.
    pub fn add_rules(&self, rules: impl IntoIterator<Item = Arc<dyn Rule>>) {
        let mut state = self.write_state();
        for rule in rules {
            // Readers may still hold the previous list; build a fresh one.
            let mut next = Vec::with_capacity(state.rules.len() + 1);
            next.push(rule.clone());
            next.extend(
                state
                    .rules
                    .iter()
                    .filter(|old| !rule.replaces(old.as_ref()))
                    .cloned(),
            );
            state.rules = Arc::new(next);
            self.stamp();
        }
    }

    /// A snapshot of this context's own rules, highest priority first.
    pub fn rules(&self) -> Vec<Arc<dyn Rule>> {
        self.read_state().rules.as_ref().clone()
    }

    /// Drops all rules of this context (inherited rules are unaffected).
    pub fn reset_rules(&self) {
        let mut state = self.write_state();
        state.rules = Arc::new(Vec::new());
        self.stamp();
    }

    /// Resolves a logger for the given message context.
    ///
    /// Own rules are scanned most-recent-first; the first match wins and
    /// fixes the verbosity regardless of later default-level changes.
    /// Unmatched evaluation delegates to the parent, still against this
    /// context's effective base sink. When no ancestor matches either,
    /// the fallback is the default logger: a dynamic view of the current
    /// effective default level and base sink, decorated with the message
    /// context's attachers.
    pub fn logger(&self, mctx: &[Element]) -> Logger {
        let base = self.base_sink();
        if let Some(logger) = self.evaluate(&base, mctx) {
            return logger;
        }
        let mut logger = Logger::new(Arc::new(DefaultSink::new(self.clone())));
        for element in mctx {
            logger = element.attach(logger);
        }
        logger
    }

    /// Resolves a logger and additionally caps it at `level`.
    pub fn v(&self, level: i32, mctx: &[Element]) -> Logger {
        self.logger(mctx).v(level)
    }

    /// Runs rule evaluation against an explicit base sink, delegating to
    /// the parent when nothing local matches. `None` means the default
    /// logger should be used.
    pub fn evaluate(&self, base: &Arc<dyn Sink>, mctx: &[Element]) -> Option<Logger> {
        let rules = self.read_state().rules.clone();
        for rule in rules.iter() {
            if let Some(logger) = rule.matches(base, mctx) {
                return Some(logger);
            }
        }
        self.data.parent.as_ref().and_then(|p| p.evaluate(base, mctx))
    }

    /// Returns a logger that re-resolves rules and sink whenever this
    /// context or one of its ancestors changes.
    ///
    /// This is the handle to cache long-term; a bound logger from
    /// [`Context::logger`] stays pinned to the state it was resolved
    /// against.
    pub fn dynamic_logger(&self, mctx: &[Element]) -> Logger {
        Logger::new(Arc::new(crate::dynamic::DynamicSink::new(
            self.clone(),
            mctx.to_vec(),
        )))
    }

    /// Returns an attribution builder carrying standing message context
    /// and decorations for loggers resolved through it.
    pub fn attribution(&self) -> Attribution {
        Attribution {
            ctx: self.clone(),
            mctx: Vec::new(),
            names: Vec::new(),
            values: Vec::new(),
        }
    }

    /// The invalidation view of this context.
    pub fn updater(&self) -> Updater {
        Updater { ctx: self.clone() }
    }

    pub(crate) fn acknowledge(&self, watermark: i64) {
        self.data.seen.fetch_max(watermark, Ordering::SeqCst);
    }

    fn stamp(&self) {
        self.data.watermark.store(next_watermark(), Ordering::SeqCst);
    }

    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.data.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.data.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("Context")
            .field("default_level", &state.default_level)
            .field("rules", &state.rules.len())
            .field("has_parent", &self.data.parent.is_some())
            .finish()
    }
}

/// Watermark view of a context, joining the ancestor chain.
///
/// `watermark()` is the value dynamic loggers compare against;
/// `seen_watermark()` is what the last dynamic resolution acknowledged.
/// After any mutation on the context or an ancestor, `watermark()`
/// exceeds `seen_watermark()` until the next dynamic resolution.
pub struct Updater {
    ctx: Context,
}

impl Updater {
    /// The effective watermark: the context's own stamp joined (`max`)
    /// with the parent's effective watermark.
    pub fn watermark(&self) -> i64 {
        let own = self.ctx.data.watermark.load(Ordering::SeqCst);
        match &self.ctx.data.parent {
            Some(parent) => own.max(parent.updater().watermark()),
            None => own,
        }
    }

    /// The watermark last consumed by a dynamic resolution.
    pub fn seen_watermark(&self) -> i64 {
        self.ctx.data.seen.load(Ordering::SeqCst)
    }
}

/// Standing message context and decorations for a family of call sites.
///
/// An attribution prepends its elements to every resolution and applies
/// its names and values to the resolved logger, so a subsystem can set up
/// its realm and fixed fields once:
///
/// ```
/// use std::sync::Arc;
/// use siftlog::{Context, NopSink, Realm};
///
/// let ctx = Context::new(Arc::new(NopSink));
/// let db = ctx
///     .attribution()
///     .with_context(Realm::new("db"))
///     .with_values(&["pool".into(), "main".into()]);
/// let logger = db.logger(&[]);
/// # let _ = logger;
/// ```
#[derive(Clone)]
pub struct Attribution {
    ctx: Context,
    mctx: Vec<Element>,
    names: Vec<String>,
    values: Vec<Value>,
}

impl Attribution {
    /// Adds a standing message-context element.
    pub fn with_context(mut self, element: impl Into<Element>) -> Self {
        self.mctx.push(element.into());
        self
    }

    /// Adds a name segment applied to every resolved logger.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Adds key/value fields applied to every resolved logger.
    pub fn with_values(mut self, kvs: &[FieldArg]) -> Self {
        self.values.extend(normalize(kvs));
        self
    }

    /// Resolves a logger with the standing elements prepended to `mctx`
    /// and the standing decorations applied.
    pub fn logger(&self, mctx: &[Element]) -> Logger {
        let mut full = self.mctx.clone();
        full.extend_from_slice(mctx);
        let mut logger = self.ctx.logger(&full);
        for name in &self.names {
            logger = logger.with_name(name);
        }
        if !self.values.is_empty() {
            logger = logger.with_values_raw(&self.values);
        }
        logger
    }
}

/// The terminal fallback: a dynamic view of the owning context's current
/// effective default level and base sink.
///
/// Level and sink are looked up on every call, so `set_default_level` and
/// `set_base_sink` (on the context or an ancestor) take effect in default
/// loggers that were handed out earlier. Decorations accumulate in the
/// view and are replayed onto the current base sink at emission time.
struct DefaultSink {
    ctx: Context,
    names: Vec<String>,
    values: Vec<Value>,
}

impl DefaultSink {
    fn new(ctx: Context) -> Self {
        Self {
            ctx,
            names: Vec::new(),
            values: Vec::new(),
        }
    }

    fn decorated(&self) -> Arc<dyn Sink> {
        let mut sink = self.ctx.base_sink();
        for name in &self.names {
            sink = sink.with_name(name);
        }
        if !self.values.is_empty() {
            sink = sink.with_values(&self.values);
        }
        sink
    }
}

impl Sink for DefaultSink {
    fn enabled(&self, level: i32) -> bool {
        self.ctx.default_level() >= level
    }

    fn info(&self, level: i32, msg: &str, fields: &[Value]) {
        if !self.enabled(level) {
            return;
        }
        self.decorated().info(level, msg, fields);
    }

    fn error(&self, err: Option<&dyn Error>, msg: &str, fields: &[Value]) {
        // Errors bypass the verbosity gate unless logging is off entirely.
        if self.ctx.default_level() <= level::NONE {
            return;
        }
        self.decorated().error(err, msg, fields);
    }

    fn with_name(&self, name: &str) -> Arc<dyn Sink> {
        let mut names = self.names.clone();
        names.push(name.to_string());
        Arc::new(DefaultSink {
            ctx: self.ctx.clone(),
            names,
            values: self.values.clone(),
        })
    }

    fn reset_name(&self, name: &str) -> Arc<dyn Sink> {
        Arc::new(DefaultSink {
            ctx: self.ctx.clone(),
            names: vec![name.to_string()],
            values: self.values.clone(),
        })
    }

    fn with_values(&self, fields: &[Value]) -> Arc<dyn Sink> {
        let mut values = self.values.clone();
        values.extend_from_slice(fields);
        Arc::new(DefaultSink {
            ctx: self.ctx.clone(),
            names: self.names.clone(),
            values,
        })
    }
}
