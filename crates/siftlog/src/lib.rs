#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `siftlog` is a structured, contextual, rule-driven logging facade. It
//! decouples call-site logging from routing policy: at the call site a
//! program attaches *message context* — [`Realm`]s, [`Tag`]s,
//! [`Attribute`]s, [`Name`]s, [`KeyValue`] pairs — and emits at a
//! severity; a [`Context`] matches the message context against an ordered
//! rule list and selects the sink and verbosity for the emission.
//!
//! Contexts are hierarchical: a child inherits the rules, base sink, and
//! default level of its parent and overrides selectively. Changes
//! propagate lazily to handed-out [dynamic loggers](Context::dynamic_logger)
//! through a watermark protocol — no callbacks, no backpointers.
//!
//! # Design
//!
//! The core is a pure in-process routing engine. It consumes a narrow
//! [`Sink`] capability (numeric verbosity, `info`/`error` emission,
//! name/value decoration) and knows nothing about formatting or output;
//! concrete backends live in `siftlog-sink`, and the externalised YAML
//! configuration in `siftlog-config`.
//!
//! Severities share one open-ended integer scale (see [`level`]): a rule
//! or default level is simply the greatest level still emitted. When an
//! embedder hands over a sink that is already verbosity-filtered, the
//! context installs a shift mapping the public scale onto the sink's own
//! (see [`adapt_sink`]).
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use siftlog::{level, Condition, ConditionRule, Context, NopSink, Realm, Tag};
//!
//! let ctx = Context::new(Arc::new(NopSink));
//!
//! // Debug-level logging for the database subsystem only.
//! ctx.add_rule(Arc::new(ConditionRule::new(
//!     level::DEBUG,
//!     [Condition::from(Realm::prefix("db"))],
//! )));
//!
//! let plain = ctx.logger(&[]);
//! let db = ctx.logger(&[Realm::new("db/pool").into()]);
//! assert!(!plain.enabled(level::DEBUG));
//! assert!(db.enabled(level::DEBUG));
//! ```
//!
//! # Concurrency
//!
//! Everything is callable from any thread. Each context serialises its
//! mutations behind a read-write lock; evaluation recurses strictly
//! child-before-parent. Bound loggers are immutable snapshots; dynamic
//! loggers refresh via an atomic watermark comparison.

mod adapt;
mod condition;
mod context;
pub mod defs;
mod dynamic;
mod element;
mod field;
pub mod keys;
pub mod level;
mod logger;
mod rule;
mod sink;

pub use adapt::{adapt_sink, probe_verbosity, wrap_sink};
pub use condition::Condition;
pub use context::{Attribution, Context, Updater};
pub use defs::{define_realm, define_tag, realm_definitions, tag_definitions, Definitions};
pub use element::{Attribute, Element, Name, Realm, Tag};
pub use field::{display_value, kv, normalize, FieldArg, KeyValue, Value};
pub use logger::Logger;
pub use rule::{ConditionRule, Rule};
pub use sink::{NopSink, RuntimeInfo, Sink};
