//! Integration tests for watermark stamping and dynamic invalidation.
//!
//! Watermark stamps come from a process-wide sequence, so tests that
//! assert exact increments serialise behind one lock instead of racing
//! each other for sequence numbers.

mod common;

use std::sync::{Mutex, OnceLock};

use siftlog::{level, Context};

fn sequence_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(Mutex::default)
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[test]
fn every_mutation_advances_the_watermark_by_one() {
    let _serial = sequence_lock();
    let (sink, _lines) = common::recording();
    let ctx = Context::new(sink);
    let updater = ctx.updater();

    ctx.set_default_level(level::DEBUG);
    let w = updater.watermark();

    ctx.set_default_level(level::TRACE);
    assert_eq!(updater.watermark(), w + 1);

    ctx.add_rule(std::sync::Arc::new(siftlog::ConditionRule::new(
        level::DEBUG,
        [],
    )));
    assert_eq!(updater.watermark(), w + 2);

    ctx.reset_rules();
    assert_eq!(updater.watermark(), w + 3);
}

#[test]
fn watermark_never_decreases() {
    let _serial = sequence_lock();
    let (sink, _lines) = common::recording();
    let ctx = Context::new(sink);
    let updater = ctx.updater();

    let mut previous = updater.watermark();
    for _ in 0..5 {
        ctx.set_default_level(level::DEBUG);
        let next = updater.watermark();
        assert!(next > previous);
        previous = next;
    }
}

#[test]
fn seen_watermark_catches_up_only_on_a_resolve() {
    let _serial = sequence_lock();
    let (sink, _lines) = common::recording();
    let ctx = Context::new(sink);
    let updater = ctx.updater();

    let logger = ctx.dynamic_logger(&[]);
    assert_eq!(updater.seen_watermark(), updater.watermark());

    ctx.set_default_level(level::DEBUG);
    ctx.set_default_level(level::TRACE);
    assert!(updater.watermark() > updater.seen_watermark());

    logger.info("resolve", &[]);
    assert_eq!(updater.seen_watermark(), updater.watermark());
}

#[test]
fn child_watermark_joins_the_parent_chain() {
    let _serial = sequence_lock();
    let (sink, _lines) = common::recording();
    let parent = Context::new(sink);
    let child = Context::with_parent(&parent);
    let up = parent.updater();
    let uc = child.updater();

    parent.set_default_level(level::DEBUG);
    let w = uc.watermark();
    assert_eq!(w, up.watermark());

    // A child mutation moves only the child's effective watermark.
    child.set_default_level(level::WARN);
    assert_eq!(uc.watermark(), w + 1);
    assert_eq!(up.watermark(), w);

    // A parent mutation moves both, past everything the child has seen.
    parent.set_default_level(level::TRACE);
    assert_eq!(up.watermark(), w + 2);
    assert_eq!(uc.watermark(), w + 2);
}

#[test]
fn ancestor_mutations_invalidate_even_busy_children() {
    let _serial = sequence_lock();
    let (sink, lines) = common::recording();
    let parent = Context::new(sink);
    let child = Context::with_parent(&parent);

    // Pile up child mutations so its own stamp runs well ahead of the
    // parent's before the parent ever changes.
    for _ in 0..4 {
        child.reset_rules();
    }

    let logger = child.dynamic_logger(&[]);
    logger.debug("debug", &[]);
    assert_eq!(lines.all(), Vec::<String>::new());

    parent.set_default_level(level::DEBUG);
    logger.debug("debug", &[]);
    assert_eq!(lines.all(), vec!["V[4] debug"]);
}
