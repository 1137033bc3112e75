//! crates/siftlog/src/rule.rs
//! Routing rules.

use std::any::Any;
use std::sync::Arc;

use crate::adapt::wrap_sink;
use crate::condition::Condition;
use crate::element::Element;
use crate::logger::Logger;
use crate::sink::Sink;

/// A routing rule: given a base sink and a message context, produce a
/// bound logger when the rule applies.
///
/// A matching rule owns the whole selection: it wraps the base sink at
/// its verbosity *and* applies the attacher-capable elements of the
/// message context, so the context adds nothing on the rule-matched path.
///
/// Rules may additionally declare that they *replace* older rules; when a
/// rule is added to a context, every existing rule it replaces is removed
/// first. The default is to replace nothing. `as_any` exists so that
/// `replaces` implementations can downcast the other rule and inspect it.
pub trait Rule: Send + Sync {
    /// Tries the rule against a message context.
    fn matches(&self, base: &Arc<dyn Sink>, mctx: &[Element]) -> Option<Logger>;

    /// Whether adding `self` should remove the older rule `other`.
    fn replaces(&self, _other: &dyn Rule) -> bool {
        false
    }

    /// Upcast for downcasting in [`Rule::replaces`] implementations.
    fn as_any(&self) -> &dyn Any;
}

/// The built-in rule: a verbosity applied when every condition matches.
///
/// Two `ConditionRule`s replace one another when their condition lists
/// are structurally equal, so re-adding a rule for the same conditions
/// updates its level instead of piling up dead entries.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionRule {
    level: i32,
    conditions: Vec<Condition>,
}

impl ConditionRule {
    /// Creates a rule emitting up to `level` when all `conditions` match.
    ///
    /// An empty condition list matches every message context, which makes
    /// a bare `ConditionRule::new(level, [])` an unconditional level
    /// override.
    pub fn new(level: i32, conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self {
            level,
            conditions: conditions.into_iter().collect(),
        }
    }

    /// The rule's verbosity cap.
    pub fn level(&self) -> i32 {
        self.level
    }

    /// The rule's conditions.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

impl Rule for ConditionRule {
    fn matches(&self, base: &Arc<dyn Sink>, mctx: &[Element]) -> Option<Logger> {
        if !self.conditions.iter().all(|c| c.matches(mctx)) {
            return None;
        }
        let mut logger = Logger::new(wrap_sink(self.level, 0, base.clone()));
        for element in mctx {
            logger = element.attach(logger);
        }
        Some(logger)
    }

    fn replaces(&self, other: &dyn Rule) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|o| o.conditions == self.conditions)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Tag;

    #[test]
    fn replaces_requires_structurally_equal_conditions() {
        let a = ConditionRule::new(crate::level::DEBUG, [Condition::Tag(Tag::new("t"))]);
        let b = ConditionRule::new(crate::level::TRACE, [Condition::Tag(Tag::new("t"))]);
        let c = ConditionRule::new(crate::level::TRACE, [Condition::Tag(Tag::new("u"))]);

        assert!(b.replaces(&a));
        assert!(a.replaces(&b));
        assert!(!c.replaces(&a));
    }

    #[test]
    fn mismatch_produces_no_logger() {
        let rule = ConditionRule::new(crate::level::DEBUG, [Condition::Tag(Tag::new("t"))]);
        let base: Arc<dyn Sink> = Arc::new(crate::sink::NopSink);
        assert!(rule.matches(&base, &[]).is_none());
        assert!(rule.matches(&base, &[Tag::new("t").into()]).is_some());
    }
}
