//! crates/siftlog/src/condition.rs
//! Boolean conditions over message contexts.

use crate::element::{Attribute, Element, Realm, Tag};

/// A condition a rule evaluates against a message context.
///
/// Leaf conditions scan the element list existentially: a realm condition
/// holds when some realm element in the context satisfies its (exact or
/// prefix) name check, a tag condition when a tag with the same name is
/// present, an attribute condition when an attribute with the same name
/// and a deep-equal value is present. Elements of other kinds are ignored
/// and can never make evaluation fail.
///
/// The composite variants form the usual short-circuit boolean algebra.
/// Structural equality (`PartialEq`) over the condition AST is what the
/// default rule replaceability test compares.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// Some realm element satisfies the realm's name check.
    Realm(Realm),
    /// Some tag element carries the same name.
    Tag(Tag),
    /// Some attribute element carries the same name and value.
    Attribute(Attribute),
    /// Every inner condition holds.
    And(Vec<Condition>),
    /// At least one inner condition holds.
    Or(Vec<Condition>),
    /// The inner condition does not hold.
    Not(Box<Condition>),
}

impl Condition {
    /// Conjunction of the given conditions.
    pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::And(conditions.into_iter().collect())
    }

    /// Disjunction of the given conditions.
    pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Or(conditions.into_iter().collect())
    }

    /// Complement of the given condition.
    pub fn not(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    /// Evaluates the condition against a message context.
    pub fn matches(&self, mctx: &[Element]) -> bool {
        match self {
            Condition::Realm(realm) => mctx
                .iter()
                .any(|e| matches!(e, Element::Realm(r) if realm.check(r.name()))),
            Condition::Tag(tag) => mctx
                .iter()
                .any(|e| matches!(e, Element::Tag(t) if t.name() == tag.name())),
            Condition::Attribute(attr) => mctx.iter().any(|e| {
                matches!(e, Element::Attribute(a)
                    if a.name() == attr.name() && a.value() == attr.value())
            }),
            Condition::And(conditions) => conditions.iter().all(|c| c.matches(mctx)),
            Condition::Or(conditions) => conditions.iter().any(|c| c.matches(mctx)),
            Condition::Not(condition) => !condition.matches(mctx),
        }
    }
}

impl From<Realm> for Condition {
    fn from(realm: Realm) -> Self {
        Condition::Realm(realm)
    }
}

impl From<Tag> for Condition {
    fn from(tag: Tag) -> Self {
        Condition::Tag(tag)
    }
}

impl From<Attribute> for Condition {
    fn from(attribute: Attribute) -> Self {
        Condition::Attribute(attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ctx(elements: &[Element]) -> Vec<Element> {
        elements.to_vec()
    }

    #[test]
    fn realm_condition_scans_realm_elements_only() {
        let cond = Condition::from(Realm::new("db"));
        assert!(cond.matches(&ctx(&[Realm::new("db").into()])));
        assert!(!cond.matches(&ctx(&[Tag::new("db").into()])));
        assert!(!cond.matches(&[]));
    }

    #[test]
    fn prefix_condition_matches_nested_realms() {
        let cond = Condition::from(Realm::prefix("net"));
        assert!(cond.matches(&ctx(&[Realm::new("net/tcp").into()])));
        assert!(cond.matches(&ctx(&[Realm::new("net").into()])));
        assert!(!cond.matches(&ctx(&[Realm::new("network").into()])));
    }

    #[test]
    fn attribute_condition_compares_values_deeply() {
        let want = Condition::from(Attribute::new("peer", serde_json::json!({"host": "a", "port": 1})));
        let same = Attribute::new("peer", serde_json::json!({"host": "a", "port": 1}));
        let other = Attribute::new("peer", serde_json::json!({"host": "a", "port": 2}));
        assert!(want.matches(&ctx(&[same.into()])));
        assert!(!want.matches(&ctx(&[other.into()])));
    }

    #[test]
    fn unknown_elements_are_ignored() {
        let cond = Condition::from(Tag::new("t"));
        let mctx = ctx(&[
            Element::Custom(std::sync::Arc::new(())),
            Tag::new("t").into(),
        ]);
        assert!(cond.matches(&mctx));
    }

    #[test]
    fn composites_follow_boolean_algebra() {
        let t = Condition::from(Tag::new("t"));
        let u = Condition::from(Tag::new("u"));
        let has_t = ctx(&[Tag::new("t").into()]);

        assert!(Condition::and([t.clone()]).matches(&has_t));
        assert!(!Condition::and([t.clone(), u.clone()]).matches(&has_t));
        assert!(Condition::or([u.clone(), t.clone()]).matches(&has_t));
        assert!(!Condition::or([u.clone()]).matches(&has_t));
        assert!(Condition::not(u).matches(&has_t));
        assert!(!Condition::not(t).matches(&has_t));
        assert!(Condition::and([]).matches(&has_t));
        assert!(!Condition::or([]).matches(&has_t));
    }

    proptest! {
        // And/Or/Not over arbitrary leaf outcomes behave like all/any/not.
        #[test]
        fn boolean_algebra_over_arbitrary_outcomes(present in proptest::collection::vec(any::<bool>(), 0..8)) {
            let mctx: Vec<Element> = present
                .iter()
                .enumerate()
                .filter(|(_, p)| **p)
                .map(|(i, _)| Tag::new(format!("t{i}")).into())
                .collect();
            let leaves: Vec<Condition> = (0..present.len())
                .map(|i| Condition::from(Tag::new(format!("t{i}"))))
                .collect();

            let all = present.iter().all(|p| *p);
            let any = present.iter().any(|p| *p);
            prop_assert_eq!(Condition::and(leaves.clone()).matches(&mctx), all);
            prop_assert_eq!(Condition::or(leaves.clone()).matches(&mctx), any);
            prop_assert_eq!(Condition::not(Condition::or(leaves)).matches(&mctx), !any);
        }
    }
}
