//! crates/siftlog/src/defs.rs
//! Process-wide realm and tag definitions.
//!
//! Purely documentary: subsystems register the realms and tags they emit
//! under, together with human descriptions, so tooling can enumerate what
//! a process may log. Definitions never influence routing.

use std::collections::BTreeMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::element::{Realm, Tag};

/// Snapshot of registered definitions: name to sorted, deduplicated
/// descriptions.
pub type Definitions = BTreeMap<String, Vec<String>>;

#[derive(Default)]
struct DefRegistry {
    realms: Definitions,
    tags: Definitions,
}

static DEFS: OnceLock<Mutex<DefRegistry>> = OnceLock::new();

fn registry() -> &'static Mutex<DefRegistry> {
    DEFS.get_or_init(Mutex::default)
}

fn record(map: &mut Definitions, name: &str, desc: &str) {
    if desc.is_empty() {
        return;
    }
    let descriptions = map.entry(name.to_string()).or_default();
    if let Err(pos) = descriptions.binary_search(&desc.to_string()) {
        descriptions.insert(pos, desc.to_string());
    }
}

/// Registers a realm description and returns the canonical (absolute)
/// realm. Empty descriptions are ignored.
pub fn define_realm(name: &str, desc: &str) -> Realm {
    let mut defs = registry().lock().unwrap_or_else(PoisonError::into_inner);
    record(&mut defs.realms, name, desc);
    Realm::absolute(name)
}

/// Registers a tag description and returns the canonical tag. Empty
/// descriptions are ignored.
pub fn define_tag(name: &str, desc: &str) -> Tag {
    let mut defs = registry().lock().unwrap_or_else(PoisonError::into_inner);
    record(&mut defs.tags, name, desc);
    Tag::new(name)
}

/// Snapshot of all registered realm definitions.
pub fn realm_definitions() -> Definitions {
    registry()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .realms
        .clone()
}

/// Snapshot of all registered tag definitions.
pub fn tag_definitions() -> Definitions {
    registry()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .tags
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    // The registry is process-wide; every test uses unique names.

    #[test]
    fn definitions_are_sorted_and_deduplicated() {
        define_tag("defs-sort", "desc 2");
        define_tag("defs-sort", "desc 1");
        define_tag("defs-sort", "desc 2");

        let defs = tag_definitions();
        assert_eq!(
            defs.get("defs-sort"),
            Some(&vec!["desc 1".to_string(), "desc 2".to_string()])
        );
    }

    #[test]
    fn empty_descriptions_are_ignored() {
        define_realm("defs-empty", "");
        assert!(!realm_definitions().contains_key("defs-empty"));

        define_realm("defs-empty", "described");
        define_realm("defs-empty", "");
        assert_eq!(
            realm_definitions().get("defs-empty"),
            Some(&vec!["described".to_string()])
        );
    }

    #[test]
    fn define_realm_returns_the_canonical_absolute_realm() {
        let realm = define_realm("defs-canonical", "a subsystem");
        assert!(realm.is_absolute());
        assert_eq!(realm.name(), "defs-canonical");

        let tag = define_tag("defs-canonical-tag", "a topic");
        assert_eq!(tag.name(), "defs-canonical-tag");
    }
}
