//! crates/siftlog/src/element.rs
//! Message-context elements.
//!
//! A call site annotates an emission with a list of elements — realms,
//! tags, attributes, names, key/value pairs — describing where the message
//! comes from and what it is about. Rules match against this list to pick
//! a logger; elements that carry decoration (everything except tags,
//! prefix realms, and custom payloads) additionally attach themselves to
//! the selected logger.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::field::{KeyValue, Value};
use crate::logger::Logger;

/// A hierarchical subsystem identifier, slash-separated.
///
/// Realms serve double duty: as a rule condition they select messages
/// originating from a subsystem, and as message context they decorate the
/// selected logger. A *prefix* realm ([`Realm::prefix`]) matches a whole
/// subtree of realms and never attaches. An *absolute* realm
/// ([`Realm::absolute`]) replaces the logger's name chain on attachment
/// instead of nesting below it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Realm {
    name: String,
    prefix: bool,
    absolute: bool,
}

impl Realm {
    /// A relative realm: matches by exact name, attaches by appending.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: false,
            absolute: false,
        }
    }

    /// An absolute realm: matches by exact name, attachment replaces the
    /// logger's name chain.
    pub fn absolute(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: false,
            absolute: true,
        }
    }

    /// A realm prefix: matches any realm equal to `name` or nested below
    /// it (`name` + `/` + …). Used only for matching, never attached.
    pub fn prefix(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: true,
            absolute: false,
        }
    }

    /// The realm name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this realm matches as a prefix.
    pub fn is_prefix(&self) -> bool {
        self.prefix
    }

    /// Whether attachment replaces the name chain.
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub(crate) fn check(&self, name: &str) -> bool {
        if name == self.name {
            return true;
        }
        self.prefix
            && name
                .strip_prefix(self.name.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A flat, opaque topic label. Pure match condition, no attachment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tag {
    name: String,
}

impl Tag {
    /// Creates a tag.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The tag name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A named runtime value, usable both as a routing condition and as a log
/// field.
///
/// As a condition it matches when the message context carries an attribute
/// with the same name and a deep-equal value; as an attacher it decorates
/// the logger with the corresponding key/value pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    name: String,
    value: Value,
}

impl Attribute {
    /// Creates an attribute.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// A logger-name segment; attaches by appending to the name chain.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Name(String);

impl Name {
    /// Creates a name segment.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The segment text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One element of a message context.
///
/// The `Custom` variant carries an opaque payload for custom [`Rule`]
/// implementations to interpret; built-in conditions and attachment ignore
/// it, so unknown element kinds can never fail evaluation.
///
/// [`Rule`]: crate::Rule
#[derive(Clone)]
pub enum Element {
    /// A realm (see [`Realm`]).
    Realm(Realm),
    /// A tag (see [`Tag`]).
    Tag(Tag),
    /// An attribute (see [`Attribute`]).
    Attribute(Attribute),
    /// A logger-name segment.
    Name(Name),
    /// A key/value pair attaching as a logger value.
    KeyValue(KeyValue),
    /// An opaque payload for custom rules.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Element {
    /// Whether this element decorates a selected logger.
    pub fn attaches(&self) -> bool {
        match self {
            Element::Realm(r) => !r.is_prefix(),
            Element::Name(_) | Element::Attribute(_) | Element::KeyValue(_) => true,
            Element::Tag(_) | Element::Custom(_) => false,
        }
    }

    /// Applies this element's decoration to a logger.
    ///
    /// Non-attaching elements return the logger unchanged. An absolute
    /// realm resets the name chain to its own name; a relative realm and a
    /// [`Name`] append a segment; attributes and key/value pairs attach as
    /// logger values.
    pub fn attach(&self, logger: Logger) -> Logger {
        match self {
            Element::Realm(r) if !r.is_prefix() => {
                if r.is_absolute() {
                    logger.reset_name(r.name())
                } else {
                    logger.with_name(r.name())
                }
            }
            Element::Name(n) => logger.with_name(n.as_str()),
            Element::Attribute(a) => {
                logger.with_values(&[KeyValue::new(a.name(), a.value().clone()).into()])
            }
            Element::KeyValue(pair) => logger.with_values(&[pair.clone().into()]),
            _ => logger,
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Realm(r) => f.debug_tuple("Realm").field(r).finish(),
            Element::Tag(t) => f.debug_tuple("Tag").field(t).finish(),
            Element::Attribute(a) => f.debug_tuple("Attribute").field(a).finish(),
            Element::Name(n) => f.debug_tuple("Name").field(n).finish(),
            Element::KeyValue(kv) => f.debug_tuple("KeyValue").field(kv).finish(),
            Element::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::Realm(a), Element::Realm(b)) => a == b,
            (Element::Tag(a), Element::Tag(b)) => a == b,
            (Element::Attribute(a), Element::Attribute(b)) => a == b,
            (Element::Name(a), Element::Name(b)) => a == b,
            (Element::KeyValue(a), Element::KeyValue(b)) => a == b,
            (Element::Custom(a), Element::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Realm> for Element {
    fn from(realm: Realm) -> Self {
        Element::Realm(realm)
    }
}

impl From<Tag> for Element {
    fn from(tag: Tag) -> Self {
        Element::Tag(tag)
    }
}

impl From<Attribute> for Element {
    fn from(attribute: Attribute) -> Self {
        Element::Attribute(attribute)
    }
}

impl From<Name> for Element {
    fn from(name: Name) -> Self {
        Element::Name(name)
    }
}

impl From<KeyValue> for Element {
    fn from(pair: KeyValue) -> Self {
        Element::KeyValue(pair)
    }
}

/// Produces an absolute [`Realm`] for the calling module, with `::`
/// rewritten to the slash-separated realm form.
///
/// ```
/// let realm = siftlog::module_realm!();
/// assert!(realm.is_absolute());
/// ```
#[macro_export]
macro_rules! module_realm {
    () => {
        $crate::Realm::absolute(module_path!().replace("::", "/"))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realm_matches_exact_name() {
        let r = Realm::new("db");
        assert!(r.check("db"));
        assert!(!r.check("db/pool"));
        assert!(!r.check("dbx"));
    }

    #[test]
    fn prefix_realm_matches_subtree() {
        let p = Realm::prefix("net");
        assert!(p.check("net"));
        assert!(p.check("net/tcp"));
        assert!(p.check("net/tcp/conn"));
        assert!(!p.check("network"));
        assert!(!p.check("ne"));
    }

    #[test]
    fn elements_report_attachment_capability() {
        assert!(Element::from(Realm::new("r")).attaches());
        assert!(!Element::from(Realm::prefix("r")).attaches());
        assert!(!Element::from(Tag::new("t")).attaches());
        assert!(Element::from(Name::new("n")).attaches());
        assert!(Element::from(Attribute::new("a", 1)).attaches());
        assert!(Element::from(KeyValue::new("k", "v")).attaches());
    }

    #[test]
    fn custom_elements_compare_by_identity() {
        let payload: Arc<dyn Any + Send + Sync> = Arc::new(42_u32);
        let a = Element::Custom(payload.clone());
        let b = Element::Custom(payload);
        let c = Element::Custom(Arc::new(42_u32));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn module_realm_uses_module_path() {
        let realm = module_realm!();
        assert!(realm.is_absolute());
        assert!(realm.name().starts_with("siftlog/"));
    }
}
