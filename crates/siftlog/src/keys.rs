//! crates/siftlog/src/keys.rs
//! Standard field keys and their pair constructors.
//!
//! Using the same keys across subsystems keeps aggregated output
//! queryable; each constant has a shorthand building the complete
//! [`FieldArg`] pair.

use crate::field::{FieldArg, KeyValue, Value};

/// Key for error values.
pub const ERROR: &str = "error";
/// Key for object identifiers.
pub const ID: &str = "id";
/// Key for object names.
pub const NAME: &str = "name";
/// Key for namespaces.
pub const NAMESPACE: &str = "namespace";
/// Key for element references.
pub const ELEMENT: &str = "element";

/// An `error` field.
pub fn error(value: impl Into<Value>) -> FieldArg {
    KeyValue::new(ERROR, value).into()
}

/// An `id` field.
pub fn id(value: impl Into<Value>) -> FieldArg {
    KeyValue::new(ID, value).into()
}

/// A `name` field.
pub fn name(value: impl Into<Value>) -> FieldArg {
    KeyValue::new(NAME, value).into()
}

/// A `namespace` field.
pub fn namespace(value: impl Into<Value>) -> FieldArg {
    KeyValue::new(NAMESPACE, value).into()
}

/// An `element` field.
pub fn element(value: impl Into<Value>) -> FieldArg {
    KeyValue::new(ELEMENT, value).into()
}
