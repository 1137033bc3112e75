//! The value-type registry for typed attribute values.
//!
//! Attribute values in a configuration document are *typed elements*: a
//! single-key mapping `{typeTag: spec}`. The registry maps type tags to
//! factories turning the spec into a runtime [`Value`]. The built-in
//! `value` tag is the generic passthrough; embedders register their own
//! tags with [`register_value_type`] or on an owned [`Registry`].

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use siftlog::Value;

use crate::error::ConfigError;
use crate::ElementSpec;

/// Factory for one value type tag.
pub trait ValueType: Send + Sync {
    /// Builds the runtime value from the element's spec node.
    fn create(&self, spec: &serde_yaml::Value) -> Result<Value, ConfigError>;
}

/// The built-in generic type: the spec node itself, converted.
struct GenericValue;

impl ValueType for GenericValue {
    fn create(&self, spec: &serde_yaml::Value) -> Result<Value, ConfigError> {
        Ok(serde_yaml::from_value(spec.clone())?)
    }
}

/// A set of registered value types.
#[derive(Clone)]
pub struct Registry {
    types: HashMap<String, Arc<dyn ValueType>>,
}

impl Registry {
    /// A registry holding only the built-in `value` type.
    pub fn new() -> Self {
        let mut types: HashMap<String, Arc<dyn ValueType>> = HashMap::new();
        types.insert("value".to_string(), Arc::new(GenericValue));
        Self { types }
    }

    /// Registers (or replaces) a value type under `tag`.
    pub fn register(&mut self, tag: impl Into<String>, value_type: Arc<dyn ValueType>) {
        self.types.insert(tag.into(), value_type);
    }

    /// Resolves a typed element into a runtime value.
    ///
    /// The element must carry exactly one type tag, and the tag must be
    /// registered.
    pub fn create_value(&self, element: &ElementSpec) -> Result<Value, ConfigError> {
        let (tag, spec) = element.entry()?;
        let value_type = self
            .types
            .get(tag)
            .ok_or_else(|| ConfigError::UnknownValueType(tag.to_string()))?;
        value_type.create(spec)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT: OnceLock<RwLock<Registry>> = OnceLock::new();

fn default_registry() -> &'static RwLock<Registry> {
    DEFAULT.get_or_init(|| RwLock::new(Registry::new()))
}

/// Registers a value type in the process-wide default registry used by
/// [`configure`](crate::configure).
pub fn register_value_type(tag: impl Into<String>, value_type: Arc<dyn ValueType>) {
    default_registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(tag, value_type);
}

/// A snapshot of the process-wide default registry.
pub fn default_registry_snapshot() -> Registry {
    default_registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
