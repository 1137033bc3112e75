//! Configuration errors.

use thiserror::Error;

/// Error produced while parsing or applying a configuration document.
///
/// Everything here surfaces to the caller of the config layer; the core
/// never sees configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document (or a typed value inside it) is not valid YAML for
    /// its expected shape.
    #[error("malformed configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A level string or number could not be interpreted.
    #[error(transparent)]
    Level(#[from] siftlog::level::ParseLevelError),

    /// A typed value element did not have exactly one type tag.
    #[error("typed value element must have exactly one type tag")]
    ElementShape,

    /// A typed value element used a tag no value type is registered for.
    #[error("unknown value type {0:?}")]
    UnknownValueType(String),
}
