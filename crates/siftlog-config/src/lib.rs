#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Externalised YAML configuration for `siftlog` contexts.
//!
//! A configuration document sets a default level and appends rules:
//!
//! ```yaml
//! defaultLevel: Warn
//! rules:
//! - rule:
//!     level: Debug
//!     conditions:
//!     - realmprefix: db
//!     - not:
//!         tag: noisy
//! ```
//!
//! Conditions are single-key objects (`tag`, `realm`, `realmprefix`,
//! `and`, `or`, `not`, `attribute`); attribute values are typed elements
//! `{typeTag: spec}` resolved through the value-type [`Registry`], with
//! the built-in `value` tag as the generic passthrough. The whole model
//! round-trips through serde, so documents can equally be composed in
//! code and serialized.
//!
//! ```
//! use std::sync::Arc;
//! use siftlog::{level, Context, NopSink, Realm};
//!
//! let ctx = Context::new(Arc::new(NopSink));
//! siftlog_config::configure_with_str(&ctx, "defaultLevel: Warn\n").unwrap();
//! assert_eq!(ctx.default_level(), level::WARN);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use siftlog::{level, Condition, ConditionRule, Context, Realm, Tag};

mod error;
mod registry;

pub use error::ConfigError;
pub use registry::{default_registry_snapshot, register_value_type, Registry, ValueType};

/// A complete configuration document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The default level applied to the context, if present.
    #[serde(rename = "defaultLevel", default, skip_serializing_if = "Option::is_none")]
    pub default_level: Option<LevelSpec>,
    /// Rules appended in document order (a later rule ends up with the
    /// higher match priority, like repeated `add_rule` calls).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleSpec>,
}

/// A level in its externalised form: a name or a non-negative number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    /// `error|warn|info|debug|trace`, any case.
    Name(String),
    /// A non-negative numeric level.
    Number(i64),
}

impl LevelSpec {
    /// Resolves to the numeric level.
    pub fn resolve(&self) -> Result<i32, ConfigError> {
        match self {
            LevelSpec::Name(name) => Ok(level::parse(name)?),
            LevelSpec::Number(n) => {
                if *n < 0 {
                    return Err(level::ParseLevelError::Negative(*n).into());
                }
                Ok(i32::try_from(*n)
                    .map_err(|_| level::ParseLevelError::Unknown(n.to_string()))?)
            }
        }
    }
}

/// One entry of the rule list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RuleSpec {
    /// A condition rule.
    #[serde(rename = "rule")]
    Rule(ConditionRuleSpec),
}

/// The externalised form of a [`ConditionRule`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionRuleSpec {
    /// The rule's verbosity cap.
    pub level: LevelSpec,
    /// The conditions, all of which must match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionSpec>,
}

/// A condition in its externalised single-key form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionSpec {
    /// `tag: name`
    Tag(String),
    /// `realm: name`
    Realm(String),
    /// `realmprefix: name`
    RealmPrefix(String),
    /// `attribute: {name, value}`
    Attribute(AttributeSpec),
    /// `and: [cond…]`
    And(Vec<ConditionSpec>),
    /// `or: [cond…]`
    Or(Vec<ConditionSpec>),
    /// `not: cond`
    Not(Box<ConditionSpec>),
}

/// The externalised form of an attribute condition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeSpec {
    /// The attribute name.
    pub name: String,
    /// The attribute value as a typed element.
    pub value: ElementSpec,
}

/// A typed value element: a single-key mapping `{typeTag: spec}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementSpec(pub BTreeMap<String, serde_yaml::Value>);

impl ElementSpec {
    /// A generic (`value`-tagged) element.
    pub fn generic(value: impl Into<serde_yaml::Value>) -> Self {
        Self::typed("value", value)
    }

    /// An element with an explicit type tag.
    pub fn typed(tag: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(tag.into(), value.into());
        Self(map)
    }

    pub(crate) fn entry(&self) -> Result<(&str, &serde_yaml::Value), ConfigError> {
        let mut entries = self.0.iter();
        match (entries.next(), entries.next()) {
            (Some((tag, spec)), None) => Ok((tag.as_str(), spec)),
            _ => Err(ConfigError::ElementShape),
        }
    }
}

impl ConditionSpec {
    /// Builds the runtime condition, resolving attribute values through
    /// `registry`.
    pub fn build(&self, registry: &Registry) -> Result<Condition, ConfigError> {
        match self {
            ConditionSpec::Tag(name) => Ok(Condition::Tag(Tag::new(name))),
            ConditionSpec::Realm(name) => Ok(Condition::Realm(Realm::new(name))),
            ConditionSpec::RealmPrefix(name) => Ok(Condition::Realm(Realm::prefix(name))),
            ConditionSpec::Attribute(attr) => {
                let value = registry.create_value(&attr.value)?;
                Ok(Condition::Attribute(siftlog::Attribute::new(
                    &attr.name, value,
                )))
            }
            ConditionSpec::And(specs) => Ok(Condition::And(build_all(specs, registry)?)),
            ConditionSpec::Or(specs) => Ok(Condition::Or(build_all(specs, registry)?)),
            ConditionSpec::Not(spec) => Ok(Condition::not(spec.build(registry)?)),
        }
    }
}

fn build_all(specs: &[ConditionSpec], registry: &Registry) -> Result<Vec<Condition>, ConfigError> {
    specs.iter().map(|s| s.build(registry)).collect()
}

impl ConditionRuleSpec {
    /// Builds the runtime rule.
    pub fn build(&self, registry: &Registry) -> Result<ConditionRule, ConfigError> {
        Ok(ConditionRule::new(
            self.level.resolve()?,
            build_all(&self.conditions, registry)?,
        ))
    }
}

/// Parses a configuration document from YAML.
pub fn from_str(data: &str) -> Result<Config, ConfigError> {
    Ok(serde_yaml::from_str(data)?)
}

/// Applies a configuration to a context using the process-wide default
/// value-type registry.
pub fn configure(ctx: &Context, config: &Config) -> Result<(), ConfigError> {
    configure_with(ctx, config, &default_registry_snapshot())
}

/// Applies a configuration to a context with an explicit registry.
pub fn configure_with(
    ctx: &Context,
    config: &Config,
    registry: &Registry,
) -> Result<(), ConfigError> {
    if let Some(spec) = &config.default_level {
        ctx.set_default_level(spec.resolve()?);
    }
    for RuleSpec::Rule(rule) in &config.rules {
        ctx.add_rule(Arc::new(rule.build(registry)?));
    }
    Ok(())
}

/// Parses and applies a YAML document in one step.
pub fn configure_with_str(ctx: &Context, data: &str) -> Result<(), ConfigError> {
    configure(ctx, &from_str(data)?)
}
