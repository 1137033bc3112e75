//! crates/siftlog/src/field.rs
//! Key/value field handling for the logger facade.
//!
//! Sinks consume a flat, alternating key/value list of [`Value`]s, the way
//! structured logging backends expect it. Call sites are allowed to be
//! sloppier: the argument list may interleave bare values (forming pairs
//! positionally) with whole [`KeyValue`] pairs. [`normalize`] flattens such
//! a list by expanding pairs in place. A trailing unpaired key and
//! non-string keys are preserved verbatim; deciding how to report them is
//! the sink's business, the facade never rejects an emission.

pub use serde_json::Value;

/// A single key/value pair usable as a logger value or message-context
/// element.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    key: String,
    value: Value,
}

impl KeyValue {
    /// Creates a pair from a key and any value convertible to [`Value`].
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The field key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The field value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// One entry of a logging call's key/value argument list.
///
/// Either a bare value (pairing up positionally with its neighbours) or a
/// complete [`KeyValue`] pair. Conversions exist from the common primitive
/// types, so argument lists read naturally:
///
/// ```
/// use siftlog::{kv, FieldArg};
///
/// let args: Vec<FieldArg> = vec!["attempts".into(), 3.into(), kv("peer", "10.0.0.1")];
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldArg(Arg);

#[derive(Clone, Debug, PartialEq)]
enum Arg {
    Value(Value),
    Pair(KeyValue),
}

/// Shorthand for building a [`FieldArg`] holding a complete pair.
pub fn kv(key: impl Into<String>, value: impl Into<Value>) -> FieldArg {
    FieldArg(Arg::Pair(KeyValue::new(key, value)))
}

impl From<KeyValue> for FieldArg {
    fn from(pair: KeyValue) -> Self {
        FieldArg(Arg::Pair(pair))
    }
}

impl From<Value> for FieldArg {
    fn from(value: Value) -> Self {
        FieldArg(Arg::Value(value))
    }
}

macro_rules! field_arg_from {
    ($($ty:ty),* $(,)?) => {
        $(impl From<$ty> for FieldArg {
            fn from(value: $ty) -> Self {
                FieldArg(Arg::Value(Value::from(value)))
            }
        })*
    };
}

field_arg_from!(&str, String, bool, i32, i64, u32, u64, f64);

/// Flattens an argument list into the alternating form sinks consume.
///
/// Pairs are expanded in place (key, then value); bare values are passed
/// through unchanged. No validation happens here: a malformed list stays
/// malformed and is forwarded as-is.
pub fn normalize(args: &[FieldArg]) -> Vec<Value> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        match &arg.0 {
            Arg::Value(v) => out.push(v.clone()),
            Arg::Pair(pair) => {
                out.push(Value::String(pair.key.clone()));
                out.push(pair.value.clone());
            }
        }
    }
    out
}

/// Renders a value for line-oriented output: strings bare, everything else
/// in its JSON form.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
