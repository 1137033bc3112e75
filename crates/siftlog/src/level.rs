//! crates/siftlog/src/level.rs
//! The public severity scale and its textual forms.
//!
//! Severities are plain integers so that rule levels, default levels, and
//! sink verbosities share one scale. Lower values are more severe; a sink
//! is "enabled at `L`" when its current verbosity is at least `L`. Values
//! above [`TRACE`] are legal and simply enable everything (a default level
//! of 9 behaves like an unconditionally open context).

use std::borrow::Cow;

use thiserror::Error;

/// No logging at all.
pub const NONE: i32 = 0;
/// Errors that should definitely be noted.
pub const ERROR: i32 = 1;
/// Non-critical entries that deserve eyes.
pub const WARN: i32 = 2;
/// General operational entries about what is going on.
pub const INFO: i32 = 3;
/// Verbose diagnostics, usually only enabled while debugging.
pub const DEBUG: i32 = 4;
/// Finer-grained diagnostics than [`DEBUG`].
pub const TRACE: i32 = 5;

/// Error produced when a level string cannot be interpreted.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseLevelError {
    /// The string is neither a known level name nor an integer.
    #[error("unknown log level {0:?}")]
    Unknown(String),
    /// The string is an integer, but a negative one.
    #[error("negative log level {0}")]
    Negative(i64),
}

/// Parses a level from its textual form.
///
/// Accepts the canonical names `error`, `warn`, `info`, `debug`, and
/// `trace` in any case, or a non-negative integer. Anything else is an
/// error; in particular, negative integers are rejected rather than
/// clamped.
///
/// # Examples
///
/// ```
/// use siftlog::level;
///
/// assert_eq!(level::parse("Warn"), Ok(level::WARN));
/// assert_eq!(level::parse("7"), Ok(7));
/// assert!(level::parse("-1").is_err());
/// assert!(level::parse("loud").is_err());
/// ```
pub fn parse(s: &str) -> Result<i32, ParseLevelError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "error" => Ok(ERROR),
        "warn" => Ok(WARN),
        "info" => Ok(INFO),
        "debug" => Ok(DEBUG),
        "trace" => Ok(TRACE),
        other => {
            if let Ok(n) = other.parse::<i64>() {
                if n < 0 {
                    return Err(ParseLevelError::Negative(n));
                }
                if let Ok(n) = i32::try_from(n) {
                    return Ok(n);
                }
            }
            Err(ParseLevelError::Unknown(s.to_string()))
        }
    }
}

/// Renders a level in its canonical form.
///
/// The five named severities render as `Error`, `Warn`, `Info`, `Debug`,
/// and `Trace`; every other value falls back to its decimal form.
pub fn name(level: i32) -> Cow<'static, str> {
    match level {
        ERROR => Cow::Borrowed("Error"),
        WARN => Cow::Borrowed("Warn"),
        INFO => Cow::Borrowed("Info"),
        DEBUG => Cow::Borrowed("Debug"),
        TRACE => Cow::Borrowed("Trace"),
        other => Cow::Owned(other.to_string()),
    }
}
