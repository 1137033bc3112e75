//! Shared field rendering for line-oriented sinks.

use siftlog::{display_value, Value};

/// Marker rendered for a trailing key that lost its value.
pub(crate) const MISSING: &str = "!(missing)";

/// Appends ` key=value` pairs to a line; a trailing unpaired key is kept
/// and marked rather than dropped.
pub(crate) fn append_pairs(line: &mut String, fields: &[Value]) {
    let mut chunks = fields.chunks_exact(2);
    for pair in chunks.by_ref() {
        line.push(' ');
        line.push_str(&display_value(&pair[0]));
        line.push('=');
        line.push_str(&display_value(&pair[1]));
    }
    if let [key] = chunks.remainder() {
        line.push(' ');
        line.push_str(&display_value(key));
        line.push('=');
        line.push_str(MISSING);
    }
}

/// Appends fields space-separated without any key/value punctuation, the
/// way the capture format records them.
pub(crate) fn append_bare(line: &mut String, fields: &[Value]) {
    for field in fields {
        line.push(' ');
        line.push_str(&display_value(field));
    }
}
