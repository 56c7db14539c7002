//! Numeric string coercion
//!
//! APIs often ship amounts as strings (`"100.5"`). `numberify` turns every
//! string that is a plain decimal number into a JSON number, walking arrays
//! and objects structurally. Anything else passes through untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

/// Optional minus, ASCII digits, optional fraction. No exponent, no `+`.
static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("Invalid regex pattern")
});

/// Coerce numeric strings to numbers, recursively
pub fn numberify(value: Value) -> Value {
    match value {
        Value::String(s) => match parse_number(&s) {
            Some(n) => Value::Number(n),
            None => Value::String(s),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(numberify).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, numberify(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Parse a numeric string, preferring exact integers
///
/// Returns `None` when the string does not match the pattern or the result
/// would not be finite.
pub fn parse_number(s: &str) -> Option<Number> {
    if !NUMERIC_RE.is_match(s) {
        return None;
    }

    if !s.contains('.') {
        if let Ok(n) = s.parse::<i64>() {
            return Some(Number::from(n));
        }
        if let Ok(n) = s.parse::<u64>() {
            return Some(Number::from(n));
        }
    }

    s.parse::<f64>().ok().and_then(Number::from_f64)
}
