//! Per-selector value transforms
//!
//! A transform sees the raw resolver result, absent (`None`) included, and
//! owns whatever it returns. Library callers pass closures; spec files and
//! the CLI name one of the built-ins.

use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::error::PickError;
use crate::numberify::parse_number;

/// Maps a resolved value to the value stored in the output
pub trait Transform: Send + Sync {
    fn apply(&self, value: Option<Value>) -> Option<Value>;
}

impl<F> Transform for F
where
    F: Fn(Option<Value>) -> Option<Value> + Send + Sync,
{
    fn apply(&self, value: Option<Value>) -> Option<Value> {
        self(value)
    }
}

/// Named transforms usable from pick specs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Element count of an array, char count of a string, member count of an object
    Length,
    /// First array element
    First,
    /// Last array element
    Last,
    /// Array without null elements
    Compact,
    /// Strings as-is, everything else as JSON text
    String,
    /// Sum of numeric elements (numeric strings included)
    Sum,
}

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Length,
        Builtin::First,
        Builtin::Last,
        Builtin::Compact,
        Builtin::String,
        Builtin::Sum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Length => "length",
            Builtin::First => "first",
            Builtin::Last => "last",
            Builtin::Compact => "compact",
            Builtin::String => "string",
            Builtin::Sum => "sum",
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Builtin {
    type Err = PickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Builtin::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or_else(|| PickError::UnknownTransform { name: s.to_string() })
    }
}

impl Transform for Builtin {
    fn apply(&self, value: Option<Value>) -> Option<Value> {
        let value = value?;
        match self {
            Builtin::Length => match &value {
                Value::Array(items) => Some(Value::from(items.len())),
                Value::String(s) => Some(Value::from(s.chars().count())),
                Value::Object(map) => Some(Value::from(map.len())),
                _ => None,
            },
            Builtin::First => match value {
                Value::Array(items) => items.into_iter().next(),
                _ => None,
            },
            Builtin::Last => match value {
                Value::Array(items) => items.into_iter().next_back(),
                _ => None,
            },
            Builtin::Compact => match value {
                Value::Array(items) => Some(Value::Array(
                    items.into_iter().filter(|v| !v.is_null()).collect(),
                )),
                other => Some(other),
            },
            Builtin::String => match value {
                Value::String(s) => Some(Value::String(s)),
                Value::Null => None,
                other => Some(Value::String(other.to_string())),
            },
            Builtin::Sum => sum(&value),
        }
    }
}

/// Integer sum while every term is an integer, float sum otherwise
fn sum(value: &Value) -> Option<Value> {
    let items = value.as_array()?;
    let terms: Vec<Number> = items.iter().filter_map(as_number).collect();

    let int_sum = terms
        .iter()
        .try_fold(0i64, |acc, n| n.as_i64().and_then(|n| acc.checked_add(n)));
    if let Some(total) = int_sum {
        return Some(Value::from(total));
    }

    let total: f64 = terms.iter().filter_map(Number::as_f64).sum();
    Number::from_f64(total).map(Value::Number)
}

fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}
