//! Selectors and the selector evaluator (v0.1)
//!
//! A selector names one value to pick: an output key, a path, an optional
//! default and an optional transform.
//!
//! Accepted forms:
//! - String: `balances[0].balance` → key and path are the same
//! - CLI string: `usd=balances[0].balance ?? 0` → explicit key, JSON default
//! - Object: `{key?, path, default?, transform?}` (pick spec files)

use std::fmt;
use std::sync::Arc;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::PickError;
use crate::jsonpath;
use crate::numberify::numberify;
use crate::transform::{Builtin, Transform};

/// One value to extract from a document
#[derive(Clone)]
pub struct Selector {
    /// Output key (defaults to the path)
    pub key: String,
    /// Path into the document
    pub path: String,
    /// Substituted when the path resolves to nothing (or null) and there is no transform
    pub default: Option<Value>,
    /// Receives the raw resolved value, absent included
    pub transform: Option<Arc<dyn Transform>>,
}

impl Selector {
    /// Shorthand selector: output key equals the path
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            key: path.clone(),
            path,
            default: None,
            transform: None,
        }
    }

    /// Store the picked value under `key` instead of the path
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn transform(mut self, transform: impl Transform + 'static) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }
}

impl From<&str> for Selector {
    fn from(path: &str) -> Self {
        Selector::new(path)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("key", &self.key)
            .field("path", &self.path)
            .field("default", &self.default)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// Parse a CLI selector: `path`, `key=path`, either with `?? default`
///
/// The default is JSON (`?? 0`, `?? null`, `?? "n/a"`). The first `=` splits
/// key from path, so keys cannot contain `=`.
pub fn parse_selector(s: &str) -> Result<Selector, PickError> {
    let s = s.trim();

    let (body, default) = match find_operator_outside_quotes(s, "??") {
        Some(idx) => {
            let raw = s[idx + 2..].trim();
            let default = serde_json::from_str(raw).map_err(|_| PickError::InvalidSelector {
                selector: s.to_string(),
            })?;
            (s[..idx].trim(), Some(default))
        }
        None => (s, None),
    };

    let (key, path) = match body.split_once('=') {
        Some((key, path)) => (key.trim(), path.trim()),
        None => (body, body),
    };

    if path.is_empty() || key.is_empty() {
        return Err(PickError::InvalidSelector {
            selector: s.to_string(),
        });
    }

    Ok(Selector {
        key: key.to_string(),
        path: path.to_string(),
        default,
        transform: None,
    })
}

/// Find the position of an operator outside of double-quoted strings
fn find_operator_outside_quotes(s: &str, op: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut escape_next = false;

    for (byte_pos, ch) in s.char_indices() {
        if escape_next {
            escape_next = false;
        } else if ch == '\\' {
            escape_next = true;
        } else if ch == '"' {
            in_quotes = !in_quotes;
        } else if !in_quotes && s[byte_pos..].starts_with(op) {
            return Some(byte_pos);
        }
    }

    None
}

/// Accepts a bare path string or an object `{key?, path, default?, transform?}`
///
/// `default: null` is kept as a present default, unlike `Option<Value>`'s
/// derived behavior.
impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SelectorVisitor)
    }
}

struct SelectorVisitor;

impl<'de> Visitor<'de> for SelectorVisitor {
    type Value = Selector;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a path string or an object {key?, path, default?, transform?}")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Selector::new(value))
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut key: Option<String> = None;
        let mut path: Option<String> = None;
        let mut default: Option<Value> = None;
        let mut transform: Option<String> = None;

        while let Some(field) = map.next_key::<String>()? {
            match field.as_str() {
                "key" => {
                    if key.is_some() {
                        return Err(de::Error::duplicate_field("key"));
                    }
                    key = Some(map.next_value()?);
                }
                "path" => {
                    if path.is_some() {
                        return Err(de::Error::duplicate_field("path"));
                    }
                    path = Some(map.next_value()?);
                }
                "default" => {
                    if default.is_some() {
                        return Err(de::Error::duplicate_field("default"));
                    }
                    default = Some(map.next_value()?);
                }
                "transform" => {
                    if transform.is_some() {
                        return Err(de::Error::duplicate_field("transform"));
                    }
                    transform = Some(map.next_value()?);
                }
                other => {
                    return Err(de::Error::unknown_field(
                        other,
                        &["key", "path", "default", "transform"],
                    ));
                }
            }
        }

        let path = path.ok_or_else(|| de::Error::missing_field("path"))?;
        let transform = transform
            .map(|name| name.parse::<Builtin>())
            .transpose()
            .map_err(|e| <M::Error as de::Error>::custom(e.to_string()))?
            .map(|builtin| Arc::new(builtin) as Arc<dyn Transform>);

        Ok(Selector {
            key: key.unwrap_or_else(|| path.clone()),
            path,
            default,
            transform,
        })
    }
}

/// Evaluation switches
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalOptions {
    /// Coerce numeric strings to numbers after transform/default
    pub parse_numbers: bool,
}

/// Ordered output mapping: selector key → picked value (`None` = absent)
///
/// A repeated key overwrites the earlier value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Picked {
    entries: Vec<(String, Option<Value>)>,
}

impl Picked {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value
    pub fn set(&mut self, key: impl Into<String>, value: Option<Value>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Picked value, `None` when the key is missing or its value is absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entry(key).and_then(Option::as_ref)
    }

    /// `Some(None)` distinguishes "selected but absent" from "never selected"
    pub fn entry(&self, key: &str) -> Option<&Option<Value>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// JSON object in selector order; absent entries have no JSON form and are dropped
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .filter_map(|(k, v)| v.clone().map(|v| (k.clone(), v)))
                .collect(),
        )
    }
}

/// Evaluate every selector against `value`, in order
pub fn evaluate(selectors: &[Selector], value: &Value, options: &EvalOptions) -> Picked {
    let mut out = Picked::new();

    for selector in selectors {
        let steps = jsonpath::tokenize(&selector.path);
        let raw = jsonpath::resolve(value, &steps);

        debug!(
            key = %selector.key,
            path = %selector.path,
            steps = steps.len(),
            found = raw.is_some(),
            "Resolved selector"
        );

        let picked = match &selector.transform {
            Some(transform) => transform.apply(raw),
            // null and missing are both absent here
            None => match raw {
                Some(v) if !v.is_null() => Some(v),
                _ => selector.default.clone(),
            },
        };

        let picked = if options.parse_numbers {
            picked.map(numberify)
        } else {
            picked
        };

        out.set(selector.key.clone(), picked);
    }

    out
}
