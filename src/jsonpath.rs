//! Minimal path language (v0.1)
//!
//! Supports:
//! - a.b.c (dot notation)
//! - a[0].b (array index)
//! - a[*].b (wildcard: map the rest of the path over every element)
//!
//! Does NOT support:
//! - Filters: a[?(@.x==1)]
//! - Slices: a[0:5]
//! - Escaping: keys containing `.`, `[` or `]` cannot be addressed
//!
//! The tokenizer is permissive. Anything it does not recognise is skipped one
//! character at a time, so it never fails; a path that matches nothing is an
//! empty step list and resolves to the whole document.

use serde_json::Value;

/// A parsed path step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Object member access: .field
    Key(String),
    /// Array position access: [0]
    Index(usize),
    /// Every array element: [*]
    Wildcard,
}

/// Tokenize a path string into steps
///
/// Examples:
/// - "balances[0].balance" → [Key("balances"), Index(0), Key("balance")]
/// - "balances[*].balance" → [Key("balances"), Wildcard, Key("balance")]
/// - "[abc]" → [Key("abc")] (brackets around a non-index are skipped)
pub fn tokenize(path: &str) -> Vec<Step> {
    let bytes = path.as_bytes();
    let mut steps = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if !is_delimiter(bytes[pos]) {
            let start = pos;
            while pos < bytes.len() && !is_delimiter(bytes[pos]) {
                pos += 1;
            }
            // Delimiters are ASCII, so both ends sit on char boundaries
            steps.push(Step::Key(path[start..pos].to_string()));
            continue;
        }

        if bytes[pos] == b'[' {
            if let Some((step, len)) = bracket_step(&path[pos..]) {
                steps.push(step);
                pos += len;
                continue;
            }
        }

        // Unmatched `.`, `[` or `]`
        pos += 1;
    }

    steps
}

fn is_delimiter(b: u8) -> bool {
    matches!(b, b'.' | b'[' | b']')
}

/// Match `[digits]` or `[*]` at the start of `rest`, returning the step and
/// the number of bytes consumed.
fn bracket_step(rest: &str) -> Option<(Step, usize)> {
    let inner = rest.strip_prefix('[')?;

    if inner.starts_with("*]") {
        return Some((Step::Wildcard, 3));
    }

    let digits = inner.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || inner.as_bytes().get(digits) != Some(&b']') {
        return None;
    }

    let text = &inner[..digits];
    let step = match text.parse::<usize>() {
        Ok(index) => Step::Index(index),
        // Too large to address any array; still usable as an object key
        Err(_) => Step::Key(text.to_string()),
    };
    Some((step, digits + 2))
}

/// Resolve steps against a JSON value
///
/// `None` means absent. Missing members, out-of-bounds indexes, lookups on
/// scalars and wildcards over non-arrays are all absent, never errors.
pub fn resolve(value: &Value, steps: &[Step]) -> Option<Value> {
    let Some((step, rest)) = steps.split_first() else {
        return Some(value.clone());
    };

    match step {
        Step::Wildcard => {
            let items = value.as_array()?;
            let mapped = items
                .iter()
                .map(|item| resolve(item, rest).unwrap_or(Value::Null))
                .collect();
            Some(Value::Array(mapped))
        }
        Step::Key(name) => resolve(lookup_key(value, name)?, rest),
        Step::Index(index) => resolve(lookup_index(value, *index)?, rest),
    }
}

/// Tokenize and resolve in one step
pub fn pick(value: &Value, path: &str) -> Option<Value> {
    resolve(value, &tokenize(path))
}

fn lookup_key<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(name),
        // "items.0" addresses a position, same as "items[0]"
        Value::Array(items) if is_array_position(name) => items.get(name.parse::<usize>().ok()?),
        _ => None,
    }
}

fn lookup_index(value: &Value, index: usize) -> Option<&Value> {
    match value {
        Value::Array(items) => items.get(index),
        Value::Object(map) => map.get(&index.to_string()),
        _ => None,
    }
}

/// Canonical decimal text only: "0", "12", never "01" or "00"
fn is_array_position(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && (s == "0" || !s.starts_with('0'))
}
