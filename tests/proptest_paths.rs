//! Property-based tests for path tokenizing, resolution and coercion
//!
//! Uses proptest to fuzz the permissive tokenizer and check the structural
//! guarantees of the resolver and numeric coercion.

use jsonpick::{evaluate, numberify, resolve, tokenize, EvalOptions, Selector, Step};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Arbitrary JSON values, a few levels deep
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "-?[0-9]{1,6}(\\.[0-9]{1,3})?".prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-c]{1,2}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

prop_compose! {
    /// Key-only paths like "ab.c.a"
    fn arb_dotted_path()(keys in prop::collection::vec("[a-c]{1,2}", 1..4)) -> String {
        keys.join(".")
    }
}

proptest! {
    /// Property: tokenizing never panics, whatever the input
    #[test]
    fn tokenize_never_panics(path in ".*") {
        let _ = tokenize(&path);
    }

    /// Property: tokenizing is deterministic
    #[test]
    fn tokenize_is_deterministic(path in "[a-z0-9.\\[\\]*]{0,20}") {
        prop_assert_eq!(tokenize(&path), tokenize(&path));
    }

    /// Property: keys never contain delimiters
    #[test]
    fn keys_never_contain_delimiters(path in ".*") {
        for step in tokenize(&path) {
            if let Step::Key(name) = step {
                prop_assert!(!name.is_empty());
                prop_assert!(!name.contains(['.', '[', ']']));
            }
        }
    }

    /// Property: a path with no steps resolves to the value itself
    #[test]
    fn empty_path_is_identity(value in arb_json(), path in "[.\\[\\]]{0,6}") {
        prop_assert!(tokenize(&path).is_empty());
        prop_assert_eq!(resolve(&value, &tokenize(&path)), Some(value));
    }

    /// Property: wildcard fan-out keeps array length
    #[test]
    fn wildcard_preserves_length(
        items in prop::collection::vec(arb_json(), 0..8),
        key in "[a-c]"
    ) {
        let value = Value::Array(items.clone());
        let steps = tokenize(&format!("[*].{}", key));
        let resolved = resolve(&value, &steps);
        let len = resolved.as_ref().and_then(Value::as_array).map(Vec::len);
        prop_assert_eq!(len, Some(items.len()));
    }

    /// Property: resolution never mutates and never panics
    #[test]
    fn resolve_is_pure(value in arb_json(), path in "[a-c0-9.\\[\\]*]{0,12}") {
        let before = value.clone();
        let _ = resolve(&value, &tokenize(&path));
        prop_assert_eq!(value, before);
    }

    /// Property: absent paths yield exactly the default
    #[test]
    fn absent_path_yields_default(path in arb_dotted_path(), default in arb_json()) {
        let document = json!({"zzz": 1});
        let selectors = [
            Selector::new(path.clone()).key("with").default(default.clone()),
            Selector::new(path).key("without"),
        ];
        let picked = evaluate(&selectors, &document, &EvalOptions::default());
        prop_assert_eq!(picked.entry("with"), Some(&Some(default)));
        prop_assert_eq!(picked.entry("without"), Some(&None));
    }

    /// Property: numeric coercion is idempotent
    #[test]
    fn numberify_is_idempotent(value in arb_json()) {
        let once = numberify(value);
        prop_assert_eq!(numberify(once.clone()), once);
    }
}
