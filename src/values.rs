//! Key-path helpers over route value trees.
//!
//! Route values are `serde_json` maps. A route part named `foo.bar` addresses
//! the `bar` key inside the `foo` map, both when a match stores its value and
//! when a resolve reads and consumes one.

use serde_json::{Map, Value};

/// Nested map of route values, keyed by part name.
pub type RouteValues = Map<String, Value>;

/// Returns the value stored at the dotted `path`, if any.
#[must_use]
pub fn get_path<'a>(values: &'a RouteValues, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = values.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Stores `value` at the dotted `path`, creating (or replacing non-map) intermediate levels.
pub fn set_path(values: &mut RouteValues, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            values.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = values
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                set_path(inner, rest, value);
            }
        }
    }
}

/// Removes and returns the value at the dotted `path`. Parent maps are left in place, even if empty.
pub fn unset_path(values: &mut RouteValues, path: &str) -> Option<Value> {
    match path.split_once('.') {
        None => values.remove(path),
        Some((head, rest)) => match values.get_mut(head)? {
            Value::Object(inner) => unset_path(inner, rest),
            _ => None,
        },
    }
}

/// Recursively merges `overlay` over `base`. Maps are merged key by key; anything else in
/// `overlay` replaces what `base` holds.
#[must_use]
pub fn deep_merge(base: &RouteValues, overlay: &RouteValues) -> RouteValues {
    let mut merged = base.clone();
    for (key, value) in overlay {
        match (merged.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                let combined = deep_merge(existing, incoming);
                *existing = combined;
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

/// Turns keys such as `"a.b": 1` into nested maps (`{"a": {"b": 1}}`), recursively.
#[must_use]
pub fn expand_dotted_keys(values: &RouteValues) -> RouteValues {
    let mut expanded = RouteValues::new();
    for (key, value) in values {
        let value = match value {
            Value::Object(inner) => Value::Object(expand_dotted_keys(inner)),
            other => other.clone(),
        };
        if key.contains('.') {
            let mut nested = RouteValues::new();
            set_path(&mut nested, key, value);
            expanded = deep_merge(&expanded, &nested);
        } else {
            match (expanded.get_mut(key), value) {
                (Some(Value::Object(existing)), Value::Object(incoming)) => {
                    let combined = deep_merge(existing, &incoming);
                    *existing = combined;
                }
                (_, value) => {
                    expanded.insert(key.clone(), value);
                }
            }
        }
    }
    expanded
}

/// Drops `null`, empty strings and containers that end up empty, at every depth.
pub fn remove_empty_elements(values: &mut RouteValues) {
    values.retain(|_, value| !prune(value));
}

fn prune(value: &mut Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(inner) => {
            remove_empty_elements(inner);
            inner.is_empty()
        }
        Value::Array(items) => {
            items.retain_mut(|item| !prune(item));
            items.is_empty()
        }
        _ => false,
    }
}

/// Text form of a scalar value: strings as-is, numbers in decimal, booleans as `1` / `0`.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

/// True when the value is a scalar or a container of scalars with no `null` anywhere.
#[must_use]
pub fn is_plain(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => items.iter().all(is_plain),
        Value::Object(inner) => inner.values().all(is_plain),
        _ => true,
    }
}
