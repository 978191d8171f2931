//! Query strings for values a route could not place in its path.

use serde_json::Value;
use url::form_urlencoded;

use crate::values::{self, RouteValues};

/// Prefix of internal arguments, always carried along.
pub const INTERNAL_ARGUMENT_PREFIX: &str = "__";
/// Prefix of sub-request argument groups, searched recursively for internal arguments.
pub const SUBREQUEST_ARGUMENT_PREFIX: &str = "--";

/// Moves internal arguments out of `arguments` and returns them.
///
/// `__`-prefixed keys move as a whole. `--`-prefixed maps are searched recursively;
/// a group left empty by the extraction is dropped from `arguments`.
pub fn extract_internal_arguments(arguments: &mut RouteValues) -> RouteValues {
    let mut internal = RouteValues::new();
    let keys: Vec<String> = arguments.keys().cloned().collect();
    for key in keys {
        if key.starts_with(INTERNAL_ARGUMENT_PREFIX) {
            if let Some(value) = arguments.remove(&key) {
                internal.insert(key, value);
            }
            continue;
        }
        if !key.starts_with(SUBREQUEST_ARGUMENT_PREFIX) {
            continue;
        }
        let Some(Value::Object(group)) = arguments.get_mut(&key) else {
            continue;
        };
        let extracted = extract_internal_arguments(group);
        let group_is_empty = group.is_empty();
        if !extracted.is_empty() {
            internal.insert(key.clone(), Value::Object(extracted));
        }
        if group_is_empty {
            arguments.remove(&key);
        }
    }
    internal
}

/// Encodes `values` as `application/x-www-form-urlencoded`, nesting with brackets
/// (`post[title]=Hello+World`, `tags[0]=a`). `null` values are skipped.
pub fn build_query(values: &RouteValues) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in values {
        append_pairs(&mut serializer, key, value);
    }
    serializer.finish()
}

fn append_pairs(serializer: &mut form_urlencoded::Serializer<'_, String>, key: &str, value: &Value) {
    match value {
        Value::Object(inner) => {
            for (child, child_value) in inner {
                append_pairs(serializer, &format!("{}[{}]", key, child), child_value);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                append_pairs(serializer, &format!("{}[{}]", key, index), item);
            }
        }
        other => {
            if let Some(text) = values::scalar_text(other) {
                serializer.append_pair(key, &text);
            }
        }
    }
}
