//! Field-path lookup over parsed JSON payloads.

use serde_json::Value as JsonValue;

/// Look up a dot-separated field path (`a.b.c`) in a JSON value.
///
/// Each path component descends one level of nested objects. Returns `None`
/// when a component is missing or an intermediate value is not an object;
/// the terminal value is returned as-is, JSON null included.
pub fn lookup<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut current = value;
    for component in path.split('.') {
        current = current.as_object()?.get(component)?;
    }
    Some(current)
}
