//! Defensive accessors over untyped JSON trees.
//!
//! Paths are dotted (`os.cpu.percent`). At every level an exact key match
//! wins over splitting, so `_cat` columns such as `docs.count` resolve as a
//! single key. A value whose runtime type does not match the accessor is
//! treated exactly like a missing one: the accessor returns its zero value.

use serde_json::{Map, Value};

/// Resolve a dotted path, trying exact keys before splitting on dots.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    let object = value.as_object()?;
    if let Some(found) = object.get(path) {
        return Some(found);
    }

    let mut split_points = path.match_indices('.').map(|(i, _)| i);
    split_points.find_map(|i| {
        let (head, rest) = (&path[..i], &path[i + 1..]);
        object.get(head).and_then(|child| lookup(child, rest))
    })
}

/// String at `path`, or an empty string.
pub fn get_str(value: &Value, path: &str) -> String {
    lookup(value, path)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default()
}

/// Floating point number at `path`, or `0.0`.
pub fn get_f64(value: &Value, path: &str) -> f64 {
    lookup(value, path).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Non-negative integer at `path`, or `0`.
///
/// JSON numbers written with a fraction are truncated; negative numbers
/// count as mis-typed.
pub fn get_u64(value: &Value, path: &str) -> u64 {
    match lookup(value, path) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_else(|| match n.as_f64() {
            Some(f) if f.is_finite() && f >= 0.0 => f as u64,
            _ => 0,
        }),
        _ => 0,
    }
}

/// Count at `path`, accepting a number or a numeric string, or `0`.
///
/// `_cat` endpoints serialise every column as a string, so counts read from
/// them go through here.
pub fn get_count(value: &Value, path: &str) -> u64 {
    match lookup(value, path) {
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(Value::Number(_)) => get_u64(value, path),
        _ => 0,
    }
}

/// Strings of the array at `path`; non-string elements are skipped.
pub fn get_str_list(value: &Value, path: &str) -> Vec<String> {
    get_array(value, path)
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect()
}

/// Elements of the array at `path`, or an empty slice.
pub fn get_array<'a>(value: &'a Value, path: &str) -> &'a [Value] {
    lookup(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Object at `path`, if there is one.
pub fn get_object<'a>(value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
    lookup(value, path).and_then(Value::as_object)
}
