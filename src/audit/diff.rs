//! Change summaries for audit entries
//!
//! Plans are diffed as JSON. The allocation is a nested map, so the detailed
//! form walks into objects and reports `category_allocation.Housing: 50.0 -> 60.0`
//! rather than just "allocation changed".

use serde_json::{Map, Value};

/// One-line summary of top-level field changes, `None` when nothing changed
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(b), Value::Object(a)) => object_changes(b, a, "", false),
        _ if before != after => vec![format!("{} -> {}", format_value(before), format_value(after))],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

/// Every leaf change, with dotted paths for nested objects
pub fn generate_detailed_diff(before: &Value, after: &Value, prefix: &str) -> Vec<String> {
    match (before, after) {
        (Value::Object(b), Value::Object(a)) => object_changes(b, a, prefix, true),
        (Value::Array(b), Value::Array(a)) if b.len() == a.len() => b
            .iter()
            .zip(a)
            .enumerate()
            .filter(|(_, (x, y))| x != y)
            .flat_map(|(i, (x, y))| generate_detailed_diff(x, y, &format!("{}[{}]", prefix, i)))
            .collect(),
        _ if before != after => vec![format!(
            "{}: {} -> {}",
            prefix,
            format_value(before),
            format_value(after)
        )],
        _ => Vec::new(),
    }
}

fn object_changes(
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    prefix: &str,
    recurse: bool,
) -> Vec<String> {
    let path = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };

    let mut changes = Vec::new();

    for (key, old) in before {
        match after.get(key) {
            Some(new) if old == new => {}
            Some(new) if recurse && (old.is_object() || old.is_array()) => {
                changes.extend(generate_detailed_diff(old, new, &path(key)));
            }
            Some(new) => changes.push(format!(
                "{}: {} -> {}",
                path(key),
                format_value(old),
                format_value(new)
            )),
            None => changes.push(format!("{}: {} -> (removed)", path(key), format_value(old))),
        }
    }

    for (key, new) in after {
        if !before.contains_key(key) {
            changes.push(format!("{}: (added) -> {}", path(key), format_value(new)));
        }
    }

    changes
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
