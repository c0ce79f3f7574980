//! Helpers for loosely typed declaration and form values.

use layout_options_host::escape;
use serde_json::Value;

/// True for values a site builder would consider "not set":
/// null, false, 0, "", "0", and empty lists or mappings.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Render a scalar as attribute text. `true` is "1", `false` and null are "".
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Elements of a list or mapping value, in order. Scalars yield themselves.
pub fn elements(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        scalar => vec![scalar],
    }
}

/// Turn raw form input into a storable option value.
///
/// Empty input passes through unchanged. Lists and mappings keep their
/// non-empty elements, each HTML-escaped, as a list. Scalars are escaped.
pub fn normalized_values(raw: Value) -> Value {
    if is_empty_value(&raw) {
        return raw;
    }
    match raw {
        Value::Array(_) | Value::Object(_) => Value::Array(
            elements(&raw)
                .into_iter()
                .filter(|v| !is_empty_value(v))
                .map(|v| Value::String(escape(&value_to_string(v))))
                .collect(),
        ),
        scalar => Value::String(escape(&value_to_string(&scalar))),
    }
}
