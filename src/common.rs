use serde_json::Value;

/// Walk a dot-separated path into a JSON object tree.
pub fn field<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = row;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

/// String form of the value at `path`; numbers and booleans are rendered,
/// objects and arrays are not.
pub fn field_str(row: &Value, path: &str) -> Option<String> {
    match field(row, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric form of the value at `path`; anything unparseable counts as zero.
pub fn field_f64(row: &Value, path: &str) -> f64 {
    match field(row, path) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Split a comma-separated query value, trimming whitespace and dropping
/// blanks.
pub fn split_values(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
