//! Parameter Parsing
//!
//! Helpers for loosely-typed operation inputs.

use serde_json::Value;

/// Parse an ID list given as a JSON array, a JSON-array string or a
/// comma-separated string. Blank and non-numeric entries are dropped.
pub fn parse_id_list(input: &Value) -> Vec<i64> {
    match input {
        Value::Array(items) => items.iter().filter_map(parse_id).collect(),
        Value::String(s) => parse_id_str(s),
        Value::Number(_) => parse_id(input).into_iter().collect(),
        _ => Vec::new(),
    }
}

/// String form of [`parse_id_list`].
pub fn parse_id_str(input: &str) -> Vec<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
        return items.iter().filter_map(parse_id).collect();
    }
    trimmed
        .split(',')
        .filter_map(|part| parse_numeric(part.trim()))
        .collect()
}

fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => parse_numeric(s.trim()),
        _ => None,
    }
}

fn parse_numeric(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_csv() {
        assert_eq!(parse_id_list(&json!("1, 2 ,3")), vec![1, 2, 3]);
        assert_eq!(parse_id_list(&json!("1,,x,4")), vec![1, 4]);
    }

    #[test]
    fn test_json_array_string() {
        assert_eq!(parse_id_list(&json!("[10, \"11\", \"bad\", null]")), vec![10, 11]);
    }

    #[test]
    fn test_array_value() {
        assert_eq!(parse_id_list(&json!([7, " 8 ", "", 9.0])), vec![7, 8, 9]);
    }

    #[test]
    fn test_blank_inputs() {
        assert!(parse_id_list(&json!("   ")).is_empty());
        assert!(parse_id_list(&Value::Null).is_empty());
        assert!(parse_id_list(&json!({"id": 1})).is_empty());
    }

    #[test]
    fn test_single_number() {
        assert_eq!(parse_id_list(&json!(42)), vec![42]);
        assert_eq!(parse_id_str("42"), vec![42]);
    }
}
