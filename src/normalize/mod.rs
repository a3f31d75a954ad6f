//! Response Normalization
//!
//! Hubstaff list endpoints answer with bare arrays, resource-keyed envelopes
//! (`{"projects": [...]}`), generic `data` envelopes or single objects. This
//! module flattens all of those into a sequence of records.

use serde_json::{Map, Value};

/// A raw API response, classified by shape.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseEnvelope {
    /// Body that arrived as a string; may itself hold JSON.
    RawString(String),
    Array(Vec<Value>),
    Object(Map<String, Value>),
    /// Numbers, booleans and null.
    Scalar(Value),
}

impl From<Value> for ResponseEnvelope {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::RawString(s),
            Value::Array(items) => Self::Array(items),
            Value::Object(map) => Self::Object(map),
            other => Self::Scalar(other),
        }
    }
}

impl ResponseEnvelope {
    /// Parse a `RawString` body once. Unparsable strings stay as they are.
    pub fn resolve(self) -> Self {
        match self {
            Self::RawString(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::String(s)) => Self::Scalar(Value::String(s)),
                Ok(parsed) => Self::from(parsed),
                Err(_) => Self::Scalar(Value::String(raw)),
            },
            other => other,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::RawString(s) => Value::String(s),
            Self::Array(items) => Value::Array(items),
            Self::Object(map) => Value::Object(map),
            Self::Scalar(v) => v,
        }
    }

    /// Whether the response carried no payload (empty body or null).
    pub fn is_empty_body(&self) -> bool {
        match self {
            Self::RawString(s) => s.trim().is_empty(),
            Self::Scalar(Value::Null) => true,
            _ => false,
        }
    }
}

/// Flatten `raw` into records, unwrapping `unwrap_key` when present.
///
/// Already-flat arrays come back unchanged.
pub fn normalize(raw: Value, unwrap_key: Option<&str>) -> Vec<Value> {
    let envelope = ResponseEnvelope::from(raw).resolve();

    let envelope = match (envelope, unwrap_key) {
        (ResponseEnvelope::Object(mut map), Some(key)) if map.contains_key(key) => {
            match map.remove(key) {
                Some(Value::Array(items)) => return items,
                Some(payload) => return vec![payload],
                None => ResponseEnvelope::Object(map),
            }
        }
        (envelope, _) => envelope,
    };

    match envelope {
        ResponseEnvelope::Array(items) => items,
        other => vec![other.into_value()],
    }
}

/// Single-record variant: unwrap `unwrap_key` when present, otherwise
/// return the parsed response whole.
pub fn normalize_one(raw: Value, unwrap_key: Option<&str>) -> Value {
    let envelope = ResponseEnvelope::from(raw).resolve();
    match (envelope, unwrap_key) {
        (ResponseEnvelope::Object(mut map), Some(key)) if map.contains_key(key) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        (envelope, _) => envelope.into_value(),
    }
}

/// Shape-agnostic extractor used while paginating.
///
/// Empty responses (null, `""`, `false`, zero) give nothing, arrays pass
/// through, `data` wins when present, then the first array-valued property in
/// document order, then the response itself as a single record.
pub fn extract_data(response: &Value) -> Vec<Value> {
    match response {
        Value::Null | Value::Bool(false) => Vec::new(),
        Value::String(s) if s.is_empty() => Vec::new(),
        Value::Number(n) if n.as_f64() == Some(0.0) => Vec::new(),
        Value::Array(items) => items.clone(),
        Value::Object(map) => {
            match map.get("data") {
                Some(Value::Array(items)) => return items.clone(),
                Some(data @ Value::Object(_)) => return vec![data.clone()],
                _ => {}
            }
            map.values()
                .find_map(|v| v.as_array().cloned())
                .unwrap_or_else(|| vec![response.clone()])
        }
        other => vec![other.clone()],
    }
}
