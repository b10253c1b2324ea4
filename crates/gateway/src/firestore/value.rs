//! Conversion between plain JSON and Firestore's typed value encoding.
//!
//! Firestore REST wraps every value in a single-key object naming its type,
//! e.g. `{"stringValue": "hi"}` or `{"integerValue": "42"}` (64-bit integers
//! travel as strings). Strings that parse as RFC 3339 timestamps are written
//! as `timestampValue` so the store orders them chronologically; timestamps
//! read back become RFC 3339 strings again.

use serde_json::{json, Map, Number, Value};

use crate::error::GatewayError;
use crate::query::Fields;

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else if let Some(u) = n.as_u64() {
                json!({ "integerValue": u.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64().unwrap_or(0.0) })
            }
        }
        Value::String(s) => {
            if is_timestamp(s) {
                json!({ "timestampValue": s })
            } else {
                json!({ "stringValue": s })
            }
        }
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            if values.is_empty() {
                json!({ "arrayValue": {} })
            } else {
                json!({ "arrayValue": { "values": values } })
            }
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

pub fn decode_value(value: &Value) -> Result<Value, GatewayError> {
    let Some(map) = value.as_object() else {
        return Err(GatewayError::Decode(format!("typed value must be an object: {value}")));
    };
    let Some((kind, inner)) = map.iter().next() else {
        return Err(GatewayError::Decode("empty typed value".into()));
    };

    let decoded = match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().unwrap_or(false)),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            match parsed {
                Some(i) => Value::Number(i.into()),
                None => return Err(GatewayError::Decode(format!("bad integerValue: {inner}"))),
            }
        }
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "geoPointValue" => inner.clone(),
        "arrayValue" => {
            let values: Vec<Value> = match inner.get("values").and_then(Value::as_array) {
                Some(items) => items.iter().map(decode_value).collect::<Result<_, _>>()?,
                None => Vec::new(),
            };
            Value::Array(values)
        }
        "mapValue" => Value::Object(decode_fields(inner.get("fields"))?),
        other => return Err(GatewayError::Decode(format!("unknown value type '{other}'"))),
    };
    Ok(decoded)
}

/// Decode a Firestore `fields` object. A missing object means no fields.
pub fn decode_fields(fields: Option<&Value>) -> Result<Fields, GatewayError> {
    let Some(fields) = fields else {
        return Ok(Fields::new());
    };
    let Some(map) = fields.as_object() else {
        return Err(GatewayError::Decode("fields must be an object".into()));
    };
    map.iter()
        .map(|(k, v)| Ok((k.clone(), decode_value(v)?)))
        .collect()
}

/// Document id from a full resource name
/// (`projects/p/databases/(default)/documents/col/ID`).
pub fn id_from_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn is_timestamp(s: &str) -> bool {
    s.contains('T') && chrono::DateTime::parse_from_rfc3339(s).is_ok()
}
