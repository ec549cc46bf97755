// ABOUTME: Firestore REST wire codec for document field values
// ABOUTME: Converts between FieldValue and the typed JSON representation used by the v1 API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

//! Firestore's REST API wraps every value in a single-key object naming its
//! type (`{"stringValue": "Ducha"}`, `{"integerValue": "8"}`). 64-bit integers
//! travel as decimal strings and non-finite doubles as `"NaN"`/`"Infinity"`.

use agua_core::errors::{AppError, AppResult};
use agua_core::models::{FieldValue, Fields};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

/// Encode a single value
///
/// The server timestamp sentinel has no value form; it is encoded as `null`
/// and must be sent as a field transform instead (see [`encode_fields`]).
#[must_use]
pub fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null | FieldValue::ServerTimestamp => json!({ "nullValue": null }),
        FieldValue::Boolean(b) => json!({ "booleanValue": b }),
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": encode_double(*d) }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Timestamp(ts) => {
            json!({ "timestampValue": ts.to_rfc3339_opts(SecondsFormat::Micros, true) })
        }
        FieldValue::Array(values) => {
            let values: Vec<Value> = values.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        FieldValue::Map(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

fn encode_double(value: f64) -> Value {
    if value.is_nan() {
        Value::from("NaN")
    } else if value.is_infinite() {
        Value::from(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        Value::from(value)
    }
}

/// Encode a field map, leaving out server timestamp sentinels
#[must_use]
pub fn encode_fields(fields: &Fields) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .filter(|(_, value)| !matches!(value, FieldValue::ServerTimestamp))
        .map(|(name, value)| (name.clone(), encode_value(value)))
        .collect();
    Value::Object(map)
}

/// Decode a single value
///
/// # Errors
///
/// Returns an error if the JSON is not a recognised typed value.
pub fn decode_value(value: &Value) -> AppResult<FieldValue> {
    let object = value
        .as_object()
        .ok_or_else(|| AppError::invalid_format(format!("Expected a typed value, got {value}")))?;
    let (kind, inner) = object
        .iter()
        .next()
        .ok_or_else(|| AppError::invalid_format("Empty typed value"))?;

    match kind.as_str() {
        "nullValue" => Ok(FieldValue::Null),
        "booleanValue" => inner
            .as_bool()
            .map(FieldValue::Boolean)
            .ok_or_else(|| bad_value(kind, inner)),
        "integerValue" => decode_integer(inner)
            .map(FieldValue::Integer)
            .ok_or_else(|| bad_value(kind, inner)),
        "doubleValue" => decode_double(inner)
            .map(FieldValue::Double)
            .ok_or_else(|| bad_value(kind, inner)),
        "stringValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| FieldValue::String(s.to_owned()))
            .ok_or_else(|| bad_value(kind, inner)),
        "timestampValue" => inner
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|ts| FieldValue::Timestamp(ts.with_timezone(&Utc)))
            .ok_or_else(|| bad_value(kind, inner)),
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect::<AppResult<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            Ok(FieldValue::Array(values))
        }
        "mapValue" => decode_fields(inner.get("fields")).map(FieldValue::Map),
        other => Err(AppError::invalid_format(format!(
            "Unsupported Firestore value type '{other}'"
        ))),
    }
}

fn decode_integer(inner: &Value) -> Option<i64> {
    match inner {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

fn decode_double(inner: &Value) -> Option<f64> {
    match inner {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match s.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            _ => s.parse().ok(),
        },
        _ => None,
    }
}

fn bad_value(kind: &str, inner: &Value) -> AppError {
    AppError::invalid_format(format!("Malformed {kind}: {inner}"))
}

/// Decode the `fields` object of a document; a missing object is an empty map
///
/// # Errors
///
/// Returns an error if any field holds a malformed value.
pub fn decode_fields(fields: Option<&Value>) -> AppResult<Fields> {
    let Some(object) = fields.and_then(Value::as_object) else {
        return Ok(Fields::new());
    };
    object
        .iter()
        .map(|(name, value)| -> AppResult<(String, FieldValue)> {
            Ok((name.clone(), decode_value(value)?))
        })
        .collect()
}

/// Quote a field path segment when it is not a plain identifier
#[must_use]
pub fn field_path(name: &str) -> String {
    let simple = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        name.to_owned()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_travels_as_string() {
        assert_eq!(
            encode_value(&FieldValue::Integer(8)),
            json!({ "integerValue": "8" })
        );
        assert_eq!(
            decode_value(&json!({ "integerValue": "12" })).unwrap(),
            FieldValue::Integer(12)
        );
    }

    #[test]
    fn test_non_finite_doubles() {
        assert_eq!(
            encode_value(&FieldValue::Double(f64::INFINITY)),
            json!({ "doubleValue": "Infinity" })
        );
        let decoded = decode_value(&json!({ "doubleValue": "NaN" })).unwrap();
        assert!(matches!(decoded, FieldValue::Double(d) if d.is_nan()));
    }

    #[test]
    fn test_server_timestamp_is_not_encoded_as_field() {
        let fields = Fields::new()
            .with("totalLiters", 10.0)
            .with("lastUpdate", FieldValue::ServerTimestamp);
        let encoded = encode_fields(&fields);
        assert_eq!(encoded, json!({ "totalLiters": { "doubleValue": 10.0 } }));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = decode_value(&json!({ "geoPointValue": { "latitude": 1.0 } })).unwrap_err();
        assert!(err.message.contains("geoPointValue"));
    }

    #[test]
    fn test_field_path_quoting() {
        assert_eq!(field_path("totalLiters"), "totalLiters");
        assert_eq!(field_path("my field"), "`my field`");
        assert_eq!(field_path("9lives"), "`9lives`");
    }
}
