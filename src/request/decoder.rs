//! Weakly-typed decoding of a validated map into the caller's destination type.
//!
//! The destination is any `serde::de::DeserializeOwned` type whose serde field names
//! match the schema's keys (alias, else api name). Before deserializing, each value is
//! coerced towards its declared [`FieldType`]: query strings, headers and cookies only
//! ever carry text, and clients are loose about `"1"` versus `1`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use super::DecodeError;
use crate::schema::{ApiField, ApiFields, FieldType};

/// Coerce `validated` according to `fields` and deserialize it into `T`.
pub fn decode<T: DeserializeOwned>(
    fields: &ApiFields,
    validated: Map<String, Value>,
) -> Result<T, DecodeError> {
    let coerced = coerce_object(fields, validated);
    serde_json::from_value(Value::Object(coerced)).map_err(DecodeError::from)
}

/// Coerce every declared key of `object`; other keys are left alone.
#[must_use]
pub fn coerce_object(fields: &ApiFields, mut object: Map<String, Value>) -> Map<String, Value> {
    for field in fields {
        if let Some(value) = object.remove(field.key()) {
            object.insert(field.key().to_string(), coerce_field(field, value));
        }
    }
    object
}

fn coerce_field(field: &ApiField, value: Value) -> Value {
    let Some(nested) = field.nested() else {
        return coerce(field.field_type(), value);
    };
    match value {
        Value::Object(object) if field.field_type() == FieldType::Array => {
            Value::Array(vec![Value::Object(coerce_object(nested, object))])
        }
        Value::Object(object) => Value::Object(coerce_object(nested, object)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(object) => Value::Object(coerce_object(nested, object)),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

/// Best-effort conversion of `value` to `field_type`. Values that cannot be converted
/// are returned unchanged and left for serde to reject.
#[must_use]
pub fn coerce(field_type: FieldType, value: Value) -> Value {
    match (field_type, value) {
        (FieldType::Int, Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(s),
        },
        (FieldType::Int, Value::Number(n)) => integral(&n).map_or(Value::Number(n), Value::from),
        (FieldType::Int, Value::Bool(b)) => Value::from(i64::from(b)),

        (FieldType::Float, Value::String(s)) => {
            match s.trim().parse::<f64>().ok().and_then(Number::from_f64) {
                Some(n) => Value::Number(n),
                None => Value::String(s),
            }
        }
        (FieldType::Float, Value::Bool(b)) => Value::from(if b { 1.0 } else { 0.0 }),

        (FieldType::Bool, Value::String(s)) => parse_bool(&s).map_or(Value::String(s), Value::Bool),
        (FieldType::Bool, Value::Number(n)) => {
            n.as_f64().map_or(Value::Number(n), |f| Value::Bool(f != 0.0))
        }

        (FieldType::String | FieldType::Uuid, Value::Number(n)) => Value::String(n.to_string()),
        (FieldType::String, Value::Bool(b)) => Value::String(b.to_string()),
        (FieldType::Uuid, Value::String(s)) => Value::String(s.trim().to_string()),

        (FieldType::Array, value @ (Value::Array(_) | Value::Null)) => value,
        (FieldType::Array, value) => Value::Array(vec![value]),

        (_, value) => value,
    }
}

/// Integer value of `n`, accepting floats with no fractional part.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integral(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

/// The spellings accepted for booleans in query strings and headers.
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" | "yes" | "on" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" | "no" | "off" => Some(false),
        _ => None,
    }
}
