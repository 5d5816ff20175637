//! Extraction of declared fields from a [`RawRequest`] into a generic JSON map.

use serde_json::{Map, Value};

use super::{PickError, RawRequest};
use crate::config::EngineConfig;
use crate::schema::{ApiField, ApiFields, FieldType, Source, join_path};

/// Whether `key` may reach the picker: ASCII letters, digits, `_`, `.` and `-` only.
#[must_use]
pub fn is_valid_key(key: &str, max_length: usize) -> bool {
    !key.is_empty()
        && key.len() <= max_length
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'))
}

/// Pick every declared field of `fields` out of `raw`.
///
/// The result is keyed by each field's [`key`](ApiField::key). Keys failing
/// [`is_valid_key`] are dropped first, undeclared keys are never copied, defaults fill
/// in missing fields and conversions run on present values. Nothing is validated here.
pub fn pick(
    fields: &ApiFields,
    raw: &RawRequest,
    config: &EngineConfig,
) -> Result<Map<String, Value>, PickError> {
    let limits = &config.limits;

    let dropped = raw.invalid_key_count(limits.max_key_length);
    if dropped > 0 {
        tracing::debug!(dropped, "Dropped malformed request keys");
    }

    let body = match raw.body() {
        None => None,
        Some(Value::Object(map)) => Some(sanitize_object(
            map,
            limits.max_key_length,
            1,
            limits.max_depth,
        )?),
        Some(_) => return Err(PickError::BodyNotObject),
    };

    let mut picked = Map::new();
    for field in fields {
        let found = match field.source() {
            Source::Body => body.as_ref().and_then(|b| b.get(field.api_name())).cloned(),
            Source::Url => {
                let name = field.api_name();
                let from_path: Vec<&str> = raw.path_values(name).collect();
                if from_path.is_empty() {
                    strings(field, raw.query_values(name))
                } else {
                    strings(field, from_path.into_iter())
                }
            }
            Source::Header => strings(field, raw.header_values(field.api_name())),
            Source::Cookie => strings(field, raw.cookie_values(field.api_name())),
        };

        if let Some(value) = pick_value(field, found, field.api_name(), config)? {
            picked.insert(field.key().to_string(), value);
        }
    }
    Ok(picked)
}

/// Raw string values as JSON: every value for array fields, the first one otherwise.
fn strings<'a>(field: &ApiField, mut values: impl Iterator<Item = &'a str>) -> Option<Value> {
    if field.field_type() == FieldType::Array {
        let all: Vec<Value> = values.map(|v| Value::String(v.to_string())).collect();
        (!all.is_empty()).then_some(Value::Array(all))
    } else {
        values.next().map(|v| Value::String(v.to_string()))
    }
}

/// Apply nesting, defaults and conversion to one field's raw value.
fn pick_value(
    field: &ApiField,
    found: Option<Value>,
    path: &str,
    config: &EngineConfig,
) -> Result<Option<Value>, PickError> {
    let Some(value) = found else {
        return Ok(field.default_value().cloned());
    };

    let value = match field.nested() {
        Some(nested) => pick_nested(nested, value, path, config)?,
        None => value,
    };

    match field.convert().and_then(|name| config.conversions.get(name)) {
        Some(convert) => convert(value).map(Some).map_err(|detail| PickError::Conversion {
            field: path.to_string(),
            detail,
        }),
        None => Ok(Some(value)),
    }
}

/// Objects and arrays of objects are re-picked through the nested schema. Any other
/// shape is passed through untouched so the validator can reject it.
fn pick_nested(
    nested: &ApiFields,
    value: Value,
    path: &str,
    config: &EngineConfig,
) -> Result<Value, PickError> {
    match value {
        Value::Object(map) => pick_object(nested, &map, path, config).map(Value::Object),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => {
                    pick_object(nested, &map, &format!("{path}[{i}]"), config).map(Value::Object)
                }
                other => Ok(other),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other),
    }
}

fn pick_object(
    fields: &ApiFields,
    object: &Map<String, Value>,
    parent: &str,
    config: &EngineConfig,
) -> Result<Map<String, Value>, PickError> {
    let mut picked = Map::new();
    for field in fields {
        let path = join_path(parent, field.api_name());
        let found = object.get(field.api_name()).cloned();
        if let Some(value) = pick_value(field, found, &path, config)? {
            picked.insert(field.key().to_string(), value);
        }
    }
    Ok(picked)
}

/// Copy of `object` with every malformed key removed, at every depth.
fn sanitize_object(
    object: &Map<String, Value>,
    max_key_length: usize,
    depth: usize,
    max_depth: usize,
) -> Result<Map<String, Value>, PickError> {
    if depth > max_depth {
        return Err(PickError::TooDeep { max: max_depth });
    }
    object
        .iter()
        .filter(|(key, _)| is_valid_key(key, max_key_length))
        .map(|(key, value)| {
            sanitize_value(value, max_key_length, depth, max_depth)
                .map(|value| (key.clone(), value))
        })
        .collect()
}

fn sanitize_value(
    value: &Value,
    max_key_length: usize,
    depth: usize,
    max_depth: usize,
) -> Result<Value, PickError> {
    match value {
        Value::Object(map) => {
            sanitize_object(map, max_key_length, depth + 1, max_depth).map(Value::Object)
        }
        Value::Array(items) => {
            if depth + 1 > max_depth {
                return Err(PickError::TooDeep { max: max_depth });
            }
            items
                .iter()
                .map(|item| sanitize_value(item, max_key_length, depth + 1, max_depth))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        other => Ok(other.clone()),
    }
}
