//! Named value conversions applied by the request picker.
//!
//! A field opts in with [`ApiField::with_convert`](crate::ApiField::with_convert); the
//! name is resolved when the schema is validated and the conversion runs on every
//! picked value of that field before validation.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A conversion from one JSON value to another, or a reason it failed.
pub type ConvertFn = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

#[derive(Clone, Default)]
pub struct ConversionRegistry {
    conversions: HashMap<String, ConvertFn>,
}

impl ConversionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            conversions: HashMap::new(),
        }
    }

    /// A registry holding `trim`, `lowercase`, `uppercase` and `uuid`.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::new()
            .register("trim", |value| map_str(value, |s| s.trim().to_string()))
            .register("lowercase", |value| map_str(value, str::to_lowercase))
            .register("uppercase", |value| map_str(value, str::to_uppercase))
            .register("uuid", canonical_uuid)
    }

    #[must_use]
    pub fn register<F>(mut self, name: impl Into<String>, conversion: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.conversions.insert(name.into(), Arc::new(conversion));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConvertFn> {
        self.conversions.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.conversions.contains_key(name)
    }
}

impl fmt::Debug for ConversionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.conversions.keys().collect();
        names.sort();
        f.debug_struct("ConversionRegistry")
            .field("conversions", &names)
            .finish()
    }
}

/// Apply `f` to strings, and to every string of an array; other values pass through.
fn map_str(value: Value, f: impl Fn(&str) -> String + Copy) -> Result<Value, String> {
    Ok(match value {
        Value::String(s) => Value::String(f(&s)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Value::String(f(&s)),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    })
}

/// Parse a UUID in any accepted spelling and re-emit its hyphenated lowercase form.
fn canonical_uuid(value: Value) -> Result<Value, String> {
    match value {
        Value::String(s) => uuid::Uuid::parse_str(s.trim())
            .map(|id| Value::String(id.hyphenated().to_string()))
            .map_err(|e| format!("invalid uuid: {e}")),
        Value::Null => Ok(Value::Null),
        _ => Err("uuid conversion expects a string".to_string()),
    }
}
