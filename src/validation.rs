//! Validation Support
//!
//! This module provides the [`ValidationError`] returned to clients when picked request
//! data does not satisfy its schema, and the [`RuleRegistry`] that resolves the rule
//! names listed in [`ApiField::with_validate`](crate::ApiField::with_validate).
//!
//! Rules are plain functions over a JSON value. They are registered by name once, at
//! startup, and resolved again per request by the value validator.
//!
//! # Example
//!
//! ```rust,ignore
//! use crudgate::validation::{RuleRegistry, rules};
//!
//! let registry = RuleRegistry::with_builtins()
//!     .register("sku", |value| match value.as_str() {
//!         Some(s) if s.starts_with("SKU-") => Ok(()),
//!         _ => Err("must be a SKU".to_string()),
//!     })
//!     .register("username", rules::length(3, 32));
//! ```

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Validation error with field path and message
///
/// The message already names the field (`field "email" is required`) and never
/// includes the submitted value, so it is safe to return verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The path of the field that failed validation (`items[2].sku`)
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn required(path: &str) -> Self {
        Self::new(path, format!("field {path:?} is required"))
    }

    #[must_use]
    pub fn not_object(path: &str) -> Self {
        Self::new(
            path,
            format!("field {path:?} must be an object or an array of objects"),
        )
    }

    #[must_use]
    pub fn rule(path: &str, reason: &str) -> Self {
        Self::new(path, format!("field {path:?} {reason}"))
    }

    #[must_use]
    pub fn too_deep(path: &str, max: usize) -> Self {
        Self::new(path, format!("field {path:?} exceeds the maximum nesting depth of {max}"))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// A named validation rule: `Ok(())` or a reason such as `"must be a valid email"`.
pub type RuleFn = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Name to rule lookup injected into the engine through
/// [`EngineConfig`](crate::EngineConfig).
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, RuleFn>,
}

impl RuleRegistry {
    /// An empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// A registry holding the built-in rules: `not_null`, `not_blank`, `email`,
    /// `uuid`, `positive` and `non_negative`.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::new()
            .register("not_null", rules::not_null)
            .register("not_blank", rules::not_blank)
            .register("email", rules::email)
            .register("uuid", rules::uuid)
            .register("positive", rules::positive)
            .register("non_negative", rules::non_negative)
    }

    /// Register (or replace) a rule under `name`.
    #[must_use]
    pub fn register<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rules.insert(name.into(), Arc::new(rule));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RuleFn> {
        self.rules.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Resolve every name in `names`, in order. Fails with the first unknown name.
    pub fn resolve<'a>(&self, names: &'a [String]) -> Result<Vec<&RuleFn>, &'a str> {
        names
            .iter()
            .map(|name| self.get(name).ok_or(name.as_str()))
            .collect()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.rules.keys().collect();
        names.sort();
        f.debug_struct("RuleRegistry").field("rules", &names).finish()
    }
}

/// Built-in rules and rule constructors
pub mod rules {
    use serde_json::Value;

    const MAX_EMAIL_LENGTH: usize = 255;

    /// Numbers, or strings holding a number
    fn as_number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Length of a string (in characters) or of an array
    fn length_of(value: &Value) -> Option<usize> {
        match value {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) => Some(items.len()),
            _ => None,
        }
    }

    pub fn not_null(value: &Value) -> Result<(), String> {
        if value.is_null() {
            return Err("must not be null".to_string());
        }
        Ok(())
    }

    /// Validate value is not empty
    pub fn not_blank(value: &Value) -> Result<(), String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Ok(()),
            Value::String(_) => Err("must not be blank".to_string()),
            _ => Err("must be a string".to_string()),
        }
    }

    /// Basic email validation
    pub fn email(value: &Value) -> Result<(), String> {
        let Some(s) = value.as_str() else {
            return Err("must be a string".to_string());
        };
        let valid = s
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            return Err("must be a valid email".to_string());
        }
        if s.len() > MAX_EMAIL_LENGTH {
            return Err(format!("must be at most {MAX_EMAIL_LENGTH} characters"));
        }
        Ok(())
    }

    pub fn uuid(value: &Value) -> Result<(), String> {
        match value.as_str().map(|s| uuid::Uuid::parse_str(s.trim())) {
            Some(Ok(_)) => Ok(()),
            _ => Err("must be a valid UUID".to_string()),
        }
    }

    pub fn positive(value: &Value) -> Result<(), String> {
        match as_number(value) {
            Some(n) if n > 0.0 => Ok(()),
            Some(_) => Err("must be positive".to_string()),
            None => Err("must be a number".to_string()),
        }
    }

    pub fn non_negative(value: &Value) -> Result<(), String> {
        match as_number(value) {
            Some(n) if n >= 0.0 => Ok(()),
            Some(_) => Err("must not be negative".to_string()),
            None => Err("must be a number".to_string()),
        }
    }

    /// Validate string (or array) length is within range
    pub fn length(
        min: usize,
        max: usize,
    ) -> impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static {
        move |value| {
            let Some(len) = length_of(value) else {
                return Err("must be a string or an array".to_string());
            };
            if len < min {
                return Err(format!("must be at least {min} long"));
            }
            if len > max {
                return Err(format!("must be at most {max} long"));
            }
            Ok(())
        }
    }

    /// Validate number is within range
    pub fn range(
        min: f64,
        max: f64,
    ) -> impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static {
        move |value| {
            let Some(n) = as_number(value) else {
                return Err("must be a number".to_string());
            };
            if n < min {
                return Err(format!("must be at least {min}"));
            }
            if n > max {
                return Err(format!("must be at most {max}"));
            }
            Ok(())
        }
    }

    /// Validate the value is one of a fixed set of strings
    pub fn one_of(
        allowed: &[&str],
    ) -> impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static {
        let allowed: Vec<String> = allowed.iter().map(|s| (*s).to_string()).collect();
        move |value| match value.as_str() {
            Some(s) if allowed.iter().any(|a| a == s) => Ok(()),
            _ => Err(format!("must be one of: {}", allowed.join(", "))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_error_creation() {
        let err = ValidationError::new("email", "Invalid email");
        assert_eq!(err.field, "email");
        assert_eq!(err.message, "Invalid email");
    }

    #[test]
    fn test_required_message_names_field() {
        let err = ValidationError::required("name");
        assert_eq!(err.to_string(), r#"field "name" is required"#);
    }

    #[test]
    fn test_rule_message_is_path_qualified() {
        let err = ValidationError::rule("items[1].sku", "must be a SKU");
        assert_eq!(err.field, "items[1].sku");
        assert_eq!(err.to_string(), r#"field "items[1].sku" must be a SKU"#);
    }

    #[test]
    fn test_builtins_registered() {
        let registry = RuleRegistry::with_builtins();
        for name in ["not_null", "not_blank", "email", "uuid", "positive", "non_negative"] {
            assert!(registry.contains(name), "missing builtin {name}");
        }
        assert!(!registry.contains("nope"));
    }

    #[test]
    fn test_resolve_reports_first_unknown() {
        let registry = RuleRegistry::with_builtins();
        let names = vec!["email".to_string(), "bogus".to_string(), "other".to_string()];
        assert_eq!(registry.resolve(&names).err(), Some("bogus"));

        let names = vec!["email".to_string(), "not_blank".to_string()];
        assert_eq!(registry.resolve(&names).map(|r| r.len()), Ok(2));
    }

    #[test]
    fn test_register_replaces() {
        let registry = RuleRegistry::new()
            .register("x", |_| Err("first".to_string()))
            .register("x", |_| Ok(()));
        let rule = registry.get("x").unwrap();
        assert!(rule(&json!(1)).is_ok());
    }

    #[test]
    fn test_validate_length() {
        let rule = rules::length(3, 5);

        // Too short
        assert!(rule(&json!("ab")).is_err());

        // Too long
        assert!(rule(&json!("abcdef")).is_err());

        // Just right
        assert!(rule(&json!("abc")).is_ok());
        assert!(rule(&json!([1, 2, 3])).is_ok());
        assert!(rule(&json!(3)).is_err());
    }

    #[test]
    fn test_validate_range() {
        let rule = rules::range(0.0, 120.0);

        // Too small
        assert!(rule(&json!(-5)).is_err());

        // Too large
        assert!(rule(&json!(150)).is_err());

        // Just right, numeric strings included
        assert!(rule(&json!(25)).is_ok());
        assert!(rule(&json!("25")).is_ok());
        assert!(rule(&json!("twenty")).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(rules::email(&json!("invalid")).is_err());
        assert!(rules::email(&json!("@example.com")).is_err());
        assert!(rules::email(&json!(42)).is_err());
        assert!(rules::email(&json!("test@example.com")).is_ok());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(rules::not_blank(&json!("")).is_err());
        assert!(rules::not_blank(&json!("   ")).is_err());
        assert!(rules::not_blank(&json!("John")).is_ok());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(rules::uuid(&json!("550e8400-e29b-41d4-a716-446655440000")).is_ok());
        assert!(rules::uuid(&json!("not-a-uuid")).is_err());
    }

    #[test]
    fn test_positive_and_non_negative() {
        assert!(rules::positive(&json!(1)).is_ok());
        assert!(rules::positive(&json!(0)).is_err());
        assert!(rules::non_negative(&json!(0)).is_ok());
        assert!(rules::non_negative(&json!(-1)).is_err());
    }

    #[test]
    fn test_one_of() {
        let rule = rules::one_of(&["active", "archived"]);
        assert!(rule(&json!("active")).is_ok());
        assert!(rule(&json!("deleted")).is_err());
    }
}
