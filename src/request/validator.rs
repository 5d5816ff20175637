//! Recursive validation of a picked map against its schema.

use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::schema::{ApiField, ApiFields, join_path};
use crate::validation::ValidationError;

/// Validate `picked` against `fields`, stopping at the first failure.
///
/// - a missing required field fails, a missing optional field is skipped;
/// - a present nested field must be an object or an array of objects, and every
///   element is validated on its own (one bad element fails the whole call);
/// - a present leaf field runs its rules in order.
///
/// Nested and leaf fields take separate paths; a nested field never runs scalar rules.
pub fn validate_values(
    fields: &ApiFields,
    picked: &Map<String, Value>,
    config: &EngineConfig,
) -> Result<(), ValidationError> {
    validate_level(fields, picked, "", 1, config)
}

fn validate_level(
    fields: &ApiFields,
    object: &Map<String, Value>,
    parent: &str,
    depth: usize,
    config: &EngineConfig,
) -> Result<(), ValidationError> {
    let max_depth = config.limits.max_depth;
    if depth > max_depth {
        return Err(ValidationError::too_deep(parent, max_depth));
    }

    for field in fields {
        let path = join_path(parent, field.api_name());
        let Some(value) = object.get(field.key()) else {
            if field.is_required() {
                return Err(ValidationError::required(&path));
            }
            continue;
        };

        match field.nested() {
            Some(nested) => validate_nested(nested, value, &path, depth, config)?,
            None => apply_rules(field, value, &path, config)?,
        }
    }
    Ok(())
}

fn validate_nested(
    nested: &ApiFields,
    value: &Value,
    path: &str,
    depth: usize,
    config: &EngineConfig,
) -> Result<(), ValidationError> {
    match value {
        Value::Object(object) => validate_level(nested, object, path, depth + 1, config),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                let Value::Object(object) = item else {
                    return Err(ValidationError::not_object(&item_path));
                };
                validate_level(nested, object, &item_path, depth + 1, config)?;
            }
            Ok(())
        }
        _ => Err(ValidationError::not_object(path)),
    }
}

fn apply_rules(
    field: &ApiField,
    value: &Value,
    path: &str,
    config: &EngineConfig,
) -> Result<(), ValidationError> {
    for name in field.validate() {
        let Some(rule) = config.rules.get(name) else {
            // Only reachable with a schema that skipped ApiFields::validate.
            tracing::error!(field = %path, rule = %name, "Validation rule is not registered");
            return Err(ValidationError::rule(path, "failed validation"));
        };
        rule(value).map_err(|reason| {
            tracing::debug!(field = %path, rule = %name, "Validation rule rejected value");
            ValidationError::rule(path, &reason)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use serde_json::json;

    fn config() -> EngineConfig {
        EngineConfig::new()
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn test_required_field_missing() {
        let fields = ApiFields::new([ApiField::new("name").with_required(true)]);
        let err = validate_values(&fields, &Map::new(), &config()).unwrap_err();
        assert_eq!(err.field, "name");
        assert!(err.to_string().contains(r#"field "name" is required"#));
    }

    #[test]
    fn test_required_field_with_zero_value_passes() {
        let fields = ApiFields::new([
            ApiField::new("count").with_required(true),
            ApiField::new("label").with_required(true),
            ApiField::new("note").with_required(true),
        ]);
        let picked = object(json!({"count": 0, "label": "", "note": null}));
        assert!(validate_values(&fields, &picked, &config()).is_ok());
    }

    #[test]
    fn test_optional_missing_is_skipped() {
        let fields = ApiFields::new([ApiField::new("email").with_validate(["email"])]);
        assert!(validate_values(&fields, &Map::new(), &config()).is_ok());
    }

    #[test]
    fn test_rule_failure_is_path_qualified() {
        let fields = ApiFields::new([ApiField::new("email").with_validate(["not_blank", "email"])]);
        let err =
            validate_values(&fields, &object(json!({"email": "nope"})), &config()).unwrap_err();
        assert_eq!(err.to_string(), r#"field "email" must be a valid email"#);
    }

    #[test]
    fn test_rules_run_in_order() {
        let fields = ApiFields::new([ApiField::new("email").with_validate(["not_blank", "email"])]);
        let err = validate_values(&fields, &object(json!({"email": "  "})), &config()).unwrap_err();
        assert_eq!(err.to_string(), r#"field "email" must not be blank"#);
    }

    #[test]
    fn test_nested_object_validated() {
        let fields = ApiFields::new([ApiField::new("address").with_nested(ApiFields::new([
            ApiField::new("city").with_required(true),
        ]))]);
        let err = validate_values(&fields, &object(json!({"address": {}})), &config()).unwrap_err();
        assert_eq!(err.field, "address.city");
    }

    #[test]
    fn test_nested_array_is_all_or_nothing() {
        let fields = ApiFields::new([ApiField::new("items").with_nested(ApiFields::new([
            ApiField::new("sku").with_required(true).with_validate(["not_blank"]),
        ]))]);

        let good = object(json!({"items": [{"sku": "A"}, {"sku": "B"}]}));
        assert!(validate_values(&fields, &good, &config()).is_ok());

        let bad = object(json!({"items": [{"sku": "A"}, {"sku": " "}, {"sku": "C"}]}));
        let err = validate_values(&fields, &bad, &config()).unwrap_err();
        assert_eq!(err.field, "items[1].sku");
    }

    #[test]
    fn test_nested_array_with_scalar_element_fails() {
        let fields = ApiFields::new([
            ApiField::new("items").with_nested(ApiFields::new([ApiField::new("sku")])),
        ]);
        let picked = object(json!({"items": [{"sku": "A"}, 5]}));
        let err = validate_values(&fields, &picked, &config()).unwrap_err();
        assert_eq!(err.field, "items[1]");
    }

    #[test]
    fn test_nested_wrong_shape_fails_even_if_optional() {
        let fields = ApiFields::new([
            ApiField::new("address").with_nested(ApiFields::new([ApiField::new("city")])),
        ]);
        for value in [json!("Main St"), json!(3), json!(null), json!(true)] {
            let picked = object(json!({ "address": value }));
            let err = validate_values(&fields, &picked, &config()).unwrap_err();
            assert_eq!(
                err.to_string(),
                r#"field "address" must be an object or an array of objects"#
            );
        }
    }

    #[test]
    fn test_alias_key_is_looked_up_but_api_name_reported() {
        let fields = ApiFields::new([ApiField::new("userName")
            .with_alias("user_name")
            .with_required(true)
            .with_validate(["not_blank"])]);
        let err =
            validate_values(&fields, &object(json!({"user_name": ""})), &config()).unwrap_err();
        assert_eq!(err.field, "userName");
    }

    #[test]
    fn test_depth_limit() {
        let inner = ApiFields::new([ApiField::new("leaf")]);
        let middle = ApiFields::new([ApiField::new("inner").with_nested(inner)]);
        let fields = ApiFields::new([ApiField::new("middle").with_nested(middle)]);
        let picked = object(json!({"middle": {"inner": {"leaf": 1}}}));
        let config = EngineConfig::new().with_limits(Limits::default().max_depth(2));
        let err = validate_values(&fields, &picked, &config).unwrap_err();
        assert_eq!(err.field, "middle.inner");
    }

    #[test]
    fn test_error_never_echoes_value() {
        let fields = ApiFields::new([ApiField::new("email").with_validate(["email"])]);
        let picked = object(json!({"email": "secret-token"}));
        let err = validate_values(&fields, &picked, &config()).unwrap_err();
        assert!(!err.to_string().contains("secret-token"));
    }
}
