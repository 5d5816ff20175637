use std::sync::Arc;

use crudgate::{ApiField, ApiFields, EngineConfig, InputHandler, SchemaError, Source};

mod common;
use common::{CreateUser, GetUser};
use crudgate::ApiInput;

#[test]
fn test_declared_schemas_are_consistent() {
    let config = EngineConfig::new();
    assert_eq!(CreateUser::api_fields().validate(&config), Ok(()));
    assert_eq!(GetUser::api_fields().validate(&config), Ok(()));
}

#[test]
fn test_schema_needs_its_rules_registered() {
    let err = CreateUser::api_fields().validate(&EngineConfig::empty()).unwrap_err();
    assert!(matches!(err, SchemaError::UnknownRule { ref path, .. } if path == "name"));
}

#[test]
fn test_nested_errors_carry_the_full_path() {
    let fields = ApiFields::new([ApiField::new("order").with_nested(ApiFields::new([
        ApiField::new("items")
            .with_nested(ApiFields::new([ApiField::new("sku").with_validate(["sku"])])),
    ]))]);
    let err = fields.validate(&EngineConfig::new()).unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnknownRule {
            path: "order.items.sku".to_string(),
            rule: "sku".to_string(),
        }
    );
}

#[test]
fn test_subset_selection() {
    let fields = CreateUser::api_fields();
    let subset = fields.get_many(&["email", "name"]).unwrap();
    assert_eq!(subset.len(), 2);
    assert_eq!(fields.get_many(&["email", "nickname"]).unwrap_err(), "nickname");
    assert_eq!(fields.must_get("age").api_name(), "age");
}

#[test]
#[should_panic(expected = "api field \"nickname\" is not declared")]
fn test_must_get_panics_on_undeclared_field() {
    let _ = CreateUser::api_fields().must_get("nickname");
}

#[test]
#[should_panic(expected = "invalid api field schema")]
fn test_handler_construction_panics_on_bad_schema() {
    let fields = ApiFields::new([ApiField::new("tags")
        .with_source(Source::Url)
        .with_nested(ApiFields::new([ApiField::new("name")]))]);
    let _ = InputHandler::<serde_json::Value>::new(fields, Arc::new(EngineConfig::new()));
}
