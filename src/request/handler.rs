use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{RawRequest, decode, pick, validate_values};
use crate::config::EngineConfig;
use crate::errors::ApiError;
use crate::schema::{ApiFields, SchemaError};

/// A destination type that declares its own field schema.
///
/// ```rust,ignore
/// #[derive(serde::Deserialize)]
/// struct CreateUser { email: String, age: Option<i64> }
///
/// impl ApiInput for CreateUser {
///     fn api_fields() -> ApiFields {
///         ApiFields::new([
///             ApiField::new("email").with_required(true).with_validate(["email"]),
///             ApiField::new("age").with_type(FieldType::Int).with_validate(["non_negative"]),
///         ])
///     }
/// }
///
/// let handler = InputHandler::<CreateUser>::for_input(config);
/// ```
pub trait ApiInput: DeserializeOwned {
    fn api_fields() -> ApiFields;
}

/// Per-request entry point: pick, validate and decode one request into `T`.
///
/// The schema is checked once, when the handler is built, so a handler that exists is
/// known to reference only registered rules and conversions.
pub struct InputHandler<T> {
    fields: ApiFields,
    config: Arc<EngineConfig>,
    _output: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> InputHandler<T> {
    /// Build a handler, rejecting an inconsistent schema.
    pub fn try_new(fields: ApiFields, config: Arc<EngineConfig>) -> Result<Self, SchemaError> {
        fields.validate(&config)?;
        Ok(Self {
            fields,
            config,
            _output: PhantomData,
        })
    }

    /// Build a handler during startup wiring.
    ///
    /// # Panics
    ///
    /// Panics if the schema is inconsistent with `config`.
    #[must_use]
    pub fn new(fields: ApiFields, config: Arc<EngineConfig>) -> Self {
        fields.must_validate(&config);
        Self {
            fields,
            config,
            _output: PhantomData,
        }
    }

    #[must_use]
    pub fn fields(&self) -> &ApiFields {
        &self.fields
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the request pipeline on `raw`.
    ///
    /// Stops at the first failing stage. Pick and decode failures surface to the client
    /// as a generic invalid-input error with the detail logged; validation failures
    /// carry their field-qualified message.
    pub fn handle(&self, raw: &RawRequest) -> Result<T, ApiError> {
        let picked = pick(&self.fields, raw, &self.config)?;
        validate_values(&self.fields, &picked, &self.config)?;
        Ok(decode(&self.fields, picked)?)
    }
}

impl<T: ApiInput> InputHandler<T> {
    /// Build a handler from the schema `T` declares.
    ///
    /// # Panics
    ///
    /// Panics if the schema is inconsistent with `config`.
    #[must_use]
    pub fn for_input(config: Arc<EngineConfig>) -> Self {
        Self::new(T::api_fields(), config)
    }
}

impl<T> Clone for InputHandler<T> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            config: Arc::clone(&self.config),
            _output: PhantomData,
        }
    }
}

impl<T> fmt::Debug for InputHandler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputHandler")
            .field("output", &std::any::type_name::<T>())
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApiField, FieldType, Source};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct GetUser {
        id: i64,
        verbose: bool,
    }

    impl ApiInput for GetUser {
        fn api_fields() -> ApiFields {
            ApiFields::new([
                ApiField::new("id")
                    .with_source(Source::Url)
                    .with_type(FieldType::Int)
                    .with_required(true)
                    .with_validate(["positive"]),
                ApiField::new("verbose")
                    .with_source(Source::Url)
                    .with_type(FieldType::Bool)
                    .with_default(false),
            ])
        }
    }

    fn handler() -> InputHandler<GetUser> {
        InputHandler::for_input(Arc::new(EngineConfig::new()))
    }

    #[test]
    fn test_handle_success() {
        let raw = RawRequest::new().with_path_param("id", "12").with_query("verbose", "1");
        assert_eq!(handler().handle(&raw).unwrap(), GetUser { id: 12, verbose: true });
    }

    #[test]
    fn test_handle_default_applied() {
        let raw = RawRequest::new().with_path_param("id", "3");
        assert_eq!(handler().handle(&raw).unwrap(), GetUser { id: 3, verbose: false });
    }

    #[test]
    fn test_handle_missing_required() {
        let err = handler().handle(&RawRequest::new()).unwrap_err();
        assert!(matches!(
            err,
            ApiError::ValidationFailed { ref errors }
                if errors == &[r#"field "id" is required"#.to_string()]
        ));
    }

    #[test]
    fn test_handle_rule_failure() {
        let raw = RawRequest::new().with_path_param("id", "-4");
        assert!(matches!(handler().handle(&raw), Err(ApiError::ValidationFailed { .. })));
    }

    #[test]
    fn test_handle_decode_failure() {
        let raw = RawRequest::new().with_path_param("id", "7").with_query("verbose", "maybe");
        assert!(matches!(handler().handle(&raw), Err(ApiError::InvalidInput { .. })));
    }

    #[test]
    fn test_try_new_rejects_bad_schema() {
        let fields = ApiFields::new([ApiField::new("x").with_validate(["nope"])]);
        let result =
            InputHandler::<serde_json::Value>::try_new(fields, Arc::new(EngineConfig::new()));
        assert!(matches!(result, Err(SchemaError::UnknownRule { .. })));
    }

    #[test]
    fn test_clone_shares_config() {
        let handler = handler();
        let copy = handler.clone();
        assert!(Arc::ptr_eq(&handler.config, &copy.config));
    }
}
