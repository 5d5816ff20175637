//! Schema-driven request intake and allow-listed query translation for axum + sea-orm APIs.
//!
//! - [`ApiFields`] declares what a handler accepts; [`InputHandler`] and [`Validated`]
//!   pick, validate and decode requests against it.
//! - [`FieldMap`] maps client field names to columns; [`ApiSelectors`], [`ApiOrders`] and
//!   [`ApiUpdates`] translate through it and refuse anything it does not list.

pub mod config;
pub mod conversion;
pub mod errors;
pub mod filtering;
pub mod models;
pub mod request;
pub mod schema;
pub mod validation;

pub use config::{EngineConfig, Limits};
pub use conversion::ConversionRegistry;
pub use errors::ApiError;
pub use filtering::{
    ApiOrders, ApiSelector, ApiSelectors, ApiToDbField, ApiUpdates, DbOrder, DbSelector, DbUpdate,
    Direction, FieldMap, Predicate, PredicateSet, TranslationError, to_condition,
};
pub use models::ListQuery;
pub use request::{ApiInput, DecodeError, InputHandler, PickError, RawRequest, Validated};
pub use schema::{ApiField, ApiFields, FieldType, SchemaError, Source};
pub use serde_with;
pub use validation::{RuleRegistry, ValidationError};
