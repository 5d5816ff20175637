//! # Field Schema
//!
//! A schema is a tree of [`ApiField`]s grouped into [`ApiFields`]. It declares, for every
//! unit of client input, where the raw value comes from ([`Source`]), whether it must be
//! present, its default, the rules it must pass, the conversion applied when it is
//! picked, and for object-like fields the nested tree describing the object.
//!
//! Schemas are built once while routes are registered, checked with
//! [`ApiFields::validate`] (or the panicking [`ApiFields::must_validate`]) and then
//! shared immutably by all requests.
//!
//! ```rust,ignore
//! use crudgate::{ApiField, ApiFields, EngineConfig, FieldType, Source};
//!
//! let fields = ApiFields::new([
//!     ApiField::new("id").with_source(Source::Url).with_type(FieldType::Uuid).with_required(true),
//!     ApiField::new("email").with_required(true).with_validate(["email"]).with_convert("trim"),
//!     ApiField::new("tags").with_type(FieldType::Array),
//!     ApiField::new("address").with_nested(ApiFields::new([
//!         ApiField::new("city").with_required(true),
//!     ])),
//! ]);
//! fields.must_validate(&EngineConfig::new());
//! ```

mod check;
mod field;
mod fields;

pub(crate) use check::join_path;
pub use check::SchemaError;
pub use field::{ApiField, FieldType, Source};
pub use fields::ApiFields;
