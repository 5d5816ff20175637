use serde_json::Value;

use super::ApiFields;

/// Where in the request a field's raw value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    /// Path parameters first, then the query string
    Url,
    /// A key of the JSON request body
    #[default]
    Body,
    /// A request header, matched case-insensitively
    Header,
    /// A cookie from the `Cookie` header
    Cookie,
}

/// The shape a field's value is expected to decode into.
///
/// Drives weak coercion in the decoder: a `"42"` query parameter becomes `42` for an
/// [`FieldType::Int`] field before the typed destination is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    /// No coercion
    #[default]
    Any,
    String,
    Int,
    Float,
    Bool,
    /// A string holding a UUID
    Uuid,
    Array,
    Object,
}

impl FieldType {
    /// Whether a nested schema may be attached to a field of this type.
    #[must_use]
    pub const fn allows_nested(self) -> bool {
        matches!(self, Self::Any | Self::Object | Self::Array)
    }
}

/// Declarative descriptor of one unit of allowed client input.
///
/// `ApiField` is an immutable value: every `with_*` method leaves `self` untouched and
/// returns a modified copy. The copy is deep, so two fields derived from a common base
/// never share their rule lists or nested trees.
///
/// ```rust,ignore
/// use crudgate::{ApiField, FieldType, Source};
///
/// let base = ApiField::new("id").with_type(FieldType::Uuid).with_validate(["uuid"]);
/// let path_id = base.with_source(Source::Url).with_required(true);
/// let body_id = base.with_api_name("owner_id");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiField {
    api_name: String,
    alias: Option<String>,
    db_column: Option<String>,
    required: bool,
    default: Option<Value>,
    source: Source,
    validate: Vec<String>,
    convert: Option<String>,
    nested: Option<ApiFields>,
    field_type: FieldType,
}

impl ApiField {
    /// A body field named `api_name`, optional, with no rules.
    #[must_use]
    pub fn new(api_name: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_api_name(&self, api_name: impl Into<String>) -> Self {
        let mut field = self.clone();
        field.api_name = api_name.into();
        field
    }

    /// Decode under `alias` instead of the api name.
    #[must_use]
    pub fn with_alias(&self, alias: impl Into<String>) -> Self {
        let mut field = self.clone();
        field.alias = Some(alias.into());
        field
    }

    #[must_use]
    pub fn with_db_column(&self, column: impl Into<String>) -> Self {
        let mut field = self.clone();
        field.db_column = Some(column.into());
        field
    }

    #[must_use]
    pub fn with_required(&self, required: bool) -> Self {
        let mut field = self.clone();
        field.required = required;
        field
    }

    /// Value picked when the request does not carry the field.
    #[must_use]
    pub fn with_default(&self, default: impl Into<Value>) -> Self {
        let mut field = self.clone();
        field.default = Some(default.into());
        field
    }

    #[must_use]
    pub fn with_source(&self, source: Source) -> Self {
        let mut field = self.clone();
        field.source = source;
        field
    }

    /// Replace the rule names applied to this field, in order.
    #[must_use]
    pub fn with_validate<I, S>(&self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = self.clone();
        field.validate = rules.into_iter().map(Into::into).collect();
        field
    }

    #[must_use]
    pub fn with_convert(&self, conversion: impl Into<String>) -> Self {
        let mut field = self.clone();
        field.convert = Some(conversion.into());
        field
    }

    /// Make this field an object (or array of objects) described by `nested`.
    #[must_use]
    pub fn with_nested(&self, nested: ApiFields) -> Self {
        let mut field = self.clone();
        field.nested = Some(nested);
        field
    }

    #[must_use]
    pub fn with_type(&self, field_type: FieldType) -> Self {
        let mut field = self.clone();
        field.field_type = field_type;
        field
    }

    #[must_use]
    pub fn api_name(&self) -> &str {
        &self.api_name
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The key this field is stored under in the picked map, and the serde field
    /// name of the decode destination.
    #[must_use]
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.api_name)
    }

    #[must_use]
    pub fn db_column(&self) -> Option<&str> {
        self.db_column.as_deref()
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }

    #[must_use]
    pub fn validate(&self) -> &[String] {
        &self.validate
    }

    #[must_use]
    pub fn convert(&self) -> Option<&str> {
        self.convert.as_deref()
    }

    #[must_use]
    pub const fn nested(&self) -> Option<&ApiFields> {
        self.nested.as_ref()
    }

    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    #[must_use]
    pub const fn is_nested(&self) -> bool {
        self.nested.is_some()
    }
}
