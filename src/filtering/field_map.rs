use std::collections::HashMap;

use super::PredicateSet;

/// Allow-list entry: where one client-visible field lives in the database, and which
/// predicates may filter on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiToDbField {
    pub table: String,
    pub column: String,
    pub predicates: PredicateSet,
}

impl ApiToDbField {
    /// Map to `table.column`, accepting every predicate.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            predicates: PredicateSet::ALL,
        }
    }

    #[must_use]
    pub fn with_predicates(mut self, predicates: impl Into<PredicateSet>) -> Self {
        self.predicates = predicates.into();
        self
    }
}

/// The only sanctioned route from a client field name to a table and column.
///
/// A name that is absent, or mapped to an empty column, is rejected by every
/// translator.
///
/// ```rust,ignore
/// let users = FieldMap::new()
///     .with(
///         "status",
///         ApiToDbField::new("users", "status").with_predicates(PredicateSet::ONLY_EQUAL),
///     )
///     .with(
///         "age",
///         ApiToDbField::new("users", "age")
///             .with_predicates(PredicateSet::ONLY_GREATER.union(PredicateSet::ONLY_LESS)),
///     );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(HashMap<String, ApiToDbField>);

impl FieldMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, field: ApiToDbField) -> Self {
        self.0.insert(name.into(), field);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, field: ApiToDbField) -> Option<ApiToDbField> {
        self.0.insert(name.into(), field)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ApiToDbField> {
        self.0.get(name)
    }

    /// The entry for `name`, if it maps to a usable column.
    pub(crate) fn resolve(&self, name: &str) -> Option<&ApiToDbField> {
        self.0.get(name).filter(|field| !field.column.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ApiToDbField)> {
        self.0.iter().map(|(name, field)| (name.as_str(), field))
    }
}

impl FromIterator<(String, ApiToDbField)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, ApiToDbField)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(String, ApiToDbField)> for FieldMap {
    fn extend<I: IntoIterator<Item = (String, ApiToDbField)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
