use super::ApiField;
use crate::filtering::{ApiToDbField, FieldMap};

/// Ordered set of [`ApiField`]s describing one JSON object.
///
/// Lookups are linear scans; a schema is small and built once at startup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiFields(Vec<ApiField>);

impl ApiFields {
    #[must_use]
    pub fn new(fields: impl IntoIterator<Item = ApiField>) -> Self {
        Self(fields.into_iter().collect())
    }

    /// A copy of this tree with `fields` appended.
    #[must_use]
    pub fn with_fields(&self, fields: impl IntoIterator<Item = ApiField>) -> Self {
        let mut copy = self.clone();
        copy.0.extend(fields);
        copy
    }

    /// Find a field by its api name.
    #[must_use]
    pub fn get(&self, api_name: &str) -> Option<&ApiField> {
        self.0.iter().find(|field| field.api_name() == api_name)
    }

    /// The subset named by `api_names`, in the order given, or the first missing name.
    pub fn get_many<'a>(&self, api_names: &[&'a str]) -> Result<Self, &'a str> {
        api_names
            .iter()
            .map(|name| self.get(name).cloned().ok_or(*name))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Like [`get`](Self::get), for startup wiring.
    ///
    /// # Panics
    ///
    /// Panics if no field is named `api_name`.
    #[must_use]
    pub fn must_get(&self, api_name: &str) -> &ApiField {
        match self.get(api_name) {
            Some(field) => field,
            None => panic!("api field {api_name:?} is not declared"),
        }
    }

    /// Like [`get_many`](Self::get_many), for startup wiring.
    ///
    /// # Panics
    ///
    /// Panics if any name is not declared.
    #[must_use]
    pub fn must_get_many(&self, api_names: &[&str]) -> Self {
        match self.get_many(api_names) {
            Ok(fields) => fields,
            Err(missing) => panic!("api field {missing:?} is not declared"),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ApiField> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Allow-list entries for every top-level field that declares a `db_column`.
    ///
    /// Fields without a column are not filterable, sortable or updatable through the
    /// returned map.
    #[must_use]
    pub fn db_field_map(&self, table: &str) -> FieldMap {
        self.0
            .iter()
            .filter_map(|field| {
                field
                    .db_column()
                    .map(|column| (field.api_name().to_string(), ApiToDbField::new(table, column)))
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ApiFields {
    type Item = &'a ApiField;
    type IntoIter = std::slice::Iter<'a, ApiField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ApiField> for ApiFields {
    fn from_iter<I: IntoIterator<Item = ApiField>>(iter: I) -> Self {
        Self::new(iter)
    }
}
