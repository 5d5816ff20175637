use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::{FieldMap, TranslationError};

/// Client field assignments keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiUpdates(BTreeMap<String, Value>);

impl ApiUpdates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(field, value)| (field.as_str(), value))
    }

    /// Translate every assignment through the allow-list. Values pass through untouched.
    pub fn to_db_updates(&self, fields: &FieldMap) -> Result<Vec<DbUpdate>, TranslationError> {
        self.0
            .iter()
            .map(|(name, value)| {
                let Some(field) = fields.resolve(name) else {
                    tracing::debug!(
                        field = %name,
                        "Rejected update of field outside the allow-list"
                    );
                    return Err(TranslationError::InvalidField { field: name.clone() });
                };
                Ok(DbUpdate {
                    table: field.table.clone(),
                    field: field.column.clone(),
                    value: value.clone(),
                })
            })
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ApiUpdates {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<serde_json::Map<String, Value>> for ApiUpdates {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

/// An assignment to an allow-listed column; `field` is the column name.
#[derive(Debug, Clone, PartialEq)]
pub struct DbUpdate {
    pub table: String,
    pub field: String,
    pub value: Value,
}
