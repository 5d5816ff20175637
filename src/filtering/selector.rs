use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::{FieldMap, Predicate, TranslationError};

/// One client filter condition: a predicate token and the value to compare with.
///
/// Deserializes from `{"predicate": "gt", "value": 5}`, or from a bare value: an array
/// means `in`, anything else means `eq`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiSelector {
    pub predicate: String,
    pub value: Value,
}

impl ApiSelector {
    pub fn new(predicate: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            predicate: predicate.into(),
            value: value.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ExplicitSelector {
    predicate: String,
    value: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectorRepr {
    Explicit(ExplicitSelector),
    Shorthand(Value),
}

impl<'de> Deserialize<'de> for ApiSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match SelectorRepr::deserialize(deserializer)? {
            SelectorRepr::Explicit(ExplicitSelector { predicate, value }) => {
                Self { predicate, value }
            }
            SelectorRepr::Shorthand(value @ Value::Array(_)) => {
                Self::new(Predicate::In.mnemonic(), value)
            }
            SelectorRepr::Shorthand(value) => Self::new(Predicate::Equal.mnemonic(), value),
        })
    }
}

/// Client filters keyed by field name; one condition per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiSelectors(BTreeMap<String, ApiSelector>);

impl ApiSelectors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, selector: ApiSelector) -> Self {
        self.0.insert(field.into(), selector);
        self
    }

    pub fn insert(
        &mut self,
        field: impl Into<String>,
        selector: ApiSelector,
    ) -> Option<ApiSelector> {
        self.0.insert(field.into(), selector)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&ApiSelector> {
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

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ApiSelector)> {
        self.0.iter().map(|(field, selector)| (field.as_str(), selector))
    }

    /// Translate every filter through the allow-list.
    ///
    /// Fails on the first field missing from `fields` (or mapped to no column) and on
    /// the first predicate that is unknown or not allowed on its field. Output is sorted
    /// by client field name.
    pub fn to_db_selectors(&self, fields: &FieldMap) -> Result<Vec<DbSelector>, TranslationError> {
        self.0
            .iter()
            .map(|(name, selector)| {
                let Some(field) = fields.resolve(name) else {
                    tracing::debug!(
                        field = %name,
                        "Rejected filter on field outside the allow-list"
                    );
                    return Err(TranslationError::InvalidField { field: name.clone() });
                };
                let Some(predicate) = Predicate::parse(&selector.predicate)
                    .filter(|predicate| field.predicates.contains(*predicate))
                else {
                    tracing::debug!(
                        field = %name,
                        predicate = %selector.predicate,
                        "Rejected filter predicate"
                    );
                    return Err(TranslationError::InvalidPredicate {
                        field: name.clone(),
                        predicate: selector.predicate.clone(),
                    });
                };
                Ok(DbSelector {
                    field: name.clone(),
                    table: field.table.clone(),
                    column: field.column.clone(),
                    predicate,
                    value: selector.value.clone(),
                })
            })
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, ApiSelector)> for ApiSelectors {
    fn from_iter<I: IntoIterator<Item = (K, ApiSelector)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A filter condition on an allow-listed column.
///
/// `field` keeps the client's name so later errors can name it without revealing the
/// column.
#[derive(Debug, Clone, PartialEq)]
pub struct DbSelector {
    pub field: String,
    pub table: String,
    pub column: String,
    pub predicate: Predicate,
    pub value: Value,
}
