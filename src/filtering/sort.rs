use sea_orm::Order;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::{FieldMap, TranslationError};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// Parse `asc`, `ascending`, `desc` or `descending`, ignoring ASCII case.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Self::Asc,
            Direction::Desc => Self::Desc,
        }
    }
}

/// Client sort request: field names with their direction tokens, in priority order.
///
/// Setting a field that is already present replaces its direction and keeps its
/// original position, so the last write wins.
///
/// Deserializes from an object (`{"name": "asc", "age": "desc"}`) or from a flat array
/// of field/direction pairs (`["name", "ASC"]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiOrders(Vec<(String, String)>);

impl ApiOrders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, direction: impl Into<String>) -> Self {
        self.insert(field, direction);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, direction: impl Into<String>) {
        let field = field.into();
        let direction = direction.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == field) {
            Some((_, slot)) => *slot = direction,
            None => self.0.push((field, direction)),
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == field)
            .map(|(_, direction)| direction.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(field, direction)| (field.as_str(), direction.as_str()))
    }

    /// Translate every order through the allow-list, keeping priority order.
    pub fn to_db_orders(&self, fields: &FieldMap) -> Result<Vec<DbOrder>, TranslationError> {
        self.0
            .iter()
            .map(|(name, token)| {
                let Some(field) = fields.resolve(name) else {
                    tracing::debug!(
                        field = %name,
                        "Rejected order on field outside the allow-list"
                    );
                    return Err(TranslationError::InvalidOrderField { field: name.clone() });
                };
                let Some(direction) = Direction::parse(token) else {
                    tracing::debug!(field = %name, direction = %token, "Rejected order direction");
                    return Err(TranslationError::InvalidDirection {
                        field: name.clone(),
                        direction: token.clone(),
                    });
                };
                Ok(DbOrder {
                    table: field.table.clone(),
                    field: field.column.clone(),
                    direction,
                })
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ApiOrders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |orders, (field, direction)| orders.with(field, direction))
    }
}

impl Serialize for ApiOrders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for ApiOrders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OrdersVisitor)
    }
}

struct OrdersVisitor;

impl<'de> Visitor<'de> for OrdersVisitor {
    type Value = ApiOrders;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#"an object of field directions or an array like ["field", "ASC"]"#)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut orders = ApiOrders::new();
        while let Some((field, direction)) = map.next_entry::<String, String>()? {
            orders.insert(field, direction);
        }
        Ok(orders)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut orders = ApiOrders::new();
        while let Some(field) = seq.next_element::<String>()? {
            let Some(direction) = seq.next_element::<String>()? else {
                return Err(de::Error::custom(format!(
                    "missing direction for sort field {field:?}"
                )));
            };
            orders.insert(field, direction);
        }
        Ok(orders)
    }
}

/// A sort on an allow-listed column; `field` is the column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbOrder {
    pub table: String,
    pub field: String,
    pub direction: Direction,
}
