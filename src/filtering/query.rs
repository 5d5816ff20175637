//! Construction of sea-query expressions from translated selectors, orders and updates.
//!
//! Nothing here touches a connection. Table and column identifiers only ever come from
//! the allow-list; client values are bound as parameters.

use sea_orm::sea_query::{Alias, ColumnRef, Expr, IntoColumnRef, SimpleExpr};
use sea_orm::{Condition, Order, Value as DbValue};
use serde_json::Value;

use super::{DbOrder, DbSelector, DbUpdate, Predicate, TranslationError};

fn column_ref(table: &str, column: &str) -> ColumnRef {
    (Alias::new(table), Alias::new(column)).into_column_ref()
}

/// Bindable form of a JSON scalar. `null`, arrays and objects have none.
fn scalar(value: &Value) -> Option<DbValue> {
    match value {
        Value::Bool(b) => Some(DbValue::from(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(DbValue::from)
            .or_else(|| n.as_u64().map(DbValue::from))
            .or_else(|| n.as_f64().map(DbValue::from)),
        Value::String(s) => Some(DbValue::from(s.clone())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl DbSelector {
    /// The `table.column` reference this selector filters on.
    #[must_use]
    pub fn column(&self) -> ColumnRef {
        column_ref(&self.table, &self.column)
    }

    /// Build the comparison expression.
    ///
    /// `eq`/`ne` against `null` become `IS NULL`/`IS NOT NULL`. `in`/`not_in` need an
    /// array of scalars; every other predicate needs a scalar.
    pub fn to_expr(&self) -> Result<SimpleExpr, TranslationError> {
        let col = Expr::col(self.column());
        Ok(match (self.predicate, &self.value) {
            (Predicate::Equal, Value::Null) => col.is_null(),
            (Predicate::NotEqual, Value::Null) => col.is_not_null(),
            (Predicate::In, value) => col.is_in(self.scalars(value)?),
            (Predicate::NotIn, value) => col.is_not_in(self.scalars(value)?),
            (Predicate::Equal, value) => col.eq(self.scalar(value)?),
            (Predicate::NotEqual, value) => col.ne(self.scalar(value)?),
            (Predicate::Greater, value) => col.gt(self.scalar(value)?),
            (Predicate::GreaterOrEqual, value) => col.gte(self.scalar(value)?),
            (Predicate::Less, value) => col.lt(self.scalar(value)?),
            (Predicate::LessOrEqual, value) => col.lte(self.scalar(value)?),
        })
    }

    fn scalar(&self, value: &Value) -> Result<DbValue, TranslationError> {
        scalar(value).ok_or_else(|| self.invalid_value())
    }

    fn scalars(&self, value: &Value) -> Result<Vec<DbValue>, TranslationError> {
        let Value::Array(items) = value else {
            return Err(self.invalid_value());
        };
        items
            .iter()
            .map(|item| self.scalar(item))
            .collect()
    }

    fn invalid_value(&self) -> TranslationError {
        tracing::debug!(field = %self.field, predicate = %self.predicate, "Rejected filter value");
        TranslationError::InvalidValue {
            field: self.field.clone(),
            predicate: self.predicate.mnemonic().to_string(),
        }
    }
}

/// AND of every selector; an empty slice matches everything.
pub fn to_condition(selectors: &[DbSelector]) -> Result<Condition, TranslationError> {
    selectors
        .iter()
        .try_fold(Condition::all(), |condition, selector| Ok(condition.add(selector.to_expr()?)))
}

impl DbOrder {
    #[must_use]
    pub fn column(&self) -> ColumnRef {
        column_ref(&self.table, &self.field)
    }

    #[must_use]
    pub fn to_order(&self) -> Order {
        self.direction.into()
    }
}

impl DbUpdate {
    #[must_use]
    pub fn column(&self) -> ColumnRef {
        column_ref(&self.table, &self.field)
    }

    /// Bindable value: scalars map to their SQL type, arrays and objects bind as JSON,
    /// and `null` binds as a NULL string.
    #[must_use]
    pub fn to_value(&self) -> DbValue {
        match &self.value {
            Value::Null => DbValue::String(None),
            value @ (Value::Array(_) | Value::Object(_)) => {
                DbValue::Json(Some(Box::new(value.clone())))
            }
            value => scalar(value).unwrap_or(DbValue::String(None)),
        }
    }
}
