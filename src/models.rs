use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::errors::ApiError;
use crate::filtering::{ApiOrders, ApiSelectors};

/// Query parameters for filtering and sorting a list of resources.
///
/// # Filtering
/// The `filter` parameter is a JSON object keyed by field name. Each value is either a
/// bare value or an explicit condition:
/// - **Equality:** `{"status": "active"}`
/// - **Membership:** `{"id": [1, 2, 3]}`
/// - **Any predicate:** `{"age": {"predicate": ">=", "value": 18}}`
///
/// # Sorting
/// The `sort` parameter is either an object of field directions, applied in order:
/// ```json
/// {"age": "desc", "name": "asc"}
/// ```
/// or an array of field/direction pairs:
/// ```json
/// ["id", "ASC"]
/// ```
///
/// Field names, predicates and directions are only checked when translated against a
/// [`FieldMap`](crate::FieldMap).
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// JSON-encoded filter.
    ///
    /// Example: `{"status": "active", "age": {"predicate": "gt", "value": 21}}`
    #[param(example = json!({
        "status": "active",
        "age": {"predicate": "gt", "value": 21}
    }))]
    pub filter: Option<String>,
    /// JSON-encoded sort order.
    ///
    /// Example: `["id", "ASC"]`
    #[param(example = r#"["id", "ASC"]"#)]
    pub sort: Option<String>,
}

impl ListQuery {
    /// Parse `filter`; a missing or blank filter selects everything.
    pub fn selectors(&self) -> Result<ApiSelectors, ApiError> {
        match self.filter.as_deref().map(str::trim) {
            None | Some("") => Ok(ApiSelectors::new()),
            Some(filter) => serde_json::from_str(filter).map_err(|err| {
                tracing::debug!(error = %err, "Rejected malformed filter parameter");
                ApiError::bad_request("filter must be a JSON object")
            }),
        }
    }

    /// Parse `sort`; a missing or blank sort means no ordering.
    pub fn orders(&self) -> Result<ApiOrders, ApiError> {
        match self.sort.as_deref().map(str::trim) {
            None | Some("") => Ok(ApiOrders::new()),
            Some(sort) => serde_json::from_str(sort).map_err(|err| {
                tracing::debug!(error = %err, "Rejected malformed sort parameter");
                ApiError::bad_request("sort must be a JSON object or array")
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::ApiSelector;
    use serde_json::json;

    fn query(filter: Option<&str>, sort: Option<&str>) -> ListQuery {
        ListQuery {
            filter: filter.map(str::to_string),
            sort: sort.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_query() {
        let q = ListQuery::default();
        assert!(q.selectors().unwrap().is_empty());
        assert!(q.orders().unwrap().is_empty());
        assert!(query(Some("  "), Some("")).selectors().unwrap().is_empty());
    }

    #[test]
    fn test_filter_parsing() {
        let q = query(
            Some(r#"{"status": "active", "age": {"predicate": ">=", "value": 18}}"#),
            None,
        );
        let selectors = q.selectors().unwrap();
        assert_eq!(selectors.get("status"), Some(&ApiSelector::new("eq", "active")));
        assert_eq!(selectors.get("age"), Some(&ApiSelector::new(">=", json!(18))));
    }

    #[test]
    fn test_sort_parsing_keeps_order() {
        let q = query(None, Some(r#"{"age": "desc", "name": "asc"}"#));
        let orders = q.orders().unwrap();
        assert_eq!(orders.iter().collect::<Vec<_>>(), [("age", "desc"), ("name", "asc")]);

        let q = query(None, Some(r#"["id", "ASC"]"#));
        assert_eq!(q.orders().unwrap().get("id"), Some("ASC"));
    }

    #[test]
    fn test_malformed_parameters() {
        let err = query(Some("[1, 2"), None).selectors().unwrap_err();
        assert_eq!(err.to_string(), "filter must be a JSON object");
        let err = query(None, Some("42")).orders().unwrap_err();
        assert_eq!(err.to_string(), "sort must be a JSON object or array");
    }
}
