//! # Filter, Sort & Update Translation
//!
//! Clients describe what they want in their own vocabulary: field names they can see,
//! predicate tokens such as `gt` or `>=`, and direction tokens such as `descending`.
//! This module translates that vocabulary into database terms through a [`FieldMap`],
//! the allow-list from client field name to table and column.
//!
//! Translation fails closed. A field missing from the map, a predicate the field does
//! not allow, or an unknown direction rejects the whole collection and nothing partial
//! is returned.
//!
//! ```rust,ignore
//! let users = FieldMap::new()
//!     .with(
//!         "status",
//!         ApiToDbField::new("users", "status").with_predicates(PredicateSet::ONLY_EQUAL),
//!     )
//!     .with(
//!         "age",
//!         ApiToDbField::new("users", "age")
//!             .with_predicates(PredicateSet::ONLY_GREATER.union(PredicateSet::ONLY_LESS)),
//!     );
//!
//! // GET /users?filter={"status":"active","age":{"predicate":">=","value":18}}&sort={"age":"desc"}
//! let selectors = query.selectors()?.to_db_selectors(&users)?;
//! let orders = query.orders()?.to_db_orders(&users)?;
//!
//! let mut select = Query::select();
//! select.cond_where(to_condition(&selectors)?);
//! for order in &orders {
//!     select.order_by(order.column(), order.to_order());
//! }
//! ```

mod error;
mod field_map;
mod predicate;
mod query;
mod selector;
mod sort;
mod update;

pub use error::TranslationError;
pub use field_map::{ApiToDbField, FieldMap};
pub use predicate::{Predicate, PredicateSet};
pub use query::to_condition;
pub use selector::{ApiSelector, ApiSelectors, DbSelector};
pub use sort::{ApiOrders, DbOrder, Direction};
pub use update::{ApiUpdates, DbUpdate};
