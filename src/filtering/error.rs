use std::fmt;

/// A client filter, order or update the allow-list does not admit.
///
/// Messages name the client's own token and never the mapped table, column or the
/// submitted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// The field is not in the allow-list, or maps to no column
    InvalidField { field: String },
    /// The predicate is unknown, or not allowed on this field
    InvalidPredicate { field: String, predicate: String },
    /// The order field is not in the allow-list, or maps to no column
    InvalidOrderField { field: String },
    /// The order direction is not a known token
    InvalidDirection { field: String, direction: String },
    /// The value cannot be used with this predicate (e.g. `in` without an array)
    InvalidValue { field: String, predicate: String },
}

impl TranslationError {
    /// The client field the error is about, if any.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidField { field }
            | Self::InvalidPredicate { field, .. }
            | Self::InvalidOrderField { field }
            | Self::InvalidDirection { field, .. }
            | Self::InvalidValue { field, .. } => field,
        }
    }
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidField { field } => write!(f, "invalid field: {field}"),
            Self::InvalidPredicate { predicate, .. } => write!(f, "invalid predicate: {predicate}"),
            Self::InvalidOrderField { field } => write!(f, "invalid order field: {field}"),
            Self::InvalidDirection { direction, .. } => {
                write!(f, "invalid order direction: {direction}")
            }
            Self::InvalidValue { field, predicate } => {
                write!(f, "invalid value for field {field} with predicate {predicate}")
            }
        }
    }
}

impl std::error::Error for TranslationError {}
