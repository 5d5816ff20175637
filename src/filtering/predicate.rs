use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::TranslationError;

/// Comparison operators accepted in client filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Predicate {
    /// Equality (`=`, `eq`)
    Equal,
    /// Not equal (`!=`, `ne`)
    NotEqual,
    /// Greater than (`>`, `gt`)
    Greater,
    /// Greater than or equal (`>=`, `ge`)
    GreaterOrEqual,
    /// Less than (`<`, `lt`)
    Less,
    /// Less than or equal (`<=`, `le`)
    LessOrEqual,
    /// Set membership (`in`)
    In,
    /// Set exclusion (`not_in`)
    NotIn,
}

impl Predicate {
    pub const ALL: [Self; 8] = [
        Self::Equal,
        Self::NotEqual,
        Self::Greater,
        Self::GreaterOrEqual,
        Self::Less,
        Self::LessOrEqual,
        Self::In,
        Self::NotIn,
    ];

    /// Parse a client token, ignoring ASCII case. Exactly fourteen spellings are known.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "=" | "eq" => Some(Self::Equal),
            "!=" | "ne" => Some(Self::NotEqual),
            ">" | "gt" => Some(Self::Greater),
            ">=" | "ge" => Some(Self::GreaterOrEqual),
            "<" | "lt" => Some(Self::Less),
            "<=" | "le" => Some(Self::LessOrEqual),
            "in" => Some(Self::In),
            "not_in" => Some(Self::NotIn),
            _ => None,
        }
    }

    /// The symbolic spelling; set predicates have only their word form.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::In => "in",
            Self::NotIn => "not_in",
        }
    }

    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Equal => "eq",
            Self::NotEqual => "ne",
            Self::Greater => "gt",
            Self::GreaterOrEqual => "ge",
            Self::Less => "lt",
            Self::LessOrEqual => "le",
            Self::In => "in",
            Self::NotIn => "not_in",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Predicate {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TranslationError::InvalidPredicate {
            field: String::new(),
            predicate: s.to_string(),
        })
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.mnemonic())
    }
}

impl<'de> Deserialize<'de> for Predicate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::parse(&token)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid predicate: {token}")))
    }
}

/// The predicates one filterable field accepts.
///
/// ```rust,ignore
/// let status = PredicateSet::ONLY_EQUAL;
/// let age = PredicateSet::ONLY_GREATER.union(PredicateSet::ONLY_LESS);
/// assert!(age.contains(Predicate::GreaterOrEqual));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PredicateSet(u8);

impl PredicateSet {
    pub const EMPTY: Self = Self(0);
    pub const ONLY_EQUAL: Self = Self(Predicate::Equal.bit());
    pub const EQUAL_AND_NOT_EQUAL: Self = Self(Predicate::Equal.bit() | Predicate::NotEqual.bit());
    pub const ONLY_GREATER: Self = Self(Predicate::Greater.bit() | Predicate::GreaterOrEqual.bit());
    pub const ONLY_LESS: Self = Self(Predicate::Less.bit() | Predicate::LessOrEqual.bit());
    pub const ONLY_IN_AND_NOT_IN: Self = Self(Predicate::In.bit() | Predicate::NotIn.bit());
    pub const ALL: Self = Self(u8::MAX);

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn with(self, predicate: Predicate) -> Self {
        Self(self.0 | predicate.bit())
    }

    #[must_use]
    pub const fn contains(self, predicate: Predicate) -> bool {
        self.0 & predicate.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Predicate> {
        Predicate::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl FromIterator<Predicate> for PredicateSet {
    fn from_iter<I: IntoIterator<Item = Predicate>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl From<Predicate> for PredicateSet {
    fn from(predicate: Predicate) -> Self {
        Self::EMPTY.with(predicate)
    }
}

impl fmt::Debug for PredicateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
