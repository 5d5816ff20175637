//! Startup-time consistency check of a field tree.

use std::collections::HashSet;
use std::fmt;

use super::{ApiField, ApiFields, Source};
use crate::config::EngineConfig;
use crate::request::is_valid_key;

/// A field tree that cannot be served. Raised while routes are wired, never per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A `validate` entry names no registered rule
    UnknownRule { path: String, rule: String },
    /// The `convert` entry names no registered conversion
    UnknownConversion { path: String, conversion: String },
    /// An api name or alias is empty or uses characters the picker would drop
    InvalidName { path: String, name: String },
    /// Two siblings share an api name or alias
    DuplicateName { path: String, name: String },
    /// A nested field also lists scalar rules
    NestedWithRules { path: String },
    /// A nested field reads from somewhere other than the body
    NestedSource { path: String, source: Source },
    /// A nested field whose subtree declares nothing
    EmptyNested { path: String },
    /// A nested field typed as a scalar
    NestedType { path: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRule { path, rule } => {
                write!(f, "field {path:?}: unknown validation rule {rule:?}")
            }
            Self::UnknownConversion { path, conversion } => {
                write!(f, "field {path:?}: unknown conversion {conversion:?}")
            }
            Self::InvalidName { path, name } => {
                write!(f, "field {path:?}: invalid name {name:?}")
            }
            Self::DuplicateName { path, name } => {
                write!(f, "field {path:?}: name {name:?} is declared twice")
            }
            Self::NestedWithRules { path } => {
                write!(f, "field {path:?}: nested fields cannot carry validation rules")
            }
            Self::NestedSource { path, source } => {
                write!(f, "field {path:?}: nested fields must come from the body, not {source:?}")
            }
            Self::EmptyNested { path } => write!(f, "field {path:?}: nested field list is empty"),
            Self::NestedType { path } => {
                write!(f, "field {path:?}: nested fields must be typed Any, Object or Array")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

impl ApiFields {
    /// Check the whole tree against `config`, stopping at the first problem.
    pub fn validate(&self, config: &EngineConfig) -> Result<(), SchemaError> {
        check_level(self, "", config)
    }

    /// Like [`validate`](Self::validate), for startup wiring.
    ///
    /// # Panics
    ///
    /// Panics with the schema error when the tree is inconsistent.
    pub fn must_validate(&self, config: &EngineConfig) {
        if let Err(err) = self.validate(config) {
            tracing::error!(error = %err, "Invalid api field schema");
            panic!("invalid api field schema: {err}");
        }
    }
}

pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn check_level(fields: &ApiFields, parent: &str, config: &EngineConfig) -> Result<(), SchemaError> {
    let max_key = config.limits.max_key_length;
    let mut seen: HashSet<&str> = HashSet::new();

    for field in fields {
        let path = join_path(parent, field.api_name());

        for name in std::iter::once(field.api_name()).chain(field.alias()) {
            if !is_valid_key(name, max_key) {
                return Err(SchemaError::InvalidName {
                    path,
                    name: name.to_string(),
                });
            }
        }

        // A field may alias itself; anything else clashing among siblings is a defect.
        let mut names = vec![field.api_name()];
        if let Some(alias) = field.alias().filter(|alias| *alias != field.api_name()) {
            names.push(alias);
        }
        for name in names {
            if !seen.insert(name) {
                return Err(SchemaError::DuplicateName {
                    path,
                    name: name.to_string(),
                });
            }
        }

        if let Some(conversion) = field.convert()
            && !config.conversions.contains(conversion)
        {
            return Err(SchemaError::UnknownConversion {
                path,
                conversion: conversion.to_string(),
            });
        }

        match field.nested() {
            Some(nested) => check_nested(field, nested, &path, config)?,
            None => {
                if let Err(rule) = config.rules.resolve(field.validate()) {
                    return Err(SchemaError::UnknownRule {
                        path,
                        rule: rule.to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}

fn check_nested(
    field: &ApiField,
    nested: &ApiFields,
    path: &str,
    config: &EngineConfig,
) -> Result<(), SchemaError> {
    if !field.validate().is_empty() {
        return Err(SchemaError::NestedWithRules {
            path: path.to_string(),
        });
    }
    if field.source() != Source::Body {
        return Err(SchemaError::NestedSource {
            path: path.to_string(),
            source: field.source(),
        });
    }
    if !field.field_type().allows_nested() {
        return Err(SchemaError::NestedType {
            path: path.to_string(),
        });
    }
    if nested.is_empty() {
        return Err(SchemaError::EmptyNested {
            path: path.to_string(),
        });
    }
    check_level(nested, path, config)
}
