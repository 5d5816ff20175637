//! # Engine Configuration
//!
//! Everything the request pipeline needs besides the schema itself is carried by an
//! [`EngineConfig`]: the custom validation rules, the named value conversions and the
//! safety [`Limits`]. A config is built once while routes are registered and is then
//! shared read-only (usually behind an `Arc`) by every request.
//!
//! ```rust,ignore
//! use crudgate::{EngineConfig, Limits, validation::{RuleRegistry, rules}};
//!
//! let config = EngineConfig::new()
//!     .with_rules(RuleRegistry::with_builtins().register("username", rules::length(3, 32)))
//!     .with_limits(Limits::default().max_depth(8));
//! ```

use crate::conversion::ConversionRegistry;
use crate::validation::RuleRegistry;

// Basic safety limits
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
const DEFAULT_MAX_KEY_LENGTH: usize = 100;
const DEFAULT_MAX_DEPTH: usize = 32;

/// Size and depth limits applied to untrusted request data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
    /// Longest accepted key (query, header, cookie or body object key).
    pub max_key_length: usize,
    /// Deepest nesting the picker and validator will walk into.
    pub max_depth: usize,
}

impl Limits {
    #[must_use]
    pub const fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    #[must_use]
    pub const fn max_key_length(mut self, length: usize) -> Self {
        self.max_key_length = length;
        self
    }

    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_key_length: DEFAULT_MAX_KEY_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Injected configuration for schema validation and the request pipeline.
///
/// There is no process-wide registry: two handlers built from two configs never see
/// each other's rules.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub rules: RuleRegistry,
    pub conversions: ConversionRegistry,
    pub limits: Limits,
}

impl EngineConfig {
    /// Config with the built-in rules and conversions and default limits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RuleRegistry::with_builtins(),
            conversions: ConversionRegistry::with_builtins(),
            limits: Limits::default(),
        }
    }

    /// Config with no rules or conversions registered at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: RuleRegistry::new(),
            conversions: ConversionRegistry::new(),
            limits: Limits::default(),
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_conversions(mut self, conversions: ConversionRegistry) -> Self {
        self.conversions = conversions;
        self
    }

    #[must_use]
    pub const fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
