//! Property rules, transformer/condition variants, and the fluent
//! per-property builder.
//!
//! Transformers and conditions are tagged variants resolved once at
//! configuration-build time: the `Named` form looks itself up in the
//! [`TransformerRegistry`] and is replaced by the registered callable, so
//! transformation never probes callable shapes per invocation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::core::value::{Value, ValueMap};
use crate::error::Result;

/// One-argument transformer callable.
pub type SimpleFn = dyn Fn(Value) -> Result<Value> + Send + Sync;

/// Two-argument transformer callable receiving the full source map.
pub type ContextFn = dyn Fn(Value, &ValueMap) -> Result<Value> + Send + Sync;

/// Condition predicate over the full source map.
pub type PredicateFn = dyn Fn(&ValueMap) -> bool + Send + Sync;

/// A value transformer attached to a property rule.
#[derive(Clone)]
pub enum Transformer {
    /// Plain `Value -> Value` function.
    Simple(Arc<SimpleFn>),

    /// Function receiving the value and the full source map.
    WithContext(Arc<ContextFn>),

    /// Reference to a registered transformer, resolved at
    /// configuration-build time.
    Named(String),
}

impl Transformer {
    /// Wrap a plain function.
    pub fn simple<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Transformer::Simple(Arc::new(f))
    }

    /// Wrap a context-aware function.
    pub fn with_context<F>(f: F) -> Self
    where
        F: Fn(Value, &ValueMap) -> Result<Value> + Send + Sync + 'static,
    {
        Transformer::WithContext(Arc::new(f))
    }

    /// Reference a registered transformer by name.
    pub fn named(name: impl Into<String>) -> Self {
        Transformer::Named(name.into())
    }

    /// Apply the transformer to a resolved value.
    ///
    /// Errors from user-supplied callables propagate unmodified. An
    /// unresolved `Named` variant should not survive configuration building;
    /// if one does, the value passes through untouched.
    pub fn apply(&self, value: Value, context: &ValueMap) -> Result<Value> {
        match self {
            Transformer::Simple(f) => f(value),
            Transformer::WithContext(f) => f(value, context),
            Transformer::Named(name) => {
                warn!(transformer = %name, "unresolved named transformer, passing value through");
                Ok(value)
            }
        }
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transformer::Simple(_) => f.write_str("Transformer::Simple"),
            Transformer::WithContext(_) => f.write_str("Transformer::WithContext"),
            Transformer::Named(name) => write!(f, "Transformer::Named({name})"),
        }
    }
}

impl PartialEq for Transformer {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Transformer::Named(a), Transformer::Named(b)) => a == b,
            (Transformer::Simple(a), Transformer::Simple(b)) => Arc::ptr_eq(a, b),
            (Transformer::WithContext(a), Transformer::WithContext(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A condition gating a property rule.
#[derive(Clone)]
pub enum Condition {
    /// Predicate over the full source map.
    Predicate(Arc<PredicateFn>),

    /// Reference to a registered condition, resolved at
    /// configuration-build time.
    Named(String),
}

impl Condition {
    /// Wrap a predicate function.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&ValueMap) -> bool + Send + Sync + 'static,
    {
        Condition::Predicate(Arc::new(f))
    }

    /// Reference a registered condition by name.
    pub fn named(name: impl Into<String>) -> Self {
        Condition::Named(name.into())
    }

    /// Evaluate the condition against the source map.
    ///
    /// An unresolved `Named` variant passes (returns true) so a stale
    /// reference degrades to plain mapping rather than dropping values.
    #[must_use]
    pub fn evaluate(&self, source: &ValueMap) -> bool {
        match self {
            Condition::Predicate(f) => f(source),
            Condition::Named(name) => {
                warn!(condition = %name, "unresolved named condition, treating as passed");
                true
            }
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Predicate(_) => f.write_str("Condition::Predicate"),
            Condition::Named(name) => write!(f, "Condition::Named({name})"),
        }
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Condition::Named(a), Condition::Named(b)) => a == b,
            (Condition::Predicate(a), Condition::Predicate(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Registry of named transformers and conditions.
///
/// Named references in fluent configuration, directives, and rehydrated
/// persistent-cache entries resolve against this registry once, when the
/// configuration is built.
#[derive(Default)]
pub struct TransformerRegistry {
    transformers: RwLock<HashMap<String, Transformer>>,
    conditions: RwLock<HashMap<String, Condition>>,
}

impl TransformerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transformer under a name.
    pub fn register_transformer(&self, name: impl Into<String>, transformer: Transformer) {
        self.transformers.write().insert(name.into(), transformer);
    }

    /// Register a condition under a name.
    pub fn register_condition(&self, name: impl Into<String>, condition: Condition) {
        self.conditions.write().insert(name.into(), condition);
    }

    /// Resolve a transformer: named references are replaced by their
    /// registered callable; unknown names are dropped with a warning.
    #[must_use]
    pub fn resolve_transformer(&self, transformer: Transformer) -> Option<Transformer> {
        match transformer {
            Transformer::Named(name) => {
                let resolved = self.transformers.read().get(&name).cloned();
                if resolved.is_none() {
                    warn!(transformer = %name, "unknown named transformer, dropping from rule");
                }
                resolved
            }
            other => Some(other),
        }
    }

    /// Resolve a condition, dropping unknown named references with a warning.
    #[must_use]
    pub fn resolve_condition(&self, condition: Condition) -> Option<Condition> {
        match condition {
            Condition::Named(name) => {
                let resolved = self.conditions.read().get(&name).cloned();
                if resolved.is_none() {
                    warn!(condition = %name, "unknown named condition, dropping from rule");
                }
                resolved
            }
            other => Some(other),
        }
    }
}

/// Resolved rule for one destination property.
///
/// Immutable once part of a cached configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRule {
    /// Source key, possibly a dotted path.
    pub source_key: String,

    /// Transformer applied after value resolution.
    pub transformer: Option<Transformer>,

    /// Condition gating the property.
    pub condition: Option<Condition>,

    /// Default value substituted for null results and failed conditions.
    pub default: Option<Value>,

    /// Whether a default was declared.
    pub has_default: bool,

    /// Skip the property entirely.
    pub ignore: bool,
}

impl PropertyRule {
    /// Rule that looks up the destination property's own name.
    pub fn same_name(name: impl Into<String>) -> Self {
        Self {
            source_key: name.into(),
            transformer: None,
            condition: None,
            default: None,
            has_default: false,
            ignore: false,
        }
    }
}

/// Fluent builder for one destination property's rule.
///
/// Mutable while being configured; becomes part of an immutable
/// [`PropertyRule`] when the owning configuration is built.
#[derive(Debug, Clone, Default)]
pub struct PropertyMapping {
    source: Option<String>,
    transformer: Option<Transformer>,
    condition: Option<Condition>,
    default: Option<Value>,
    has_default: bool,
    ignore: bool,
}

impl PropertyMapping {
    /// Create an empty property mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the property from `source_key` (may be a dotted path).
    #[must_use]
    pub fn map_from(mut self, source_key: impl Into<String>) -> Self {
        self.source = Some(source_key.into());
        self
    }

    /// Apply a transformer to the resolved value.
    #[must_use]
    pub fn using(mut self, transformer: Transformer) -> Self {
        self.transformer = Some(transformer);
        self
    }

    /// Gate the property on a condition.
    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Substitute `value` when the resolved value is null or the condition
    /// fails.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self.has_default = true;
        self
    }

    /// Skip the property entirely.
    #[must_use]
    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Explicit source key, if one was set.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Seed a mapping from an existing rule (used when reversing maps).
    pub fn from_rule(rule: &PropertyRule) -> Self {
        Self {
            source: Some(rule.source_key.clone()),
            transformer: rule.transformer.clone(),
            condition: rule.condition.clone(),
            default: rule.default.clone(),
            has_default: rule.has_default,
            ignore: rule.ignore,
        }
    }

    /// Resolve into an immutable rule for `dest_name`.
    ///
    /// Named transformer/condition references are looked up in the registry
    /// here, once; unknown names are dropped defensively.
    pub fn into_rule(self, dest_name: &str, registry: &TransformerRegistry) -> PropertyRule {
        PropertyRule {
            source_key: self.source.unwrap_or_else(|| dest_name.to_string()),
            transformer: self.transformer.and_then(|t| registry.resolve_transformer(t)),
            condition: self.condition.and_then(|c| registry.resolve_condition(c)),
            default: self.default,
            has_default: self.has_default,
            ignore: self.ignore,
        }
    }
}
