//! Core traits at the engine's collaborator boundaries.
//!
//! - [`Mapped`]: the mapped-object capability. Types implementing it convert
//!   themselves to and from value maps, and the engine prefers their own
//!   factory over generic construction.
//! - [`DirectiveSource`]: supplies the already-extracted per-property
//!   directives (ignore, explicit source, transformer, condition, default,
//!   collection item type). How they were declared is not this crate's
//!   concern; the engine consumes them as opaque data.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::core::value::{Value, ValueMap};
use crate::error::Result;
use crate::mapping::rule::{Condition, Transformer};

use super::schema::TypeSchema;

/// A type that can describe itself and convert to/from a value map.
///
/// Implementations register through
/// [`TypeCatalog::register`](super::catalog::TypeCatalog::register), which
/// stores both the schema and a map factory built from `from_map`/`to_map`.
pub trait Mapped: Sized {
    /// Type name used in mapping cache keys and error messages.
    fn type_name() -> &'static str;

    /// Static descriptor of the type's properties and constructor.
    fn schema() -> TypeSchema;

    /// Build an instance from a value map.
    fn from_map(map: &ValueMap) -> Result<Self>;

    /// Flatten the instance into a value map.
    fn to_map(&self) -> ValueMap;
}

/// Per-property directives extracted by an external declaration processor.
#[derive(Debug, Clone, Default)]
pub struct PropertyDirectives {
    /// Skip the property entirely.
    pub ignore: bool,

    /// Explicit source key (may be a dotted path).
    pub source: Option<String>,

    /// Transformer applied after value resolution.
    pub transformer: Option<Transformer>,

    /// Condition gating the property.
    pub condition: Option<Condition>,

    /// Default value substituted for null results or failed conditions.
    pub default: Option<Value>,

    /// Whether `default` was declared (a declared null default is distinct
    /// from no default).
    pub has_default: bool,

    /// Whether the property is a collection of mapped items.
    pub is_collection: bool,

    /// Item type name for collection properties.
    pub collection_item_type: Option<String>,
}

/// Supplies declarative per-property directives for destination types.
///
/// This is the boundary to the attribute/declaration extractor collaborator.
/// The default [`NullDirectiveSource`] yields nothing; tests and embedders
/// use [`StaticDirectiveSource`] to register directives explicitly.
pub trait DirectiveSource: Send + Sync {
    /// Directives for one destination property, if any were declared.
    fn property_directives(&self, dest_type: &str, property: &str) -> Option<PropertyDirectives>;
}

/// Directive source with no declarations.
#[derive(Debug, Default)]
pub struct NullDirectiveSource;

impl DirectiveSource for NullDirectiveSource {
    fn property_directives(&self, _dest_type: &str, _property: &str) -> Option<PropertyDirectives> {
        None
    }
}

/// Directive source backed by explicit registration.
#[derive(Default)]
pub struct StaticDirectiveSource {
    entries: RwLock<HashMap<(String, String), PropertyDirectives>>,
}

impl StaticDirectiveSource {
    /// Create an empty directive source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register directives for a (destination type, property) pair.
    pub fn set(
        &self,
        dest_type: impl Into<String>,
        property: impl Into<String>,
        directives: PropertyDirectives,
    ) {
        self.entries
            .write()
            .insert((dest_type.into(), property.into()), directives);
    }
}

impl DirectiveSource for StaticDirectiveSource {
    fn property_directives(&self, dest_type: &str, property: &str) -> Option<PropertyDirectives> {
        self.entries
            .read()
            .get(&(dest_type.to_string(), property.to_string()))
            .cloned()
    }
}
