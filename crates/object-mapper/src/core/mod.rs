//! Core abstractions for rule-based object mapping.
//!
//! This module provides the foundational types used throughout the engine:
//!
//! - [`value`]: the dynamically typed value tree and dotted-path lookup
//! - [`schema`]: static type descriptors (properties, constructor parameters)
//! - [`traits`]: the mapped-object and directive-source collaborator traits
//! - [`catalog`]: explicit type registry consumed by builder and factory

pub mod catalog;
pub mod schema;
pub mod traits;
pub mod value;

// Re-export commonly used types for convenience
pub use catalog::{MapFactory, TypeCatalog};
pub use schema::{ConstructorParam, PropertySchema, TypeSchema, ValueKind};
pub use traits::{
    DirectiveSource, Mapped, NullDirectiveSource, PropertyDirectives, StaticDirectiveSource,
};
pub use value::{lookup_path, Value, ValueMap};

/// Sentinel source-type name for raw key/value input.
pub const MAP_TYPE: &str = "map";
