//! # object-mapper
//!
//! Rule-based object mapping library.
//!
//! This library turns an arbitrary source value (raw map, mapped object, or
//! another described type) into a destination type, guided by per-property
//! rules discovered from three sources:
//!
//! - **Fluent configuration** via `create_map` / profiles
//! - **Declarative directives** supplied by an external extractor
//! - **Naming-convention inference** with confidence scoring
//!
//! Resolved rule sets are cached per (source type, destination type) pair
//! with interchangeable backends: process-local, process-wide shared, or
//! file-backed persistent.
//!
//! ## Example
//!
//! ```rust,ignore
//! use object_mapper::{MappingEngine, SourceValue, TypeCatalog};
//!
//! let catalog = TypeCatalog::new();
//! catalog.register::<UserDto>();
//!
//! let engine = MappingEngine::new(catalog);
//! let user: UserDto = engine.map(&SourceValue::Map(row))?;
//! ```

pub mod cache;
pub mod config;
pub mod convention;
pub mod core;
pub mod engine;
pub mod error;
pub mod factory;
pub mod mapping;
pub mod transform;

// Re-exports for convenient access
pub use cache::{LocalCache, MappingCache, PersistentCache, SharedCache};
pub use config::{CacheBackendKind, MapperOptions};
pub use convention::{ConventionMapper, ConventionRegistry, NamingConvention};
pub use crate::core::{
    DirectiveSource, Mapped, PropertyDirectives, TypeCatalog, TypeSchema, Value, ValueMap,
};
pub use engine::{MappingEngine, SourceValue};
pub use error::{MapperError, Result};
pub use factory::{ObjectFactory, PopulateMode};
pub use mapping::{
    BidirectionalTypeMapping, Condition, MappingConfiguration, MappingProfile, PropertyMapping,
    Transformer, TypeMapping,
};
pub use transform::DataTransformer;
