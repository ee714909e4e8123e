//! Type catalog for explicit schema registration.
//!
//! The [`TypeCatalog`] is the registry of every type the engine can map to
//! or introspect. Unlike runtime reflection, it is explicitly populated and
//! injected into the engine, giving deterministic initialization and easy
//! test setup.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::value::ValueMap;
use crate::error::{MapperError, Result};

use super::schema::TypeSchema;
use super::traits::Mapped;

/// Factory closure for the mapped-object capability: builds and canonicalizes
/// an instance's value map from transformed data.
pub type MapFactory = dyn Fn(&ValueMap) -> Result<ValueMap> + Send + Sync;

/// Registry of type schemas and mapped-object factories.
///
/// Writers are expected at startup and in tests; lookups dominate afterwards,
/// so both tables sit behind read/write locks.
#[derive(Default)]
pub struct TypeCatalog {
    /// Registered schemas by type name.
    schemas: RwLock<HashMap<String, Arc<TypeSchema>>>,

    /// Mapped-object factories by type name.
    factories: RwLock<HashMap<String, Arc<MapFactory>>>,
}

impl TypeCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type by its schema alone.
    ///
    /// Types registered this way are constructed generically by the
    /// object factory (constructor defaulting plus field population).
    pub fn register_schema(&self, schema: TypeSchema) {
        self.schemas
            .write()
            .insert(schema.name.clone(), Arc::new(schema));
    }

    /// Register a [`Mapped`] type: its schema plus a factory that delegates
    /// construction to the type's own `from_map`.
    pub fn register<T: Mapped + 'static>(&self) {
        let schema = T::schema();
        self.register_schema(schema);
        self.factories.write().insert(
            T::type_name().to_string(),
            Arc::new(|map: &ValueMap| {
                let instance = T::from_map(map)?;
                Ok(instance.to_map())
            }),
        );
    }

    /// Look up a schema, or `None` if the type is unknown.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<Arc<TypeSchema>> {
        self.schemas.read().get(type_name).cloned()
    }

    /// Resolve a schema, failing with `DestinationNotFound` for unknown types.
    pub fn resolve(&self, type_name: &str) -> Result<Arc<TypeSchema>> {
        self.get(type_name)
            .ok_or_else(|| MapperError::DestinationNotFound(type_name.to_string()))
    }

    /// Look up the mapped-object factory for a type, if it has one.
    #[must_use]
    pub fn factory(&self, type_name: &str) -> Option<Arc<MapFactory>> {
        self.factories.read().get(type_name).cloned()
    }

    /// Check whether a type is registered.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.schemas.read().contains_key(type_name)
    }
}
