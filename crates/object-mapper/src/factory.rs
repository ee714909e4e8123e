//! Generic instance construction from transformed value maps.
//!
//! The factory builds a destination instance's field map by walking the
//! type's constructor parameters in declaration order, consuming matching
//! data keys, and defaulting the rest (declared default, null when nullable,
//! or a type-appropriate zero value). Leftover data is then populated onto
//! writable properties under the configured [`PopulateMode`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::catalog::TypeCatalog;
use crate::core::schema::{TypeSchema, ValueKind};
use crate::core::value::{Value, ValueMap};
use crate::error::{MapperError, Result};

/// Recursion limit for zero-value synthesis of nested object parameters.
const MAX_ZERO_DEPTH: usize = 8;

/// Policy for writing leftover data onto properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulateMode {
    /// Skip unknown and non-writable properties silently.
    ///
    /// Write-once fields are left alone rather than treated as errors.
    #[default]
    BestEffort,

    /// Fail on the first property that cannot be written.
    Strict,
}

/// Builds and populates destination value maps from transformed data.
pub struct ObjectFactory {
    catalog: Arc<TypeCatalog>,
    mode: PopulateMode,
}

impl ObjectFactory {
    /// Create a factory over the given catalog and population policy.
    pub fn new(catalog: Arc<TypeCatalog>, mode: PopulateMode) -> Self {
        Self { catalog, mode }
    }

    /// Active population policy.
    #[must_use]
    pub fn mode(&self) -> PopulateMode {
        self.mode
    }

    /// Change the population policy.
    pub fn set_mode(&mut self, mode: PopulateMode) {
        self.mode = mode;
    }

    /// Construct an instance field map for `dest_type` from transformed data.
    ///
    /// Fails only when the destination type is not registered; absent
    /// constructor parameters never fail, they default.
    pub fn create(&self, data: ValueMap, dest_type: &str) -> Result<ValueMap> {
        self.create_at_depth(data, dest_type, 0)
    }

    fn create_at_depth(&self, mut data: ValueMap, dest_type: &str, depth: usize) -> Result<ValueMap> {
        let schema = self.catalog.resolve(dest_type)?;
        let mut instance = ValueMap::new();

        if let Some(params) = &schema.constructor {
            for param in params {
                let value = match data.shift_remove(&param.name) {
                    Some(value) => value,
                    None => match &param.default {
                        Some(default) => default.clone(),
                        None if param.nullable => Value::Null,
                        None => self.zero_value(&param.kind, depth),
                    },
                };
                instance.insert(param.name.clone(), value);
            }
        }

        self.populate_map(&mut instance, data, &schema)?;
        Ok(instance)
    }

    /// Populate an existing instance's field map with transformed data,
    /// without construction.
    pub fn populate(&self, instance: &mut ValueMap, data: ValueMap, dest_type: &str) -> Result<()> {
        let schema = self.catalog.resolve(dest_type)?;
        self.populate_map(instance, data, &schema)
    }

    fn populate_map(
        &self,
        instance: &mut ValueMap,
        data: ValueMap,
        schema: &TypeSchema,
    ) -> Result<()> {
        for (key, value) in data {
            match schema.property(&key) {
                Some(prop) if prop.writable => {
                    instance.insert(key, value);
                }
                Some(_) => {
                    if self.mode == PopulateMode::Strict {
                        return Err(MapperError::construction(
                            &schema.name,
                            format!("property {key} is not writable"),
                        ));
                    }
                    trace!(property = %key, "skipping non-writable property");
                }
                None => {
                    if self.mode == PopulateMode::Strict {
                        return Err(MapperError::construction(
                            &schema.name,
                            format!("unknown property {key}"),
                        ));
                    }
                    trace!(property = %key, "skipping unknown property");
                }
            }
        }
        Ok(())
    }

    /// Type-appropriate zero value for a missing constructor parameter.
    fn zero_value(&self, kind: &ValueKind, depth: usize) -> Value {
        match kind {
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::String => Value::String(String::new()),
            ValueKind::Array => Value::Array(Vec::new()),
            ValueKind::Map => Value::Map(ValueMap::new()),
            ValueKind::Object(type_name) => {
                if depth >= MAX_ZERO_DEPTH {
                    return Value::Null;
                }
                // Best-effort default-constructed instance; unresolvable
                // types degrade to null.
                self.create_at_depth(ValueMap::new(), type_name, depth + 1)
                    .map_or(Value::Null, Value::Map)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{ConstructorParam, PropertySchema};

    fn catalog() -> Arc<TypeCatalog> {
        let catalog = TypeCatalog::new();
        catalog.register_schema(
            TypeSchema::new("User")
                .with_property(PropertySchema::new("id", ValueKind::Int))
                .with_property(PropertySchema::new("age", ValueKind::Int))
                .with_property(PropertySchema::new("nickname", ValueKind::String).nullable())
                .with_property(PropertySchema::new("created_at", ValueKind::String).write_once())
                .with_constructor(vec![
                    ConstructorParam::new("id", ValueKind::Int),
                    ConstructorParam::new("age", ValueKind::Int),
                    ConstructorParam::new("nickname", ValueKind::String).nullable(),
                ]),
        );
        catalog.register_schema(
            TypeSchema::new("Bag").with_property(PropertySchema::new("items", ValueKind::Array)),
        );
        Arc::new(catalog)
    }

    fn data(pairs: &[(&str, Value)]) -> ValueMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_constructor_consumes_data() {
        let factory = ObjectFactory::new(catalog(), PopulateMode::BestEffort);
        let out = factory
            .create(data(&[("id", Value::from(7)), ("age", Value::from(30))]), "User")
            .unwrap();
        assert_eq!(out.get("id"), Some(&Value::Int(7)));
        assert_eq!(out.get("age"), Some(&Value::Int(30)));
    }

    #[test]
    fn test_missing_int_param_defaults_to_zero() {
        let factory = ObjectFactory::new(catalog(), PopulateMode::BestEffort);
        let out = factory.create(data(&[("id", Value::from(7))]), "User").unwrap();
        assert_eq!(out.get("age"), Some(&Value::Int(0)));
    }

    #[test]
    fn test_missing_nullable_param_defaults_to_null() {
        let factory = ObjectFactory::new(catalog(), PopulateMode::BestEffort);
        let out = factory.create(ValueMap::new(), "User").unwrap();
        assert_eq!(out.get("nickname"), Some(&Value::Null));
    }

    #[test]
    fn test_declared_default_beats_zero_value() {
        let catalog = TypeCatalog::new();
        catalog.register_schema(
            TypeSchema::new("Widget")
                .with_property(PropertySchema::new("size", ValueKind::Int))
                .with_constructor(vec![
                    ConstructorParam::new("size", ValueKind::Int).with_default(Value::Int(10)),
                ]),
        );
        let factory = ObjectFactory::new(Arc::new(catalog), PopulateMode::BestEffort);
        let out = factory.create(ValueMap::new(), "Widget").unwrap();
        assert_eq!(out.get("size"), Some(&Value::Int(10)));
    }

    #[test]
    fn test_leftover_data_populates_writable_fields() {
        let factory = ObjectFactory::new(catalog(), PopulateMode::BestEffort);
        let out = factory
            .create(
                data(&[
                    ("id", Value::from(1)),
                    ("created_at", Value::from("2024-01-01")),
                    ("unknown", Value::from("dropped")),
                ]),
                "User",
            )
            .unwrap();
        // Write-once and unknown fields are skipped, not errors.
        assert!(!out.contains_key("created_at"));
        assert!(!out.contains_key("unknown"));
    }

    #[test]
    fn test_strict_mode_fails_on_non_writable() {
        let factory = ObjectFactory::new(catalog(), PopulateMode::Strict);
        let err = factory
            .create(
                data(&[("created_at", Value::from("2024-01-01"))]),
                "User",
            )
            .unwrap_err();
        assert!(matches!(err, MapperError::ConstructionFailure { .. }));
    }

    #[test]
    fn test_no_constructor_populates_directly() {
        let factory = ObjectFactory::new(catalog(), PopulateMode::BestEffort);
        let out = factory
            .create(data(&[("items", Value::Array(vec![Value::from(1)]))]), "Bag")
            .unwrap();
        assert_eq!(out.get("items"), Some(&Value::Array(vec![Value::Int(1)])));
    }

    #[test]
    fn test_populate_existing_instance() {
        let factory = ObjectFactory::new(catalog(), PopulateMode::BestEffort);
        let mut instance = data(&[("id", Value::from(1)), ("age", Value::from(20))]);
        factory
            .populate(&mut instance, data(&[("age", Value::from(21))]), "User")
            .unwrap();
        assert_eq!(instance.get("age"), Some(&Value::Int(21)));
        assert_eq!(instance.get("id"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_unknown_destination_fails() {
        let factory = ObjectFactory::new(catalog(), PopulateMode::BestEffort);
        let err = factory.create(ValueMap::new(), "Ghost").unwrap_err();
        assert!(matches!(err, MapperError::DestinationNotFound(_)));
    }

    #[test]
    fn test_object_zero_value() {
        let catalog = TypeCatalog::new();
        catalog.register_schema(
            TypeSchema::new("Inner")
                .with_property(PropertySchema::new("n", ValueKind::Int))
                .with_constructor(vec![ConstructorParam::new("n", ValueKind::Int)]),
        );
        catalog.register_schema(
            TypeSchema::new("Outer")
                .with_property(PropertySchema::new("inner", ValueKind::Object("Inner".into())))
                .with_constructor(vec![ConstructorParam::new(
                    "inner",
                    ValueKind::Object("Inner".into()),
                )]),
        );

        let factory = ObjectFactory::new(Arc::new(catalog), PopulateMode::BestEffort);
        let out = factory.create(ValueMap::new(), "Outer").unwrap();
        let Some(Value::Map(inner)) = out.get("inner") else {
            panic!("expected nested zero instance")
        };
        assert_eq!(inner.get("n"), Some(&Value::Int(0)));
    }
}
