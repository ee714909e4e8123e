//! The mapping engine: normalization, configuration lookup, transformation,
//! and construction wired into one pipeline.
//!
//! `map` produces a new destination instance, `map_to` populates an existing
//! one, and `map_array` maps element-wise with fail-fast semantics. Types
//! implementing [`Mapped`] construct through their own `from_map`; everything
//! else goes through the generic [`ObjectFactory`].

use std::sync::Arc;

use tracing::debug;

use crate::cache::{LocalCache, MappingCache, PersistentCache, SharedCache};
use crate::config::{CacheBackendKind, MapperOptions};
use crate::convention::NamingConvention;
use crate::core::catalog::TypeCatalog;
use crate::core::traits::{DirectiveSource, Mapped, NullDirectiveSource};
use crate::core::value::{Value, ValueMap};
use crate::core::MAP_TYPE;
use crate::error::{MapperError, Result};
use crate::factory::{ObjectFactory, PopulateMode};
use crate::mapping::builder::ConfigurationBuilder;
use crate::mapping::profile::MappingProfile;
use crate::mapping::rule::{Condition, PropertyMapping, Transformer, TransformerRegistry};
use crate::mapping::type_mapping::{BidirectionalTypeMapping, TypeMapping};
use crate::transform::DataTransformer;

/// A mapping input in one of the supported shapes.
///
/// Raw maps pass through normalization unchanged; mapped objects flatten via
/// their own `to_map`; scalar values are rejected as unsupported sources.
#[derive(Debug, Clone)]
pub enum SourceValue {
    /// Raw key/value input.
    Map(ValueMap),

    /// A dynamically typed value; only the map variant is a valid source.
    Value(Value),

    /// A flattened mapped object with its type name.
    Object {
        /// Source type name used for configuration lookup.
        type_name: String,
        /// Flattened public fields.
        fields: ValueMap,
    },
}

impl SourceValue {
    /// Capture a mapped object as a source.
    pub fn object<T: Mapped>(value: &T) -> Self {
        SourceValue::Object {
            type_name: T::type_name().to_string(),
            fields: value.to_map(),
        }
    }

    /// Source type name (or value kind) without normalizing.
    fn type_hint(&self) -> &str {
        match self {
            SourceValue::Map(_) => MAP_TYPE,
            SourceValue::Value(v) => v.kind_name(),
            SourceValue::Object { type_name, .. } => type_name,
        }
    }
}

impl From<ValueMap> for SourceValue {
    fn from(map: ValueMap) -> Self {
        SourceValue::Map(map)
    }
}

impl From<Value> for SourceValue {
    fn from(value: Value) -> Self {
        SourceValue::Value(value)
    }
}

/// Orchestrates the full mapping pipeline.
pub struct MappingEngine {
    catalog: Arc<TypeCatalog>,
    transformers: Arc<TransformerRegistry>,
    builder: ConfigurationBuilder,
    data_transformer: DataTransformer,
    factory: ObjectFactory,
}

impl MappingEngine {
    /// Create an engine over a type catalog with default collaborators:
    /// process-local cache, no declarative directives, conventions enabled.
    pub fn new(catalog: TypeCatalog) -> Self {
        let catalog = Arc::new(catalog);
        let transformers = Arc::new(TransformerRegistry::new());
        let builder = ConfigurationBuilder::new(
            Arc::clone(&catalog),
            Arc::new(LocalCache::new()),
            Arc::new(NullDirectiveSource),
            Arc::clone(&transformers),
        );
        let factory = ObjectFactory::new(Arc::clone(&catalog), PopulateMode::BestEffort);
        Self {
            catalog,
            transformers,
            builder,
            data_transformer: DataTransformer::new(),
            factory,
        }
    }

    /// Create an engine configured from validated [`MapperOptions`].
    pub fn with_options(catalog: TypeCatalog, options: MapperOptions) -> Result<Self> {
        options.validate()?;

        let mut engine = Self::new(catalog);
        let cache: Arc<dyn MappingCache> = match options.cache.backend {
            CacheBackendKind::Local => Arc::new(LocalCache::new()),
            CacheBackendKind::Shared => Arc::new(SharedCache::new()),
            CacheBackendKind::Persistent => match options.cache.path.as_ref() {
                Some(path) => Arc::new(PersistentCache::open(path)?),
                None => {
                    return Err(MapperError::Config(
                        "persistent cache backend requires cache.path".to_string(),
                    ))
                }
            },
        };
        engine.set_cache(cache);
        engine.use_conventions(options.conventions.enabled);
        engine.set_convention_threshold(options.conventions.threshold)?;
        engine.set_populate_mode(options.populate.mode);
        Ok(engine)
    }

    /// The engine's type catalog.
    #[must_use]
    pub fn catalog(&self) -> Arc<TypeCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Register a [`Mapped`] type with the catalog.
    pub fn register_type<T: Mapped + 'static>(&self) {
        self.catalog.register::<T>();
    }

    // ===== Mapping operations =====

    /// Map a source into a new instance of `D`.
    pub fn map<D: Mapped>(&self, source: &SourceValue) -> Result<D> {
        let fields = self.map_value(source, D::type_name())?;
        D::from_map(&fields)
            .map_err(|e| MapperError::wrap_mapping(source.type_hint(), D::type_name(), e))
    }

    /// Map a source into a destination field map for `dest_type`.
    ///
    /// This is the dynamic pipeline behind [`map`](Self::map): normalize,
    /// resolve configuration, transform, construct. Types with the
    /// mapped-object capability construct through their own factory.
    pub fn map_value(&self, source: &SourceValue, dest_type: &str) -> Result<ValueMap> {
        let (source_type, data) = self.normalize_source(source)?;

        let config = self
            .builder
            .get_configuration(&source_type, dest_type)
            .map_err(|e| MapperError::wrap_mapping(&source_type, dest_type, e))?;

        // User-supplied transformer failures propagate unmodified.
        let transformed = self.data_transformer.transform(&data, &config)?;

        let built = match self.catalog.factory(dest_type) {
            Some(factory) => factory(&transformed)
                .map_err(|e| MapperError::wrap_mapping(&source_type, dest_type, e))?,
            None => self
                .factory
                .create(transformed, dest_type)
                .map_err(|e| MapperError::wrap_mapping(&source_type, dest_type, e))?,
        };
        Ok(built)
    }

    /// Map a source onto an existing instance, populating instead of
    /// constructing.
    pub fn map_to<D: Mapped>(&self, source: &SourceValue, dest: &mut D) -> Result<()> {
        let (source_type, data) = self.normalize_source(source)?;

        let config = self
            .builder
            .get_configuration(&source_type, D::type_name())
            .map_err(|e| MapperError::wrap_mapping(&source_type, D::type_name(), e))?;
        let transformed = self.data_transformer.transform(&data, &config)?;

        let mut fields = dest.to_map();
        self.factory
            .populate(&mut fields, transformed, D::type_name())
            .map_err(|e| MapperError::wrap_mapping(&source_type, D::type_name(), e))?;
        *dest = D::from_map(&fields)
            .map_err(|e| MapperError::wrap_mapping(&source_type, D::type_name(), e))?;
        Ok(())
    }

    /// Map a slice of sources element-wise, preserving order.
    ///
    /// Fails fast: the first element error aborts the batch, and no later
    /// element is touched.
    pub fn map_array<D: Mapped>(&self, sources: &[SourceValue]) -> Result<Vec<D>> {
        sources.iter().map(|source| self.map(source)).collect()
    }

    fn normalize_source(&self, source: &SourceValue) -> Result<(String, ValueMap)> {
        match source {
            SourceValue::Map(map) => Ok((MAP_TYPE.to_string(), map.clone())),
            SourceValue::Value(Value::Map(map)) => Ok((MAP_TYPE.to_string(), map.clone())),
            SourceValue::Value(other) => Err(MapperError::unsupported_source(other.kind_name())),
            SourceValue::Object { type_name, fields } => {
                Ok((type_name.clone(), fields.clone()))
            }
        }
    }

    // ===== Fluent configuration =====

    /// Open a fluent mapping builder for a type pair.
    pub fn create_map(&self, source_type: &str, dest_type: &str) -> TypeMapping {
        TypeMapping::new(source_type, dest_type, self.builder.store())
    }

    /// Open a fluent bidirectional builder between two types.
    pub fn create_map_bidirectional(&self, type_a: &str, type_b: &str) -> BidirectionalTypeMapping {
        BidirectionalTypeMapping::new(type_a, type_b, self.builder.store())
    }

    /// Derive and cache the reverse of an already-resolved forward mapping.
    ///
    /// Fails with `ReverseMapMissing` when the forward configuration was
    /// never resolved. Returns an open builder for the reverse direction,
    /// seeded with the mirrored member registrations.
    pub fn create_reverse_map(&self, source_type: &str, dest_type: &str) -> Result<TypeMapping> {
        let reverse = self
            .builder
            .create_reverse_configuration(source_type, dest_type)?;

        let store = self.builder.store();
        for (dest_prop, rule) in reverse.rules() {
            if rule.source_key != *dest_prop {
                store.set_member(
                    dest_type,
                    source_type,
                    dest_prop.clone(),
                    PropertyMapping::from_rule(rule),
                );
            }
        }
        Ok(TypeMapping::new(dest_type, source_type, store))
    }

    /// Add a mapping profile, eagerly resolving everything it declares.
    pub fn add_profile(&mut self, profile: MappingProfile) -> Result<()> {
        self.builder.add_profile(profile)
    }

    // ===== Cache control =====

    /// Drop every cached configuration and convention discovery.
    pub fn clear_cache(&self) {
        self.builder.cache().clear();
        self.builder.conventions().invalidate();
        debug!("mapping caches cleared");
    }

    /// Eagerly resolve every pair declared by profiles and fluent builders.
    pub fn warmup_cache(&self) -> Result<()> {
        self.builder.warmup_cache()
    }

    /// Swap the cache backend.
    pub fn set_cache(&mut self, cache: Arc<dyn MappingCache>) {
        self.builder.set_cache(cache);
    }

    // ===== Convention control =====

    /// Enable or disable convention discovery.
    pub fn use_conventions(&mut self, enabled: bool) {
        self.builder.set_conventions_enabled(enabled);
    }

    /// Set the convention acceptance threshold, in [0,1].
    pub fn set_convention_threshold(&mut self, threshold: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&threshold) || threshold.is_nan() {
            return Err(MapperError::Config(format!(
                "convention threshold must be in [0,1], got {threshold}"
            )));
        }
        self.builder.conventions_mut().set_threshold(threshold);
        Ok(())
    }

    /// Register an additional naming convention.
    pub fn register_convention(&mut self, convention: Arc<dyn NamingConvention>) {
        self.builder.conventions_mut().register_convention(convention);
    }

    // ===== Collaborator wiring =====

    /// Swap the declarative directive source.
    pub fn set_directive_source(&mut self, directives: Arc<dyn DirectiveSource>) {
        self.builder.set_directive_source(directives);
    }

    /// Set the population policy for generic construction.
    pub fn set_populate_mode(&mut self, mode: PopulateMode) {
        self.factory.set_mode(mode);
    }

    /// Register a named transformer for use in rules and directives.
    pub fn register_transformer(&self, name: impl Into<String>, transformer: Transformer) {
        self.transformers.register_transformer(name, transformer);
    }

    /// Register a named condition for use in rules and directives.
    pub fn register_condition(&self, name: impl Into<String>, condition: Condition) {
        self.transformers.register_condition(name, condition);
    }
}
