//! Configuration resolution: merging explicit, declarative, and
//! convention-discovered rules into cached per-type-pair configurations.
//!
//! Per destination property the merge priority is: fluent store, then
//! profiles in registration order, then declarative directives, then a
//! same-name default. When conventions are enabled, discovery runs last and
//! rewrites the source key of properties that fell through to the default.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::cache::MappingCache;
use crate::core::catalog::TypeCatalog;
use crate::core::traits::{DirectiveSource, PropertyDirectives};
use crate::core::value::Value;
use crate::core::MAP_TYPE;
use crate::convention::ConventionMapper;
use crate::error::{MapperError, Result};
use crate::factory::{ObjectFactory, PopulateMode};

use super::configuration::{pair_key, MappingConfiguration};
use super::profile::MappingProfile;
use super::rule::{PropertyMapping, PropertyRule, Transformer, TransformerRegistry};
use super::store::MappingStore;

/// Resolves and caches mapping configurations per type pair.
pub struct ConfigurationBuilder {
    cache: Arc<dyn MappingCache>,
    catalog: Arc<TypeCatalog>,
    directives: Arc<dyn DirectiveSource>,
    transformers: Arc<TransformerRegistry>,
    store: Arc<MappingStore>,
    profiles: Vec<MappingProfile>,
    conventions: ConventionMapper,
    conventions_enabled: bool,
}

impl ConfigurationBuilder {
    /// Create a builder over the given collaborators.
    pub fn new(
        catalog: Arc<TypeCatalog>,
        cache: Arc<dyn MappingCache>,
        directives: Arc<dyn DirectiveSource>,
        transformers: Arc<TransformerRegistry>,
    ) -> Self {
        Self {
            cache,
            catalog,
            directives,
            transformers,
            store: Arc::new(MappingStore::new()),
            profiles: Vec::new(),
            conventions: ConventionMapper::default(),
            conventions_enabled: true,
        }
    }

    /// The fluent-configuration store shared with `TypeMapping` builders.
    #[must_use]
    pub fn store(&self) -> Arc<MappingStore> {
        Arc::clone(&self.store)
    }

    /// The active cache backend.
    #[must_use]
    pub fn cache(&self) -> Arc<dyn MappingCache> {
        Arc::clone(&self.cache)
    }

    /// Swap the cache backend.
    pub fn set_cache(&mut self, cache: Arc<dyn MappingCache>) {
        self.cache = cache;
    }

    /// Swap the directive source.
    pub fn set_directive_source(&mut self, directives: Arc<dyn DirectiveSource>) {
        self.directives = directives;
    }

    /// Enable or disable convention discovery.
    pub fn set_conventions_enabled(&mut self, enabled: bool) {
        self.conventions_enabled = enabled;
    }

    /// The convention mapper.
    #[must_use]
    pub fn conventions(&self) -> &ConventionMapper {
        &self.conventions
    }

    /// Mutable access to the convention mapper (threshold, registry).
    pub fn conventions_mut(&mut self) -> &mut ConventionMapper {
        &mut self.conventions
    }

    /// Resolve the configuration for a type pair, from cache when possible.
    pub fn get_configuration(
        &self,
        source_type: &str,
        dest_type: &str,
    ) -> Result<Arc<MappingConfiguration>> {
        let key = pair_key(source_type, dest_type);
        if let Some(hit) = self.cache.get(&key) {
            trace!(key = %key, backend = self.cache.backend_type(), "configuration cache hit");
            return Ok(hit);
        }

        let config = Arc::new(self.build_configuration(source_type, dest_type)?);
        self.cache.insert(&key, Arc::clone(&config));
        debug!(key = %key, rules = config.len(), "configuration built");
        Ok(config)
    }

    fn build_configuration(
        &self,
        source_type: &str,
        dest_type: &str,
    ) -> Result<MappingConfiguration> {
        let dest_schema = self.catalog.resolve(dest_type)?;
        let explicit = self.explicit_members(source_type, dest_type);

        let mut config = MappingConfiguration::new(source_type, dest_type);
        let mut defaulted: Vec<String> = Vec::new();

        for prop in &dest_schema.properties {
            let rule = if let Some(mapping) = explicit.get(&prop.name) {
                mapping.clone().into_rule(&prop.name, &self.transformers)
            } else if let Some(directives) =
                self.directives.property_directives(dest_type, &prop.name)
            {
                self.rule_from_directives(&prop.name, directives)
            } else {
                defaulted.push(prop.name.clone());
                PropertyRule::same_name(&prop.name)
            };
            config.insert_rule(prop.name.clone(), rule);
        }

        // Conventions only apply when the source is itself a described type,
        // never for raw key/value input.
        if self.conventions_enabled && source_type != MAP_TYPE {
            if let Some(source_schema) = self.catalog.get(source_type) {
                let discovered = self.conventions.discover(&source_schema, &dest_schema);
                for dest_prop in &defaulted {
                    if let Some(source_prop) = discovered.get(dest_prop) {
                        if let Some(rule) = config.rule_mut(dest_prop) {
                            rule.source_key = source_prop.clone();
                        }
                    }
                }
            }
        }

        Ok(config)
    }

    /// Explicit member mappings for a pair: profiles in registration order,
    /// overridden by the fluent store.
    fn explicit_members(
        &self,
        source_type: &str,
        dest_type: &str,
    ) -> IndexMap<String, PropertyMapping> {
        let mut explicit: IndexMap<String, PropertyMapping> = IndexMap::new();
        for profile in &self.profiles {
            if let Some(members) = profile.members(source_type, dest_type) {
                for (prop, mapping) in members {
                    explicit.entry(prop).or_insert(mapping);
                }
            }
        }
        if let Some(members) = self.store.members(source_type, dest_type) {
            for (prop, mapping) in members {
                explicit.insert(prop, mapping);
            }
        }
        explicit
    }

    fn rule_from_directives(
        &self,
        dest_property: &str,
        directives: PropertyDirectives,
    ) -> PropertyRule {
        if directives.ignore {
            return PropertyRule {
                source_key: dest_property.to_string(),
                transformer: None,
                condition: None,
                default: None,
                has_default: false,
                ignore: true,
            };
        }

        let transformer = match directives.transformer {
            Some(t) => self.transformers.resolve_transformer(t),
            None if directives.is_collection => directives
                .collection_item_type
                .as_deref()
                .and_then(|item| self.collection_transformer(item)),
            None => None,
        };

        PropertyRule {
            source_key: directives
                .source
                .unwrap_or_else(|| dest_property.to_string()),
            transformer,
            condition: directives
                .condition
                .and_then(|c| self.transformers.resolve_condition(c)),
            default: directives.default,
            has_default: directives.has_default,
            ignore: false,
        }
    }

    /// Transformer mapping each map element of a collection into the
    /// declared item type.
    fn collection_transformer(&self, item_type: &str) -> Option<Transformer> {
        if !self.catalog.contains(item_type) {
            warn!(item_type = %item_type, "collection item type not registered, mapping items as-is");
            return None;
        }

        let catalog = Arc::clone(&self.catalog);
        let factory = ObjectFactory::new(Arc::clone(&self.catalog), PopulateMode::BestEffort);
        let item_type = item_type.to_string();
        Some(Transformer::simple(move |value| {
            let Value::Array(items) = value else {
                return Ok(value);
            };
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Map(map) => {
                        let built = match catalog.factory(&item_type) {
                            Some(f) => f(&map)?,
                            None => factory.create(map, &item_type)?,
                        };
                        out.push(Value::Map(built));
                    }
                    other => out.push(other),
                }
            }
            Ok(Value::Array(out))
        }))
    }

    /// Build the reverse configuration from an already-cached forward one.
    ///
    /// Every non-ignored, non-transformed, renamed forward property is
    /// copied into the reverse direction; the remaining reverse properties
    /// fall back to same-name lookups. Custom transformers cannot be
    /// auto-reversed and are deliberately left out.
    pub fn create_reverse_configuration(
        &self,
        source_type: &str,
        dest_type: &str,
    ) -> Result<Arc<MappingConfiguration>> {
        let forward_key = pair_key(source_type, dest_type);
        let forward = self
            .cache
            .get(&forward_key)
            .ok_or_else(|| MapperError::reverse_map_missing(source_type, dest_type))?;

        let reverse_dest_schema = self.catalog.resolve(source_type)?;
        let mut reverse = MappingConfiguration::new(dest_type, source_type);
        for prop in &reverse_dest_schema.properties {
            reverse.insert_rule(prop.name.clone(), PropertyRule::same_name(&prop.name));
        }

        for (dest_prop, rule) in forward.rules() {
            if rule.ignore || rule.transformer.is_some() {
                continue;
            }
            // Only renamed direct lookups can be mirrored; dotted paths have
            // no writable counterpart on the reverse side.
            if rule.source_key == *dest_prop || rule.source_key.contains('.') {
                continue;
            }
            reverse.insert_rule(rule.source_key.clone(), PropertyRule::same_name(dest_prop));
        }

        let reverse = Arc::new(reverse);
        self.cache.insert(&reverse.cache_key(), Arc::clone(&reverse));
        Ok(reverse)
    }

    /// Add a profile and eagerly resolve every mapping it declares.
    pub fn add_profile(&mut self, profile: MappingProfile) -> Result<()> {
        debug!(profile = profile.name(), pairs = profile.pairs().len(), "profile added");
        let pairs: Vec<_> = profile.pairs().to_vec();
        self.profiles.push(profile);
        for (source_type, dest_type) in pairs {
            self.get_configuration(&source_type, &dest_type)?;
        }
        Ok(())
    }

    /// Eagerly resolve every pair declared by profiles and the fluent store.
    pub fn warmup_cache(&self) -> Result<()> {
        for profile in &self.profiles {
            for (source_type, dest_type) in profile.pairs() {
                self.get_configuration(source_type, dest_type)?;
            }
        }
        for key in self.store.pair_keys() {
            if let Some((source_type, dest_type)) = key.split_once("->") {
                self.get_configuration(source_type, dest_type)?;
            }
        }
        Ok(())
    }
}
