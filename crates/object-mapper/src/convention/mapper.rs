//! Convention-based property discovery between type pairs.
//!
//! The [`ConventionMapper`] detects a type's dominant naming convention and
//! discovers best-effort source/destination property pairings via string
//! similarity. Discoveries are cached per type pair and invalidated when the
//! registry or the acceptance threshold changes.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::core::schema::TypeSchema;
use crate::mapping::configuration::pair_key;

use super::naming::{ConventionRegistry, NamingConvention};
use super::similarity::{edit_similarity, phonetic_similarity};

/// Default acceptance threshold for discovered pairings.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Confidence assigned when two names normalize to the same form.
const NORMALIZED_MATCH_SCORE: f64 = 0.95;

/// Discovers property pairings between differently-styled type schemas.
pub struct ConventionMapper {
    registry: ConventionRegistry,
    threshold: f64,

    /// Discovery cache: `"sourceType->destType"` -> `{dest prop -> source prop}`.
    discovered: RwLock<HashMap<String, Arc<HashMap<String, String>>>>,
}

impl Default for ConventionMapper {
    fn default() -> Self {
        Self::new(ConventionRegistry::with_defaults(), DEFAULT_THRESHOLD)
    }
}

impl ConventionMapper {
    /// Create a mapper over the given registry and acceptance threshold.
    pub fn new(registry: ConventionRegistry, threshold: f64) -> Self {
        Self {
            registry,
            threshold,
            discovered: RwLock::new(HashMap::new()),
        }
    }

    /// Current acceptance threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Change the acceptance threshold. Invalidates cached discoveries.
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
        self.invalidate();
    }

    /// Append a convention to the registry. Invalidates cached discoveries.
    pub fn register_convention(&mut self, convention: Arc<dyn NamingConvention>) {
        self.registry.register(convention);
        self.invalidate();
    }

    /// Drop all cached discoveries.
    pub fn invalidate(&self) {
        self.discovered.write().clear();
    }

    /// Detect the dominant convention of a type by counting how many of its
    /// property names each registered convention recognizes.
    ///
    /// Ties go to the earliest registered convention; `None` when no
    /// convention recognizes any property.
    #[must_use]
    pub fn detect_convention(&self, schema: &TypeSchema) -> Option<Arc<dyn NamingConvention>> {
        let mut best: Option<(usize, &Arc<dyn NamingConvention>)> = None;
        for convention in self.registry.iter() {
            let score = schema
                .property_names()
                .filter(|name| convention.matches(name))
                .count();
            if score > 0 && best.map_or(true, |(top, _)| score > top) {
                best = Some((score, convention));
            }
        }
        best.map(|(_, convention)| Arc::clone(convention))
    }

    /// Score how likely `source_name` and `dest_name` refer to the same
    /// property, in [0,1].
    ///
    /// Identical raw names short-circuit to 1.0. For every convention pair
    /// that recognizes the respective names, equal normalized forms score
    /// 0.95 and anything else the maximum of edit-distance and phonetic
    /// similarity of the normalized forms. The best score across all
    /// convention combinations wins.
    #[must_use]
    pub fn calculate_confidence(&self, source_name: &str, dest_name: &str) -> f64 {
        if source_name == dest_name {
            return 1.0;
        }

        let mut best = 0.0f64;
        for source_conv in self.registry.iter() {
            if !source_conv.matches(source_name) {
                continue;
            }
            let normalized_source = source_conv.normalize(source_name);
            for dest_conv in self.registry.iter() {
                if !dest_conv.matches(dest_name) {
                    continue;
                }
                let normalized_dest = dest_conv.normalize(dest_name);
                let score = if normalized_source == normalized_dest {
                    NORMALIZED_MATCH_SCORE
                } else {
                    edit_similarity(&normalized_source, &normalized_dest)
                        .max(phonetic_similarity(&normalized_source, &normalized_dest))
                };
                best = best.max(score);
            }
        }
        best
    }

    /// Discover `{dest property -> source property}` pairings for a type pair.
    ///
    /// Each destination property keeps its single best-scoring source
    /// property, included only when the confidence reaches the threshold.
    /// Results are cached per type pair until [`invalidate`](Self::invalidate)
    /// is called. Never fails: an unmatched property simply has no entry.
    pub fn discover(
        &self,
        source_schema: &TypeSchema,
        dest_schema: &TypeSchema,
    ) -> Arc<HashMap<String, String>> {
        let key = pair_key(&source_schema.name, &dest_schema.name);
        if let Some(hit) = self.discovered.read().get(&key) {
            return Arc::clone(hit);
        }

        let mut mappings = HashMap::new();
        for dest_prop in dest_schema.property_names() {
            let mut best: Option<(&str, f64)> = None;
            for source_prop in source_schema.property_names() {
                let confidence = self.calculate_confidence(source_prop, dest_prop);
                if best.map_or(true, |(_, top)| confidence > top) {
                    best = Some((source_prop, confidence));
                }
            }
            if let Some((source_prop, confidence)) = best {
                if confidence >= self.threshold {
                    mappings.insert(dest_prop.to_string(), source_prop.to_string());
                }
            }
        }

        debug!(
            source = %source_schema.name,
            dest = %dest_schema.name,
            discovered = mappings.len(),
            "convention discovery"
        );

        let mappings = Arc::new(mappings);
        self.discovered.write().insert(key, Arc::clone(&mappings));
        mappings
    }
}
