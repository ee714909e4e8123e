//! Named, reusable bundles of type-mapping configuration.
//!
//! A profile owns its own [`MappingStore`] and records the type pairs it
//! declares. Once added to the engine it is queried read-only by the
//! configuration builder, and every declared pair is resolved eagerly so the
//! first real `map` call hits a warm cache.

use std::sync::Arc;

use super::store::MappingStore;
use super::type_mapping::TypeMapping;

/// Named bundle of type mappings.
pub struct MappingProfile {
    name: String,
    store: Arc<MappingStore>,
    pairs: Vec<(String, String)>,
}

impl MappingProfile {
    /// Create an empty profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store: Arc::new(MappingStore::new()),
            pairs: Vec::new(),
        }
    }

    /// Profile name, for logging.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a mapping for a type pair and return its fluent builder.
    pub fn create_map(&mut self, source_type: &str, dest_type: &str) -> TypeMapping {
        self.pairs
            .push((source_type.to_string(), dest_type.to_string()));
        TypeMapping::new(source_type, dest_type, Arc::clone(&self.store))
    }

    /// Type pairs declared by this profile, in declaration order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Member mappings this profile registered for a type pair.
    #[must_use]
    pub fn members(
        &self,
        source_type: &str,
        dest_type: &str,
    ) -> Option<indexmap::IndexMap<String, super::rule::PropertyMapping>> {
        self.store.members(source_type, dest_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::rule::PropertyMapping;

    #[test]
    fn test_profile_records_pairs_and_members() {
        let mut profile = MappingProfile::new("api");
        let mut mapping = profile.create_map("Row", "Dto");
        mapping
            .for_member("name", PropertyMapping::new().map_from("full_name"))
            .unwrap();

        assert_eq!(profile.name(), "api");
        assert_eq!(profile.pairs(), &[("Row".to_string(), "Dto".to_string())]);
        let members = profile.members("Row", "Dto").unwrap();
        assert_eq!(members.get("name").unwrap().source(), Some("full_name"));
    }
}
