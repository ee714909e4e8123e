//! Shared storage backend for fluent mapping builders.
//!
//! [`TypeMapping`](super::type_mapping::TypeMapping) builders write their
//! member registrations through here, and the
//! [`ConfigurationBuilder`](super::builder::ConfigurationBuilder) reads them
//! back when resolving a type pair.

use std::collections::HashMap;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::configuration::pair_key;
use super::rule::PropertyMapping;

/// Property mappings registered per type pair, in declaration order.
#[derive(Default)]
pub struct MappingStore {
    entries: RwLock<HashMap<String, IndexMap<String, PropertyMapping>>>,
}

impl MappingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the mapping for one destination property.
    pub fn set_member(
        &self,
        source_type: &str,
        dest_type: &str,
        dest_property: impl Into<String>,
        mapping: PropertyMapping,
    ) {
        let key = pair_key(source_type, dest_type);
        self.entries
            .write()
            .entry(key)
            .or_default()
            .insert(dest_property.into(), mapping);
    }

    /// All member mappings registered for a type pair.
    #[must_use]
    pub fn members(
        &self,
        source_type: &str,
        dest_type: &str,
    ) -> Option<IndexMap<String, PropertyMapping>> {
        self.entries
            .read()
            .get(&pair_key(source_type, dest_type))
            .cloned()
    }

    /// Type pairs with at least one registered member, as cache keys.
    #[must_use]
    pub fn pair_keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_read_members() {
        let store = MappingStore::new();
        store.set_member("A", "B", "name", PropertyMapping::new().map_from("full_name"));
        store.set_member("A", "B", "id", PropertyMapping::new());

        let members = store.members("A", "B").unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members.get("name").unwrap().source(), Some("full_name"));
        assert!(store.members("B", "A").is_none());
    }
}
