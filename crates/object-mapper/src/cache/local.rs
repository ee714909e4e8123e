//! Process-local cache backend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::mapping::configuration::MappingConfiguration;

use super::MappingCache;

/// In-memory cache owned by a single engine instance.
#[derive(Default)]
pub struct LocalCache {
    entries: RwLock<HashMap<String, Arc<MappingConfiguration>>>,
}

impl LocalCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MappingCache for LocalCache {
    fn get(&self, key: &str) -> Option<Arc<MappingConfiguration>> {
        self.entries.read().get(key).cloned()
    }

    fn insert(&self, key: &str, config: Arc<MappingConfiguration>) {
        self.entries.write().insert(key.to_string(), config);
    }

    fn clear(&self) {
        self.entries.write().clear();
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn backend_type(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_cache_round_trip() {
        let cache = LocalCache::new();
        assert!(cache.is_empty());

        let config = Arc::new(MappingConfiguration::new("map", "User"));
        cache.insert("map->User", Arc::clone(&config));

        let hit = cache.get("map->User").unwrap();
        assert!(Arc::ptr_eq(&hit, &config));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.get("map->User").is_none());
    }

    #[test]
    fn test_local_caches_are_independent() {
        let a = LocalCache::new();
        let b = LocalCache::new();
        a.insert("map->User", Arc::new(MappingConfiguration::new("map", "User")));
        assert!(b.get("map->User").is_none());
    }
}
