//! Process-wide shared cache backend.
//!
//! Every [`SharedCache`] handle views the same underlying map, so resolved
//! configurations survive across engine instances within one process. The
//! map sits behind a read/write lock; there is no unsynchronized global
//! state. Tests and embedders call [`SharedCache::reset`] for isolation.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::mapping::configuration::MappingConfiguration;

use super::MappingCache;

static SHARED_ENTRIES: LazyLock<RwLock<HashMap<String, Arc<MappingConfiguration>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Handle onto the process-wide configuration cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct SharedCache;

impl SharedCache {
    /// Create a handle. All handles share the same storage.
    pub fn new() -> Self {
        Self
    }

    /// Drop every configuration in the process-wide cache.
    ///
    /// Equivalent to `clear` on any handle; provided as an associated
    /// function for explicit test isolation.
    pub fn reset() {
        SHARED_ENTRIES.write().clear();
    }
}

impl MappingCache for SharedCache {
    fn get(&self, key: &str) -> Option<Arc<MappingConfiguration>> {
        SHARED_ENTRIES.read().get(key).cloned()
    }

    fn insert(&self, key: &str, config: Arc<MappingConfiguration>) {
        SHARED_ENTRIES.write().insert(key.to_string(), config);
    }

    fn clear(&self) {
        SHARED_ENTRIES.write().clear();
    }

    fn len(&self) -> usize {
        SHARED_ENTRIES.read().len()
    }

    fn backend_type(&self) -> &'static str {
        "shared"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A single test covers visibility and reset so parallel test runs never
    // race on the process-wide map.
    #[test]
    fn test_shared_cache_visibility_and_reset() {
        let key = "SharedVisibilityRow->SharedVisibilityDto";
        let a = SharedCache::new();
        let b = SharedCache::new();

        a.insert(
            key,
            Arc::new(MappingConfiguration::new(
                "SharedVisibilityRow",
                "SharedVisibilityDto",
            )),
        );
        assert!(b.get(key).is_some(), "second handle sees the entry");

        SharedCache::reset();
        assert!(a.get(key).is_none());
        assert!(b.get(key).is_none());
    }
}
