//! Mapping-configuration cache backends.
//!
//! The [`MappingCache`] trait defines the interface for storing resolved
//! configurations per `"sourceType->destinationType"` key. Backends differ
//! only in lifetime:
//!
//! - [`LocalCache`]: dies with its owner
//! - [`SharedCache`]: process-wide, survives across engine instances until
//!   explicitly reset
//! - [`PersistentCache`]: file-backed, survives process restarts
//!
//! All backends are internally synchronized; writers never corrupt
//! concurrent readers.

mod local;
mod persistent;
mod shared;

pub use local::LocalCache;
pub use persistent::PersistentCache;
pub use shared::SharedCache;

use std::sync::Arc;

use crate::mapping::configuration::MappingConfiguration;

/// Key-value store of resolved mapping configurations.
///
/// A cached configuration is treated as immutable for its key until the
/// cache is explicitly cleared.
pub trait MappingCache: Send + Sync {
    /// Look up a configuration by pair key.
    fn get(&self, key: &str) -> Option<Arc<MappingConfiguration>>;

    /// Store a configuration under a pair key.
    fn insert(&self, key: &str, config: Arc<MappingConfiguration>);

    /// Drop every cached configuration.
    fn clear(&self);

    /// Number of cached configurations.
    fn len(&self) -> usize;

    /// Check if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Backend name for logging/debugging.
    fn backend_type(&self) -> &'static str;
}
