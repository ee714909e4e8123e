//! File-backed cache backend for configurations that survive restarts.
//!
//! The cache file is JSON with a format version, a save timestamp, and a
//! SHA-256 checksum over the serialized configurations. Writes are atomic
//! (temp file then rename). A version mismatch or checksum failure is
//! logged and the cache starts empty rather than serving suspect entries.
//!
//! Only data-only rules can be represented on disk: configurations carrying
//! transformer or condition callables are served from memory and rebuilt
//! after a restart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::core::value::Value;
use crate::error::Result;
use crate::mapping::configuration::MappingConfiguration;
use crate::mapping::rule::PropertyRule;

use super::MappingCache;

const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    saved_at: DateTime<Utc>,
    checksum: String,
    configurations: Vec<StoredConfiguration>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredConfiguration {
    source_type: String,
    dest_type: String,
    rules: Vec<StoredRule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRule {
    dest: String,
    source_key: String,
    #[serde(default)]
    ignore: bool,
    #[serde(default)]
    has_default: bool,
    #[serde(default)]
    default: Option<Value>,
}

fn checksum_of(configurations: &[StoredConfiguration]) -> Result<String> {
    let content = serde_json::to_string(configurations)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Whether a configuration can be represented on disk (no callables).
fn is_storable(config: &MappingConfiguration) -> bool {
    config
        .rules()
        .all(|(_, rule)| rule.transformer.is_none() && rule.condition.is_none())
}

fn to_stored(config: &MappingConfiguration) -> StoredConfiguration {
    StoredConfiguration {
        source_type: config.source_type().to_string(),
        dest_type: config.dest_type().to_string(),
        rules: config
            .rules()
            .map(|(dest, rule)| StoredRule {
                dest: dest.clone(),
                source_key: rule.source_key.clone(),
                ignore: rule.ignore,
                has_default: rule.has_default,
                default: rule.default.clone(),
            })
            .collect(),
    }
}

fn from_stored(stored: StoredConfiguration) -> MappingConfiguration {
    let mut config = MappingConfiguration::new(stored.source_type, stored.dest_type);
    for rule in stored.rules {
        config.insert_rule(
            rule.dest,
            PropertyRule {
                source_key: rule.source_key,
                transformer: None,
                condition: None,
                default: rule.default,
                has_default: rule.has_default,
                ignore: rule.ignore,
            },
        );
    }
    config
}

/// File-backed configuration cache.
pub struct PersistentCache {
    path: PathBuf,
    entries: RwLock<HashMap<String, Arc<MappingConfiguration>>>,
}

impl PersistentCache {
    /// Open (or create) a cache at `path`, loading any valid existing file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match Self::load_file(&path) {
            Ok(entries) => entries,
            Err(reason) => {
                if path.exists() {
                    warn!(path = %path.display(), %reason, "ignoring unusable cache file");
                }
                HashMap::new()
            }
        };
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_file(path: &Path) -> std::result::Result<HashMap<String, Arc<MappingConfiguration>>, String> {
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        let file: CacheFile = serde_json::from_str(&content).map_err(|e| e.to_string())?;

        if file.version != CACHE_FORMAT_VERSION {
            return Err(format!(
                "format version {} (expected {})",
                file.version, CACHE_FORMAT_VERSION
            ));
        }

        let expected = checksum_of(&file.configurations).map_err(|e| e.to_string())?;
        if file.checksum != expected {
            return Err("checksum mismatch".to_string());
        }

        let mut entries = HashMap::new();
        for stored in file.configurations {
            let config = Arc::new(from_stored(stored));
            entries.insert(config.cache_key(), config);
        }
        debug!(path = %path.display(), entries = entries.len(), "loaded persistent cache");
        Ok(entries)
    }

    /// Write the storable subset of the cache to disk (atomic).
    fn persist(&self) -> Result<()> {
        let entries = self.entries.read();
        let mut configurations: Vec<StoredConfiguration> = Vec::new();
        for config in entries.values() {
            if is_storable(config) {
                configurations.push(to_stored(config));
            } else {
                debug!(key = %config.cache_key(), "configuration has callables, kept in memory only");
            }
        }
        // Stable file content regardless of hash-map iteration order.
        configurations.sort_by(|a, b| {
            (a.source_type.as_str(), a.dest_type.as_str())
                .cmp(&(b.source_type.as_str(), b.dest_type.as_str()))
        });

        let file = CacheFile {
            version: CACHE_FORMAT_VERSION,
            saved_at: Utc::now(),
            checksum: checksum_of(&configurations)?,
            configurations,
        };
        let content = serde_json::to_string_pretty(&file)?;

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl MappingCache for PersistentCache {
    fn get(&self, key: &str) -> Option<Arc<MappingConfiguration>> {
        self.entries.read().get(key).cloned()
    }

    fn insert(&self, key: &str, config: Arc<MappingConfiguration>) {
        self.entries.write().insert(key.to_string(), config);
        // Persistence is best-effort; the in-memory view stays authoritative.
        if let Err(e) = self.persist() {
            warn!(path = %self.path.display(), error = %e, "failed to persist cache");
        }
    }

    fn clear(&self) {
        self.entries.write().clear();
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "failed to remove cache file");
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn backend_type(&self) -> &'static str {
        "persistent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::rule::Transformer;

    fn sample_config() -> MappingConfiguration {
        let mut config = MappingConfiguration::new("Row", "Dto");
        config.insert_rule("firstName", PropertyRule::same_name("first_name"));
        let mut rule = PropertyRule::same_name("nickname");
        rule.default = Some(Value::from("anon"));
        rule.has_default = true;
        config.insert_rule("nickname", rule);
        config
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");

        {
            let cache = PersistentCache::open(&path).unwrap();
            cache.insert("Row->Dto", Arc::new(sample_config()));
        }

        let reopened = PersistentCache::open(&path).unwrap();
        let hit = reopened.get("Row->Dto").unwrap();
        assert_eq!(hit.rule("firstName").unwrap().source_key, "first_name");
        assert_eq!(hit.rule("nickname").unwrap().default, Some(Value::from("anon")));
    }

    #[test]
    fn test_checksum_mismatch_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");

        {
            let cache = PersistentCache::open(&path).unwrap();
            cache.insert("Row->Dto", Arc::new(sample_config()));
        }

        let tampered = std::fs::read_to_string(&path)
            .unwrap()
            .replace("first_name", "hacked_key");
        std::fs::write(&path, tampered).unwrap();

        let reopened = PersistentCache::open(&path).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_version_mismatch_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");

        {
            let cache = PersistentCache::open(&path).unwrap();
            cache.insert("Row->Dto", Arc::new(sample_config()));
        }

        let bumped = std::fs::read_to_string(&path)
            .unwrap()
            .replace("\"version\": 1", "\"version\": 999");
        std::fs::write(&path, bumped).unwrap();

        let reopened = PersistentCache::open(&path).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_configs_with_callables_stay_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");

        {
            let cache = PersistentCache::open(&path).unwrap();
            let mut config = MappingConfiguration::new("Row", "Dto");
            let mut rule = PropertyRule::same_name("name");
            rule.transformer = Some(Transformer::simple(Ok));
            config.insert_rule("name", rule);
            cache.insert("Row->Dto", Arc::new(config));

            // Served from memory while the instance lives.
            assert!(cache.get("Row->Dto").is_some());
        }

        // Not representable on disk, so a new process rebuilds it.
        let reopened = PersistentCache::open(&path).unwrap();
        assert!(reopened.get("Row->Dto").is_none());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");

        let cache = PersistentCache::open(&path).unwrap();
        cache.insert("Row->Dto", Arc::new(sample_config()));
        assert!(path.exists());

        cache.clear();
        assert!(!path.exists());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_file_is_json_with_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");

        let cache = PersistentCache::open(&path).unwrap();
        cache.insert("Row->Dto", Arc::new(sample_config()));

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["version"], 1);
        assert!(parsed["checksum"].as_str().unwrap().len() == 64);
        assert!(parsed["saved_at"].is_string());
    }
}
