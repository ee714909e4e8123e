//! Engine option type definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::convention::DEFAULT_THRESHOLD;
use crate::factory::PopulateMode;

/// Root engine options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapperOptions {
    /// Convention discovery options.
    #[serde(default)]
    pub conventions: ConventionOptions,

    /// Cache backend options.
    #[serde(default)]
    pub cache: CacheOptions,

    /// Population policy options.
    #[serde(default)]
    pub populate: PopulateOptions,
}

/// Convention discovery options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConventionOptions {
    /// Whether convention discovery runs at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Acceptance threshold for discovered pairings, in [0,1].
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for ConventionOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// Cache backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackendKind {
    /// Per-engine in-memory cache.
    #[default]
    Local,

    /// Process-wide shared cache.
    Shared,

    /// File-backed cache surviving restarts.
    Persistent,
}

/// Cache backend options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheOptions {
    /// Which backend to use.
    #[serde(default)]
    pub backend: CacheBackendKind,

    /// Cache file path; required for the persistent backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Population policy options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopulateOptions {
    /// How leftover data is written onto properties.
    #[serde(default)]
    pub mode: PopulateMode,
}
