//! Engine option loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;

use crate::error::Result;

impl MapperOptions {
    /// Load options from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse options from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let options: MapperOptions = serde_yaml::from_str(yaml)?;
        options.validate()?;
        Ok(options)
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::PopulateMode;

    #[test]
    fn test_from_yaml_defaults() {
        let options = MapperOptions::from_yaml("{}").unwrap();
        assert!(options.conventions.enabled);
        assert_eq!(options.conventions.threshold, 0.8);
        assert_eq!(options.cache.backend, CacheBackendKind::Local);
        assert_eq!(options.populate.mode, PopulateMode::BestEffort);
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = r"
conventions:
  enabled: false
  threshold: 0.9
cache:
  backend: persistent
  path: /tmp/mappings.json
populate:
  mode: strict
";
        let options = MapperOptions::from_yaml(yaml).unwrap();
        assert!(!options.conventions.enabled);
        assert_eq!(options.conventions.threshold, 0.9);
        assert_eq!(options.cache.backend, CacheBackendKind::Persistent);
        assert_eq!(options.populate.mode, PopulateMode::Strict);
    }

    #[test]
    fn test_from_yaml_rejects_bad_threshold() {
        let err = MapperOptions::from_yaml("conventions:\n  threshold: 2.0\n").unwrap_err();
        assert!(matches!(err, crate::error::MapperError::Config(_)));
    }
}
