//! Engine option validation.

use crate::error::{MapperError, Result};

use super::types::{CacheBackendKind, MapperOptions};

/// Validate option values before an engine is built from them.
pub fn validate(options: &MapperOptions) -> Result<()> {
    let threshold = options.conventions.threshold;
    if !(0.0..=1.0).contains(&threshold) || threshold.is_nan() {
        return Err(MapperError::Config(format!(
            "convention threshold must be in [0,1], got {threshold}"
        )));
    }

    if options.cache.backend == CacheBackendKind::Persistent && options.cache.path.is_none() {
        return Err(MapperError::Config(
            "persistent cache backend requires cache.path".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        assert!(validate(&MapperOptions::default()).is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut options = MapperOptions::default();
        options.conventions.threshold = 1.5;
        assert!(validate(&options).is_err());
    }

    #[test]
    fn test_persistent_backend_requires_path() {
        let mut options = MapperOptions::default();
        options.cache.backend = CacheBackendKind::Persistent;
        let err = validate(&options).unwrap_err();
        assert!(matches!(err, MapperError::Config(_)));

        options.cache.path = Some("/tmp/mappings.json".into());
        assert!(validate(&options).is_ok());
    }
}
