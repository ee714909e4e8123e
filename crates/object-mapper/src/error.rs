//! Error types for the mapping library.

use thiserror::Error;

/// Main error type for mapping operations.
#[derive(Error, Debug)]
pub enum MapperError {
    /// Configuration error (invalid YAML, bad option values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source value is neither a map, a mapped object, nor an introspectable object.
    #[error("Unsupported source type: {type_name}")]
    UnsupportedSource { type_name: String },

    /// Destination type name does not resolve to a registered, constructible type.
    #[error("Destination type not found: {0}")]
    DestinationNotFound(String),

    /// Reverse map requested before the forward mapping was resolved and cached.
    #[error("No cached mapping for {source_type} -> {dest_type} - resolve the forward map first")]
    ReverseMapMissing {
        source_type: String,
        dest_type: String,
    },

    /// Destination type exists but could not be instantiated.
    #[error("Failed to construct {type_name}: {message}")]
    ConstructionFailure { type_name: String, message: String },

    /// A user-supplied transformer failed. Propagated unmodified by the engine.
    #[error("Transformer failed for property {property}: {message}")]
    Transformer { property: String, message: String },

    /// A mapping builder was mutated after sealing.
    #[error("Invalid mapping state: {0}")]
    InvalidState(String),

    /// Mapping failed for a type pair, wrapping an internal cause.
    #[error("Mapping {source_type} -> {dest_type} failed: {message}")]
    Mapping {
        source_type: String,
        dest_type: String,
        message: String,
    },

    /// IO error (persistent cache file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl MapperError {
    /// Create an UnsupportedSource error for a source value kind.
    pub fn unsupported_source(type_name: impl Into<String>) -> Self {
        MapperError::UnsupportedSource {
            type_name: type_name.into(),
        }
    }

    /// Create a ConstructionFailure error.
    pub fn construction(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        MapperError::ConstructionFailure {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a Transformer error.
    pub fn transformer(property: impl Into<String>, message: impl Into<String>) -> Self {
        MapperError::Transformer {
            property: property.into(),
            message: message.into(),
        }
    }

    /// Create a ReverseMapMissing error.
    pub fn reverse_map_missing(
        source_type: impl Into<String>,
        dest_type: impl Into<String>,
    ) -> Self {
        MapperError::ReverseMapMissing {
            source_type: source_type.into(),
            dest_type: dest_type.into(),
        }
    }

    /// Wrap an internal error with type-pair context.
    ///
    /// Errors that already identify the failure precisely (the domain
    /// variants, including an existing `Mapping` wrap) pass through
    /// unchanged so callers never see double-wrapped context.
    pub fn wrap_mapping(
        source_type: impl Into<String>,
        dest_type: impl Into<String>,
        cause: MapperError,
    ) -> Self {
        match cause {
            MapperError::Mapping { .. }
            | MapperError::UnsupportedSource { .. }
            | MapperError::DestinationNotFound(_)
            | MapperError::ReverseMapMissing { .. }
            | MapperError::ConstructionFailure { .. }
            | MapperError::Transformer { .. }
            | MapperError::InvalidState(_) => cause,
            other => MapperError::Mapping {
                source_type: source_type.into(),
                dest_type: dest_type.into(),
                message: other.to_string(),
            },
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for mapping operations.
pub type Result<T> = std::result::Result<T, MapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_mapping_passes_domain_errors_through() {
        let err = MapperError::unsupported_source("i64");
        let wrapped = MapperError::wrap_mapping("map", "User", err);
        assert!(matches!(wrapped, MapperError::UnsupportedSource { .. }));
    }

    #[test]
    fn test_wrap_mapping_never_double_wraps() {
        let inner = MapperError::Mapping {
            source_type: "map".into(),
            dest_type: "User".into(),
            message: "boom".into(),
        };
        let wrapped = MapperError::wrap_mapping("Other", "Thing", inner);
        match wrapped {
            MapperError::Mapping { source_type, .. } => assert_eq!(source_type, "map"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrap_mapping_adds_context_to_internal_errors() {
        let err = MapperError::Config("bad".into());
        let wrapped = MapperError::wrap_mapping("map", "User", err);
        match wrapped {
            MapperError::Mapping {
                source_type,
                dest_type,
                message,
            } => {
                assert_eq!(source_type, "map");
                assert_eq!(dest_type, "User");
                assert!(message.contains("bad"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
