//! Applies a resolved configuration to normalized source data.

use tracing::warn;

use crate::core::value::{lookup_path, Value, ValueMap};
use crate::error::Result;
use crate::mapping::configuration::MappingConfiguration;

/// Applies property rules to a source map, producing the
/// destination-shaped value map.
#[derive(Debug, Default)]
pub struct DataTransformer;

impl DataTransformer {
    /// Create a transformer.
    pub fn new() -> Self {
        Self
    }

    /// Transform `source` according to `config`.
    ///
    /// Per rule, in order: ignored rules are skipped (key absent from the
    /// output); a failing condition emits the default when one was declared
    /// and otherwise omits the key; the value resolves via the source key
    /// (dotted paths walk nested maps, misses become null); the transformer
    /// runs, with its errors propagated unmodified; a null result is
    /// replaced by the declared default.
    ///
    /// Malformed rules are skipped with a warning; they never fail the
    /// whole transform.
    pub fn transform(&self, source: &ValueMap, config: &MappingConfiguration) -> Result<ValueMap> {
        let mut output = ValueMap::new();

        for (dest_property, rule) in config.rules() {
            if rule.ignore {
                continue;
            }
            if rule.source_key.is_empty() {
                warn!(property = %dest_property, "rule has empty source key, skipping");
                continue;
            }

            if let Some(condition) = &rule.condition {
                if !condition.evaluate(source) {
                    if rule.has_default {
                        output.insert(
                            dest_property.clone(),
                            rule.default.clone().unwrap_or(Value::Null),
                        );
                    }
                    continue;
                }
            }

            let mut value = lookup_path(source, &rule.source_key)
                .cloned()
                .unwrap_or(Value::Null);

            if let Some(transformer) = &rule.transformer {
                value = transformer.apply(value, source)?;
            }

            if value.is_null() && rule.has_default {
                value = rule.default.clone().unwrap_or(Value::Null);
            }

            output.insert(dest_property.clone(), value);
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapperError;
    use crate::mapping::rule::{Condition, PropertyRule, Transformer};

    fn config_with(rules: Vec<(&str, PropertyRule)>) -> MappingConfiguration {
        let mut config = MappingConfiguration::new("map", "Dest");
        for (name, rule) in rules {
            config.insert_rule(name, rule);
        }
        config
    }

    fn nested_source() -> ValueMap {
        let mut profile = ValueMap::new();
        profile.insert("email".to_string(), Value::from("a@b.com"));
        let mut user = ValueMap::new();
        user.insert("profile".to_string(), Value::Map(profile));
        let mut source = ValueMap::new();
        source.insert("user".to_string(), Value::Map(user));
        source
    }

    #[test]
    fn test_dotted_path_lookup() {
        let config = config_with(vec![("dest", PropertyRule::same_name("user.profile.email"))]);
        let out = DataTransformer::new()
            .transform(&nested_source(), &config)
            .unwrap();
        assert_eq!(out.get("dest"), Some(&Value::from("a@b.com")));
    }

    #[test]
    fn test_missing_path_yields_null() {
        let config = config_with(vec![("dest", PropertyRule::same_name("user.missing.email"))]);
        let out = DataTransformer::new()
            .transform(&nested_source(), &config)
            .unwrap();
        assert_eq!(out.get("dest"), Some(&Value::Null));
    }

    #[test]
    fn test_ignore_omits_key() {
        let mut rule = PropertyRule::same_name("name");
        rule.ignore = true;
        let config = config_with(vec![("name", rule)]);
        let out = DataTransformer::new()
            .transform(&ValueMap::new(), &config)
            .unwrap();
        assert!(!out.contains_key("name"));
    }

    #[test]
    fn test_failed_condition_with_default_emits_default() {
        let mut rule = PropertyRule::same_name("name");
        rule.condition = Some(Condition::predicate(|_| false));
        rule.default = Some(Value::from("fallback"));
        rule.has_default = true;
        let config = config_with(vec![("name", rule)]);

        let out = DataTransformer::new()
            .transform(&ValueMap::new(), &config)
            .unwrap();
        assert_eq!(out.get("name"), Some(&Value::from("fallback")));
    }

    #[test]
    fn test_failed_condition_without_default_omits_key() {
        let mut rule = PropertyRule::same_name("name");
        rule.condition = Some(Condition::predicate(|_| false));
        let config = config_with(vec![("name", rule)]);

        let out = DataTransformer::new()
            .transform(&ValueMap::new(), &config)
            .unwrap();
        assert!(!out.contains_key("name"));
    }

    #[test]
    fn test_transformer_with_context() {
        let mut rule = PropertyRule::same_name("greeting");
        rule.transformer = Some(Transformer::with_context(|value, source| {
            let name = source
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("nobody");
            match value {
                Value::String(prefix) => Ok(Value::String(format!("{prefix} {name}"))),
                other => Ok(other),
            }
        }));
        let config = config_with(vec![("greeting", rule)]);

        let mut source = ValueMap::new();
        source.insert("greeting".to_string(), Value::from("hello"));
        source.insert("name".to_string(), Value::from("bob"));

        let out = DataTransformer::new().transform(&source, &config).unwrap();
        assert_eq!(out.get("greeting"), Some(&Value::from("hello bob")));
    }

    #[test]
    fn test_null_after_transform_gets_default() {
        let mut rule = PropertyRule::same_name("nick");
        rule.transformer = Some(Transformer::simple(|_| Ok(Value::Null)));
        rule.default = Some(Value::from("anon"));
        rule.has_default = true;
        let config = config_with(vec![("nick", rule)]);

        let mut source = ValueMap::new();
        source.insert("nick".to_string(), Value::from("set"));

        let out = DataTransformer::new().transform(&source, &config).unwrap();
        assert_eq!(out.get("nick"), Some(&Value::from("anon")));
    }

    #[test]
    fn test_transformer_error_propagates() {
        let mut rule = PropertyRule::same_name("name");
        rule.transformer = Some(Transformer::simple(|_| {
            Err(MapperError::transformer("name", "boom"))
        }));
        let config = config_with(vec![("name", rule)]);

        let err = DataTransformer::new()
            .transform(&ValueMap::new(), &config)
            .unwrap_err();
        assert!(matches!(err, MapperError::Transformer { .. }));
    }

    #[test]
    fn test_empty_source_key_skipped() {
        let mut rule = PropertyRule::same_name("x");
        rule.source_key = String::new();
        let config = config_with(vec![("x", rule)]);

        let out = DataTransformer::new()
            .transform(&ValueMap::new(), &config)
            .unwrap();
        assert!(out.is_empty());
    }
}
