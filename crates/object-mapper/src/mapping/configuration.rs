//! Resolved mapping configurations and their cache keys.

use indexmap::IndexMap;

use super::rule::PropertyRule;

/// Build the cache key for a (source type, destination type) pair.
#[must_use]
pub fn pair_key(source_type: &str, dest_type: &str) -> String {
    format!("{source_type}->{dest_type}")
}

/// Resolved set of per-destination-property rules for one type pair.
///
/// Rules are kept in destination-property declaration order. Once a
/// configuration is cached it is treated as immutable for its key until the
/// cache is explicitly cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingConfiguration {
    source_type: String,
    dest_type: String,
    rules: IndexMap<String, PropertyRule>,
}

impl MappingConfiguration {
    /// Create an empty configuration for a type pair.
    pub fn new(source_type: impl Into<String>, dest_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            dest_type: dest_type.into(),
            rules: IndexMap::new(),
        }
    }

    /// Source type name (or the map sentinel).
    #[must_use]
    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    /// Destination type name.
    #[must_use]
    pub fn dest_type(&self) -> &str {
        &self.dest_type
    }

    /// Cache key for this configuration.
    #[must_use]
    pub fn cache_key(&self) -> String {
        pair_key(&self.source_type, &self.dest_type)
    }

    /// Insert or replace the rule for a destination property.
    pub fn insert_rule(&mut self, dest_property: impl Into<String>, rule: PropertyRule) {
        self.rules.insert(dest_property.into(), rule);
    }

    /// Rule for one destination property.
    #[must_use]
    pub fn rule(&self, dest_property: &str) -> Option<&PropertyRule> {
        self.rules.get(dest_property)
    }

    /// Mutable rule access, used while the configuration is still being built.
    pub(crate) fn rule_mut(&mut self, dest_property: &str) -> Option<&mut PropertyRule> {
        self.rules.get_mut(dest_property)
    }

    /// Iterate rules in destination-property order.
    pub fn rules(&self) -> impl Iterator<Item = (&String, &PropertyRule)> {
        self.rules.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the configuration has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key() {
        assert_eq!(pair_key("map", "User"), "map->User");
    }

    #[test]
    fn test_rules_preserve_insertion_order() {
        let mut config = MappingConfiguration::new("map", "User");
        config.insert_rule("b", PropertyRule::same_name("b"));
        config.insert_rule("a", PropertyRule::same_name("a"));

        let order: Vec<_> = config.rules().map(|(name, _)| name.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(config.cache_key(), "map->User");
    }
}
