//! Naming convention policies and their ordered registry.
//!
//! A convention recognizes names written in its style, normalizes them to a
//! comparable form (lowercase words separated by single spaces), and
//! denormalizes that form back into the convention's spelling. Normalization
//! is idempotent; `denormalize(normalize(x))` is convention-stable rather
//! than byte-identical.

use std::sync::Arc;

/// A naming-style recognizer and normalizer.
pub trait NamingConvention: Send + Sync {
    /// Convention identifier (e.g. "snake_case").
    fn name(&self) -> &'static str;

    /// Whether the given property name is written in this convention.
    fn matches(&self, name: &str) -> bool;

    /// Normalize a name to the comparable form: lowercase words joined by
    /// single spaces.
    fn normalize(&self, name: &str) -> String;

    /// Render a normalized form in this convention's spelling.
    fn denormalize(&self, normalized: &str) -> String;
}

fn split_case_boundaries(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with(' ') {
                out.push(' ');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn join_words(name: &str, separator: char) -> String {
    name.split(separator)
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `snake_case` names: lowercase words separated by underscores.
#[derive(Debug, Default)]
pub struct SnakeCaseConvention;

impl NamingConvention for SnakeCaseConvention {
    fn name(&self) -> &'static str {
        "snake_case"
    }

    fn matches(&self, name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    }

    fn normalize(&self, name: &str) -> String {
        join_words(name, '_')
    }

    fn denormalize(&self, normalized: &str) -> String {
        normalized.split_whitespace().collect::<Vec<_>>().join("_")
    }
}

/// `camelCase` names: leading lowercase word, capitalized words after it.
#[derive(Debug, Default)]
pub struct CamelCaseConvention;

impl NamingConvention for CamelCaseConvention {
    fn name(&self) -> &'static str {
        "camelCase"
    }

    fn matches(&self, name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_lowercase() => {
                name.chars().all(|c| c.is_ascii_alphanumeric())
            }
            _ => false,
        }
    }

    fn normalize(&self, name: &str) -> String {
        split_case_boundaries(name)
    }

    fn denormalize(&self, normalized: &str) -> String {
        let mut words = normalized.split_whitespace();
        let mut out = words.next().map(str::to_ascii_lowercase).unwrap_or_default();
        for word in words {
            out.push_str(&capitalize(word));
        }
        out
    }
}

/// `PascalCase` names: every word capitalized.
#[derive(Debug, Default)]
pub struct PascalCaseConvention;

impl NamingConvention for PascalCaseConvention {
    fn name(&self) -> &'static str {
        "PascalCase"
    }

    fn matches(&self, name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_uppercase() => {
                name.chars().all(|c| c.is_ascii_alphanumeric())
            }
            _ => false,
        }
    }

    fn normalize(&self, name: &str) -> String {
        split_case_boundaries(name)
    }

    fn denormalize(&self, normalized: &str) -> String {
        normalized.split_whitespace().map(capitalize).collect()
    }
}

/// `kebab-case` names: lowercase words separated by hyphens.
#[derive(Debug, Default)]
pub struct KebabCaseConvention;

impl NamingConvention for KebabCaseConvention {
    fn name(&self) -> &'static str {
        "kebab-case"
    }

    fn matches(&self, name: &str) -> bool {
        !name.is_empty()
            && name.contains('-')
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    fn normalize(&self, name: &str) -> String {
        join_words(name, '-')
    }

    fn denormalize(&self, normalized: &str) -> String {
        normalized.split_whitespace().collect::<Vec<_>>().join("-")
    }
}

/// Ordered collection of naming conventions.
///
/// Registration order matters: convention-detection ties are broken in favor
/// of the earliest registered convention.
#[derive(Clone, Default)]
pub struct ConventionRegistry {
    conventions: Vec<Arc<dyn NamingConvention>>,
}

impl ConventionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in conventions registered:
    /// snake_case, camelCase, PascalCase, kebab-case.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SnakeCaseConvention));
        registry.register(Arc::new(CamelCaseConvention));
        registry.register(Arc::new(PascalCaseConvention));
        registry.register(Arc::new(KebabCaseConvention));
        registry
    }

    /// Append a convention.
    pub fn register(&mut self, convention: Arc<dyn NamingConvention>) {
        self.conventions.push(convention);
    }

    /// Iterate conventions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn NamingConvention>> {
        self.conventions.iter()
    }

    /// Number of registered conventions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conventions.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conventions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        let conv = SnakeCaseConvention;
        assert!(conv.matches("first_name"));
        assert!(conv.matches("id"));
        assert!(!conv.matches("firstName"));
        assert!(!conv.matches("first-name"));
        assert_eq!(conv.normalize("first_name"), "first name");
        assert_eq!(conv.denormalize("first name"), "first_name");
    }

    #[test]
    fn test_camel_case() {
        let conv = CamelCaseConvention;
        assert!(conv.matches("firstName"));
        assert!(conv.matches("id"));
        assert!(!conv.matches("FirstName"));
        assert!(!conv.matches("first_name"));
        assert_eq!(conv.normalize("firstName"), "first name");
        assert_eq!(conv.denormalize("first name"), "firstName");
    }

    #[test]
    fn test_pascal_case() {
        let conv = PascalCaseConvention;
        assert!(conv.matches("FirstName"));
        assert!(!conv.matches("firstName"));
        assert_eq!(conv.normalize("FirstName"), "first name");
        assert_eq!(conv.denormalize("first name"), "FirstName");
    }

    #[test]
    fn test_kebab_case() {
        let conv = KebabCaseConvention;
        assert!(conv.matches("first-name"));
        assert!(!conv.matches("first_name"));
        assert!(!conv.matches("plain"));
        assert_eq!(conv.normalize("first-name"), "first name");
        assert_eq!(conv.denormalize("first name"), "first-name");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let conventions: Vec<Box<dyn NamingConvention>> = vec![
            Box::new(SnakeCaseConvention),
            Box::new(CamelCaseConvention),
            Box::new(PascalCaseConvention),
            Box::new(KebabCaseConvention),
        ];
        for conv in &conventions {
            let once = conv.normalize("firstName");
            assert_eq!(conv.normalize(&once), once, "{}", conv.name());
        }
    }

    #[test]
    fn test_registry_order() {
        let registry = ConventionRegistry::with_defaults();
        let names: Vec<_> = registry.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["snake_case", "camelCase", "PascalCase", "kebab-case"]
        );
    }
}
