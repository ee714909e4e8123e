//! Static type descriptors for mapping destinations and sources.
//!
//! Instead of introspecting types at call time, every participating type is
//! described once by a [`TypeSchema`]: its properties, their kinds, and the
//! constructor parameter list used for type-aware defaulting. Schemas are
//! registered in the [`TypeCatalog`](super::catalog::TypeCatalog) or supplied
//! by a [`Mapped`](super::traits::Mapped) implementation.

use serde::{Deserialize, Serialize};

use super::value::Value;

/// Kind of value a property or constructor parameter holds.
///
/// Used to synthesize type-appropriate zero values when a constructor
/// parameter is absent from the transformed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
    Array,
    Map,
    /// Another registered type, by name.
    Object(String),
}

/// One property of a described type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// Property name as it appears in value maps.
    pub name: String,

    /// Kind of value the property holds.
    pub kind: ValueKind,

    /// Whether the property accepts null.
    #[serde(default)]
    pub nullable: bool,

    /// Whether the property can be written after construction.
    ///
    /// Write-once fields set this to `false`; best-effort population skips
    /// them, strict population fails on them.
    #[serde(default = "default_writable")]
    pub writable: bool,
}

fn default_writable() -> bool {
    true
}

impl PropertySchema {
    /// Create a writable, non-nullable property.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            writable: true,
        }
    }

    /// Mark the property as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the property as write-once (not writable after construction).
    #[must_use]
    pub fn write_once(mut self) -> Self {
        self.writable = false;
        self
    }
}

/// One constructor parameter of a described type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorParam {
    /// Parameter name, matched against transformed data keys.
    pub name: String,

    /// Kind of value the parameter expects.
    pub kind: ValueKind,

    /// Whether the parameter accepts null.
    #[serde(default)]
    pub nullable: bool,

    /// Declared default, used when the parameter is absent from data.
    #[serde(default)]
    pub default: Option<Value>,
}

impl ConstructorParam {
    /// Create a required, non-nullable parameter.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            default: None,
        }
    }

    /// Mark the parameter as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Attach a declared default value.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Static descriptor for one mappable type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSchema {
    /// Type name used as the mapping cache key component.
    pub name: String,

    /// Properties in declaration order.
    pub properties: Vec<PropertySchema>,

    /// Constructor parameters in declaration order, if the type has one.
    ///
    /// `None` means the type is built by field population alone.
    #[serde(default)]
    pub constructor: Option<Vec<ConstructorParam>>,
}

impl TypeSchema {
    /// Create a schema with no properties and no constructor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            constructor: None,
        }
    }

    /// Add a property.
    #[must_use]
    pub fn with_property(mut self, property: PropertySchema) -> Self {
        self.properties.push(property);
        self
    }

    /// Set the constructor parameter list.
    #[must_use]
    pub fn with_constructor(mut self, params: Vec<ConstructorParam>) -> Self {
        self.constructor = Some(params);
        self
    }

    /// Look up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Iterate property names in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builder() {
        let schema = TypeSchema::new("User")
            .with_property(PropertySchema::new("id", ValueKind::Int))
            .with_property(PropertySchema::new("name", ValueKind::String).nullable())
            .with_constructor(vec![
                ConstructorParam::new("id", ValueKind::Int),
                ConstructorParam::new("name", ValueKind::String)
                    .with_default(Value::from("anonymous")),
            ]);

        assert_eq!(schema.name, "User");
        assert_eq!(schema.properties.len(), 2);
        assert!(schema.property("name").unwrap().nullable);
        assert!(schema.property("missing").is_none());

        let params = schema.constructor.as_ref().unwrap();
        assert_eq!(params[1].default, Some(Value::from("anonymous")));
    }

    #[test]
    fn test_write_once_property() {
        let prop = PropertySchema::new("created_at", ValueKind::String).write_once();
        assert!(!prop.writable);
    }
}
