//! Generic value tree for type-agnostic data mapping.
//!
//! Every mapping operation works on [`Value`] trees: sources are normalized
//! into a [`ValueMap`], rules are applied against it, and destinations are
//! built back from the transformed map.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered key/value map used for normalized source data and built instances.
///
/// Insertion order is preserved so destination properties come out in rule
/// declaration order.
pub type ValueMap = IndexMap<String, Value>;

/// Dynamically typed value for mapping input and output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent or null value.
    Null,

    /// Boolean value.
    Bool(bool),

    /// 64-bit signed integer.
    Int(i64),

    /// 64-bit floating point.
    Float(f64),

    /// Text value.
    String(String),

    /// Ordered list of values.
    Array(Vec<Value>),

    /// Nested key/value map.
    Map(ValueMap),
}

impl Value {
    /// Check if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get a short name for the value's kind, used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Borrow the nested map if this value is a map.
    #[must_use]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow the string if this value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

// From implementations for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<ValueMap> for Value {
    fn from(v: ValueMap) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Resolve a dotted path against a value map.
///
/// `"a.b.c"` walks nested maps segment by segment. Returns `None` when any
/// segment is missing or the intermediate value is not a map. A key without
/// dots is a direct lookup.
#[must_use]
pub fn lookup_path<'a>(map: &'a ValueMap, path: &str) -> Option<&'a Value> {
    if !path.contains('.') {
        return map.get(path);
    }

    let mut current = map;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let value = current.get(segment)?;
        if segments.peek().is_none() {
            return Some(value);
        }
        current = value.as_map()?;
    }
    None
}
