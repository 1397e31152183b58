//! Dynamic property values
//!
//! This module defines the value model carried by property slots: a small
//! closed set of scalar and container kinds, with conversions from common
//! Rust types and from JSON values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A dynamically typed property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag
    Bool(bool),

    /// Signed integer
    Int(i64),

    /// Floating point number
    Float(f64),

    /// Text value
    Text(String),

    /// Ordered list of values
    List(Vec<Value>),

    /// String-keyed map of values
    Map(BTreeMap<String, Value>),
}

/// The kind discriminant of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    List,
    Map,
}

impl Value {
    /// Create a text value
    pub fn text<S: Into<String>>(value: S) -> Self {
        Value::Text(value.into())
    }

    /// Get the kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// Get the boolean content, if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the integer content, if this is an integer value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the numeric content as a float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Get the list content, if this is a list value
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the map content, if this is a map value
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Check whether this value is empty for its kind
    ///
    /// Scalars are never empty; text, lists, and maps are empty when they
    /// hold no content.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Text(t) => t.trim().is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }
}

impl ValueKind {
    /// Get the display name for this value kind
    pub fn display_name(&self) -> &'static str {
        match self {
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(t) => f.write_str(t),
            other => {
                let rendered = serde_json::to_string(other).map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => Err("null values are not representable".to_string()),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(x) = n.as_f64() {
                    Ok(Value::Float(x))
                } else {
                    Err(format!("number {n} is out of range"))
                }
            }
            serde_json::Value::String(s) => Ok(Value::Text(s)),
            serde_json::Value::Array(items) => {
                let converted: Result<Vec<Value>, String> =
                    items.into_iter().map(Value::try_from).collect();
                Ok(Value::List(converted?))
            }
            serde_json::Value::Object(entries) => {
                let mut map = BTreeMap::new();
                for (key, entry) in entries {
                    map.insert(key, Value::try_from(entry)?);
                }
                Ok(Value::Map(map))
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(i.into()),
            Value::Float(x) => serde_json::Number::from_f64(x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(t) => serde_json::Value::String(t),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(entries) => serde_json::Value::Object(
                entries.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kinds() {
        assert_eq!(Value::Bool(true).kind(), ValueKind::Bool);
        assert_eq!(Value::Int(7).kind(), ValueKind::Int);
        assert_eq!(Value::Float(1.5).kind(), ValueKind::Float);
        assert_eq!(Value::text("hello").kind(), ValueKind::Text);
        assert_eq!(Value::List(vec![]).kind(), ValueKind::List);
        assert_eq!(Value::Map(BTreeMap::new()).kind(), ValueKind::Map);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Int(42).as_float(), Some(42.0));
        assert_eq!(Value::text("abc").as_text(), Some("abc"));
        assert_eq!(Value::text("abc").as_int(), None);
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
    }

    #[test]
    fn test_emptiness() {
        assert!(Value::text("").is_empty());
        assert!(Value::text("   ").is_empty());
        assert!(!Value::text("x").is_empty());
        assert!(Value::List(vec![]).is_empty());
        assert!(!Value::Int(0).is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::text("plain").to_string(), "plain");
        assert_eq!(Value::Bool(false).to_string(), "false");
        let list = Value::from(vec![1i64, 2, 3]);
        assert_eq!(list.to_string(), "[1,2,3]");
    }

    #[test]
    fn test_json_round_trip() {
        let original = Value::from(vec![Value::Int(1), Value::text("two")]);
        let json: serde_json::Value = original.clone().into();
        let back = Value::try_from(json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_json_null_rejected() {
        assert!(Value::try_from(serde_json::Value::Null).is_err());
    }

    #[test]
    fn test_serde_untagged() {
        let value: Value = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(value, Value::text("text"));

        let value: Value = serde_json::from_str("12").unwrap();
        assert_eq!(value, Value::Int(12));

        let value: Value = serde_json::from_str("12.5").unwrap();
        assert_eq!(value, Value::Float(12.5));
    }

    #[test]
    fn test_kind_display_names() {
        assert_eq!(ValueKind::Text.display_name(), "text");
        assert_eq!(ValueKind::Int.to_string(), "integer");
    }
}
