//! # Field values
//!
//! The recursive value model shared by evaluation contexts and resolved flag
//! values, plus the type descriptors used to validate extracted values.
//!
//! JSON integers map to [`FieldValue::Int`] and any other JSON number maps to
//! [`FieldValue::Float`], so an integer-typed request never accepts `1.5` and a
//! float-typed request never accepts `1`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A mapping of field names to values.
pub type Object = BTreeMap<String, FieldValue>;

/// A JSON-like value: a primitive, a list or a mapping.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FieldValue>),
    Map(Object),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Object> for FieldValue {
    fn from(value: Object) -> Self {
        FieldValue::Map(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => n.as_f64().map_or(FieldValue::Null, FieldValue::Float),
            },
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Array(arr) => {
                FieldValue::List(arr.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(obj) => FieldValue::Map(
                obj.into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// The shape a caller expects an extracted value to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    String,
    List,
    Object,
}

impl ValueType {
    /// Structural match. Booleans and integers are distinct kinds; list
    /// elements are not inspected.
    pub fn matches(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (ValueType::Bool, FieldValue::Bool(_))
                | (ValueType::Int, FieldValue::Int(_))
                | (ValueType::Float, FieldValue::Float(_))
                | (ValueType::String, FieldValue::String(_))
                | (ValueType::List, FieldValue::List(_))
                | (ValueType::Object, FieldValue::Map(_))
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Object => "object",
        };
        f.write_str(name)
    }
}

/// Rust types a flag value can be resolved into.
pub trait FlagValue: Sized {
    const VALUE_TYPE: ValueType;

    /// Converts a value that already passed [`ValueType::matches`].
    fn from_field_value(value: &FieldValue) -> Option<Self>;
}

impl FlagValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FlagValue for i64 {
    const VALUE_TYPE: ValueType = ValueType::Int;

    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value.as_i64()
    }
}

impl FlagValue for f64 {
    const VALUE_TYPE: ValueType = ValueType::Float;

    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value.as_f64()
    }
}

impl FlagValue for String {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value.as_str().map(String::from)
    }
}

impl FlagValue for Object {
    const VALUE_TYPE: ValueType = ValueType::Object;

    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl FlagValue for Vec<FieldValue> {
    const VALUE_TYPE: ValueType = ValueType::List;

    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value.as_list().map(<[FieldValue]>::to_vec)
    }
}

/// Resolves like `T`, with `None` as a default that callers can tell apart
/// from any resolved value.
impl<T: FlagValue> FlagValue for Option<T> {
    const VALUE_TYPE: ValueType = T::VALUE_TYPE;

    fn from_field_value(value: &FieldValue) -> Option<Self> {
        T::from_field_value(value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_distinguishes_numbers() {
        let value: FieldValue = serde_json::from_value(json!({
            "count": 3,
            "ratio": 0.5,
            "whole": 2.0,
            "enabled": true,
            "missing": null
        }))
        .unwrap();

        let map = value.as_object().unwrap();
        assert_eq!(map["count"], FieldValue::Int(3));
        assert_eq!(map["ratio"], FieldValue::Float(0.5));
        assert_eq!(map["whole"], FieldValue::Float(2.0));
        assert_eq!(map["enabled"], FieldValue::Bool(true));
        assert_eq!(map["missing"], FieldValue::Null);
    }

    #[test]
    fn test_serialize_is_plain_json() {
        let mut map = Object::new();
        map.insert("name".to_string(), "x".into());
        map.insert("tags".to_string(), vec![FieldValue::from(1), FieldValue::Null].into());

        let json = serde_json::to_value(FieldValue::Map(map)).unwrap();
        assert_eq!(json, json!({"name": "x", "tags": [1, null]}));
    }

    #[test]
    fn test_from_json_value() {
        let value = FieldValue::from(json!({"a": [1, 2.5, "s"]}));
        assert_eq!(
            value.as_object().unwrap()["a"],
            FieldValue::List(vec![
                FieldValue::Int(1),
                FieldValue::Float(2.5),
                FieldValue::String("s".to_string())
            ])
        );
    }

    #[test]
    fn test_bool_and_int_never_match_each_other() {
        assert!(!ValueType::Int.matches(&FieldValue::Bool(true)));
        assert!(!ValueType::Bool.matches(&FieldValue::Int(1)));
        assert!(ValueType::Int.matches(&FieldValue::Int(1)));
        assert!(ValueType::Bool.matches(&FieldValue::Bool(false)));
    }

    #[test]
    fn test_collection_matches() {
        assert!(ValueType::List.matches(&FieldValue::List(vec![FieldValue::Bool(true)])));
        assert!(ValueType::Object.matches(&FieldValue::Map(Object::new())));
        assert!(!ValueType::Object.matches(&FieldValue::List(vec![])));
        assert!(!ValueType::Float.matches(&FieldValue::Int(1)));
        assert!(!ValueType::String.matches(&FieldValue::Null));
    }

    #[test]
    fn test_optional_flag_value() {
        assert_eq!(<Option<i64>>::VALUE_TYPE, ValueType::Int);
        assert_eq!(
            <Option<i64>>::from_field_value(&FieldValue::Int(7)),
            Some(Some(7))
        );
        assert_eq!(<Option<bool>>::from_field_value(&FieldValue::Int(7)), None);
    }
}
