//! Dot-path selection into resolved flag values.

use tracing::debug;

use crate::error::ConfidenceError;
use crate::value::{FieldValue, ValueType};

/// Follows `path` (dot separated keys) into `root` and checks the result
/// against `expected`.
///
/// Every intermediate value must be a mapping containing the next key,
/// otherwise a [`ConfidenceError::Parse`] is returned. A `null` leaf yields
/// `Ok(None)` without a type check so the caller falls back to its default.
pub fn select<'a>(
    root: &'a FieldValue,
    path: Option<&str>,
    expected: ValueType,
) -> Result<Option<&'a FieldValue>, ConfidenceError> {
    let mut value = root;

    if let Some(path) = path {
        for key in path.split('.') {
            let FieldValue::Map(map) = value else {
                debug!(key, "Value is not an object");
                return Err(ConfidenceError::Parse(format!(
                    "cannot select '{}' from a non-object value",
                    key
                )));
            };
            value = map.get(key).ok_or_else(|| {
                debug!(key, "Key not found in value");
                ConfidenceError::Parse(format!("key '{}' not found in value", key))
            })?;
        }
    }

    if value.is_null() {
        return Ok(None);
    }

    if !expected.matches(value) {
        debug!(expected = %expected, "Value did not match the expected type");
        return Err(ConfidenceError::TypeMismatch(format!(
            "type of value did not match expected type {}",
            expected
        )));
    }

    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(json: serde_json::Value) -> FieldValue {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_select_root_without_path() {
        let root = value(json!({"color": "blue"}));
        let selected = select(&root, None, ValueType::Object).unwrap();
        assert_eq!(selected, Some(&root));
    }

    #[test]
    fn test_select_nested_path() {
        let root = value(json!({"button": {"style": {"color": "blue"}}}));
        let selected = select(&root, Some("button.style.color"), ValueType::String).unwrap();
        assert_eq!(selected, Some(&FieldValue::String("blue".to_string())));
    }

    #[test]
    fn test_select_missing_key_is_parse_error() {
        let root = value(json!({"button": {"size": 3}}));
        let err = select(&root, Some("button.color"), ValueType::String).unwrap_err();
        assert!(matches!(err, ConfidenceError::Parse(_)));
    }

    #[test]
    fn test_select_through_non_object_is_parse_error() {
        let root = value(json!({"button": [1, 2]}));
        let err = select(&root, Some("button.size"), ValueType::Int).unwrap_err();
        assert!(matches!(err, ConfidenceError::Parse(_)));

        let err = select(&FieldValue::Null, Some("anything"), ValueType::Int).unwrap_err();
        assert!(matches!(err, ConfidenceError::Parse(_)));
    }

    #[test]
    fn test_null_leaf_skips_type_check() {
        let root = value(json!({"size": null}));
        assert_eq!(select(&root, Some("size"), ValueType::Int).unwrap(), None);
        assert_eq!(select(&FieldValue::Null, None, ValueType::Bool).unwrap(), None);
    }

    #[test]
    fn test_bool_is_not_an_int() {
        let root = value(json!({"enabled": true}));
        let err = select(&root, Some("enabled"), ValueType::Int).unwrap_err();
        assert!(matches!(err, ConfidenceError::TypeMismatch(_)));

        let root = value(json!({"count": 1}));
        let err = select(&root, Some("count"), ValueType::Bool).unwrap_err();
        assert!(matches!(err, ConfidenceError::TypeMismatch(_)));
    }

    #[test]
    fn test_list_elements_are_not_checked() {
        let root = value(json!({"items": [1, "two", false]}));
        let selected = select(&root, Some("items"), ValueType::List).unwrap();
        assert_eq!(selected.and_then(FieldValue::as_list).map(<[_]>::len), Some(3));
    }

    #[test]
    fn test_empty_path_segment_is_parse_error() {
        let root = value(json!({"a": {"b": 1}}));
        let err = select(&root, Some("a..b"), ValueType::Int).unwrap_err();
        assert!(matches!(err, ConfidenceError::Parse(_)));
    }
}
