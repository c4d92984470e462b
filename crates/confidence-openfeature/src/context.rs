use confidence_sdk::{EvaluationContext as ConfidenceContext, FieldValue, Object};
use open_feature::{EvaluationContext, EvaluationContextFieldValue, StructValue, Value};
use tracing::debug;

/// Converts an OpenFeature context into the attributes sent to the resolver.
///
/// The targeting key is stored under `targeting_key`. Struct fields are only
/// understood when they hold a [`StructValue`]; anything else becomes an
/// empty map.
pub(crate) fn to_confidence_context(context: &EvaluationContext) -> ConfidenceContext {
    let mut fields: Object = context
        .custom_fields
        .iter()
        .map(|(key, value)| (key.clone(), field_to_value(key, value)))
        .collect();

    if let Some(targeting_key) = &context.targeting_key {
        fields.insert(
            "targeting_key".to_string(),
            FieldValue::String(targeting_key.clone()),
        );
    }

    ConfidenceContext::from(fields)
}

fn field_to_value(key: &str, value: &EvaluationContextFieldValue) -> FieldValue {
    match value {
        EvaluationContextFieldValue::Bool(b) => FieldValue::Bool(*b),
        EvaluationContextFieldValue::Int(i) => FieldValue::Int(*i),
        EvaluationContextFieldValue::Float(f) => FieldValue::Float(*f),
        EvaluationContextFieldValue::String(s) => FieldValue::String(s.clone()),
        EvaluationContextFieldValue::DateTime(dt) => FieldValue::String(dt.to_string()),
        EvaluationContextFieldValue::Struct(s) => match s.downcast_ref::<StructValue>() {
            Some(struct_value) => FieldValue::Map(struct_to_object(struct_value)),
            None => {
                debug!(key, "Unsupported struct in evaluation context, sending empty map");
                FieldValue::Map(Object::new())
            }
        },
    }
}

fn struct_to_object(value: &StructValue) -> Object {
    value
        .fields
        .iter()
        .map(|(k, v)| (k.clone(), value_to_field(v)))
        .collect()
}

fn value_to_field(value: &Value) -> FieldValue {
    match value {
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Int(i) => FieldValue::Int(*i),
        Value::Float(f) => FieldValue::Float(*f),
        Value::String(s) => FieldValue::String(s.clone()),
        Value::Array(items) => FieldValue::List(items.iter().map(value_to_field).collect()),
        Value::Struct(s) => FieldValue::Map(struct_to_object(s)),
    }
}

/// Converts a resolved object into an OpenFeature struct. Null fields are
/// dropped since [`Value`] has no null.
pub(crate) fn object_to_struct(object: &Object) -> StructValue {
    StructValue {
        fields: object
            .iter()
            .filter_map(|(k, v)| field_to_feature_value(v).map(|v| (k.clone(), v)))
            .collect(),
    }
}

fn field_to_feature_value(value: &FieldValue) -> Option<Value> {
    match value {
        FieldValue::Null => None,
        FieldValue::Bool(b) => Some(Value::Bool(*b)),
        FieldValue::Int(i) => Some(Value::Int(*i)),
        FieldValue::Float(f) => Some(Value::Float(*f)),
        FieldValue::String(s) => Some(Value::String(s.clone())),
        FieldValue::List(items) => Some(Value::Array(
            items.iter().filter_map(field_to_feature_value).collect(),
        )),
        FieldValue::Map(map) => Some(Value::Struct(object_to_struct(map))),
    }
}
