use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// Attributes sent to the resolver to select a variant.
///
/// A client handle owns one snapshot; [`crate::Confidence::with_context`]
/// derives a new snapshot through [`EvaluationContext::merged`] and never
/// mutates the parent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationContext {
    fields: BTreeMap<String, FieldValue>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_targeting_key(self, targeting_key: impl Into<String>) -> Self {
        self.with_field("targeting_key", targeting_key.into())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Shallow merge; keys in `overlay` replace keys in `self`.
    pub fn merged(&self, overlay: &EvaluationContext) -> EvaluationContext {
        let mut fields = self.fields.clone();
        fields.extend(
            overlay
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        EvaluationContext { fields }
    }
}

impl From<BTreeMap<String, FieldValue>> for EvaluationContext {
    fn from(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for EvaluationContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<FieldValue>, const N: usize> From<[(K, V); N]> for EvaluationContext {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
