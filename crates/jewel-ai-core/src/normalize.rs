//! Contract-driven cleanup of validated records
//!
//! One routine serves every task: the contract's field kinds decide what is
//! touched. String leaves are trimmed (absent ones become `""`), string
//! arrays are trimmed element-wise with empty elements dropped, nested
//! objects and arrays of objects recurse. Integer fields written as `3.0`
//! become `3`; other numbers, booleans and enum values are copied unchanged.
//! Keys outside the contract are dropped.
//!
//! `normalize(normalize(x)) == normalize(x)` for every valid `x`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::contract::{Contract, FieldKind, ObjectShape, ScalarKind};
use crate::validate::ValidatedRecord;

/// A validated record after cleanup; the shape callers receive
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord(Map<String, Value>);

impl NormalizedRecord {
    pub(crate) fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Borrow the underlying object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Look up a top-level field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Top-level string field, if present and a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Convert into a plain JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<NormalizedRecord> for ValidatedRecord {
    fn from(record: NormalizedRecord) -> Self {
        ValidatedRecord::from_map(record.0)
    }
}

/// Clean a validated record according to its contract
pub fn normalize(contract: &Contract, record: ValidatedRecord) -> NormalizedRecord {
    NormalizedRecord(normalize_shape(contract.shape(), record.as_map()))
}

fn normalize_shape(shape: &ObjectShape, source: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for field in shape.fields() {
        let value = source.get(&field.name);
        let cleaned = match &field.kind {
            FieldKind::Scalar(kind) | FieldKind::OptionalScalar(kind) if kind.is_text() => {
                Some(Value::String(trimmed(value)))
            }
            FieldKind::Scalar(kind) | FieldKind::OptionalScalar(kind) => {
                value.filter(|v| !v.is_null()).map(|v| kind.canonical(v))
            }
            FieldKind::ArrayOf(ScalarKind::String) => Some(Value::Array(
                value
                    .and_then(Value::as_array)
                    .map(|items| clean_strings(items))
                    .unwrap_or_default(),
            )),
            FieldKind::ArrayOf(kind) => Some(Value::Array(
                value
                    .and_then(Value::as_array)
                    .map(|items| items.iter().map(|v| kind.canonical(v)).collect())
                    .unwrap_or_default(),
            )),
            FieldKind::Object(inner) => {
                let empty = Map::new();
                let nested = value.and_then(Value::as_object).unwrap_or(&empty);
                Some(Value::Object(normalize_shape(inner, nested)))
            }
            FieldKind::ArrayOfObjects(inner) => Some(Value::Array(
                value
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(Value::as_object)
                            .map(|item| Value::Object(normalize_shape(inner, item)))
                            .collect()
                    })
                    .unwrap_or_default(),
            )),
        };
        if let Some(cleaned) = cleaned {
            out.insert(field.name.clone(), cleaned);
        }
    }
    out
}

fn trimmed(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn clean_strings(items: &[Value]) -> Vec<Value> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Value::String(s.to_string()))
        .collect()
}
