//! Structural validation of parsed replies against a contract
//!
//! The walk visits the contract and the value in lock-step and collects
//! every violation rather than stopping at the first. Keys the contract does
//! not mention are ignored so that a model adding extra commentary fields
//! does not fail an otherwise good reply.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::contract::{Contract, FieldKind, ObjectShape, ScalarKind};
use crate::error::ValidationError;

/// Path used for the reply as a whole
pub const ROOT_PATH: &str = "$";

/// One mismatch between a value and its contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path with `[i]` element indices, e.g. `designIdeas[1].title`
    pub path: String,
    /// Expected kind, e.g. `number` or `array of string`
    pub expected: String,
    /// What was there instead, e.g. `missing` or `string`
    pub found: String,
}

impl Violation {
    /// Create a violation
    pub fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: expected {}, found {}", self.path, self.expected, self.found)
    }
}

/// A reply object that passed validation
///
/// Only [`validate`] (and conversion from an already normalized record)
/// can produce one.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord(Map<String, Value>);

impl ValidatedRecord {
    pub(crate) fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Borrow the underlying object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the underlying object
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Check `value` against `contract`
pub fn validate(contract: &Contract, value: &Value) -> Result<ValidatedRecord, ValidationError> {
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(ValidationError::new(vec![Violation::new(
                ROOT_PATH,
                "object",
                json_type(other),
            )]))
        }
    };

    let mut violations = Vec::new();
    check_shape(contract.shape(), object, "", &mut violations);

    if violations.is_empty() {
        Ok(ValidatedRecord(object.clone()))
    } else {
        tracing::debug!(
            contract = contract.name(),
            violations = violations.len(),
            "Reply failed contract validation"
        );
        Err(ValidationError::new(violations))
    }
}

fn check_shape(
    shape: &ObjectShape,
    object: &Map<String, Value>,
    prefix: &str,
    violations: &mut Vec<Violation>,
) {
    for field in shape.fields() {
        let path = join_path(prefix, &field.name);
        let value = object.get(&field.name);

        match &field.kind {
            FieldKind::Scalar(kind) => match value {
                Some(v) if kind.matches(v) => {}
                other => violations.push(Violation::new(path, kind.expected(), describe_found(kind, other))),
            },
            FieldKind::OptionalScalar(kind) => match value {
                None | Some(Value::Null) => {}
                Some(v) if kind.matches(v) => {}
                other => violations.push(Violation::new(path, kind.expected(), describe_found(kind, other))),
            },
            FieldKind::ArrayOf(kind) => match value {
                Some(Value::Array(items)) => {
                    for (index, item) in items.iter().enumerate() {
                        if !kind.matches(item) {
                            violations.push(Violation::new(
                                format!("{}[{}]", path, index),
                                kind.expected(),
                                describe_found(kind, Some(item)),
                            ));
                        }
                    }
                }
                other => violations.push(Violation::new(path, field.kind.expected(), found_type(other))),
            },
            FieldKind::Object(inner) => match value {
                Some(Value::Object(nested)) => check_shape(inner, nested, &path, violations),
                other => violations.push(Violation::new(path, "object", found_type(other))),
            },
            FieldKind::ArrayOfObjects(inner) => match value {
                Some(Value::Array(items)) => {
                    for (index, item) in items.iter().enumerate() {
                        let item_path = format!("{}[{}]", path, index);
                        match item {
                            Value::Object(nested) => {
                                check_shape(inner, nested, &item_path, violations)
                            }
                            other => violations.push(Violation::new(
                                item_path,
                                "object",
                                json_type(other),
                            )),
                        }
                    }
                }
                other => violations.push(Violation::new(path, field.kind.expected(), found_type(other))),
            },
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// JSON type name of a value
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn found_type(value: Option<&Value>) -> String {
    value.map(json_type).unwrap_or("missing").to_string()
}

/// Name the offending value when the type alone would not explain the mismatch
fn describe_found(kind: &ScalarKind, value: Option<&Value>) -> String {
    match (kind, value) {
        (ScalarKind::Enum(_), Some(Value::String(s))) => format!("\"{}\"", s),
        (ScalarKind::Integer, Some(Value::Number(n))) => format!("number {}", n),
        (_, other) => found_type(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ObjectShape;
    use serde_json::json;

    fn contract() -> Contract {
        Contract::builder("test")
            .primary("summary")
            .shape(
                ObjectShape::new()
                    .string("summary", "")
                    .scalar(ScalarKind::Number, "score", "")
                    .optional(ScalarKind::Integer, "rank", "")
                    .string_array("colors", "")
                    .scalar(ScalarKind::Enum(&["low", "high"]), "level", "")
                    .object("profile", "", ObjectShape::new().string("style", ""))
                    .object_array(
                        "ideas",
                        "",
                        ObjectShape::new().string("title", "").string_array("features", ""),
                    ),
            )
            .build()
            .unwrap()
    }

    fn valid_value() -> Value {
        json!({
            "summary": "ok",
            "score": 0.5,
            "colors": ["#fff"],
            "level": "low",
            "profile": {"style": "minimal"},
            "ideas": [{"title": "Ring", "features": ["thin band"]}]
        })
    }

    fn paths(err: &ValidationError) -> Vec<&str> {
        err.violations.iter().map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn test_valid_value_passes() {
        let record = contract().validate(&valid_value()).unwrap();
        assert_eq!(record.as_map().get("summary"), Some(&json!("ok")));
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let mut value = valid_value();
        value["commentary"] = json!("extra");
        value["profile"]["mood"] = json!(42);
        assert!(contract().validate(&value).is_ok());
    }

    #[test]
    fn test_missing_required_scalar() {
        let mut value = valid_value();
        value.as_object_mut().unwrap().remove("score");
        let err = contract().validate(&value).unwrap_err();
        assert_eq!(err.violations, vec![Violation::new("score", "number", "missing")]);
    }

    #[test]
    fn test_optional_scalar_rules() {
        let mut value = valid_value();
        value["rank"] = json!(null);
        assert!(contract().validate(&value).is_ok());

        value["rank"] = json!(2.5);
        let err = contract().validate(&value).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::new("rank", "integer", "number 2.5")]
        );
    }

    #[test]
    fn test_array_elements_report_index() {
        let mut value = valid_value();
        value["colors"] = json!(["#fff", 3, "#000", null]);
        let err = contract().validate(&value).unwrap_err();
        assert_eq!(paths(&err), vec!["colors[1]", "colors[3]"]);
        assert_eq!(err.violations[0].found, "number");
    }

    #[test]
    fn test_nested_paths_are_prefixed() {
        let mut value = valid_value();
        value["profile"] = json!({});
        value["ideas"] = json!([{"title": "A", "features": []}, {"features": ["x", 1]}, "oops"]);
        let err = contract().validate(&value).unwrap_err();
        assert_eq!(
            paths(&err),
            vec!["profile.style", "ideas[1].title", "ideas[1].features[1]", "ideas[2]"]
        );
    }

    #[test]
    fn test_reports_all_violations() {
        let err = contract().validate(&json!({"summary": 1})).unwrap_err();
        assert_eq!(
            paths(&err),
            vec!["summary", "score", "colors", "level", "profile", "ideas"]
        );
        assert_eq!(err.violations[2].expected, "array of string");
    }

    #[test]
    fn test_enum_mismatch_names_value() {
        let mut value = valid_value();
        value["level"] = json!("extreme");
        let err = contract().validate(&value).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::new("level", "one of [low, high]", "\"extreme\"")]
        );
    }

    #[test]
    fn test_non_object_root() {
        let err = contract().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.violations, vec![Violation::new(ROOT_PATH, "object", "array")]);
    }

    #[test]
    fn test_violation_display() {
        let v = Violation::new("score", "number", "missing");
        assert_eq!(v.to_string(), "score: expected number, found missing");
    }
}
