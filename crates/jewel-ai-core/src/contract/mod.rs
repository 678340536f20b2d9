//! Output contracts for AI-backed tasks
//!
//! A [`Contract`] is pure data describing the exact JSON object a task must
//! produce. It drives every later stage:
//!
//! - the schema document embedded in the system prompt ([`Contract::describe`])
//! - structural validation of the parsed reply ([`Contract::validate`])
//! - field-level cleanup ([`crate::normalize`])
//! - the zero value used for fallbacks ([`Contract::empty_default`])
//!
//! Every contract designates one required string field as its *primary
//! narrative field*, which is where fallback diagnostics are written.

pub mod schema;

pub use schema::SchemaNode;

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::{ContractError, ValidationError};
use crate::validate::{self, ValidatedRecord};

/// Kind of a scalar leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarKind {
    /// Any JSON string
    String,
    /// Any JSON number
    Number,
    /// A JSON number without a fractional part
    ///
    /// `3.0` is accepted and normalized to `3`.
    Integer,
    /// `true` or `false`
    Boolean,
    /// A string drawn from a closed set
    Enum(&'static [&'static str]),
}

impl ScalarKind {
    /// JSON schema type name
    pub const fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::String | ScalarKind::Enum(_) => "string",
            ScalarKind::Number => "number",
            ScalarKind::Integer => "integer",
            ScalarKind::Boolean => "boolean",
        }
    }

    /// Description of the kind as used in violation reports
    pub fn expected(&self) -> String {
        match self {
            ScalarKind::Enum(values) => format!("one of [{}]", values.join(", ")),
            other => other.type_name().to_string(),
        }
    }

    /// Check whether a JSON value is of this kind
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (ScalarKind::String, Value::String(_)) => true,
            (ScalarKind::Number, Value::Number(_)) => true,
            (ScalarKind::Integer, Value::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().and_then(integral).is_some()
            }
            (ScalarKind::Boolean, Value::Bool(_)) => true,
            (ScalarKind::Enum(values), Value::String(s)) => values.contains(&s.as_str()),
            _ => false,
        }
    }

    /// Zero value of this kind
    pub fn empty_value(&self) -> Value {
        match self {
            ScalarKind::String => Value::String(String::new()),
            ScalarKind::Number | ScalarKind::Integer => Value::from(0),
            ScalarKind::Boolean => Value::Bool(false),
            ScalarKind::Enum(values) => {
                Value::String(values.first().copied().unwrap_or_default().to_string())
            }
        }
    }

    /// Whether the normalizer rewrites values of this kind
    pub const fn is_text(&self) -> bool {
        matches!(self, ScalarKind::String)
    }

    /// Canonical form of a matching value
    ///
    /// Integral floats become integers; everything else is returned as is.
    pub fn canonical(&self, value: &Value) -> Value {
        match (self, value) {
            (ScalarKind::Integer, Value::Number(n)) if !(n.is_i64() || n.is_u64()) => n
                .as_f64()
                .and_then(integral)
                .map(Value::from)
                .unwrap_or_else(|| value.clone()),
            _ => value.clone(),
        }
    }
}

fn integral(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

/// Shape of a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Required scalar
    Scalar(ScalarKind),
    /// Scalar that may be absent or `null`
    OptionalScalar(ScalarKind),
    /// Required array of scalars
    ArrayOf(ScalarKind),
    /// Required nested object
    Object(ObjectShape),
    /// Required array of nested objects
    ArrayOfObjects(ObjectShape),
}

impl FieldKind {
    /// Description of the kind as used in violation reports
    pub fn expected(&self) -> String {
        match self {
            FieldKind::Scalar(kind) | FieldKind::OptionalScalar(kind) => kind.expected(),
            FieldKind::ArrayOf(kind) => format!("array of {}", kind.type_name()),
            FieldKind::Object(_) => "object".to_string(),
            FieldKind::ArrayOfObjects(_) => "array of object".to_string(),
        }
    }

    /// Whether the field may be left out
    pub const fn is_optional(&self) -> bool {
        matches!(self, FieldKind::OptionalScalar(_))
    }
}

/// A named field with a human description for the schema document
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// JSON key
    pub name: String,
    /// Text shown to the model
    pub description: String,
    /// Expected shape
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Create a field spec
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
        }
    }
}

/// Ordered list of fields making up a JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape {
    fields: Vec<FieldSpec>,
}

impl ObjectShape {
    /// Create an empty shape
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Add a required string
    pub fn string(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.scalar(ScalarKind::String, name, description)
    }

    /// Add a required scalar of any kind
    pub fn scalar(
        self,
        kind: ScalarKind,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.field(FieldSpec::new(name, description, FieldKind::Scalar(kind)))
    }

    /// Add an optional scalar
    pub fn optional(
        self,
        kind: ScalarKind,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.field(FieldSpec::new(name, description, FieldKind::OptionalScalar(kind)))
    }

    /// Add an array of strings
    pub fn string_array(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.array(ScalarKind::String, name, description)
    }

    /// Add an array of scalars
    pub fn array(
        self,
        kind: ScalarKind,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.field(FieldSpec::new(name, description, FieldKind::ArrayOf(kind)))
    }

    /// Add a nested object
    pub fn object(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        shape: ObjectShape,
    ) -> Self {
        self.field(FieldSpec::new(name, description, FieldKind::Object(shape)))
    }

    /// Add an array of nested objects
    pub fn object_array(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        shape: ObjectShape,
    ) -> Self {
        self.field(FieldSpec::new(name, description, FieldKind::ArrayOfObjects(shape)))
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Zero value of this shape
    ///
    /// Optional strings become `""` and other optional scalars are left out,
    /// matching what the normalizer produces.
    pub fn empty_value(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for field in &self.fields {
            let value = match &field.kind {
                FieldKind::Scalar(kind) => kind.empty_value(),
                FieldKind::OptionalScalar(kind) if kind.is_text() => kind.empty_value(),
                FieldKind::OptionalScalar(_) => continue,
                FieldKind::ArrayOf(_) | FieldKind::ArrayOfObjects(_) => Value::Array(Vec::new()),
                FieldKind::Object(inner) => Value::Object(inner.empty_value()),
            };
            map.insert(field.name.clone(), value);
        }
        map
    }

    fn check_fields(&self, prefix: &str, contract: &str) -> Result<(), ContractError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            let path = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{}.{}", prefix, field.name)
            };
            if !seen.insert(field.name.as_str()) {
                return Err(ContractError::DuplicateField {
                    contract: contract.to_string(),
                    path,
                });
            }
            match &field.kind {
                FieldKind::Object(inner) | FieldKind::ArrayOfObjects(inner) => {
                    inner.check_fields(&path, contract)?;
                }
                FieldKind::Scalar(ScalarKind::Enum(values))
                | FieldKind::OptionalScalar(ScalarKind::Enum(values))
                | FieldKind::ArrayOf(ScalarKind::Enum(values))
                    if values.is_empty() =>
                {
                    return Err(ContractError::EmptyEnum {
                        contract: contract.to_string(),
                        path,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// The declared output shape of one AI task
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    name: String,
    description: String,
    shape: ObjectShape,
    primary: String,
}

impl Contract {
    /// Start declaring a contract
    pub fn builder(name: impl Into<String>) -> ContractBuilder {
        ContractBuilder::new(name)
    }

    /// Contract name, used in logs and metrics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the task produces
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Top-level object shape
    pub fn shape(&self) -> &ObjectShape {
        &self.shape
    }

    /// Top-level fields in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        self.shape.fields()
    }

    /// Name of the primary narrative field
    pub fn primary_field(&self) -> &str {
        &self.primary
    }

    /// Render the schema tree embedded into prompts
    pub fn describe(&self) -> SchemaNode {
        SchemaNode::for_contract(self)
    }

    /// Schema tree serialized with indentation
    pub fn schema_document(&self) -> String {
        self.describe().to_document()
    }

    /// Check a parsed value against this contract
    pub fn validate(&self, value: &Value) -> Result<ValidatedRecord, ValidationError> {
        validate::validate(self, value)
    }

    /// Structurally valid zero value: `""`, `[]`, `0`, `false`
    pub fn empty_default(&self) -> Map<String, Value> {
        self.shape.empty_value()
    }
}

/// Builder enforcing the contract invariants
#[derive(Debug, Clone)]
pub struct ContractBuilder {
    name: String,
    description: String,
    shape: ObjectShape,
    primary: Option<String>,
}

impl ContractBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            shape: ObjectShape::new(),
            primary: None,
        }
    }

    /// Set the contract description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Name the primary narrative field
    pub fn primary(mut self, field: impl Into<String>) -> Self {
        self.primary = Some(field.into());
        self
    }

    /// Set the top-level fields
    pub fn shape(mut self, shape: ObjectShape) -> Self {
        self.shape = shape;
        self
    }

    /// Validate the declaration and produce the contract
    pub fn build(self) -> Result<Contract, ContractError> {
        let primary = self
            .primary
            .ok_or_else(|| ContractError::MissingPrimary(self.name.clone()))?;

        self.shape.check_fields("", &self.name)?;

        match self.shape.get(&primary).map(|f| &f.kind) {
            None => {
                return Err(ContractError::UnknownPrimary {
                    contract: self.name,
                    field: primary,
                })
            }
            Some(FieldKind::Scalar(ScalarKind::String)) => {}
            Some(_) => {
                return Err(ContractError::PrimaryNotString {
                    contract: self.name,
                    field: primary,
                })
            }
        }

        Ok(Contract {
            name: self.name,
            description: self.description,
            shape: self.shape,
            primary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Contract {
        Contract::builder("sample")
            .description("A sample contract")
            .primary("summary")
            .shape(
                ObjectShape::new()
                    .string("summary", "Overview")
                    .scalar(ScalarKind::Number, "score", "Score")
                    .optional(ScalarKind::String, "note", "Note")
                    .optional(ScalarKind::Integer, "rank", "Rank")
                    .string_array("tags", "Tags")
                    .scalar(ScalarKind::Enum(&["low", "high"]), "level", "Level")
                    .object("meta", "Meta", ObjectShape::new().string("author", "Author"))
                    .object_array(
                        "items",
                        "Items",
                        ObjectShape::new().string("title", "Title"),
                    ),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_primary() {
        let err = Contract::builder("x")
            .shape(ObjectShape::new().string("summary", ""))
            .build()
            .unwrap_err();
        assert_eq!(err, ContractError::MissingPrimary("x".to_string()));
    }

    #[test]
    fn test_builder_rejects_unknown_primary() {
        let err = Contract::builder("x")
            .primary("summary")
            .shape(ObjectShape::new().string("title", ""))
            .build()
            .unwrap_err();
        assert!(matches!(err, ContractError::UnknownPrimary { .. }));
    }

    #[test]
    fn test_builder_rejects_non_string_primary() {
        for shape in [
            ObjectShape::new().scalar(ScalarKind::Number, "summary", ""),
            ObjectShape::new().optional(ScalarKind::String, "summary", ""),
            ObjectShape::new().string_array("summary", ""),
        ] {
            let err = Contract::builder("x")
                .primary("summary")
                .shape(shape)
                .build()
                .unwrap_err();
            assert!(matches!(err, ContractError::PrimaryNotString { .. }));
        }
    }

    #[test]
    fn test_builder_rejects_nested_duplicates() {
        let err = Contract::builder("x")
            .primary("summary")
            .shape(ObjectShape::new().string("summary", "").object(
                "meta",
                "",
                ObjectShape::new().string("a", "").string("a", ""),
            ))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::DuplicateField {
                contract: "x".to_string(),
                path: "meta.a".to_string()
            }
        );
    }

    #[test]
    fn test_builder_rejects_empty_enums() {
        let base = || ObjectShape::new().string("summary", "");
        for shape in [
            base().scalar(ScalarKind::Enum(&[]), "level", ""),
            base().optional(ScalarKind::Enum(&[]), "level", ""),
            base().array(ScalarKind::Enum(&[]), "levels", ""),
        ] {
            let err = Contract::builder("x")
                .primary("summary")
                .shape(shape)
                .build()
                .unwrap_err();
            assert!(matches!(err, ContractError::EmptyEnum { .. }), "{:?}", err);
        }

        let err = Contract::builder("x")
            .primary("summary")
            .shape(ObjectShape::new().string("summary", "").object(
                "meta",
                "",
                ObjectShape::new().scalar(ScalarKind::Enum(&[]), "level", ""),
            ))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::EmptyEnum {
                contract: "x".to_string(),
                path: "meta.level".to_string()
            }
        );
    }

    #[test]
    fn test_scalar_matching() {
        assert!(ScalarKind::Integer.matches(&json!(3)));
        assert!(ScalarKind::Integer.matches(&json!(3.0)));
        assert!(ScalarKind::Integer.matches(&json!(-2.0)));
        assert!(!ScalarKind::Integer.matches(&json!(3.5)));
        assert!(ScalarKind::Number.matches(&json!(3.5)));
        assert!(!ScalarKind::String.matches(&json!(null)));
        assert!(ScalarKind::Enum(&["a", "b"]).matches(&json!("b")));
        assert!(!ScalarKind::Enum(&["a", "b"]).matches(&json!("c")));
    }

    #[test]
    fn test_integer_canonical_form() {
        assert_eq!(ScalarKind::Integer.canonical(&json!(3.0)), json!(3));
        assert!(ScalarKind::Integer.canonical(&json!(3.0)).is_i64());
        assert_eq!(ScalarKind::Integer.canonical(&json!(7)), json!(7));
        assert_eq!(ScalarKind::Number.canonical(&json!(3.0)), json!(3.0));
        assert!(!ScalarKind::Integer.matches(&json!(1e300)));
    }

    #[test]
    fn test_empty_default_shape() {
        let contract = sample();
        assert_eq!(
            Value::Object(contract.empty_default()),
            json!({
                "summary": "",
                "score": 0,
                "note": "",
                "tags": [],
                "level": "low",
                "meta": {"author": ""},
                "items": []
            })
        );
    }

    #[test]
    fn test_empty_default_validates() {
        let contract = sample();
        let empty = Value::Object(contract.empty_default());
        assert!(contract.validate(&empty).is_ok());
    }

    #[test]
    fn test_expected_descriptions() {
        assert_eq!(FieldKind::ArrayOf(ScalarKind::String).expected(), "array of string");
        assert_eq!(
            FieldKind::Scalar(ScalarKind::Enum(&["low", "high"])).expected(),
            "one of [low, high]"
        );
        assert!(FieldKind::OptionalScalar(ScalarKind::Boolean).is_optional());
    }
}
