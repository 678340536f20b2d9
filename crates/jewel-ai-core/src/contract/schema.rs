//! Schema document rendering
//!
//! Produces the `{type, description, properties?, items?}` tree that is
//! pasted verbatim into system prompts. Field order follows declaration
//! order so the document reads the same way the contract was written.

use serde_json::{Map, Value};

use super::{Contract, FieldKind, FieldSpec, ObjectShape, ScalarKind};

/// One node of the schema document
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// JSON type name
    pub node_type: &'static str,
    /// Human description
    pub description: String,
    /// Child fields for objects, in declaration order
    pub properties: Option<Vec<(String, SchemaNode)>>,
    /// Required child names for objects
    pub required: Option<Vec<String>>,
    /// Element node for arrays
    pub items: Option<Box<SchemaNode>>,
    /// Allowed values for enumerations
    pub allowed: Option<&'static [&'static str]>,
}

impl SchemaNode {
    fn leaf(node_type: &'static str, description: impl Into<String>) -> Self {
        Self {
            node_type,
            description: description.into(),
            properties: None,
            required: None,
            items: None,
            allowed: None,
        }
    }

    fn scalar(kind: &ScalarKind, description: impl Into<String>) -> Self {
        let mut node = Self::leaf(kind.type_name(), description);
        if let ScalarKind::Enum(values) = kind {
            node.allowed = Some(*values);
        }
        node
    }

    fn array(items: SchemaNode, description: impl Into<String>) -> Self {
        let mut node = Self::leaf("array", description);
        node.items = Some(Box::new(items));
        node
    }

    fn object(shape: &ObjectShape, description: impl Into<String>) -> Self {
        let mut node = Self::leaf("object", description);
        node.properties = Some(
            shape
                .fields()
                .iter()
                .map(|f| (f.name.clone(), Self::for_field(f)))
                .collect(),
        );
        node.required = Some(
            shape
                .fields()
                .iter()
                .filter(|f| !f.kind.is_optional())
                .map(|f| f.name.clone())
                .collect(),
        );
        node
    }

    fn for_field(field: &FieldSpec) -> Self {
        match &field.kind {
            FieldKind::Scalar(kind) => Self::scalar(kind, field.description.clone()),
            FieldKind::OptionalScalar(kind) => {
                Self::scalar(kind, format!("{} (optional)", field.description))
            }
            FieldKind::ArrayOf(kind) => Self::array(Self::scalar(kind, ""), field.description.clone()),
            FieldKind::Object(shape) => Self::object(shape, field.description.clone()),
            FieldKind::ArrayOfObjects(shape) => {
                Self::array(Self::object(shape, ""), field.description.clone())
            }
        }
    }

    /// Root node of a contract
    pub fn for_contract(contract: &Contract) -> Self {
        Self::object(contract.shape(), contract.description())
    }

    /// Convert to a JSON value, keeping property order
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::from(self.node_type));
        if !self.description.is_empty() {
            map.insert("description".to_string(), Value::from(self.description.clone()));
        }
        if let Some(values) = self.allowed {
            map.insert(
                "enum".to_string(),
                Value::Array(values.iter().map(|v| Value::from(*v)).collect()),
            );
        }
        if let Some(properties) = &self.properties {
            let props = properties
                .iter()
                .map(|(name, node)| (name.clone(), node.to_value()))
                .collect::<Map<String, Value>>();
            map.insert("properties".to_string(), Value::Object(props));
        }
        if let Some(required) = &self.required {
            map.insert(
                "required".to_string(),
                Value::Array(required.iter().cloned().map(Value::from).collect()),
            );
        }
        if let Some(items) = &self.items {
            map.insert("items".to_string(), items.to_value());
        }
        Value::Object(map)
    }

    /// Pretty-printed document
    pub fn to_document(&self) -> String {
        format!("{:#}", self.to_value())
    }
}
