//! Tool parameter schemas.
//!
//! [`SchemaNode`] is the normalized parameter schema a tool exposes. It is
//! built either from an example payload ([`SchemaNode::from_example`]) or
//! from a JSON-Schema definition ([`SchemaNode::from_definition`]).
//!
//! The model endpoint rejects reference and union constructs anywhere in a
//! schema, so they never make it into a `SchemaNode`: nullable unions are
//! resolved into [`SchemaNode::Nullable`], everything else listed in
//! [`UNSUPPORTED_KEYWORDS`] is dropped. [`simplify_for_target`] applies the
//! same stripping to raw JSON schemas that are forwarded as-is.
//!
//! ```text
//! example JSON ──from_example──┐
//!                              ├──▶ SchemaNode ──to_json──▶ endpoint wire schema
//! JSON Schema ──from_definition┘        │
//!                                       └──describe_parameters──▶ prose fallback
//! ```

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use thiserror::Error;

/// Keywords the endpoint rejects at any depth.
pub const UNSUPPORTED_KEYWORDS: [&str; 8] = [
    "$schema",
    "$id",
    "definitions",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "$ref",
];

/// Errors raised while reading a schema definition.
///
/// Every variant names the JSON path of the offending node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Schema at `{path}` must be a JSON object")]
    NotAnObject { path: String },

    #[error("Unsupported type {found} at `{path}`")]
    UnsupportedType { path: String, found: String },

    #[error("Array schema at `{path}` is missing `items`")]
    MissingItems { path: String },

    #[error("`properties` at `{path}` must be an object")]
    InvalidProperties { path: String },

    #[error("`required` at `{path}` must be an array of property names")]
    InvalidRequired { path: String },
}

/// A named object property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub description: Option<String>,
    pub schema: SchemaNode,
}

impl Property {
    pub fn new(name: impl Into<String>, schema: SchemaNode) -> Self {
        Self {
            name: name.into(),
            description: None,
            schema,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Object node: ordered properties plus the set of required names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub properties: Vec<Property>,
    pub required: BTreeSet<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property (builder pattern).
    pub fn property(mut self, property: Property, required: bool) -> Self {
        if required {
            self.required.insert(property.name.clone());
        }
        self.properties.push(property);
        self
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Normalized parameter schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Null,
    Boolean,
    Number,
    String,
    Array(Box<SchemaNode>),
    Object(ObjectSchema),
    /// Optional/nullable wrapper around another node.
    Nullable(Box<SchemaNode>),
}

impl SchemaNode {
    /// Object schema with a single string property, the shape of
    /// string-input tools.
    pub fn single_string(name: &str, description: &str) -> Self {
        SchemaNode::Object(ObjectSchema::new().property(
            Property::new(name, SchemaNode::String).with_description(description),
            true,
        ))
    }

    /// Infer a schema from an example payload.
    ///
    /// Examples carry no optionality signal, so callers normally pass
    /// `all_required = true`. Empty arrays infer string items.
    pub fn from_example(example: &Value, all_required: bool) -> Self {
        match example {
            Value::Null => SchemaNode::Null,
            Value::Bool(_) => SchemaNode::Boolean,
            Value::Number(_) => SchemaNode::Number,
            Value::String(_) => SchemaNode::String,
            Value::Array(items) => {
                let item = items
                    .first()
                    .map(|first| SchemaNode::from_example(first, all_required))
                    .unwrap_or(SchemaNode::String);
                SchemaNode::Array(Box::new(item))
            }
            Value::Object(fields) => {
                let mut object = ObjectSchema::new();
                for (name, value) in fields {
                    object = object.property(
                        Property::new(name, SchemaNode::from_example(value, all_required)),
                        all_required,
                    );
                }
                SchemaNode::Object(object)
            }
        }
    }

    /// Read a JSON-Schema definition.
    ///
    /// Nullable unions are resolved, other unsupported keywords are ignored,
    /// `integer` becomes `Number` and nodes without a recognizable type
    /// default to `String`.
    pub fn from_definition(definition: &Value) -> Result<Self, SchemaError> {
        parse_node(definition, "$")
    }

    /// Mark every object property as required, at every depth.
    pub fn require_all(self) -> Self {
        match self {
            SchemaNode::Object(object) => {
                let properties: Vec<Property> = object
                    .properties
                    .into_iter()
                    .map(|p| Property {
                        schema: p.schema.require_all(),
                        ..p
                    })
                    .collect();
                let required = properties.iter().map(|p| p.name.clone()).collect();
                SchemaNode::Object(ObjectSchema {
                    properties,
                    required,
                })
            }
            SchemaNode::Array(items) => SchemaNode::Array(Box::new(items.require_all())),
            SchemaNode::Nullable(inner) => SchemaNode::Nullable(Box::new(inner.require_all())),
            other => other,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            SchemaNode::Object(object) => Some(object),
            _ => None,
        }
    }

    /// One-word type used in prose descriptions.
    ///
    /// Unwraps a single optional/nullable level; anything unrecognized is
    /// reported as `string`.
    pub fn simplified_type(&self) -> &'static str {
        match self {
            SchemaNode::Nullable(inner) => match inner.as_ref() {
                SchemaNode::Nullable(_) => "string",
                other => other.simplified_type(),
            },
            SchemaNode::Object(_) => "object",
            SchemaNode::Number => "number",
            SchemaNode::Boolean => "boolean",
            SchemaNode::Array(_) => "array",
            _ => "string",
        }
    }

    /// Render as a JSON schema the endpoint accepts.
    pub fn to_json(&self) -> Value {
        match self {
            SchemaNode::Null => serde_json::json!({"type": "null"}),
            SchemaNode::Boolean => serde_json::json!({"type": "boolean"}),
            SchemaNode::Number => serde_json::json!({"type": "number"}),
            SchemaNode::String => serde_json::json!({"type": "string"}),
            SchemaNode::Array(items) => serde_json::json!({
                "type": "array",
                "items": items.to_json(),
            }),
            SchemaNode::Object(object) => {
                let mut properties = Map::new();
                for property in &object.properties {
                    let mut schema = property.schema.to_json();
                    if let (Some(description), Value::Object(map)) =
                        (&property.description, &mut schema)
                    {
                        map.insert("description".to_string(), Value::from(description.as_str()));
                    }
                    properties.insert(property.name.clone(), schema);
                }
                let required: Vec<Value> = object
                    .properties
                    .iter()
                    .filter(|p| object.is_required(&p.name))
                    .map(|p| Value::from(p.name.as_str()))
                    .collect();
                serde_json::json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                })
            }
            // Optionality is expressed through `required` on the parent.
            SchemaNode::Nullable(inner) => inner.to_json(),
        }
    }
}

/// Remove [`UNSUPPORTED_KEYWORDS`] from a raw JSON schema, at every depth.
///
/// Keys of a `properties` map are property names, not keywords, so they
/// are kept (their schemas are still simplified).
pub fn simplify_for_target(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut simplified = Map::new();
            for (key, value) in map {
                if UNSUPPORTED_KEYWORDS.contains(&key.as_str()) {
                    continue;
                }
                let value = match (key.as_str(), value) {
                    ("properties", Value::Object(properties)) => Value::Object(
                        properties
                            .iter()
                            .map(|(name, child)| (name.clone(), simplify_for_target(child)))
                            .collect(),
                    ),
                    _ => simplify_for_target(value),
                };
                simplified.insert(key.clone(), value);
            }
            Value::Object(simplified)
        }
        Value::Array(items) => Value::Array(items.iter().map(simplify_for_target).collect()),
        other => other.clone(),
    }
}

fn parse_node(value: &Value, path: &str) -> Result<SchemaNode, SchemaError> {
    let Some(obj) = value.as_object() else {
        return Err(SchemaError::NotAnObject {
            path: path.to_string(),
        });
    };

    if let Some((keyword, inner)) = nullable_union(obj) {
        let inner = parse_node(inner, &format!("{path}.{keyword}"))?;
        return Ok(SchemaNode::Nullable(Box::new(inner)));
    }

    let node = match obj.get("type") {
        Some(Value::String(kind)) => parse_typed(obj, kind, path)?,
        Some(Value::Array(kinds)) => {
            let mut names = Vec::with_capacity(kinds.len());
            for kind in kinds {
                let Some(name) = kind.as_str() else {
                    return Err(SchemaError::UnsupportedType {
                        path: path.to_string(),
                        found: kind.to_string(),
                    });
                };
                names.push(name);
            }
            let has_null = names.contains(&"null");
            let non_null: Vec<&str> = names.into_iter().filter(|n| *n != "null").collect();
            match non_null.as_slice() {
                [] => SchemaNode::Null,
                [single] if has_null => {
                    SchemaNode::Nullable(Box::new(parse_typed(obj, single, path)?))
                }
                [single] => parse_typed(obj, single, path)?,
                // Multi-type unions are not accepted by the endpoint.
                _ => SchemaNode::String,
            }
        }
        Some(other) => {
            return Err(SchemaError::UnsupportedType {
                path: path.to_string(),
                found: other.to_string(),
            });
        }
        None if obj.contains_key("properties") => parse_typed(obj, "object", path)?,
        None if obj.contains_key("items") => parse_typed(obj, "array", path)?,
        None => SchemaNode::String,
    };

    if obj.get("nullable") == Some(&Value::Bool(true)) && !matches!(node, SchemaNode::Nullable(_)) {
        return Ok(SchemaNode::Nullable(Box::new(node)));
    }
    Ok(node)
}

fn parse_typed(obj: &Map<String, Value>, kind: &str, path: &str) -> Result<SchemaNode, SchemaError> {
    match kind {
        "object" => parse_object(obj, path).map(SchemaNode::Object),
        "array" => {
            let items = match obj.get("items") {
                Some(Value::Array(tuple)) => tuple.first(),
                Some(items) => Some(items),
                None => None,
            };
            let Some(items) = items else {
                return Err(SchemaError::MissingItems {
                    path: path.to_string(),
                });
            };
            let items = parse_node(items, &format!("{path}.items"))?;
            Ok(SchemaNode::Array(Box::new(items)))
        }
        "string" => Ok(SchemaNode::String),
        "number" | "integer" => Ok(SchemaNode::Number),
        "boolean" => Ok(SchemaNode::Boolean),
        "null" => Ok(SchemaNode::Null),
        other => Err(SchemaError::UnsupportedType {
            path: path.to_string(),
            found: format!("\"{other}\""),
        }),
    }
}

fn parse_object(obj: &Map<String, Value>, path: &str) -> Result<ObjectSchema, SchemaError> {
    let mut object = ObjectSchema::new();

    match obj.get("properties") {
        None => {}
        Some(Value::Object(properties)) => {
            for (name, child) in properties {
                let schema = parse_node(child, &format!("{path}.properties.{name}"))?;
                let mut property = Property::new(name, schema);
                if let Some(description) = child.get("description").and_then(|d| d.as_str()) {
                    property = property.with_description(description);
                }
                object.properties.push(property);
            }
        }
        Some(_) => {
            return Err(SchemaError::InvalidProperties {
                path: path.to_string(),
            });
        }
    }

    match obj.get("required") {
        None => {}
        Some(Value::Array(names)) => {
            for name in names {
                let Some(name) = name.as_str() else {
                    return Err(SchemaError::InvalidRequired {
                        path: path.to_string(),
                    });
                };
                object.required.insert(name.to_string());
            }
        }
        Some(_) => {
            return Err(SchemaError::InvalidRequired {
                path: path.to_string(),
            });
        }
    }

    Ok(object)
}

/// Detect `anyOf`/`oneOf` of exactly one schema plus `{"type": "null"}`.
fn nullable_union(obj: &Map<String, Value>) -> Option<(&'static str, &Value)> {
    for keyword in ["anyOf", "oneOf"] {
        let Some(Value::Array(branches)) = obj.get(keyword) else {
            continue;
        };
        if branches.len() != 2 {
            continue;
        }
        let is_null = |v: &Value| v.get("type").and_then(|t| t.as_str()) == Some("null");
        match (is_null(&branches[0]), is_null(&branches[1])) {
            (true, false) => return Some((keyword, &branches[1])),
            (false, true) => return Some((keyword, &branches[0])),
            _ => {}
        }
    }
    None
}
