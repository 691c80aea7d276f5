//! Package-native structured tools.

use super::dynamic::DynamicTool;
use crate::ports::invocable::Invocable;
use aicore_domain::{ObjectSchema, SchemaNode, ToolError, fallback_tool_description};
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

pub type StructuredToolFn =
    Arc<dyn Fn(Map<String, Value>) -> BoxFuture<'static, Result<Value, ToolError>> + Send + Sync>;

/// A tool taking a JSON object validated against its parameter schema.
#[derive(Clone)]
pub struct StructuredTool {
    name: String,
    description: String,
    schema: SchemaNode,
    func: StructuredToolFn,
}

impl StructuredTool {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: SchemaNode,
        func: F,
    ) -> Self
    where
        F: Fn(Map<String, Value>) -> BoxFuture<'static, Result<Value, ToolError>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            func: Arc::new(func),
        }
    }

    /// Convert into a string-input [`DynamicTool`].
    ///
    /// The converted tool parses its input as JSON. Non-JSON input is bound
    /// to the only property when the schema has exactly one, and rejected
    /// otherwise. Failures of the wrapped function come back as text so the
    /// model can read them.
    pub fn as_dynamic_tool(&self) -> DynamicTool {
        let description = fallback_tool_description(&self.description, &self.schema);
        let schema = self.schema.clone();
        let func = self.func.clone();
        let name = self.name.clone();

        DynamicTool::new(self.name.clone(), description, move |input: String| {
            let schema = schema.clone();
            let func = func.clone();
            let name = name.clone();
            async move {
                let arguments = parse_string_input(&input, &schema)?;
                validate_arguments(&arguments, &schema)?;
                match func(arguments).await {
                    Ok(Value::String(text)) => Ok(text),
                    Ok(other) => Ok(other.to_string()),
                    Err(e) => {
                        debug!(tool = %name, error = %e.message, "Structured tool failed");
                        Ok(format!("There was an error: \"{}\"", e.message))
                    }
                }
            }
            .boxed()
        })
    }
}

impl std::fmt::Debug for StructuredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Invocable for StructuredTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &SchemaNode {
        &self.schema
    }

    async fn invoke(&self, input: Value) -> Result<Value, ToolError> {
        let arguments = match input {
            Value::Object(map) => map,
            Value::String(text) => parse_string_input(&text, &self.schema)?,
            other => {
                return Err(ToolError::invalid_argument(format!(
                    "Expected an object, got {}",
                    other
                )));
            }
        };
        validate_arguments(&arguments, &self.schema)?;
        (self.func)(arguments).await
    }
}

fn object_schema(schema: &SchemaNode) -> Option<&ObjectSchema> {
    match schema {
        SchemaNode::Nullable(inner) => inner.as_object(),
        other => other.as_object(),
    }
}

fn parse_string_input(input: &str, schema: &SchemaNode) -> Result<Map<String, Value>, ToolError> {
    match serde_json::from_str::<Value>(input) {
        Ok(Value::Object(map)) => Ok(map),
        parsed => {
            let single = object_schema(schema)
                .filter(|object| object.properties.len() == 1)
                .map(|object| object.properties[0].name.clone());
            match (single, parsed) {
                (Some(key), _) => {
                    let mut map = Map::new();
                    map.insert(key, Value::String(input.to_string()));
                    Ok(map)
                }
                (None, Err(e)) => Err(ToolError::invalid_argument(format!(
                    "Input is not a valid JSON: {}",
                    e
                ))),
                (None, Ok(_)) => Err(ToolError::invalid_argument(
                    "Input is not a valid JSON: expected an object",
                )),
            }
        }
    }
}

fn validate_arguments(arguments: &Map<String, Value>, schema: &SchemaNode) -> Result<(), ToolError> {
    let Some(object) = object_schema(schema) else {
        return Ok(());
    };
    let missing: Vec<&str> = object
        .properties
        .iter()
        .filter(|p| object.is_required(&p.name) && !arguments.contains_key(&p.name))
        .map(|p| p.name.as_str())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ToolError::invalid_argument(format!(
            "Received tool input did not match expected schema: missing required {}",
            missing.join(", ")
        )))
    }
}
