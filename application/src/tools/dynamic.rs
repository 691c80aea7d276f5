//! String-input tools.

use crate::ports::invocable::Invocable;
use aicore_domain::{SchemaNode, ToolError};
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

pub type DynamicToolFn =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<String, ToolError>> + Send + Sync>;

/// A tool that takes a single string `input` and returns text.
///
/// Models that cannot fill a structured schema call tools in this form; the
/// expected argument layout is then described in prose inside
/// `description`.
#[derive(Clone)]
pub struct DynamicTool {
    name: String,
    description: String,
    parameters: SchemaNode,
    func: DynamicToolFn,
}

impl DynamicTool {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, func: F) -> Self
    where
        F: Fn(String) -> BoxFuture<'static, Result<String, ToolError>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: SchemaNode::single_string("input", ""),
            func: Arc::new(func),
        }
    }

    /// Extract the string handed to the function from a model-supplied value.
    ///
    /// Accepts a bare string, `{"input": "..."}`, or anything else, which is
    /// passed on as its JSON text.
    fn input_text(input: Value) -> String {
        match input {
            Value::String(text) => text,
            Value::Object(mut map) => match map.remove("input") {
                Some(Value::String(text)) if map.is_empty() => text,
                Some(other) if map.is_empty() => other.to_string(),
                Some(other) => {
                    map.insert("input".to_string(), other);
                    Value::Object(map).to_string()
                }
                None => Value::Object(map).to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl std::fmt::Debug for DynamicTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Invocable for DynamicTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &SchemaNode {
        &self.parameters
    }

    async fn invoke(&self, input: Value) -> Result<Value, ToolError> {
        let text = Self::input_text(input);
        (self.func)(text).await.map(Value::String)
    }
}
