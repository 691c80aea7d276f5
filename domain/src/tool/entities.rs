//! Tool call entities

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tool-call directive taken from a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallRequest {
    /// Endpoint-assigned id, used to pair the result with this request.
    pub call_id: String,
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCallRequest {
    pub fn new(call_id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_arguments(mut self, arguments: Map<String, Value>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Arguments as a JSON object value, ready to hand to a tool.
    pub fn arguments_value(&self) -> Value {
        Value::Object(self.arguments.clone())
    }
}

/// Outcome of one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolOutcome {
    #[serde(rename = "output")]
    Output(Value),
    #[serde(rename = "errorMessage")]
    Error(String),
}

impl ToolOutcome {
    /// Text fed back to the model in the synthetic `tool` message.
    ///
    /// Errors render as `Error: <message>`, outputs as their JSON encoding.
    pub fn render(&self) -> String {
        match self {
            ToolOutcome::Output(value) => {
                serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
            }
            ToolOutcome::Error(message) => format!("Error: {}", message),
        }
    }
}

/// Result of one tool-call directive, paired with its request by `call_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub call_id: String,
    pub tool_name: String,
    #[serde(flatten)]
    pub outcome: ToolOutcome,
}

impl ToolCallResult {
    pub fn output(request: &ToolCallRequest, output: Value) -> Self {
        Self {
            call_id: request.call_id.clone(),
            tool_name: request.tool_name.clone(),
            outcome: ToolOutcome::Output(output),
        }
    }

    pub fn error(request: &ToolCallRequest, message: impl Into<String>) -> Self {
        Self {
            call_id: request.call_id.clone(),
            tool_name: request.tool_name.clone(),
            outcome: ToolOutcome::Error(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Error(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            ToolOutcome::Error(message) => Some(message),
            ToolOutcome::Output(_) => None,
        }
    }
}
