//! Wire types for the SAP AI Core inference and token endpoints.
//!
//! Chat completions follow the OpenAI-compatible shape served by
//! `/v2/inference/deployments/{id}/chat/completions`.

use super::error::{AiCoreError, Result};
use aicore_domain::{
    ContentBlock, GenerationOptions, LlmResponse, Message, Role, StopReason, ToolCallRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Header naming the resource group of the deployment.
pub const RESOURCE_GROUP_HEADER: &str = "AI-Resource-Group";

/// Chat completions URL for a deployment.
pub fn completions_url(base_url: &str, deployment_id: &str) -> String {
    format!(
        "{}/v2/inference/deployments/{}/chat/completions",
        base_url.trim_end_matches('/'),
        deployment_id
    )
}

/// Token endpoint, accepting both the bare service-key `url` and a full
/// `.../oauth/token` URL.
pub fn token_url(oauth_url: &str) -> String {
    let base = oauth_url.trim_end_matches('/');
    if base.ends_with("/oauth/token") {
        base.to_string()
    } else {
        format!("{}/oauth/token", base)
    }
}

// ─── Request ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    pub fn new(messages: &[Message], tools: &[Value], options: &GenerationOptions) -> Self {
        Self {
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: tools.to_vec(),
            temperature: options.temperature,
            top_p: options.top_p,
            max_tokens: options.max_tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        // Assistant tool-call turns may have no text; the endpoint wants null then.
        let content = if message.role == Role::Assistant
            && message.has_tool_calls()
            && message.content.is_empty()
        {
            None
        } else {
            Some(message.content.clone())
        };
        Self {
            role: message.role.as_str().to_string(),
            content,
            tool_calls: message.tool_calls.iter().map(WireToolCall::from).collect(),
            tool_call_id: message.tool_call_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub kind: String,
    pub function: WireFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

/// Function name plus JSON-encoded arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

impl From<&ToolCallRequest> for WireToolCall {
    fn from(call: &ToolCallRequest) -> Self {
        Self {
            id: call.call_id.clone(),
            kind: function_type(),
            function: WireFunctionCall {
                name: call.tool_name.clone(),
                arguments: Value::Object(call.arguments.clone()).to_string(),
            },
        }
    }
}

impl WireToolCall {
    /// Decode the arguments string.
    ///
    /// Arguments that are not a JSON object are kept as text under `input`,
    /// which is what single-input tools read.
    pub fn arguments_map(&self) -> Map<String, Value> {
        let raw = self.function.arguments.trim();
        if raw.is_empty() {
            return Map::new();
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                let mut map = Map::new();
                map.insert("input".to_string(), other);
                map
            }
            Err(e) => {
                warn!(tool = %self.function.name, error = %e, "Tool arguments are not valid JSON");
                let mut map = Map::new();
                map.insert("input".to_string(), Value::String(raw.to_string()));
                map
            }
        }
    }
}

// ─── Response ────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: WireMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl ChatCompletionResponse {
    /// Convert the first choice into a domain response.
    ///
    /// Text comes first, followed by tool-call directives in the order the
    /// endpoint listed them.
    pub fn into_llm_response(self) -> Result<LlmResponse> {
        let Some(choice) = self.choices.into_iter().next() else {
            return Err(AiCoreError::UnexpectedResponse(
                "response contains no choices".to_string(),
            ));
        };

        let mut content = Vec::with_capacity(choice.message.tool_calls.len() + 1);
        if let Some(text) = choice.message.content.as_deref()
            && !text.is_empty()
        {
            content.push(ContentBlock::Text(text.to_string()));
        }
        for call in &choice.message.tool_calls {
            content.push(ContentBlock::ToolUse {
                id: call.id.clone(),
                name: call.function.name.clone(),
                input: call.arguments_map(),
            });
        }

        Ok(LlmResponse {
            content,
            stop_reason: choice
                .finish_reason
                .as_deref()
                .map(StopReason::from_finish_reason),
            model: self.model,
        })
    }
}

// ─── OAuth ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}
