//! Chat model response types.
//!
//! A model answers either with plain text or with a mix of text and
//! tool-call directives. [`LlmResponse`] models both.
//!
//! ```text
//! no tools bound:   invoke() → LlmResponse { [Text] }
//! tools bound:      invoke() → LlmResponse { [Text?, ToolUse, ToolUse, ...] }
//! ```

use crate::tool::entities::ToolCallRequest;
use serde::{Deserialize, Serialize};

/// A single block of content within a model response.
///
/// # Examples
///
/// ```
/// use aicore_domain::session::response::ContentBlock;
///
/// let text = ContentBlock::Text("Let me look that up.".to_string());
/// assert!(text.as_text().is_some());
///
/// let tool = ContentBlock::ToolUse {
///     id: "call_abc123".to_string(),
///     name: "weather".to_string(),
///     input: serde_json::json!({"city": "Walldorf"}).as_object().unwrap().clone(),
/// };
/// assert!(tool.as_tool_use().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text produced by the model.
    Text(String),

    /// A tool-call directive.
    ToolUse {
        /// Endpoint-assigned id used to pair the result with the request.
        id: String,
        /// Name of the requested tool.
        name: String,
        /// Arguments for the tool.
        input: serde_json::Map<String, serde_json::Value>,
    },
}

impl ContentBlock {
    /// Returns the text content if this is a `Text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `(id, name, input)` if this is a `ToolUse` block.
    pub fn as_tool_use(&self) -> Option<(&str, &str, &serde_json::Map<String, serde_json::Value>)> {
        match self {
            ContentBlock::ToolUse { id, name, input } => Some((id, name, input)),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response.
    EndTurn,
    /// The model wants tools executed.
    ToolUse,
    /// Token limit reached, the answer may be truncated.
    MaxTokens,
    /// Endpoint-specific stop reason.
    Other(String),
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason`.
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "stop" => StopReason::EndTurn,
            "tool_calls" | "function_call" => StopReason::ToolUse,
            "length" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// A structured model response.
///
/// # Examples
///
/// ```
/// use aicore_domain::session::response::{LlmResponse, ContentBlock, StopReason};
///
/// let response = LlmResponse::from_text("Hello!");
/// assert_eq!(response.text_content(), "Hello!");
/// assert!(!response.has_tool_calls());
///
/// let response = LlmResponse {
///     content: vec![ContentBlock::ToolUse {
///         id: "call_1".to_string(),
///         name: "weather".to_string(),
///         input: serde_json::Map::new(),
///     }],
///     stop_reason: Some(StopReason::ToolUse),
///     model: Some("gpt-4o".to_string()),
/// };
/// assert_eq!(response.tool_calls().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Content blocks in the response (text and/or tool use).
    pub content: Vec<ContentBlock>,
    /// Why the model stopped generating.
    pub stop_reason: Option<StopReason>,
    /// Model identifier (if returned by the endpoint).
    pub model: Option<String>,
}

impl LlmResponse {
    /// Create a text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// Concatenate all `Text` content blocks into a single string.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract the tool-call directives, in the order the model returned them.
    pub fn tool_calls(&self) -> Vec<ToolCallRequest> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => {
                    Some(ToolCallRequest::new(id, name).with_arguments(input.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Returns `true` if the response contains any tool-call directive.
    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn from_text_creates_text_only_response() {
        let response = LlmResponse::from_text("Hello, world!");
        assert_eq!(response.text_content(), "Hello, world!");
        assert!(!response.has_tool_calls());
        assert!(response.tool_calls().is_empty());
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
    }

    #[test]
    fn tool_calls_keep_model_order() {
        let response = LlmResponse {
            content: vec![
                ContentBlock::Text("Checking.".to_string()),
                ContentBlock::ToolUse {
                    id: "call_b".to_string(),
                    name: "second".to_string(),
                    input: args(json!({"x": 1})),
                },
                ContentBlock::ToolUse {
                    id: "call_a".to_string(),
                    name: "first".to_string(),
                    input: args(json!({})),
                },
            ],
            stop_reason: Some(StopReason::ToolUse),
            model: None,
        };

        let calls = response.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].call_id, "call_b");
        assert_eq!(calls[0].tool_name, "second");
        assert_eq!(calls[0].arguments["x"], 1);
        assert_eq!(calls[1].call_id, "call_a");
        assert_eq!(response.text_content(), "Checking.");
    }

    #[test]
    fn finish_reason_mapping() {
        assert_eq!(StopReason::from_finish_reason("stop"), StopReason::EndTurn);
        assert_eq!(StopReason::from_finish_reason("tool_calls"), StopReason::ToolUse);
        assert_eq!(StopReason::from_finish_reason("length"), StopReason::MaxTokens);
        assert_eq!(
            StopReason::from_finish_reason("content_filter"),
            StopReason::Other("content_filter".to_string())
        );
    }

    #[test]
    fn empty_response() {
        let response = LlmResponse {
            content: vec![],
            stop_reason: None,
            model: None,
        };
        assert_eq!(response.text_content(), "");
        assert!(!response.has_tool_calls());
    }
}
