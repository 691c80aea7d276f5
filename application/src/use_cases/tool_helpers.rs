//! Shared helpers for tool use cases.

use aicore_domain::ToolCallRequest;
use aicore_domain::util::log_preview;

/// Extract a short preview string from tool call arguments.
///
/// Looks for well-known keys (`input`, `query`, `url`, `id`) first, then
/// falls back to the first string value found.
pub(crate) fn tool_args_preview(call: &ToolCallRequest) -> String {
    let keys = ["input", "query", "url", "id"];
    for key in &keys {
        if let Some(s) = call.get_string(key) {
            return log_preview(s, 50);
        }
    }
    // Fallback: first string value
    for value in call.arguments.values() {
        if let Some(s) = value.as_str() {
            return log_preview(s, 50);
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_call() -> ToolCallRequest {
        ToolCallRequest::new("call_1", "test_tool")
    }

    #[test]
    fn test_query_key_preferred() {
        let call = make_call().with_arg("other", "ignored").with_arg("query", "sap ai core");
        assert_eq!(tool_args_preview(&call), "sap ai core");
    }

    #[test]
    fn test_input_key() {
        let call = make_call().with_arg("input", r#"{"a": 1}"#);
        assert_eq!(tool_args_preview(&call), r#"{"a": 1}"#);
    }

    #[test]
    fn test_fallback_to_first_string() {
        let call = make_call().with_arg("count", 3).with_arg("city", "Walldorf");
        assert_eq!(tool_args_preview(&call), "Walldorf");
    }

    #[test]
    fn test_no_string_values() {
        let call = make_call().with_arg("count", json!(42));
        assert_eq!(tool_args_preview(&call), "");
    }

    #[test]
    fn test_truncation() {
        let call = make_call().with_arg("url", "a".repeat(100));
        let result = tool_args_preview(&call);
        assert_eq!(result.len(), 53);
        assert!(result.ends_with("..."));
    }
}
