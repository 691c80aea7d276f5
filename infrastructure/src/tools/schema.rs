//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] producing the
//! OpenAI-compatible function definitions the SAP AI Core chat endpoint
//! accepts.

use aicore_application::ports::invocable::Invocable;
use aicore_application::ports::tool_schema::ToolSchemaPort;
use aicore_domain::simplify_for_target;
use serde_json::json;

/// Default implementation producing function-calling definitions.
///
/// ```text
/// {"type": "function",
///  "function": {"name": .., "description": .., "parameters": <JSON Schema>}}
/// ```
///
/// `parameters` is passed through [`simplify_for_target`], so keywords the
/// endpoint rejects never reach it.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &dyn Invocable) -> serde_json::Value {
        json!({
            "type": "function",
            "function": {
                "name": tool.name(),
                "description": tool.description(),
                "parameters": simplify_for_target(&tool.parameters().to_json()),
            }
        })
    }
}
