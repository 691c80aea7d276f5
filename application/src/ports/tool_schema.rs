//! Tool schema conversion port.
//!
//! Separates "which tools to use" (the discovered [`ToolSet`]) from "how to
//! serialize them for the endpoint" (infrastructure).

use crate::ports::invocable::Invocable;
use crate::tools::ToolSet;
use serde_json::Value;

/// Port for converting tools to the endpoint's wire format.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool to its wire definition.
    fn tool_to_schema(&self, tool: &dyn Invocable) -> Value;

    /// Convert all tools, keeping the tool set order (used for binding).
    fn bind_schema(&self, tools: &ToolSet) -> Vec<Value> {
        tools.iter().map(|tool| self.tool_to_schema(tool.as_ref())).collect()
    }

    /// Convert all tools, sorted by name.
    fn all_tools_schema(&self, tools: &ToolSet) -> Vec<Value> {
        let mut sorted: Vec<_> = tools.iter().collect();
        sorted.sort_by(|a, b| a.name().cmp(b.name()));
        sorted
            .into_iter()
            .map(|tool| self.tool_to_schema(tool.as_ref()))
            .collect()
    }
}
