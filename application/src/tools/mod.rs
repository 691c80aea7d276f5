//! Connected tools and the tool set handed to the orchestrator.
//!
//! Tools arrive from the host in several shapes ([`ConnectedTool`]).
//! [`DiscoverToolsUseCase`](crate::use_cases::discover_tools::DiscoverToolsUseCase)
//! validates and adapts them into a [`ToolSet`] of [`Invocable`]s.

pub mod dynamic;
pub mod legacy;
pub mod structured;

pub use dynamic::DynamicTool;
pub use legacy::{InvocationMember, LegacyAdapter, LegacyTool};
pub use structured::StructuredTool;

use crate::ports::invocable::Invocable;
use aicore_domain::{SchemaNode, ToolError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A value received on a tool connection.
#[derive(Clone)]
pub enum ConnectedTool {
    /// Already in generic form.
    Invocable(Arc<dyn Invocable>),
    /// Package-native tool, converted to a [`DynamicTool`] on request.
    Structured(StructuredTool),
    /// Raw members of an older tool node.
    Legacy(LegacyTool),
    /// Aggregate expanding into several tools.
    Toolkit(Toolkit),
    /// Anything that is not a tool at all.
    Other(Value),
}

impl ConnectedTool {
    pub fn invocable(tool: impl Invocable + 'static) -> Self {
        ConnectedTool::Invocable(Arc::new(tool))
    }

    /// Short label used in logs.
    pub fn shape(&self) -> &'static str {
        match self {
            ConnectedTool::Invocable(_) => "tool",
            ConnectedTool::Structured(_) => "structured tool",
            ConnectedTool::Legacy(_) => "legacy tool",
            ConnectedTool::Toolkit(_) => "toolkit",
            ConnectedTool::Other(_) => "non-tool value",
        }
    }
}

impl std::fmt::Debug for ConnectedTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectedTool::Invocable(tool) => f.debug_tuple("Invocable").field(&tool.name()).finish(),
            ConnectedTool::Structured(tool) => f.debug_tuple("Structured").field(tool).finish(),
            ConnectedTool::Legacy(tool) => f.debug_tuple("Legacy").field(tool).finish(),
            ConnectedTool::Toolkit(kit) => f.debug_tuple("Toolkit").field(&kit.name).finish(),
            ConnectedTool::Other(value) => f.debug_tuple("Other").field(value).finish(),
        }
    }
}

/// A named group of tools.
#[derive(Clone, Debug)]
pub struct Toolkit {
    pub name: String,
    pub tools: Vec<ConnectedTool>,
}

impl Toolkit {
    pub fn new(name: impl Into<String>, tools: Vec<ConnectedTool>) -> Self {
        Self {
            name: name.into(),
            tools,
        }
    }
}

/// Ordered, validated tools for one orchestration run.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Invocable>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tools(tools: Vec<Arc<dyn Invocable>>) -> Self {
        Self { tools }
    }

    /// Add a tool (builder pattern).
    pub fn with(mut self, tool: impl Invocable + 'static) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    pub fn push(&mut self, tool: Arc<dyn Invocable>) {
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Invocable>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Invocable>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Tool wrapper that replaces the advertised description.
pub struct DescribedTool {
    inner: Arc<dyn Invocable>,
    description: String,
}

impl DescribedTool {
    pub fn new(inner: Arc<dyn Invocable>, description: impl Into<String>) -> Self {
        Self {
            inner,
            description: description.into(),
        }
    }
}

#[async_trait]
impl Invocable for DescribedTool {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &SchemaNode {
        self.inner.parameters()
    }

    async fn invoke(&self, input: Value) -> Result<Value, ToolError> {
        self.inner.invoke(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use serde_json::json;

    fn echo(name: &str) -> DynamicTool {
        DynamicTool::new(name, "Echo", |input: String| async move { Ok(input) }.boxed())
    }

    #[test]
    fn test_tool_set_keeps_order_and_looks_up_by_name() {
        let tools = ToolSet::new().with(echo("b")).with(echo("a"));
        assert_eq!(tools.names(), vec!["b", "a"]);
        assert_eq!(tools.len(), 2);
        assert!(tools.get("a").is_some());
        assert!(tools.get("c").is_none());
    }

    #[tokio::test]
    async fn test_described_tool_overrides_description_only() {
        let inner: Arc<dyn Invocable> = Arc::new(echo("echo"));
        let tool = DescribedTool::new(inner, "Echo {{x}}");
        assert_eq!(tool.name(), "echo");
        assert_eq!(tool.description(), "Echo {{x}}");
        assert_eq!(tool.invoke(json!("hi")).await.unwrap(), json!("hi"));
    }

    #[test]
    fn test_connected_tool_shape() {
        assert_eq!(ConnectedTool::Other(json!(42)).shape(), "non-tool value");
        assert_eq!(ConnectedTool::invocable(echo("x")).shape(), "tool");
    }
}
