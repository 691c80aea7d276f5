//! Invocable tool port
//!
//! The single interface every connected tool is reduced to before it
//! reaches the orchestrator. Legacy tool shapes are adapted into it at the
//! registry boundary (see [`crate::tools`]).

use aicore_domain::{SchemaNode, ToolError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait Invocable: Send + Sync {
    /// Tool name, unique within one orchestration run
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Parameter schema advertised to the model
    fn parameters(&self) -> &SchemaNode;

    /// Run the tool with the arguments chosen by the model
    async fn invoke(&self, input: Value) -> Result<Value, ToolError>;
}

#[async_trait]
impl<T: Invocable + ?Sized> Invocable for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    fn parameters(&self) -> &SchemaNode {
        (**self).parameters()
    }

    async fn invoke(&self, input: Value) -> Result<Value, ToolError> {
        (**self).invoke(input).await
    }
}
