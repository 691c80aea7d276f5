//! Adapters for legacy tool shapes.
//!
//! Older tool nodes expose their invocation through one of three members:
//! a callable `func` field, a `call` method or an internal `_call` method.
//! They arrive here as [`LegacyTool`] records and are turned into a single
//! [`Invocable`] at the registry boundary.

use crate::ports::invocable::Invocable;
use aicore_domain::{SchemaNode, ToolError};
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

pub type LegacyToolFn =
    Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, ToolError>> + Send + Sync>;

/// Which member the adapter calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMember {
    Func,
    Call,
    InternalCall,
}

impl InvocationMember {
    pub fn as_str(&self) -> &str {
        match self {
            InvocationMember::Func => "func",
            InvocationMember::Call => "call",
            InvocationMember::InternalCall => "_call",
        }
    }
}

/// A tool described by its raw members.
#[derive(Clone, Default)]
pub struct LegacyTool {
    pub name: Option<String>,
    pub description: Option<String>,
    pub schema: Option<SchemaNode>,
    pub func: Option<LegacyToolFn>,
    pub call: Option<LegacyToolFn>,
    pub internal_call: Option<LegacyToolFn>,
}

impl LegacyTool {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_func<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> BoxFuture<'static, Result<Value, ToolError>> + Send + Sync + 'static,
    {
        self.func = Some(Arc::new(f));
        self
    }

    pub fn with_call<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> BoxFuture<'static, Result<Value, ToolError>> + Send + Sync + 'static,
    {
        self.call = Some(Arc::new(f));
        self
    }

    pub fn with_internal_call<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> BoxFuture<'static, Result<Value, ToolError>> + Send + Sync + 'static,
    {
        self.internal_call = Some(Arc::new(f));
        self
    }

    /// Non-empty name, if any.
    pub fn tool_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }

    /// Pick the invocation member, `func` first, then `call`, then `_call`.
    pub fn invocation(&self) -> Option<(InvocationMember, LegacyToolFn)> {
        self.func
            .clone()
            .map(|f| (InvocationMember::Func, f))
            .or_else(|| self.call.clone().map(|f| (InvocationMember::Call, f)))
            .or_else(|| {
                self.internal_call
                    .clone()
                    .map(|f| (InvocationMember::InternalCall, f))
            })
    }

    /// Adapt into an [`Invocable`]; `None` when the record has no usable
    /// name or no invocation member.
    pub fn into_invocable(self) -> Option<LegacyAdapter> {
        let name = self.tool_name()?.to_string();
        let (member, func) = self.invocation()?;
        Some(LegacyAdapter {
            name,
            description: self.description.unwrap_or_default(),
            schema: self
                .schema
                .unwrap_or_else(|| SchemaNode::single_string("input", "")),
            member,
            func,
        })
    }
}

impl std::fmt::Debug for LegacyTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("func", &self.func.is_some())
            .field("call", &self.call.is_some())
            .field("_call", &self.internal_call.is_some())
            .finish()
    }
}

/// [`Invocable`] view of a [`LegacyTool`].
pub struct LegacyAdapter {
    name: String,
    description: String,
    schema: SchemaNode,
    member: InvocationMember,
    func: LegacyToolFn,
}

impl LegacyAdapter {
    pub fn member(&self) -> InvocationMember {
        self.member
    }
}

#[async_trait]
impl Invocable for LegacyAdapter {
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
        (self.func)(input).await
    }
}
