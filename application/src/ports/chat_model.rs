//! Chat model port
//!
//! Defines the interface for talking to a hosted chat completion endpoint,
//! plus the retry classification hook consulted by the caller's own retry
//! policy.

use aicore_domain::{ConfigError, LlmResponse, Message, NodeError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during model endpoint operations
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Deployment not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Endpoint returned status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Tool binding failed: {0}")]
    BindingFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,

    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Node(#[from] NodeError),

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// HTTP-like status carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GatewayError::Status { code, .. } => Some(*code),
            GatewayError::Node(e) => e.http_code,
            _ => None,
        }
    }
}

/// Advice returned by [`classify_failed_attempt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAdvice {
    Retry,
    DoNotRetry,
}

/// Statuses that will not succeed on a second attempt. 408 is absent on purpose.
const NO_RETRY_STATUSES: [u16; 9] = [400, 401, 402, 403, 404, 405, 406, 407, 409];

/// Classify a failed attempt for the caller's retry policy.
///
/// This layer never retries by itself.
pub fn classify_failed_attempt(error: &GatewayError) -> RetryAdvice {
    if let Some(code) = error.status_code()
        && NO_RETRY_STATUSES.contains(&code)
    {
        return RetryAdvice::DoNotRetry;
    }

    match error {
        GatewayError::Node(e) if e.retryable == Some(false) => RetryAdvice::DoNotRetry,
        GatewayError::Cancelled | GatewayError::Configuration(_) => RetryAdvice::DoNotRetry,
        GatewayError::RequestFailed(message) | GatewayError::Other(message)
            if message.starts_with("Cancel") || message.starts_with("AbortError") =>
        {
            RetryAdvice::DoNotRetry
        }
        _ => RetryAdvice::Retry,
    }
}

/// A chat completion endpoint.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Name of the model or deployment behind this handle
    fn model_name(&self) -> &str;

    /// Return a tool-aware handle that sends `tools` with every request.
    ///
    /// `tools` are already in the endpoint's wire format
    /// (see [`ToolSchemaPort`](super::tool_schema::ToolSchemaPort)).
    fn bind_tools(&self, tools: &[Value]) -> Result<Box<dyn ChatModel>, GatewayError>;

    /// Submit a conversation and wait for the full response
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, GatewayError>;
}

#[async_trait]
impl<T: ChatModel + ?Sized> ChatModel for Box<T> {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn bind_tools(&self, tools: &[Value]) -> Result<Box<dyn ChatModel>, GatewayError> {
        (**self).bind_tools(tools)
    }

    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, GatewayError> {
        (**self).invoke(messages).await
    }
}

#[async_trait]
impl<T: ChatModel + ?Sized> ChatModel for Arc<T> {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn bind_tools(&self, tools: &[Value]) -> Result<Box<dyn ChatModel>, GatewayError> {
        (**self).bind_tools(tools)
    }

    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, GatewayError> {
        (**self).invoke(messages).await
    }
}
