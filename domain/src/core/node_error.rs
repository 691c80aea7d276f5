//! Structured host errors.
//!
//! The workflow host expects failures of AI sub-nodes in one shape: a
//! message, an optional longer description and a tag saying which part of
//! the workflow produced it. [`NodeError`] is that shape. Errors from
//! capabilities that don't already use it are wrapped into a
//! [`ErrorOrigin::ConfigurationNode`] error at the interception boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which part of the workflow an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorOrigin {
    /// The node itself failed while executing.
    Node,
    /// A remote API returned an error.
    Api,
    /// A connected configuration node (memory, retriever, tool, ...) failed.
    ConfigurationNode,
}

impl ErrorOrigin {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorOrigin::Node => "node",
            ErrorOrigin::Api => "api",
            ErrorOrigin::ConfigurationNode => "configuration-node",
        }
    }
}

impl std::fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The host's structured error.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct NodeError {
    pub origin: ErrorOrigin,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_code: Option<u16>,
    /// `Some(false)` when a retry cannot succeed (cancelled, misconfigured).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl NodeError {
    pub fn new(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            origin,
            message: message.into(),
            description: None,
            http_code: None,
            retryable: None,
        }
    }

    pub fn node(message: impl Into<String>) -> Self {
        Self::new(ErrorOrigin::Node, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ErrorOrigin::Api, message)
    }

    pub fn configuration_node(message: impl Into<String>) -> Self {
        Self::new(ErrorOrigin::ConfigurationNode, message)
    }

    /// Wrap a plain failure the way the host does: the original message is
    /// kept, and doubles as the description when none was supplied.
    pub fn wrap_plain(message: impl Into<String>, description: Option<String>) -> Self {
        let message = message.into();
        let description = description.unwrap_or_else(|| message.clone());
        Self::configuration_node(message).with_description(description)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_http_code(mut self, code: u16) -> Self {
        self.http_code = Some(code);
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }
}

/// Failure of a capability operation (memory, retriever, embedder, ...).
///
/// Capabilities may fail with an already structured [`NodeError`] or with a
/// plain message. Instrumented capabilities only ever return the `Node`
/// variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error("{0}")]
    Failed(String),
}

impl CapabilityError {
    pub fn failed(message: impl Into<String>) -> Self {
        CapabilityError::Failed(message.into())
    }

    /// Returns the structured error if this failure already has the host shape.
    pub fn as_node_error(&self) -> Option<&NodeError> {
        match self {
            CapabilityError::Node(e) => Some(e),
            CapabilityError::Failed(_) => None,
        }
    }
}
