//! Tool error value object.

use crate::core::node_error::{ErrorOrigin, NodeError};
use serde::{Deserialize, Serialize};

/// Error that occurred during tool execution.
///
/// | Code | Description |
/// |------|-------------|
/// | `INVALID_ARGUMENT` | Missing/wrong parameters, the model can fix them |
/// | `NOT_FOUND` | Unknown tool or resource |
/// | `EXECUTION_FAILED` | Runtime failure inside the tool |
/// | `NODE_ERROR` | Structured host error (carries an [`ErrorOrigin`]) |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "EXECUTION_FAILED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Set when the error already has the host's structured shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<ErrorOrigin>,
}

impl ToolError {
    pub const NODE_ERROR: &'static str = "NODE_ERROR";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            origin: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("Resource not found: {}", resource.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    /// Whether this error already has the host's structured shape.
    pub fn is_structured(&self) -> bool {
        self.origin.is_some()
    }

    /// View this error as a [`NodeError`], if it is structured.
    pub fn to_node_error(&self) -> Option<NodeError> {
        let origin = self.origin?;
        let mut error = NodeError::new(origin, self.message.clone());
        error.description = self.details.clone();
        Some(error)
    }
}

impl From<NodeError> for ToolError {
    fn from(error: NodeError) -> Self {
        Self {
            code: Self::NODE_ERROR.to_string(),
            message: error.message,
            details: error.description,
            origin: Some(error.origin),
        }
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error() {
        let err = ToolError::not_found("weather station").with_details("station offline");

        assert_eq!(err.code, "NOT_FOUND");
        assert!(err.message.contains("weather station"));
        assert!(!err.is_structured());
        assert!(err.to_node_error().is_none());
        assert_eq!(
            err.to_string(),
            "[NOT_FOUND] Resource not found: weather station (station offline)"
        );
    }

    #[test]
    fn test_node_error_round_trip() {
        let node = NodeError::api("quota exceeded").with_description("upgrade plan");
        let err = ToolError::from(node.clone());

        assert_eq!(err.code, ToolError::NODE_ERROR);
        assert!(err.is_structured());
        assert_eq!(err.to_node_error(), Some(node));
    }
}
