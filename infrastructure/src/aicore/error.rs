//! Error types for the SAP AI Core adapter

use aicore_application::ports::chat_model::GatewayError;
use aicore_domain::ConfigError;
use thiserror::Error;

/// Result type alias for SAP AI Core operations
pub type Result<T> = std::result::Result<T, AiCoreError>;

/// Errors that can occur when talking to SAP AI Core
#[derive(Error, Debug)]
pub enum AiCoreError {
    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Token request failed with status {status}: {body}")]
    TokenRejected { status: u16, body: String },

    #[error("Endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<AiCoreError> for GatewayError {
    fn from(error: AiCoreError) -> Self {
        match error {
            AiCoreError::Transport(message) => GatewayError::ConnectionError(message),
            AiCoreError::Timeout => GatewayError::Timeout,
            AiCoreError::TokenRejected { status, body } => GatewayError::Status {
                code: status,
                message: format!("token request rejected: {}", body),
            },
            AiCoreError::Status { status, body } => GatewayError::Status {
                code: status,
                message: body,
            },
            AiCoreError::Config(e) => GatewayError::Configuration(e),
            other @ (AiCoreError::SerializationError(_) | AiCoreError::UnexpectedResponse(_)) => {
                GatewayError::RequestFailed(other.to_string())
            }
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for AiCoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            AiCoreError::Timeout
        } else {
            AiCoreError::Transport(error.to_string())
        }
    }
}
