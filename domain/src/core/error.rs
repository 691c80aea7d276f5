//! Domain error types

use thiserror::Error;

/// Configuration errors.
///
/// These are raised before any network call is made and are never retryable:
/// the caller has to fix the configuration first. Each message carries the
/// remediation text shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing credential field `{field}`. {remediation}")]
    MissingCredential {
        field: &'static str,
        remediation: &'static str,
    },

    #[error("No deployment configured. Set `deployment.id` (or AICORE_DEPLOYMENT__ID) to a running deployment of the selected model")]
    MissingDeployment,

    #[error("Invalid credential field `{field}`: {reason}")]
    InvalidCredential { field: &'static str, reason: String },
}

impl ConfigError {
    /// Configuration errors never succeed on retry.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Name of the offending field, if the error is about a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::MissingCredential { field, .. }
            | ConfigError::InvalidCredential { field, .. } => Some(field),
            ConfigError::MissingDeployment => None,
        }
    }
}
