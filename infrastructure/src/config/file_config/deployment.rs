//! Deployment configuration from TOML (`[deployment]` section)

use super::ConfigValidationError;
use aicore_domain::{ConfigError, require_deployment};
use serde::{Deserialize, Serialize};

/// Raw deployment configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDeploymentConfig {
    /// Deployment id of a running model deployment
    pub id: Option<String>,
    /// Model name, only used for logging and telemetry
    pub model: Option<String>,
}

impl FileDeploymentConfig {
    /// Deployment id, or [`ConfigError::MissingDeployment`] with remediation text.
    pub fn deployment_id(&self) -> Result<&str, ConfigError> {
        require_deployment(self.id.as_deref())
    }

    pub(super) fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(id) = &self.id
            && id.trim().is_empty()
        {
            return Err(ConfigValidationError::EmptyValue {
                field: "deployment.id",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_id_required() {
        let config = FileDeploymentConfig::default();
        assert_eq!(config.deployment_id(), Err(ConfigError::MissingDeployment));

        let config = FileDeploymentConfig {
            id: Some("d42".to_string()),
            model: None,
        };
        assert_eq!(config.deployment_id(), Ok("d42"));
    }

    #[test]
    fn test_blank_id_is_invalid() {
        let config = FileDeploymentConfig {
            id: Some("  ".to_string()),
            model: None,
        };
        assert!(config.validate().is_err());
    }
}
