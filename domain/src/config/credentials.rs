//! SAP AI Core service credentials.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

const SERVICE_KEY_HINT: &str =
    "Copy it from the SAP AI Core service key (BTP cockpit > Instances > Service Keys)";

/// Credentials of an SAP AI Core service instance.
///
/// Passed by value into client construction; nothing is read from or
/// written to the process environment at call time.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiCoreCredentials {
    /// OAuth client id (`clientid` in the service key)
    pub client_id: String,
    /// OAuth client secret (`clientsecret` in the service key)
    pub client_secret: String,
    /// Token endpoint base (`url` in the service key)
    pub oauth_url: String,
    /// AI API base URL (`serviceurls.AI_API_URL` in the service key)
    pub base_url: String,
    /// Resource group sent with every inference request
    pub resource_group: String,
}

impl AiCoreCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        oauth_url: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            oauth_url: oauth_url.into(),
            base_url: base_url.into(),
            resource_group: "default".to_string(),
        }
    }

    pub fn with_resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.resource_group = resource_group.into();
        self
    }

    /// Check that every field is present before any call is made.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields: [(&'static str, &str); 4] = [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("oauth_url", &self.oauth_url),
            ("base_url", &self.base_url),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingCredential {
                    field,
                    remediation: SERVICE_KEY_HINT,
                });
            }
        }

        for (field, value) in [("oauth_url", &self.oauth_url), ("base_url", &self.base_url)] {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(ConfigError::InvalidCredential {
                    field,
                    reason: format!("`{}` is not an http(s) URL", value),
                });
            }
        }
        Ok(())
    }

    /// Resource group, falling back to `default` when unset.
    pub fn resource_group(&self) -> &str {
        if self.resource_group.trim().is_empty() {
            "default"
        } else {
            &self.resource_group
        }
    }
}

impl std::fmt::Debug for AiCoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiCoreCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("oauth_url", &self.oauth_url)
            .field("base_url", &self.base_url)
            .field("resource_group", &self.resource_group)
            .finish()
    }
}

/// Return the deployment id or the configuration error explaining how to set it.
pub fn require_deployment(deployment_id: Option<&str>) -> Result<&str, ConfigError> {
    match deployment_id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ConfigError::MissingDeployment),
    }
}
