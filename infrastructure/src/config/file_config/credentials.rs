//! Credentials configuration from TOML (`[credentials]` section)
//!
//! ```toml
//! [credentials]
//! client_id = "sb-..."
//! client_secret = "..."
//! oauth_url = "https://<subaccount>.authentication.<region>.hana.ondemand.com"
//! base_url = "https://api.ai.<region>.ml.hana.ondemand.com"
//! resource_group = "default"
//! ```
//!
//! The secret is usually better supplied through `AICORE_CREDENTIALS__CLIENT_SECRET`.

use super::ConfigValidationError;
use aicore_domain::AiCoreCredentials;
use serde::{Deserialize, Serialize};

/// Raw credentials configuration from TOML
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCredentialsConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub oauth_url: Option<String>,
    pub base_url: Option<String>,
    pub resource_group: Option<String>,
}

impl FileCredentialsConfig {
    /// Convert into runtime credentials.
    ///
    /// Absent fields stay empty so that [`AiCoreCredentials::validate`]
    /// can name them with remediation text.
    pub fn to_credentials(&self) -> AiCoreCredentials {
        let mut credentials = AiCoreCredentials::new(
            self.client_id.clone().unwrap_or_default(),
            self.client_secret.clone().unwrap_or_default(),
            self.oauth_url.clone().unwrap_or_default(),
            self.base_url.clone().unwrap_or_default(),
        );
        if let Some(group) = &self.resource_group {
            credentials = credentials.with_resource_group(group.clone());
        }
        credentials
    }

    pub(super) fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [("oauth_url", &self.oauth_url), ("base_url", &self.base_url)] {
            if let Some(url) = value
                && !(url.starts_with("https://") || url.starts_with("http://"))
            {
                return Err(ConfigValidationError::InvalidUrl {
                    field,
                    value: url.clone(),
                });
            }
        }
        if let Some(group) = &self.resource_group
            && group.trim().is_empty()
        {
            return Err(ConfigValidationError::EmptyValue {
                field: "credentials.resource_group",
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileCredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCredentialsConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("oauth_url", &self.oauth_url)
            .field("base_url", &self.base_url)
            .field("resource_group", &self.resource_group)
            .finish()
    }
}
