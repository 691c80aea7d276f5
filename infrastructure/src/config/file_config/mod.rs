//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into runtime values by value.

mod credentials;
mod deployment;
mod generation;
mod telemetry;
mod tools;

pub use credentials::FileCredentialsConfig;
pub use deployment::FileDeploymentConfig;
pub use generation::FileGenerationConfig;
pub use telemetry::FileTelemetryConfig;
pub use tools::FileToolsConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("generation.{field} = {value} is out of range ({range})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("tools.max_rounds cannot be 0")]
    ZeroMaxRounds,

    #[error("{field} is set but empty")]
    EmptyValue { field: &'static str },

    #[error("credentials.{field} must be an http(s) URL, got '{value}'")]
    InvalidUrl { field: &'static str, value: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Service key fields
    pub credentials: FileCredentialsConfig,
    /// Target deployment
    pub deployment: FileDeploymentConfig,
    /// Sampling options
    pub generation: FileGenerationConfig,
    /// Tool discovery and tool-calling options
    pub tools: FileToolsConfig,
    /// Side-channel telemetry output
    pub telemetry: FileTelemetryConfig,
}

impl FileConfig {
    /// Validate the configuration.
    ///
    /// Credentials may be partial here (the environment often fills them in);
    /// completeness is checked when a client is built.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.credentials.validate()?;
        self.deployment.validate()?;
        self.generation.validate()?;
        self.tools.validate()?;
        Ok(())
    }
}
