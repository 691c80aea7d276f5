//! Configuration file loading for sap-aicore
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AICORE_`-prefixed environment variables (`AICORE_CREDENTIALS__CLIENT_ID`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./aicore.toml` or `./.aicore.toml`
//! 4. Global: `$XDG_CONFIG_HOME/sap-aicore/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileCredentialsConfig, FileDeploymentConfig,
    FileGenerationConfig, FileTelemetryConfig, FileToolsConfig,
};
pub use loader::ConfigLoader;
