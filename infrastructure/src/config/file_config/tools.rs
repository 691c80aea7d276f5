//! Tools configuration from TOML (`[tools]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [tools]
//! enforce_unique_names = true
//! convert_native_tools = true
//! escape_curly_braces = false   # set when descriptions end up in prompt templates
//! max_rounds = 1
//! unknown_tool = "skip"         # or "record_error"
//! ```

use super::ConfigValidationError;
use aicore_application::{DiscoveryOptions, ToolCallingParams, UnknownToolPolicy};
use serde::{Deserialize, Serialize};

/// Raw tools configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    pub enforce_unique_names: bool,
    pub convert_native_tools: bool,
    pub escape_curly_braces: bool,
    /// Tool rounds per run
    pub max_rounds: usize,
    /// What to do when the model names a tool that is not bound
    pub unknown_tool: UnknownToolPolicy,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        let discovery = DiscoveryOptions::default();
        let params = ToolCallingParams::default();
        Self {
            enforce_unique_names: discovery.enforce_unique_names,
            convert_native_tools: discovery.convert_native_tools,
            escape_curly_braces: discovery.escape_curly_braces,
            max_rounds: params.max_rounds,
            unknown_tool: params.unknown_tool_policy,
        }
    }
}

impl FileToolsConfig {
    pub fn to_discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            enforce_unique_names: self.enforce_unique_names,
            convert_native_tools: self.convert_native_tools,
            escape_curly_braces: self.escape_curly_braces,
        }
    }

    pub fn to_tool_calling_params(&self) -> ToolCallingParams {
        ToolCallingParams::default()
            .with_max_rounds(self.max_rounds)
            .with_unknown_tool_policy(self.unknown_tool)
    }

    pub(super) fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_rounds == 0 {
            return Err(ConfigValidationError::ZeroMaxRounds);
        }
        Ok(())
    }
}
