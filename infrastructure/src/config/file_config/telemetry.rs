//! Telemetry configuration from TOML (`[telemetry]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw telemetry configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTelemetryConfig {
    pub enabled: bool,
    /// JSONL file receiving one line per telemetry event
    pub jsonl_path: Option<PathBuf>,
}

impl Default for FileTelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            jsonl_path: None,
        }
    }
}

impl FileTelemetryConfig {
    /// Output path, if telemetry should be written at all.
    pub fn output_path(&self) -> Option<&PathBuf> {
        if self.enabled {
            self.jsonl_path.as_ref()
        } else {
            None
        }
    }
}
