//! Generation configuration from TOML (`[generation]` section)
//!
//! ```toml
//! [generation]
//! temperature = 0.7     # 0..=2
//! top_p = 1.0           # 0..=1
//! max_tokens = 1000     # 1..=8000
//! max_iterations = 10   # 1..=50
//! ```

use super::ConfigValidationError;
use aicore_domain::GenerationOptions;
use serde::{Deserialize, Serialize};

/// Raw generation configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
    pub max_iterations: Option<u32>,
}

impl FileGenerationConfig {
    /// Convert into runtime options, filling missing values with defaults.
    pub fn to_options(&self) -> GenerationOptions {
        let defaults = GenerationOptions::default();
        GenerationOptions {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            top_p: self.top_p.unwrap_or(defaults.top_p),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
        }
    }

    pub(super) fn validate(&self) -> Result<(), ConfigValidationError> {
        check_range("temperature", self.temperature.map(f64::from), 0.0, 2.0, "0..=2")?;
        check_range("top_p", self.top_p.map(f64::from), 0.0, 1.0, "0..=1")?;
        check_range("max_tokens", self.max_tokens.map(f64::from), 1.0, 8000.0, "1..=8000")?;
        check_range("max_iterations", self.max_iterations.map(f64::from), 1.0, 50.0, "1..=50")
    }
}

fn check_range(
    field: &'static str,
    value: Option<f64>,
    min: f64,
    max: f64,
    range: &'static str,
) -> Result<(), ConfigValidationError> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(ConfigValidationError::OutOfRange {
            field,
            value: v,
            range,
        }),
        _ => Ok(()),
    }
}
