//! Generation options sent with chat completion requests.

use serde::{Deserialize, Serialize};

/// Sampling and loop options for a model.
///
/// Accepted ranges are `temperature` 0..=2, `top_p` 0..=1, `max_tokens`
/// 1..=8000 and `max_iterations` 1..=50. Range checks belong to the caller
/// (the node UI enforces them); missing values are filled with defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub max_iterations: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 1.0,
            max_tokens: 1000,
            max_iterations: 10,
        }
    }
}

impl GenerationOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_are_defaulted() {
        let options: GenerationOptions = serde_json::from_str(r#"{"temperature": 0.2}"#).unwrap();
        assert_eq!(options.temperature, 0.2);
        assert_eq!(options.top_p, 1.0);
        assert_eq!(options.max_tokens, 1000);
        assert_eq!(options.max_iterations, 10);
    }

    #[test]
    fn test_out_of_range_values_pass_through() {
        let options = GenerationOptions::default().with_temperature(5.0).with_max_tokens(0);
        assert_eq!(options.temperature, 5.0);
        assert_eq!(options.max_tokens, 0);
    }
}
