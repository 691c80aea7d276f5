//! Tool-calling parameters: orchestration loop control.
//!
//! [`ToolCallingParams`] groups the static parameters that control the
//! tool loop in [`RunToolCallingUseCase`](crate::use_cases::run_tool_calling::RunToolCallingUseCase).

use serde::{Deserialize, Serialize};

/// What to do with a tool-call directive naming a tool that is not bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownToolPolicy {
    /// Drop the directive without a result (logged at warn level).
    #[default]
    Skip,
    /// Record a `Tool not found: <name>` error result the model can see.
    RecordError,
}

/// Tool loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolCallingParams {
    /// Maximum number of tool rounds (request, execute, resubmit).
    pub max_rounds: usize,
    /// Handling of directives for tools absent from the tool set.
    pub unknown_tool_policy: UnknownToolPolicy,
}

impl Default for ToolCallingParams {
    fn default() -> Self {
        Self {
            max_rounds: 1,
            unknown_tool_policy: UnknownToolPolicy::Skip,
        }
    }
}

impl ToolCallingParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_unknown_tool_policy(mut self, policy: UnknownToolPolicy) -> Self {
        self.unknown_tool_policy = policy;
        self
    }
}
