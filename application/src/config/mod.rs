//! Application-level configuration.
//!
//! - [`ToolCallingParams`]: tool loop control (rounds, unknown tools)

pub mod tool_calling_params;

pub use tool_calling_params::{ToolCallingParams, UnknownToolPolicy};
