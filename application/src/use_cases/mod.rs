//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod discover_tools;
pub mod run_tool_calling;
pub(crate) mod tool_helpers;
