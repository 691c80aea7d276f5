//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod capabilities;
pub mod chat_model;
pub mod invocable;
pub mod telemetry;
pub mod tool_schema;
pub mod trace_sink;
