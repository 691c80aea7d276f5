//! Tool domain module
//!
//! Pure definitions for the tool-calling pipeline:
//!
//! ```text
//! ┌──────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │ SchemaNode   │    │ ToolCallRequest │───▶│ ToolCallResult  │
//! │ (parameters) │    │ (directive)     │    │ (output|error)  │
//! └──────┬───────┘    └─────────────────┘    └─────────────────┘
//!        │
//!        ├─ to_json():             wire schema for the endpoint
//!        └─ describe_parameters(): prose fallback for string-input tools
//! ```
//!
//! # Key Types
//!
//! - [`SchemaNode`]: normalized parameter schema
//! - [`ToolCallRequest`]: a tool-call directive from a model response
//! - [`ToolCallResult`]: outcome of one directive, paired by `call_id`
//! - [`ToolError`]: tool execution failure
//!
//! The invocable tool trait itself is an application port; this module has
//! no I/O.

pub mod description;
pub mod entities;
pub mod schema;
pub mod value_objects;

pub use description::{describe_parameters, escape_curly_braces, fallback_tool_description};
pub use entities::{ToolCallRequest, ToolCallResult, ToolOutcome};
pub use schema::{ObjectSchema, Property, SchemaError, SchemaNode, simplify_for_target};
pub use value_objects::ToolError;
