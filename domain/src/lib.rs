//! Domain layer for the SAP AI Core tool-calling nodes
//!
//! This crate contains the pure model of the system: messages and model
//! responses, tool schemas and their prose fallbacks, capability categories,
//! the host's structured error, and credential/generation value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Capabilities
//!
//! Every AI sub-node the host can connect (memory, retriever, embedder,
//! re-ranker, text splitter, tool, vector store, language model) belongs to
//! one [`CapabilityKind`]. Calls made on a capability are recorded under
//! that kind.
//!
//! ## Tool schemas
//!
//! A [`SchemaNode`] is the normalized parameter schema of a tool. It can be
//! built from an example object or a JSON-schema definition, serialized for
//! the chat endpoint, and rendered as prose for models that only accept a
//! single string input.

pub mod capability;
pub mod config;
pub mod core;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use capability::{CallEvent, CapabilityKind, Document};
pub use config::{AiCoreCredentials, GenerationOptions, require_deployment};
pub use core::{
    error::ConfigError,
    node_error::{CapabilityError, ErrorOrigin, NodeError},
};
pub use session::{
    entities::{Conversation, Message, Role},
    response::{ContentBlock, LlmResponse, StopReason},
};
pub use tool::{
    description::{describe_parameters, escape_curly_braces, fallback_tool_description},
    entities::{ToolCallRequest, ToolCallResult, ToolOutcome},
    schema::{ObjectSchema, Property, SchemaError, SchemaNode, simplify_for_target},
    value_objects::ToolError,
};
