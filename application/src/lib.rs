//! Application layer for the SAP AI Core tool mediation workspace
//!
//! This crate contains the capability ports, the call-interception wrapper,
//! the tool adapters and the use cases that discover and run tools.
//! It depends only on the domain layer.

pub mod config;
pub mod instrument;
pub mod ports;
pub mod tools;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ToolCallingParams, UnknownToolPolicy};
pub use instrument::{InterceptedError, Instrumented, wrap};
pub use ports::{
    capabilities::{
        Compressor, Embedder, MemoryStore, MessageHistory, Retriever, Splitter, VectorStore,
    },
    chat_model::{ChatModel, GatewayError, RetryAdvice, classify_failed_attempt},
    invocable::Invocable,
    telemetry::{NoTelemetry, TelemetryEvent, TelemetryPort},
    tool_schema::ToolSchemaPort,
    trace_sink::{NoTraceSink, SinkError, TraceIndex, TraceSink},
};
pub use tools::{ConnectedTool, DynamicTool, LegacyTool, StructuredTool, ToolSet, Toolkit};
pub use use_cases::discover_tools::{DiscoverToolsUseCase, DiscoveryError, DiscoveryOptions};
pub use use_cases::run_tool_calling::{
    OrchestrationResult, ResponseKind, RunToolCallingError, RunToolCallingUseCase,
};
