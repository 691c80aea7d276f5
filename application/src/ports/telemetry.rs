//! Port for side-channel telemetry.
//!
//! Defines the [`TelemetryPort`] trait for the host's AI event stream
//! (`ai-tool-called`, `ai-documents-retrieved`, ...).
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port emits one
//! machine-readable event per completed capability call.

use serde_json::Value;

/// A named AI event with its JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryEvent {
    /// Event name (e.g., "ai-tool-called", "ai-tools-discovered").
    pub event_name: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl TelemetryEvent {
    pub fn new(event_name: &'static str, payload: Value) -> Self {
        Self {
            event_name,
            payload,
        }
    }
}

/// Port for emitting telemetry events.
///
/// `track` is synchronous and non-fallible so delivery problems never
/// disrupt the main execution flow.
pub trait TelemetryPort: Send + Sync {
    fn track(&self, event: TelemetryEvent);
}

/// No-op implementation for tests and when telemetry is disabled.
pub struct NoTelemetry;

impl TelemetryPort for NoTelemetry {
    fn track(&self, _event: TelemetryEvent) {}
}
