//! Logging infrastructure: structured telemetry output.
//!
//! Provides [`JsonlTelemetry`], a JSONL file writer that implements
//! the [`TelemetryPort`](aicore_application::TelemetryPort) port.

mod jsonl_telemetry;

pub use jsonl_telemetry::JsonlTelemetry;
