//! Execution-tracing sinks.
//!
//! Provides [`RunDataSink`], an in-memory [`TraceSink`](aicore_application::TraceSink)
//! that keeps per-kind input/output records for the host to inspect.

mod run_data;

pub use run_data::{RunDataSink, TraceRecord};
