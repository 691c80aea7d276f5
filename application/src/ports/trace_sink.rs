//! Port for the host's execution-tracing sink.
//!
//! Every intercepted call writes an input record before the wrapped
//! operation runs and an output (or error) record afterwards. The index
//! returned by [`TraceSink::record_input`] is the token under which the
//! matching output is recorded, so the host can correlate both ends.

use aicore_domain::{CallEvent, CapabilityKind, NodeError};
use serde_json::Value;
use thiserror::Error;

/// Position of an input record within its capability kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceIndex(pub usize);

impl std::fmt::Display for TraceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("No input record {index} for {kind}")]
    UnknownIndex { kind: CapabilityKind, index: TraceIndex },

    #[error("Output for {kind} {index} already recorded")]
    AlreadyRecorded { kind: CapabilityKind, index: TraceIndex },

    #[error("Trace sink unavailable: {0}")]
    Unavailable(String),
}

/// Port for recording intercepted calls.
///
/// Callers treat both methods as fire-and-forget: a failing sink must never
/// abort the operation being traced.
pub trait TraceSink: Send + Sync {
    /// Record the input side of a call and return its index.
    fn record_input(&self, kind: CapabilityKind, event: &CallEvent) -> Result<TraceIndex, SinkError>;

    /// Record the outcome of the call started at `index`.
    fn record_output(
        &self,
        kind: CapabilityKind,
        index: TraceIndex,
        outcome: Result<Value, NodeError>,
    ) -> Result<(), SinkError>;
}

/// No-op implementation for tests and when tracing is disabled.
pub struct NoTraceSink;

impl TraceSink for NoTraceSink {
    fn record_input(&self, _kind: CapabilityKind, _event: &CallEvent) -> Result<TraceIndex, SinkError> {
        Ok(TraceIndex(0))
    }

    fn record_output(
        &self,
        _kind: CapabilityKind,
        _index: TraceIndex,
        _outcome: Result<Value, NodeError>,
    ) -> Result<(), SinkError> {
        Ok(())
    }
}
