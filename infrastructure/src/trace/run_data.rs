//! In-memory run data, grouped by capability kind.

use aicore_application::ports::trace_sink::{SinkError, TraceIndex, TraceSink};
use aicore_domain::{CallEvent, CapabilityKind, NodeError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

/// One traced call: the input record and, once finished, its outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    pub operation: &'static str,
    pub input: Value,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<NodeError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl TraceRecord {
    fn started(event: &CallEvent) -> Self {
        Self {
            operation: event.operation,
            input: event.input.clone(),
            started_at: event.timestamp,
            output: None,
            error: None,
            finished_at: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Append-only trace sink keeping records in memory.
///
/// Indices are positions within a kind's record list, so the first call
/// of every kind gets index 0.
#[derive(Debug, Default)]
pub struct RunDataSink {
    records: Mutex<BTreeMap<CapabilityKind, Vec<TraceRecord>>>,
}

impl RunDataSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the records of one kind, in call order.
    pub fn snapshot(&self, kind: CapabilityKind) -> Vec<TraceRecord> {
        self.records
            .lock()
            .map(|records| records.get(&kind).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Number of calls recorded for `kind`.
    pub fn len(&self, kind: CapabilityKind) -> usize {
        self.records
            .lock()
            .map(|records| records.get(&kind).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.records
            .lock()
            .map(|records| records.values().all(Vec::is_empty))
            .unwrap_or(true)
    }

    /// All records as JSON, keyed by the host's connection type name.
    pub fn to_json(&self) -> Value {
        let Ok(records) = self.records.lock() else {
            return Value::Null;
        };
        let map = records
            .iter()
            .map(|(kind, list)| {
                (
                    kind.as_str().to_string(),
                    serde_json::to_value(list).unwrap_or(Value::Null),
                )
            })
            .collect();
        Value::Object(map)
    }
}

impl TraceSink for RunDataSink {
    fn record_input(&self, kind: CapabilityKind, event: &CallEvent) -> Result<TraceIndex, SinkError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        let list = records.entry(kind).or_default();
        list.push(TraceRecord::started(event));
        let index = TraceIndex(list.len() - 1);
        debug!(kind = %kind, index = %index, operation = event.operation, "Recorded input");
        Ok(index)
    }

    fn record_output(
        &self,
        kind: CapabilityKind,
        index: TraceIndex,
        outcome: Result<Value, NodeError>,
    ) -> Result<(), SinkError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        let record = records
            .get_mut(&kind)
            .and_then(|list| list.get_mut(index.0))
            .ok_or(SinkError::UnknownIndex { kind, index })?;
        if record.is_finished() {
            return Err(SinkError::AlreadyRecorded { kind, index });
        }
        match outcome {
            Ok(output) => record.output = Some(output),
            Err(error) => record.error = Some(error),
        }
        record.finished_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(kind: CapabilityKind, query: &str) -> CallEvent {
        CallEvent::new(kind, "invoke", json!({"query": query}))
    }

    #[test]
    fn test_indices_are_per_kind() {
        let sink = RunDataSink::new();
        let t0 = sink.record_input(CapabilityKind::Tool, &event(CapabilityKind::Tool, "a")).unwrap();
        let r0 = sink
            .record_input(CapabilityKind::Retriever, &event(CapabilityKind::Retriever, "b"))
            .unwrap();
        let t1 = sink.record_input(CapabilityKind::Tool, &event(CapabilityKind::Tool, "c")).unwrap();

        assert_eq!(t0, TraceIndex(0));
        assert_eq!(r0, TraceIndex(0));
        assert_eq!(t1, TraceIndex(1));
        assert_eq!(sink.len(CapabilityKind::Tool), 2);
    }

    #[test]
    fn test_output_pairs_with_input() {
        let sink = RunDataSink::new();
        let index = sink.record_input(CapabilityKind::Tool, &event(CapabilityKind::Tool, "6*7")).unwrap();
        assert!(!sink.snapshot(CapabilityKind::Tool)[0].is_finished());

        sink.record_output(CapabilityKind::Tool, index, Ok(json!({"response": 42})))
            .unwrap();

        let record = &sink.snapshot(CapabilityKind::Tool)[0];
        assert!(record.is_finished());
        assert_eq!(record.input["query"], "6*7");
        assert_eq!(record.output, Some(json!({"response": 42})));
    }

    #[test]
    fn test_error_outcome_is_kept_structured() {
        let sink = RunDataSink::new();
        let index = sink
            .record_input(CapabilityKind::LanguageModel, &event(CapabilityKind::LanguageModel, "hi"))
            .unwrap();
        sink.record_output(
            CapabilityKind::LanguageModel,
            index,
            Err(NodeError::wrap_plain("boom", None)),
        )
        .unwrap();

        let record = &sink.snapshot(CapabilityKind::LanguageModel)[0];
        assert!(record.is_error());
        assert_eq!(record.error.as_ref().unwrap().message, "boom");
    }

    #[test]
    fn test_unknown_and_duplicate_outputs_rejected() {
        let sink = RunDataSink::new();
        assert_eq!(
            sink.record_output(CapabilityKind::Tool, TraceIndex(3), Ok(json!(null))),
            Err(SinkError::UnknownIndex {
                kind: CapabilityKind::Tool,
                index: TraceIndex(3)
            })
        );

        let index = sink.record_input(CapabilityKind::Tool, &event(CapabilityKind::Tool, "x")).unwrap();
        sink.record_output(CapabilityKind::Tool, index, Ok(json!(1))).unwrap();
        assert!(matches!(
            sink.record_output(CapabilityKind::Tool, index, Ok(json!(2))),
            Err(SinkError::AlreadyRecorded { .. })
        ));
    }

    #[test]
    fn test_to_json_groups_by_connection_type() {
        let sink = RunDataSink::new();
        assert!(sink.is_empty());
        sink.record_input(CapabilityKind::Tool, &event(CapabilityKind::Tool, "x")).unwrap();

        let json = sink.to_json();
        assert_eq!(json["ai_tool"][0]["input"]["query"], "x");
        assert!(json["ai_tool"][0].get("output").is_none());
    }
}
