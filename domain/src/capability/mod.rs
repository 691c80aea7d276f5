//! Capability categories and call events.
//!
//! The host wires AI sub-nodes together by *connection type*: a memory node
//! plugs into an `ai_memory` input, a retriever into `ai_retriever`, and so
//! on. [`CapabilityKind`] names those categories; every intercepted call is
//! recorded under the kind of the capability it was made on.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Capability category, one per host connection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CapabilityKind {
    /// Conversational memory and message history stores.
    #[serde(rename = "ai_memory")]
    Memory,
    #[serde(rename = "ai_retriever")]
    Retriever,
    #[serde(rename = "ai_embedding")]
    Embedding,
    /// Document compressors / re-rankers.
    #[serde(rename = "ai_reranker")]
    Reranker,
    #[serde(rename = "ai_textSplitter")]
    TextSplitter,
    #[serde(rename = "ai_tool")]
    Tool,
    #[serde(rename = "ai_vectorStore")]
    VectorStore,
    #[serde(rename = "ai_languageModel")]
    LanguageModel,
}

impl CapabilityKind {
    pub fn as_str(&self) -> &str {
        match self {
            CapabilityKind::Memory => "ai_memory",
            CapabilityKind::Retriever => "ai_retriever",
            CapabilityKind::Embedding => "ai_embedding",
            CapabilityKind::Reranker => "ai_reranker",
            CapabilityKind::TextSplitter => "ai_textSplitter",
            CapabilityKind::Tool => "ai_tool",
            CapabilityKind::VectorStore => "ai_vectorStore",
            CapabilityKind::LanguageModel => "ai_languageModel",
        }
    }
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The input side of one intercepted call.
///
/// Created right before the wrapped operation runs and dropped once the
/// matching output (or error) has been recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct CallEvent {
    pub kind: CapabilityKind,
    pub operation: &'static str,
    pub input: Value,
    pub timestamp: DateTime<Utc>,
}

impl CallEvent {
    pub fn new(kind: CapabilityKind, operation: &'static str, input: Value) -> Self {
        Self {
            kind,
            operation,
            input,
            timestamp: Utc::now(),
        }
    }

    /// JSON record handed to sinks.
    pub fn to_record(&self) -> Value {
        serde_json::json!({
            "kind": self.kind.as_str(),
            "operation": self.operation,
            "input": self.input,
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}

/// A document passed between retrievers, splitters, re-rankers and vector
/// stores.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
