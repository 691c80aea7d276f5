//! Capability ports
//!
//! One trait per AI sub-node category the host can connect. Each trait is
//! implemented by the adapter behind a connection and, transparently, by
//! [`Instrumented`](crate::instrument::Instrumented) around it.
//!
//! | Trait | Connection type | Intercepted operations |
//! |-------|-----------------|------------------------|
//! | [`MemoryStore`] | `ai_memory` | `load_memory_variables`, `save_context` |
//! | [`MessageHistory`] | `ai_memory` | `get_messages`, `add_message` |
//! | [`Retriever`] | `ai_retriever` | `get_relevant_documents` |
//! | [`Embedder`] | `ai_embedding` | `embed_query`, `embed_documents` |
//! | [`Compressor`] | `ai_reranker` | `compress_documents` |
//! | [`Splitter`] | `ai_textSplitter` | `split_text` |
//! | [`VectorStore`] | `ai_vectorStore` | `similarity_search` |
//!
//! Tools and chat models have their own ports
//! ([`Invocable`](super::invocable::Invocable),
//! [`ChatModel`](super::chat_model::ChatModel)).

use aicore_domain::{CapabilityError, Document, Message};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Conversational memory: variables loaded before a turn, context saved after.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn load_memory_variables(
        &self,
        values: Map<String, Value>,
    ) -> Result<Map<String, Value>, CapabilityError>;

    async fn save_context(
        &self,
        input: Map<String, Value>,
        output: Map<String, Value>,
    ) -> Result<(), CapabilityError>;

    /// Messages currently held by the memory's backing history.
    async fn chat_history(&self) -> Result<Vec<Message>, CapabilityError>;
}

/// Raw chat message history store.
#[async_trait]
pub trait MessageHistory: Send + Sync {
    async fn get_messages(&self) -> Result<Vec<Message>, CapabilityError>;

    async fn add_message(&self, message: Message) -> Result<(), CapabilityError>;

    async fn clear(&self) -> Result<(), CapabilityError>;
}

#[async_trait]
pub trait Retriever: Send + Sync {
    async fn get_relevant_documents(&self, query: &str) -> Result<Vec<Document>, CapabilityError>;
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, CapabilityError>;

    async fn embed_documents(&self, documents: &[String]) -> Result<Vec<Vec<f32>>, CapabilityError>;

    /// Vector size, when known up front
    fn dimensions(&self) -> Option<usize> {
        None
    }
}

/// Document compressor / re-ranker.
#[async_trait]
pub trait Compressor: Send + Sync {
    async fn compress_documents(
        &self,
        documents: Vec<Document>,
        query: &str,
    ) -> Result<Vec<Document>, CapabilityError>;
}

#[async_trait]
pub trait Splitter: Send + Sync {
    async fn split_text(&self, text: &str) -> Result<Vec<String>, CapabilityError>;
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn similarity_search(
        &self,
        query: &str,
        k: Option<usize>,
        filter: Option<Value>,
    ) -> Result<Vec<Document>, CapabilityError>;

    /// Insert documents, returning their ids
    async fn add_documents(&self, documents: Vec<Document>) -> Result<Vec<String>, CapabilityError>;
}
