//! Capability port implementations for [`Instrumented`].

use super::{Instrumented, Interception, Recorded};
use crate::ports::capabilities::{
    Compressor, Embedder, MemoryStore, MessageHistory, Retriever, Splitter, VectorStore,
};
use aicore_domain::{CapabilityError, CapabilityKind, Document, Message};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;

const MESSAGES_RETRIEVED: &str = "ai-messages-retrieved-from-memory";
const MESSAGE_ADDED: &str = "ai-message-added-to-memory";

#[async_trait]
impl<T: MemoryStore> MemoryStore for Instrumented<T> {
    async fn load_memory_variables(
        &self,
        values: Map<String, Value>,
    ) -> Result<Map<String, Value>, CapabilityError> {
        let call = Interception::new(
            CapabilityKind::Memory,
            "load_memory_variables",
            json!({"action": "loadMemoryVariables", "values": values}),
            MESSAGES_RETRIEVED,
        );
        self.intercept(call, self.inner.load_memory_variables(values), |response| Recorded {
            output: json!({"action": "loadMemoryVariables", "response": response}),
            telemetry: json!({"response": response}),
        })
        .await
    }

    async fn save_context(
        &self,
        input: Map<String, Value>,
        output: Map<String, Value>,
    ) -> Result<(), CapabilityError> {
        let call = Interception::new(
            CapabilityKind::Memory,
            "save_context",
            json!({"action": "saveContext", "input": input, "output": output}),
            MESSAGE_ADDED,
        );
        let message = json!({"input": input, "output": output});
        let delegate = async {
            self.inner.save_context(input, output).await?;
            // The history snapshot only feeds the output record.
            let history = self.inner.chat_history().await.unwrap_or_else(|e| {
                debug!(error = %e, "Could not read chat history after save");
                Vec::new()
            });
            Ok::<_, CapabilityError>(history)
        };
        self.intercept(call, delegate, |history| Recorded {
            output: json!({"action": "saveContext", "chatHistory": history}),
            telemetry: json!({"message": message}),
        })
        .await
        .map(|_| ())
    }

    async fn chat_history(&self) -> Result<Vec<Message>, CapabilityError> {
        self.inner.chat_history().await
    }
}

#[async_trait]
impl<T: MessageHistory> MessageHistory for Instrumented<T> {
    async fn get_messages(&self) -> Result<Vec<Message>, CapabilityError> {
        let call = Interception::new(
            CapabilityKind::Memory,
            "get_messages",
            json!({"action": "getMessages"}),
            MESSAGES_RETRIEVED,
        );
        self.intercept(call, self.inner.get_messages(), |messages| Recorded {
            output: json!({"action": "getMessages", "messages": messages}),
            telemetry: json!({"response": messages}),
        })
        .await
    }

    async fn add_message(&self, message: Message) -> Result<(), CapabilityError> {
        let payload = json!(message);
        let call = Interception::new(
            CapabilityKind::Memory,
            "add_message",
            json!({"action": "addMessage", "message": payload}),
            MESSAGE_ADDED,
        );
        self.intercept(call, self.inner.add_message(message), |_| Recorded {
            output: json!({"action": "addMessage"}),
            telemetry: json!({"message": payload}),
        })
        .await
    }

    async fn clear(&self) -> Result<(), CapabilityError> {
        self.inner.clear().await
    }
}

#[async_trait]
impl<T: Retriever> Retriever for Instrumented<T> {
    async fn get_relevant_documents(&self, query: &str) -> Result<Vec<Document>, CapabilityError> {
        let call = Interception::new(
            CapabilityKind::Retriever,
            "get_relevant_documents",
            json!({"query": query}),
            "ai-documents-retrieved",
        );
        self.intercept(call, self.inner.get_relevant_documents(query), |documents| Recorded {
            output: json!({"documents": documents}),
            telemetry: json!({"query": query}),
        })
        .await
    }
}

#[async_trait]
impl<T: Embedder> Embedder for Instrumented<T> {
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, CapabilityError> {
        let call = Interception::new(
            CapabilityKind::Embedding,
            "embed_query",
            json!({"query": query}),
            "ai-query-embedded",
        );
        self.intercept(call, self.inner.embed_query(query), |embedding| Recorded {
            output: json!({"embedding": embedding}),
            telemetry: json!({"query": query}),
        })
        .await
    }

    async fn embed_documents(&self, documents: &[String]) -> Result<Vec<Vec<f32>>, CapabilityError> {
        let call = Interception::new(
            CapabilityKind::Embedding,
            "embed_documents",
            json!({"documents": documents}),
            "ai-document-embedded",
        );
        self.intercept(call, self.inner.embed_documents(documents), |embeddings| Recorded {
            output: json!({"embeddings": embeddings}),
            telemetry: json!({"documents": documents.len()}),
        })
        .await
    }

    fn dimensions(&self) -> Option<usize> {
        self.inner.dimensions()
    }
}

#[async_trait]
impl<T: Compressor> Compressor for Instrumented<T> {
    async fn compress_documents(
        &self,
        documents: Vec<Document>,
        query: &str,
    ) -> Result<Vec<Document>, CapabilityError> {
        let call = Interception::new(
            CapabilityKind::Reranker,
            "compress_documents",
            json!({"query": query, "documents": documents}),
            "ai-document-reranked",
        );
        self.intercept(call, self.inner.compress_documents(documents, query), |response| {
            Recorded {
                output: json!({"response": response}),
                telemetry: json!({"query": query}),
            }
        })
        .await
    }
}

#[async_trait]
impl<T: Splitter> Splitter for Instrumented<T> {
    async fn split_text(&self, text: &str) -> Result<Vec<String>, CapabilityError> {
        let call = Interception::new(
            CapabilityKind::TextSplitter,
            "split_text",
            json!({"textSplitter": text}),
            "ai-text-split",
        );
        self.intercept(call, self.inner.split_text(text), |chunks| Recorded {
            output: json!({"response": chunks}),
            telemetry: json!({"response": chunks}),
        })
        .await
    }
}

#[async_trait]
impl<T: VectorStore> VectorStore for Instrumented<T> {
    async fn similarity_search(
        &self,
        query: &str,
        k: Option<usize>,
        filter: Option<Value>,
    ) -> Result<Vec<Document>, CapabilityError> {
        let call = Interception::new(
            CapabilityKind::VectorStore,
            "similarity_search",
            json!({"query": query, "k": k, "filter": filter}),
            "ai-vector-store-searched",
        );
        self.intercept(call, self.inner.similarity_search(query, k, filter), |documents| {
            Recorded {
                output: json!({"documents": documents}),
                telemetry: json!({"query": query}),
            }
        })
        .await
    }

    async fn add_documents(&self, documents: Vec<Document>) -> Result<Vec<String>, CapabilityError> {
        self.inner.add_documents(documents).await
    }
}
