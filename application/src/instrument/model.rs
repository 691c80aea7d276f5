//! [`ChatModel`] implementation for [`Instrumented`].

use super::{Instrumented, Interception, Recorded};
use crate::ports::chat_model::{ChatModel, GatewayError};
use aicore_domain::{CapabilityKind, LlmResponse, Message};
use async_trait::async_trait;
use serde_json::{Value, json};

#[async_trait]
impl<T: ChatModel + 'static> ChatModel for Instrumented<T> {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    /// The bound handle stays instrumented.
    fn bind_tools(&self, tools: &[Value]) -> Result<Box<dyn ChatModel>, GatewayError> {
        let bound = self.inner.bind_tools(tools)?;
        Ok(Box::new(self.rewrap(bound)))
    }

    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, GatewayError> {
        let call = Interception::new(
            CapabilityKind::LanguageModel,
            "invoke",
            json!({"messages": messages}),
            "ai-llm-generated-output",
        )
        .on_error("ai-llm-errored");
        let model = self.inner.model_name().to_string();
        self.intercept(call, self.inner.invoke(messages), |response| Recorded {
            output: json!({"response": response}),
            telemetry: json!({"model": model, "messages": messages, "response": response}),
        })
        .await
    }
}
