//! [`Invocable`] implementation for [`Instrumented`].

use super::{Instrumented, Interception, Recorded};
use crate::ports::invocable::Invocable;
use aicore_domain::{CapabilityKind, SchemaNode, ToolError};
use async_trait::async_trait;
use serde_json::{Value, json};

#[async_trait]
impl<T: Invocable> Invocable for Instrumented<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn parameters(&self) -> &SchemaNode {
        self.inner.parameters()
    }

    async fn invoke(&self, input: Value) -> Result<Value, ToolError> {
        let payload = match &self.toolkit {
            Some(toolkit) => json!({
                "query": input,
                "tool": {
                    "name": self.inner.name(),
                    "description": self.inner.description(),
                },
                "toolkit": toolkit,
            }),
            None => json!({"query": input}),
        };
        let query = input.clone();
        let call = Interception::new(CapabilityKind::Tool, "invoke", payload, "ai-tool-called");
        self.intercept(call, self.inner.invoke(input), |response| Recorded {
            output: json!({"response": response}),
            telemetry: json!({"query": query, "response": response}),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::test_support::{RecordingSink, RecordingTelemetry, SinkEntry};
    use crate::instrument::wrap;
    use crate::tools::DynamicTool;
    use aicore_domain::{ErrorOrigin, NodeError};
    use futures::FutureExt;
    use std::sync::Arc;

    fn upper() -> DynamicTool {
        DynamicTool::new("upper", "Uppercase the input", |input: String| {
            async move {
                if input.is_empty() {
                    return Err(ToolError::invalid_argument("empty input").with_details("send some text"));
                }
                Ok(input.to_uppercase())
            }
            .boxed()
        })
    }

    fn failing_with_node_error() -> DynamicTool {
        DynamicTool::new("lookup", "Look something up", |_input: String| {
            async move { Err(ToolError::from(NodeError::api("Not Found").with_http_code(404))) }.boxed()
        })
    }

    #[tokio::test]
    async fn test_tool_call_is_transparent_and_traced() {
        let sink = Arc::new(RecordingSink::default());
        let telemetry = Arc::new(RecordingTelemetry::default());
        let tool = wrap(upper(), sink.clone()).with_telemetry(telemetry.clone());

        assert_eq!(tool.name(), "upper");
        assert_eq!(tool.description(), "Uppercase the input");
        assert_eq!(tool.invoke(json!("abc")).await.unwrap(), json!("ABC"));

        let entries = sink.entries();
        assert_eq!(
            entries[0],
            SinkEntry::Input {
                kind: CapabilityKind::Tool,
                operation: "invoke",
                input: json!({"query": "abc"}),
            }
        );
        match &entries[1] {
            SinkEntry::Output { outcome, .. } => {
                assert_eq!(outcome.as_ref().unwrap(), &json!({"response": "ABC"}));
            }
            other => panic!("unexpected entry {:?}", other),
        }
        let events = telemetry.events.lock().unwrap();
        assert_eq!(events[0].event_name, "ai-tool-called");
        assert_eq!(events[0].payload["response"], "ABC");
    }

    #[tokio::test]
    async fn test_toolkit_member_carries_identity() {
        let sink = Arc::new(RecordingSink::default());
        let tool = wrap(upper(), sink.clone()).with_toolkit("text-utils");
        tool.invoke(json!("x")).await.unwrap();

        match &sink.entries()[0] {
            SinkEntry::Input { input, .. } => {
                assert_eq!(input["toolkit"], "text-utils");
                assert_eq!(input["tool"]["name"], "upper");
                assert_eq!(input["query"], "x");
            }
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_plain_tool_error_keeps_message_and_details() {
        let sink = Arc::new(RecordingSink::default());
        let tool = wrap(upper(), sink);

        let err = tool.invoke(json!("")).await.unwrap_err();
        assert!(err.is_structured());
        assert_eq!(err.code, ToolError::NODE_ERROR);
        assert_eq!(err.origin, Some(ErrorOrigin::ConfigurationNode));
        assert_eq!(err.message, "empty input");
        assert_eq!(err.details.as_deref(), Some("send some text"));
    }

    #[tokio::test]
    async fn test_structured_tool_error_keeps_origin() {
        let sink = Arc::new(RecordingSink::default());
        let tool = wrap(failing_with_node_error(), sink.clone())
            .with_description_mapper(|_| Some("The record does not exist".to_string()));

        let err = tool.invoke(json!("42")).await.unwrap_err();
        assert_eq!(err.origin, Some(ErrorOrigin::Api));
        assert_eq!(err.message, "Not Found");
        assert_eq!(err.details.as_deref(), Some("The record does not exist"));

        match &sink.entries()[1] {
            SinkEntry::Output { outcome, .. } => {
                let recorded = outcome.as_ref().unwrap_err();
                assert_eq!(recorded.description.as_deref(), Some("The record does not exist"));
            }
            other => panic!("unexpected entry {:?}", other),
        }
    }
}
