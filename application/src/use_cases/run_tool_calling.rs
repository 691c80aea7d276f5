//! Run Tool Calling use case.
//!
//! Binds a [`ToolSet`] to a chat model, executes the tool calls the model
//! asks for and resubmits the extended conversation for the final answer.
//!
//! Protocol per run:
//! 1. Empty tool set: plain call, no binding
//! 2. Bind tools, submit the conversation
//! 3. No tool-call directives: answer returned as is
//! 4. Each directive resolved on its own, in model order; tool failures
//!    become error results
//! 5. Assistant tool-call turn plus one `tool` message per result appended
//! 6. Resubmitted, up to `max_rounds` times
//!
//! A binding or submission failure falls back to one tool-less call on the
//! original conversation.

use crate::config::{ToolCallingParams, UnknownToolPolicy};
use crate::ports::chat_model::{ChatModel, GatewayError};
use crate::ports::tool_schema::ToolSchemaPort;
use crate::tools::ToolSet;
use crate::use_cases::tool_helpers::tool_args_preview;
use aicore_domain::util::truncate_str;
use aicore_domain::{Conversation, Message, ToolCallRequest, ToolCallResult};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during a tool-calling run.
#[derive(Error, Debug)]
pub enum RunToolCallingError {
    /// Direct call (no tools bound) failed.
    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    #[error("Tool calling failed ({protocol_error}); direct fallback failed too: {fallback_error}")]
    FallbackFailed {
        protocol_error: String,
        fallback_error: String,
    },
}

/// How the final answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseKind {
    DirectResponse,
    WithTools,
    Fallback,
}

/// Outcome of [`RunToolCallingUseCase::execute`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationResult {
    pub output: String,
    /// Tool results in the order the model requested them.
    pub intermediate_steps: Vec<ToolCallResult>,
    pub tools_used: usize,
    pub kind: ResponseKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of tool rounds executed.
    pub rounds: usize,
}

impl OrchestrationResult {
    fn direct(output: String, tools_used: usize) -> Self {
        Self {
            output,
            intermediate_steps: Vec::new(),
            tools_used,
            kind: ResponseKind::DirectResponse,
            error: None,
            rounds: 0,
        }
    }

    fn fallback(output: String, error: String) -> Self {
        Self {
            output,
            intermediate_steps: Vec::new(),
            tools_used: 0,
            kind: ResponseKind::Fallback,
            error: Some(error),
            rounds: 0,
        }
    }
}

/// Directives of one round that got a result, with those results.
struct RoundOutcome {
    resolved: Vec<ToolCallRequest>,
    results: Vec<ToolCallResult>,
}

/// Use case for running a tool-calling exchange.
#[derive(Clone)]
pub struct RunToolCallingUseCase {
    tool_schema: Arc<dyn ToolSchemaPort>,
}

impl RunToolCallingUseCase {
    pub fn new(tool_schema: Arc<dyn ToolSchemaPort>) -> Self {
        Self { tool_schema }
    }

    pub async fn execute(
        &self,
        conversation: &Conversation,
        tools: &ToolSet,
        model: &dyn ChatModel,
        params: &ToolCallingParams,
    ) -> Result<OrchestrationResult, RunToolCallingError> {
        let last = conversation.last().map(|m| m.content.as_str()).unwrap_or_default();
        info!(
            model = model.model_name(),
            tools = tools.len(),
            "Starting tool calling: {}",
            truncate_str(last, 100)
        );

        if tools.is_empty() {
            let response = model.invoke(conversation.messages()).await?;
            return Ok(OrchestrationResult::direct(response.text_content(), 0));
        }

        match self.run_with_tools(conversation, tools, model, params).await {
            Ok(result) => {
                info!(
                    kind = ?result.kind,
                    rounds = result.rounds,
                    steps = result.intermediate_steps.len(),
                    "Tool calling completed"
                );
                Ok(result)
            }
            Err(protocol_error) => {
                warn!(error = %protocol_error, "Tool calling failed, falling back to a direct call");
                match model.invoke(conversation.messages()).await {
                    Ok(response) => Ok(OrchestrationResult::fallback(
                        response.text_content(),
                        protocol_error.to_string(),
                    )),
                    Err(fallback_error) => Err(RunToolCallingError::FallbackFailed {
                        protocol_error: protocol_error.to_string(),
                        fallback_error: fallback_error.to_string(),
                    }),
                }
            }
        }
    }

    async fn run_with_tools(
        &self,
        conversation: &Conversation,
        tools: &ToolSet,
        model: &dyn ChatModel,
        params: &ToolCallingParams,
    ) -> Result<OrchestrationResult, GatewayError> {
        let schemas = self.tool_schema.bind_schema(tools);
        let bound = model.bind_tools(&schemas)?;
        debug!(tools = ?tools.names(), "Bound {} tools", schemas.len());

        let max_rounds = params.max_rounds.max(1);
        let mut conversation = conversation.clone();
        let mut response = bound.invoke(conversation.messages()).await?;
        let mut steps = Vec::new();
        let mut rounds = 0;

        loop {
            let calls = response.tool_calls();
            if calls.is_empty() {
                break;
            }
            if rounds >= max_rounds {
                warn!(
                    "Tool loop reached max_rounds ({}); returning the last answer",
                    max_rounds
                );
                break;
            }
            rounds += 1;

            let RoundOutcome { resolved, results } =
                self.execute_round(&calls, tools, params.unknown_tool_policy).await;

            debug!(
                "Tool round {}/{}: sending {} tool results",
                rounds,
                max_rounds,
                results.len()
            );

            conversation = conversation
                .with_message(Message::assistant_tool_calls(response.text_content(), resolved))
                .with_messages(
                    results
                        .iter()
                        .map(|r| Message::tool(r.call_id.clone(), r.outcome.render())),
                );
            steps.extend(results);

            response = bound.invoke(conversation.messages()).await?;
        }

        let kind = if rounds == 0 {
            ResponseKind::DirectResponse
        } else {
            ResponseKind::WithTools
        };

        Ok(OrchestrationResult {
            output: response.text_content(),
            intermediate_steps: steps,
            tools_used: tools.len(),
            kind,
            error: None,
            rounds,
        })
    }

    /// Resolve every directive of one round, sequentially and in order.
    async fn execute_round(
        &self,
        calls: &[ToolCallRequest],
        tools: &ToolSet,
        policy: UnknownToolPolicy,
    ) -> RoundOutcome {
        let mut resolved = Vec::with_capacity(calls.len());
        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            let Some(tool) = tools.get(&call.tool_name) else {
                match policy {
                    UnknownToolPolicy::Skip => {
                        warn!(tool = %call.tool_name, "Model requested an unknown tool; skipping");
                    }
                    UnknownToolPolicy::RecordError => {
                        warn!(tool = %call.tool_name, "Model requested an unknown tool");
                        results.push(ToolCallResult::error(
                            call,
                            format!("Tool not found: {}", call.tool_name),
                        ));
                        resolved.push(call.clone());
                    }
                }
                continue;
            };

            debug!(
                tool = %call.tool_name,
                call_id = %call.call_id,
                "Calling tool: {}",
                tool_args_preview(call)
            );
            let result = match tool.invoke(call.arguments_value()).await {
                Ok(output) => ToolCallResult::output(call, output),
                Err(e) => {
                    warn!(tool = %call.tool_name, error = %e, "Tool call failed");
                    ToolCallResult::error(call, e.message)
                }
            };
            results.push(result);
            resolved.push(call.clone());
        }

        RoundOutcome { resolved, results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::invocable::Invocable;
    use crate::tools::DynamicTool;
    use aicore_domain::{ContentBlock, LlmResponse, Role, StopReason, ToolError};
    use async_trait::async_trait;
    use futures::FutureExt;
    use serde_json::{Map, Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    #[derive(Default)]
    struct ModelScript {
        responses: Mutex<VecDeque<Result<LlmResponse, GatewayError>>>,
        /// Conversations submitted, with whether tools were bound.
        requests: Mutex<Vec<(bool, Vec<Message>)>>,
        bind_error: Option<GatewayError>,
        bound_tools: Mutex<Vec<Value>>,
    }

    struct MockModel {
        script: Arc<ModelScript>,
        bound: bool,
    }

    impl MockModel {
        fn new(responses: Vec<Result<LlmResponse, GatewayError>>) -> (Self, Arc<ModelScript>) {
            Self::with_script(ModelScript {
                responses: Mutex::new(VecDeque::from(responses)),
                ..ModelScript::default()
            })
        }

        fn with_script(script: ModelScript) -> (Self, Arc<ModelScript>) {
            let script = Arc::new(script);
            (
                Self {
                    script: script.clone(),
                    bound: false,
                },
                script,
            )
        }
    }

    #[async_trait]
    impl ChatModel for MockModel {
        fn model_name(&self) -> &str {
            "mock-model"
        }

        fn bind_tools(&self, tools: &[Value]) -> Result<Box<dyn ChatModel>, GatewayError> {
            if let Some(e) = &self.script.bind_error {
                return Err(e.clone());
            }
            self.script.bound_tools.lock().unwrap().extend(tools.iter().cloned());
            Ok(Box::new(MockModel {
                script: self.script.clone(),
                bound: true,
            }))
        }

        async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, GatewayError> {
            self.script
                .requests
                .lock()
                .unwrap()
                .push((self.bound, messages.to_vec()));
            self.script
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Other("No more responses".to_string())))
        }
    }

    /// Minimal ToolSchemaPort reproducing the wire format for tests.
    struct MockToolSchema;

    impl ToolSchemaPort for MockToolSchema {
        fn tool_to_schema(&self, tool: &dyn Invocable) -> Value {
            json!({
                "type": "function",
                "function": {"name": tool.name(), "description": tool.description()}
            })
        }
    }

    fn use_case() -> RunToolCallingUseCase {
        RunToolCallingUseCase::new(Arc::new(MockToolSchema))
    }

    fn tool(name: &'static str) -> DynamicTool {
        DynamicTool::new(name, "Test tool", move |input: String| {
            async move {
                if input.contains("fail") {
                    return Err(ToolError::execution_failed(format!("{} exploded", name)));
                }
                Ok(format!("{}({})", name, input))
            }
            .boxed()
        })
    }

    fn tools() -> ToolSet {
        ToolSet::new().with(tool("search")).with(tool("calc")).with(tool("lookup"))
    }

    fn text_response(text: &str) -> LlmResponse {
        LlmResponse::from_text(text)
    }

    fn tool_call(id: &str, name: &str, input: &str) -> ContentBlock {
        let mut args = Map::new();
        args.insert("input".to_string(), json!(input));
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input: args,
        }
    }

    fn tool_use_response(calls: Vec<ContentBlock>) -> LlmResponse {
        LlmResponse {
            content: calls,
            stop_reason: Some(StopReason::ToolUse),
            model: Some("mock-model".to_string()),
        }
    }

    fn conversation() -> Conversation {
        Conversation::from_prompt("You are helpful.", "What is 6*7?")
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_empty_tool_set_never_binds() {
        let (model, script) = MockModel::new(vec![Ok(text_response("42"))]);

        let result = use_case()
            .execute(&conversation(), &ToolSet::new(), &model, &ToolCallingParams::default())
            .await
            .unwrap();

        assert_eq!(result.kind, ResponseKind::DirectResponse);
        assert_eq!(result.tools_used, 0);
        assert_eq!(result.output, "42");
        assert!(script.bound_tools.lock().unwrap().is_empty());
        assert!(!script.requests.lock().unwrap()[0].0);
    }

    #[tokio::test]
    async fn test_no_directives_is_direct_response_with_tool_count() {
        let (model, script) = MockModel::new(vec![Ok(text_response("Just 42."))]);

        let result = use_case()
            .execute(&conversation(), &tools(), &model, &ToolCallingParams::default())
            .await
            .unwrap();

        assert_eq!(result.kind, ResponseKind::DirectResponse);
        assert_eq!(result.tools_used, 3);
        assert_eq!(result.output, "Just 42.");
        let bound = script.bound_tools.lock().unwrap();
        let names: Vec<&str> = bound
            .iter()
            .map(|t| t["function"]["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["search", "calc", "lookup"]);
    }

    #[tokio::test]
    async fn test_tool_round_appends_turns_and_resubmits() {
        let (model, script) = MockModel::new(vec![
            Ok(tool_use_response(vec![tool_call("call_1", "calc", "6*7")])),
            Ok(text_response("The answer is 42.")),
        ]);

        let result = use_case()
            .execute(&conversation(), &tools(), &model, &ToolCallingParams::default())
            .await
            .unwrap();

        assert_eq!(result.kind, ResponseKind::WithTools);
        assert_eq!(result.output, "The answer is 42.");
        assert_eq!(result.rounds, 1);
        assert_eq!(result.intermediate_steps.len(), 1);
        assert_eq!(
            result.intermediate_steps[0].outcome,
            aicore_domain::ToolOutcome::Output(json!("calc(6*7)"))
        );

        let requests = script.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        let (bound, resubmitted) = &requests[1];
        assert!(*bound);
        assert_eq!(resubmitted.len(), 4);
        assert_eq!(resubmitted[2].role, Role::Assistant);
        assert_eq!(resubmitted[2].tool_calls[0].call_id, "call_1");
        assert_eq!(resubmitted[3].role, Role::Tool);
        assert_eq!(resubmitted[3].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(resubmitted[3].content, r#""calc(6*7)""#);
    }

    #[tokio::test]
    async fn test_one_failing_tool_does_not_abort_round() {
        let (model, script) = MockModel::new(vec![
            Ok(tool_use_response(vec![
                tool_call("call_1", "search", "sap"),
                tool_call("call_2", "calc", "fail"),
                tool_call("call_3", "lookup", "acme"),
            ])),
            Ok(text_response("Done despite one failure.")),
        ]);

        let result = use_case()
            .execute(&conversation(), &tools(), &model, &ToolCallingParams::default())
            .await
            .unwrap();

        assert_eq!(result.kind, ResponseKind::WithTools);
        assert_eq!(result.output, "Done despite one failure.");
        assert_eq!(result.intermediate_steps.len(), 3);
        let errors: Vec<_> = result
            .intermediate_steps
            .iter()
            .filter(|s| s.is_error())
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].call_id, "call_2");
        assert_eq!(errors[0].error_message(), Some("calc exploded"));

        let ids: Vec<&str> = result
            .intermediate_steps
            .iter()
            .map(|s| s.call_id.as_str())
            .collect();
        assert_eq!(ids, vec!["call_1", "call_2", "call_3"]);

        let requests = script.requests.lock().unwrap();
        assert_eq!(requests[1].1[4].content, "Error: calc exploded");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_skipped_by_default() {
        let (model, script) = MockModel::new(vec![
            Ok(tool_use_response(vec![
                tool_call("call_1", "teleport", "mars"),
                tool_call("call_2", "calc", "1+1"),
            ])),
            Ok(text_response("2")),
        ]);

        let result = use_case()
            .execute(&conversation(), &tools(), &model, &ToolCallingParams::default())
            .await
            .unwrap();

        assert_eq!(result.intermediate_steps.len(), 1);
        assert_eq!(result.intermediate_steps[0].tool_name, "calc");
        let requests = script.requests.lock().unwrap();
        let assistant = &requests[1].1[2];
        assert_eq!(assistant.tool_calls.len(), 1);
        assert_eq!(assistant.tool_calls[0].tool_name, "calc");
    }

    #[tokio::test]
    async fn test_unknown_tool_recorded_when_requested() {
        let (model, _script) = MockModel::new(vec![
            Ok(tool_use_response(vec![tool_call("call_1", "teleport", "mars")])),
            Ok(text_response("Cannot teleport.")),
        ]);
        let params =
            ToolCallingParams::default().with_unknown_tool_policy(UnknownToolPolicy::RecordError);

        let result = use_case()
            .execute(&conversation(), &tools(), &model, &params)
            .await
            .unwrap();

        assert_eq!(result.intermediate_steps.len(), 1);
        assert_eq!(
            result.intermediate_steps[0].error_message(),
            Some("Tool not found: teleport")
        );
    }

    #[tokio::test]
    async fn test_bind_failure_falls_back_to_direct_call() {
        let (model, script) = MockModel::with_script(ModelScript {
            responses: Mutex::new(VecDeque::from(vec![Ok(text_response("Plain answer"))])),
            bind_error: Some(GatewayError::BindingFailed("tools unsupported".to_string())),
            ..ModelScript::default()
        });

        let result = use_case()
            .execute(&conversation(), &tools(), &model, &ToolCallingParams::default())
            .await
            .unwrap();

        assert_eq!(result.kind, ResponseKind::Fallback);
        assert_eq!(result.tools_used, 0);
        assert_eq!(result.output, "Plain answer");
        assert!(result.error.as_deref().unwrap().contains("tools unsupported"));

        let requests = script.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].0);
        assert_eq!(requests[0].1, conversation().messages().to_vec());
    }

    #[tokio::test]
    async fn test_first_invoke_failure_falls_back() {
        let (model, _script) = MockModel::new(vec![
            Err(GatewayError::Status {
                code: 400,
                message: "tools not supported by this deployment".to_string(),
            }),
            Ok(text_response("Fallback answer")),
        ]);

        let result = use_case()
            .execute(&conversation(), &tools(), &model, &ToolCallingParams::default())
            .await
            .unwrap();

        assert_eq!(result.kind, ResponseKind::Fallback);
        assert_eq!(result.tools_used, 0);
        assert!(!result.error.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_failure_reports_both_errors() {
        let (model, _script) = MockModel::new(vec![
            Err(GatewayError::Timeout),
            Err(GatewayError::ConnectionError("refused".to_string())),
        ]);

        let err = use_case()
            .execute(&conversation(), &tools(), &model, &ToolCallingParams::default())
            .await
            .unwrap_err();

        match err {
            RunToolCallingError::FallbackFailed {
                protocol_error,
                fallback_error,
            } => {
                assert_eq!(protocol_error, "Timeout");
                assert!(fallback_error.contains("refused"));
            }
            other => panic!("expected FallbackFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_max_rounds_bounds_tool_rounds() {
        let (model, script) = MockModel::new(vec![
            Ok(tool_use_response(vec![tool_call("call_1", "search", "a")])),
            Ok(tool_use_response(vec![tool_call("call_2", "search", "b")])),
            Ok(tool_use_response(vec![tool_call("call_3", "search", "c")])),
            Ok(text_response("never reached")),
        ]);
        let params = ToolCallingParams::default().with_max_rounds(2);

        let result = use_case()
            .execute(&conversation(), &tools(), &model, &params)
            .await
            .unwrap();

        assert_eq!(result.rounds, 2);
        assert_eq!(result.intermediate_steps.len(), 2);
        assert_eq!(result.kind, ResponseKind::WithTools);
        assert_eq!(script.requests.lock().unwrap().len(), 3);
    }
}
