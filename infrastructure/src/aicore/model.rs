//! Chat model backed by an SAP AI Core deployment.

use super::error::{AiCoreError, Result};
use super::protocol::{
    ChatCompletionRequest, ChatCompletionResponse, RESOURCE_GROUP_HEADER, TokenResponse,
    completions_url, token_url,
};
use super::token::TokenCache;
use aicore_application::ports::chat_model::{ChatModel, GatewayError};
use aicore_domain::{AiCoreCredentials, GenerationOptions, LlmResponse, Message, require_deployment};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// [`ChatModel`] calling the chat completions route of one deployment.
///
/// Credentials are passed in by value and the OAuth token is cached and
/// shared with every handle returned by [`ChatModel::bind_tools`].
#[derive(Clone)]
pub struct AiCoreChatModel {
    client: reqwest::Client,
    credentials: Arc<AiCoreCredentials>,
    deployment_id: String,
    model_name: String,
    options: GenerationOptions,
    tools: Vec<Value>,
    token: Arc<TokenCache>,
}

impl AiCoreChatModel {
    /// Create a model for `deployment_id`.
    ///
    /// Fails with a configuration error naming the missing field before
    /// any request is made.
    pub fn new(
        credentials: AiCoreCredentials,
        deployment_id: Option<&str>,
        options: GenerationOptions,
    ) -> std::result::Result<Self, GatewayError> {
        credentials.validate()?;
        let deployment_id = require_deployment(deployment_id)?.to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        info!(
            deployment = %deployment_id,
            resource_group = credentials.resource_group(),
            "SAP AI Core chat model initialized"
        );

        Ok(Self {
            client,
            credentials: Arc::new(credentials),
            model_name: deployment_id.clone(),
            deployment_id,
            options,
            tools: Vec::new(),
            token: Arc::new(TokenCache::new()),
        })
    }

    /// Name reported in logs and telemetry (defaults to the deployment id).
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    pub fn deployment_id(&self) -> &str {
        &self.deployment_id
    }

    pub fn bound_tools(&self) -> &[Value] {
        &self.tools
    }

    async fn access_token(&self) -> Result<String> {
        self.token
            .get_or_refresh(chrono::Utc::now(), || self.fetch_token())
            .await
    }

    async fn fetch_token(&self) -> Result<TokenResponse> {
        let url = token_url(&self.credentials.oauth_url);
        debug!(url = %url, "Requesting access token");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiCoreError::TokenRejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn complete(&self, messages: &[Message]) -> Result<LlmResponse> {
        let token = self.access_token().await?;
        let url = completions_url(&self.credentials.base_url, &self.deployment_id);
        let request = ChatCompletionRequest::new(messages, &self.tools, &self.options);

        debug!(
            deployment = %self.deployment_id,
            messages = messages.len(),
            tools = self.tools.len(),
            "Calling chat completions"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .header(RESOURCE_GROUP_HEADER, self.credentials.resource_group())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 401 {
                // Next call fetches a fresh token.
                self.token.invalidate().await;
            }
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Chat completions request failed");
            return Err(AiCoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        parsed.into_llm_response()
    }
}

impl std::fmt::Debug for AiCoreChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiCoreChatModel")
            .field("deployment_id", &self.deployment_id)
            .field("model_name", &self.model_name)
            .field("tools", &self.tools.len())
            .finish_non_exhaustive()
    }
}

/// Check that every definition names its function.
fn check_tool_definitions(tools: &[Value]) -> std::result::Result<(), GatewayError> {
    for (i, tool) in tools.iter().enumerate() {
        let named = tool
            .pointer("/function/name")
            .and_then(Value::as_str)
            .is_some_and(|name| !name.is_empty());
        if !named {
            return Err(GatewayError::BindingFailed(format!(
                "tool definition #{} has no function name",
                i
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl ChatModel for AiCoreChatModel {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn bind_tools(&self, tools: &[Value]) -> std::result::Result<Box<dyn ChatModel>, GatewayError> {
        check_tool_definitions(tools)?;
        let mut bound = self.clone();
        bound.tools = tools.to_vec();
        Ok(Box::new(bound))
    }

    async fn invoke(&self, messages: &[Message]) -> std::result::Result<LlmResponse, GatewayError> {
        Ok(self.complete(messages).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aicore_domain::ConfigError;
    use serde_json::json;

    fn credentials() -> AiCoreCredentials {
        AiCoreCredentials::new(
            "sb-client",
            "secret",
            "https://tenant.authentication.example.com",
            "https://api.ai.example.com",
        )
    }

    #[test]
    fn test_missing_credential_fails_before_any_call() {
        let mut incomplete = credentials();
        incomplete.client_secret = String::new();

        let err = AiCoreChatModel::new(incomplete, Some("d1"), GenerationOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Configuration(ConfigError::MissingCredential {
                field: "client_secret",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_deployment_fails() {
        let err = AiCoreChatModel::new(credentials(), None, GenerationOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Configuration(ConfigError::MissingDeployment)
        ));
    }

    #[test]
    fn test_bind_tools_returns_bound_copy() {
        let model = AiCoreChatModel::new(credentials(), Some("d1"), GenerationOptions::default())
            .unwrap()
            .with_model_name("gpt-4o");
        let tools = vec![json!({"type": "function", "function": {"name": "calc"}})];

        let bound = model.bind_tools(&tools).unwrap();
        assert_eq!(bound.model_name(), "gpt-4o");
        assert!(model.bound_tools().is_empty());
    }

    #[test]
    fn test_bind_rejects_unnamed_definition() {
        let model =
            AiCoreChatModel::new(credentials(), Some("d1"), GenerationOptions::default()).unwrap();
        let err = model
            .bind_tools(&[json!({"type": "function", "function": {}})])
            .err()
            .unwrap();
        assert!(matches!(err, GatewayError::BindingFailed(_)));
    }

    // ─── Against a mock endpoint ─────────────────────────────────

    use aicore_application::{RetryAdvice, classify_failed_attempt};
    use mockito::{Matcher, Server, ServerGuard};

    const COMPLETIONS_PATH: &str = "/v2/inference/deployments/d1/chat/completions";

    fn model_for(server: &ServerGuard) -> AiCoreChatModel {
        let credentials = AiCoreCredentials::new("sb-client", "secret", server.url(), server.url())
            .with_resource_group("rg-tools");
        AiCoreChatModel::new(credentials, Some("d1"), GenerationOptions::default()).unwrap()
    }

    async fn mock_token(server: &mut ServerGuard, hits: usize) -> mockito::Mock {
        server
            .mock("POST", "/oauth/token")
            .match_header("authorization", Matcher::Regex("^Basic ".to_string()))
            .match_body(Matcher::UrlEncoded(
                "grant_type".to_string(),
                "client_credentials".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "tok-1", "expires_in": 3600}"#)
            .expect(hits)
            .create_async()
            .await
    }

    fn completion_body(text: &str) -> String {
        json!({
            "model": "gpt-4o",
            "choices": [{
                "finish_reason": "stop",
                "message": {"role": "assistant", "content": text}
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_invoke_sends_bearer_token_and_resource_group() {
        let mut server = Server::new_async().await;
        let token = mock_token(&mut server, 1).await;
        let completions = server
            .mock("POST", COMPLETIONS_PATH)
            .match_header("authorization", "Bearer tok-1")
            .match_header("AI-Resource-Group", "rg-tools")
            .match_body(Matcher::PartialJson(json!({"max_tokens": 1000})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Hello"))
            .expect(2)
            .create_async()
            .await;

        let model = model_for(&server);
        for _ in 0..2 {
            let response = model.invoke(&[Message::user("Hi")]).await.unwrap();
            assert_eq!(response.text_content(), "Hello");
        }

        // The cached token serves both calls
        token.assert_async().await;
        completions.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_classified() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server, 1).await;
        let _missing = server
            .mock("POST", COMPLETIONS_PATH)
            .with_status(404)
            .with_body("deployment not found")
            .create_async()
            .await;

        let err = model_for(&server)
            .invoke(&[Message::user("Hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Status { code: 404, .. }));
        assert_eq!(classify_failed_attempt(&err), RetryAdvice::DoNotRetry);
    }

    #[tokio::test]
    async fn test_unauthorized_response_drops_cached_token() {
        let mut server = Server::new_async().await;
        let token = mock_token(&mut server, 2).await;
        let unauthorized = server
            .mock("POST", COMPLETIONS_PATH)
            .with_status(401)
            .with_body("token expired")
            .expect(1)
            .create_async()
            .await;

        let model = model_for(&server);
        let err = model.invoke(&[Message::user("Hi")]).await.unwrap_err();
        assert_eq!(err.status_code(), Some(401));
        unauthorized.assert_async().await;
        unauthorized.remove_async().await;

        let _ok = server
            .mock("POST", COMPLETIONS_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Hello again"))
            .create_async()
            .await;

        let response = model.invoke(&[Message::user("Hi")]).await.unwrap();
        assert_eq!(response.text_content(), "Hello again");
        token.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_token_request_is_not_retried() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("POST", "/oauth/token")
            .with_status(401)
            .with_body(r#"{"error": "invalid_client"}"#)
            .create_async()
            .await;

        let err = model_for(&server)
            .invoke(&[Message::user("Hi")])
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(401));
        assert_eq!(classify_failed_attempt(&err), RetryAdvice::DoNotRetry);
    }
}
