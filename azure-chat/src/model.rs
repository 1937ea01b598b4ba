//! Azure OpenAI chat-completion model.
//!
//! The model is addressed by deployment name rather than model id:
//!
//! ```text
//! POST {endpoint}/openai/deployments/{deployment}/chat/completions?api-version={version}
//! Authorization: Bearer <token>
//! ```
//!
//! A bearer token is requested from the [`BearerTokenProvider`] before every
//! call; caching is left to the credential behind it.

use std::time::Duration;

use azure_chat_core::{ChatMessage, ChatSettings};
use azure_chat_identity::BearerTokenProvider;
use reqwest::header::HeaderMap;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::error::{ModelError, Result};
use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, Usage};

/// Result of a single completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    /// Text of the first choice, as returned.
    pub content: String,
    /// Reason the model stopped.
    pub finish_reason: Option<String>,
    /// Token usage, if reported.
    pub usage: Option<Usage>,
    /// Model that served the deployment.
    pub model: Option<String>,
}

impl ChatCompletion {
    /// Content with surrounding whitespace removed.
    #[must_use]
    pub fn text(&self) -> &str {
        self.content.trim()
    }
}

/// Chat-completion client bound to one Azure OpenAI deployment.
#[derive(Debug, Clone)]
pub struct AzureChatModel {
    client: Client,
    endpoint: String,
    deployment_name: String,
    api_version: String,
    token_provider: BearerTokenProvider,
    settings: ChatSettings,
    timeout: Duration,
}

impl AzureChatModel {
    /// Create a model for `deployment_name` on `endpoint`.
    pub fn new(
        endpoint: impl Into<String>,
        deployment_name: impl Into<String>,
        api_version: impl Into<String>,
        token_provider: BearerTokenProvider,
    ) -> Self {
        let model = Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            deployment_name: deployment_name.into(),
            api_version: api_version.into(),
            token_provider,
            settings: ChatSettings::default(),
            timeout: Duration::from_secs(120),
        };
        info!(
            endpoint = %model.endpoint,
            deployment = %model.deployment_name,
            api_version = %model.api_version,
            "Azure OpenAI chat model initialized"
        );
        model
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Endpoint without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Deployment name.
    pub fn deployment_name(&self) -> &str {
        &self.deployment_name
    }

    /// API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Generation settings sent with every request. These are fixed at
    /// [`ChatSettings::default`].
    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full chat-completions URL for this deployment.
    ///
    /// The deployment name is appended as a single path segment and the API
    /// version as the `api-version` query pair, both percent-encoded.
    pub fn chat_url(&self) -> std::result::Result<Url, ModelError> {
        let invalid =
            |reason: String| ModelError::InvalidEndpoint(format!("{}: {}", self.endpoint, reason));

        let mut url = Url::parse(&self.endpoint).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend([
                "openai",
                "deployments",
                self.deployment_name.as_str(),
                "chat",
                "completions",
            ]);
        url.query_pairs_mut().append_pair("api-version", &self.api_version);
        Ok(url)
    }

    /// Send `messages` as one completion request.
    pub async fn invoke(&self, messages: &[ChatMessage]) -> Result<ChatCompletion> {
        let url = self.chat_url()?;
        let token = self.token_provider.token().await?;

        let body = ChatCompletionRequest {
            messages,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        debug!(
            deployment = %self.deployment_name,
            messages = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(ModelError::from)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            warn!(deployment = %self.deployment_name, status, "Chat completion failed");
            return Err(handle_error_response(status, &body, &headers).into());
        }

        let resp: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::invalid_response(e.to_string()))?;
        debug!(deployment = %self.deployment_name, status, "Chat completion received");

        Ok(parse_response(resp)?)
    }
}

fn parse_response(resp: ChatCompletionResponse) -> std::result::Result<ChatCompletion, ModelError> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::invalid_response("No choices in response"))?;

    if let Some(refusal) = choice.message.refusal {
        return Err(ModelError::ContentFiltered(refusal));
    }

    Ok(ChatCompletion {
        content: choice.message.content.unwrap_or_default(),
        finish_reason: choice.finish_reason,
        usage: resp.usage,
        model: resp.model,
    })
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn handle_error_response(status: u16, body: &str, headers: &HeaderMap) -> ModelError {
    if status == 429 {
        return ModelError::RateLimited {
            retry_after: parse_retry_after(headers),
        };
    }

    if let Ok(err) = serde_json::from_str::<ApiErrorResponse>(body) {
        return match status {
            401 | 403 => ModelError::Authentication(err.error.message),
            404 => ModelError::NotFound(err.error.message),
            _ => ModelError::Api {
                message: err.error.message,
                code: err.error.code,
            },
        };
    }

    ModelError::http(status, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatChoice, ResponseMessage};
    use azure_chat_identity::{AccessToken, AuthError, TokenCredential};
    use reqwest::header::HeaderValue;
    use std::sync::Arc;

    #[derive(Debug)]
    struct StaticCredential;

    #[async_trait::async_trait]
    impl TokenCredential for StaticCredential {
        async fn get_token(&self, _scopes: &[&str]) -> std::result::Result<AccessToken, AuthError> {
            Ok(AccessToken::new("static", chrono::Utc::now()))
        }
    }

    fn model(endpoint: &str) -> AzureChatModel {
        let provider = BearerTokenProvider::new(Arc::new(StaticCredential), "scope");
        AzureChatModel::new(endpoint, "gpt-4", "2024-02-15-preview", provider)
    }

    fn response(content: Option<&str>, refusal: Option<&str>) -> ChatCompletionResponse {
        ChatCompletionResponse {
            id: Some("id".into()),
            model: Some("gpt-4".into()),
            choices: vec![ChatChoice {
                index: 0,
                message: ResponseMessage {
                    role: Some("assistant".into()),
                    content: content.map(String::from),
                    refusal: refusal.map(String::from),
                },
                finish_reason: Some("stop".into()),
            }],
            usage: None,
        }
    }

    #[test]
    fn test_chat_url() {
        let model = model("https://res.openai.azure.com/");
        assert_eq!(
            model.chat_url().unwrap().as_str(),
            "https://res.openai.azure.com/openai/deployments/gpt-4/chat/completions?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn test_chat_url_encodes_deployment_and_version() {
        let provider = BearerTokenProvider::new(Arc::new(StaticCredential), "scope");
        let model =
            AzureChatModel::new("https://res.openai.azure.com", "my deploy/v2", "2024&x=1", provider);
        let url = model.chat_url().unwrap();

        assert_eq!(url.path(), "/openai/deployments/my%20deploy%2Fv2/chat/completions");
        assert_eq!(url.query(), Some("api-version=2024%26x%3D1"));
        let version = url
            .query_pairs()
            .find(|(key, _)| key == "api-version")
            .map(|(_, value)| value.into_owned());
        assert_eq!(version.as_deref(), Some("2024&x=1"));
    }

    #[test]
    fn test_chat_url_keeps_endpoint_path_prefix() {
        let model = model("https://gateway.example.com/azure/");
        assert_eq!(
            model.chat_url().unwrap().path(),
            "/azure/openai/deployments/gpt-4/chat/completions"
        );
    }

    #[test]
    fn test_chat_url_rejects_unparseable_endpoint() {
        let err = model("not a url").chat_url().unwrap_err();
        assert!(matches!(err, ModelError::InvalidEndpoint(ref m) if m.contains("not a url")));
    }

    #[test]
    fn test_default_settings() {
        let model = model("https://e");
        assert_eq!(model.settings().temperature, 0.1);
        assert_eq!(model.settings().max_tokens, 4000);
        assert_eq!(model.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_parse_response_keeps_raw_content() {
        let completion = parse_response(response(Some("  Hi there  \n"), None)).unwrap();
        assert_eq!(completion.content, "  Hi there  \n");
        assert_eq!(completion.text(), "Hi there");
        assert_eq!(completion.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_parse_response_null_content_is_empty() {
        let completion = parse_response(response(None, None)).unwrap();
        assert_eq!(completion.text(), "");
    }

    #[test]
    fn test_parse_response_refusal() {
        let err = parse_response(response(None, Some("no"))).unwrap_err();
        assert!(matches!(err, ModelError::ContentFiltered(ref r) if r == "no"));
    }

    #[test]
    fn test_parse_response_no_choices() {
        let mut resp = response(Some("x"), None);
        resp.choices.clear();
        assert!(matches!(
            parse_response(resp).unwrap_err(),
            ModelError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_error_mapping() {
        let headers = HeaderMap::new();
        let body = r#"{"error": {"code": "401", "message": "Access denied"}}"#;
        assert!(matches!(
            handle_error_response(401, body, &headers),
            ModelError::Authentication(ref m) if m == "Access denied"
        ));

        let body = r#"{"error": {"code": "DeploymentNotFound", "message": "missing"}}"#;
        assert!(matches!(
            handle_error_response(404, body, &headers),
            ModelError::NotFound(_)
        ));

        let body = r#"{"error": {"code": "content_filter", "message": "filtered"}}"#;
        assert!(matches!(
            handle_error_response(400, body, &headers),
            ModelError::Api { code: Some(ref c), .. } if c == "content_filter"
        ));

        assert!(matches!(
            handle_error_response(502, "Bad Gateway", &headers),
            ModelError::Http { status: 502, .. }
        ));
    }

    #[test]
    fn test_rate_limit_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("12"));
        let err = handle_error_response(429, "", &headers);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(12)));
    }
}
