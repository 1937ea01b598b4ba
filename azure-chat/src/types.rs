//! Azure OpenAI chat-completion wire types.

use azure_chat_core::ChatMessage;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

/// Chat completion request body.
///
/// The deployment is addressed by URL, so no `model` field is sent.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    /// Messages in the conversation.
    pub messages: &'a [ChatMessage],
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens to generate.
    pub max_tokens: u64,
}

// ============================================================================
// Response Types
// ============================================================================

/// Chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Response ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Model that served the deployment.
    #[serde(default)]
    pub model: Option<String>,
    /// Response choices.
    pub choices: Vec<ChatChoice>,
    /// Token usage.
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Chat choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// Choice index.
    #[serde(default)]
    pub index: u32,
    /// The message.
    pub message: ResponseMessage,
    /// Reason for stopping.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response message.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Role.
    #[serde(default)]
    pub role: Option<String>,
    /// Text content.
    #[serde(default)]
    pub content: Option<String>,
    /// Refusal (for content filter).
    #[serde(default)]
    pub refusal: Option<String>,
}

/// Token usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens.
    pub prompt_tokens: u64,
    /// Completion tokens.
    pub completion_tokens: u64,
    /// Total tokens.
    pub total_tokens: u64,
}

// ============================================================================
// Error Types
// ============================================================================

/// Error envelope returned by Azure OpenAI.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error message.
    pub message: String,
    /// Error code, e.g. `DeploymentNotFound`.
    #[serde(default)]
    pub code: Option<String>,
    /// Error type.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialize_request() {
        let messages = vec![ChatMessage::system("S"), ChatMessage::user("Hi")];
        let request = ChatCompletionRequest {
            messages: &messages,
            temperature: 0.1,
            max_tokens: 4000,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "messages": [
                    {"role": "system", "content": "S"},
                    {"role": "user", "content": "Hi"}
                ],
                "temperature": 0.1,
                "max_tokens": 4000
            })
        );
    }

    #[test]
    fn test_deserialize_response() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1234567890,
            "model": "gpt-4",
            "prompt_filter_results": [],
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello!"},
                "finish_reason": "stop",
                "content_filter_results": {}
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].message.content.as_deref(), Some("Hello!"));
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(15));
    }

    #[test]
    fn test_deserialize_azure_error() {
        let json = r#"{"error": {"code": "DeploymentNotFound", "message": "The API deployment for this resource does not exist."}}"#;
        let err: ApiErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(err.error.code.as_deref(), Some("DeploymentNotFound"));
        assert!(err.error.error_type.is_none());
    }
}
