//! Error types for azure-chat.

use azure_chat_core::TemplateError;
use azure_chat_identity::AuthError;
use std::time::Duration;
use thiserror::Error;

/// The main error type for client operations.
#[derive(Debug, Error)]
pub enum AzureChatError {
    /// Required configuration is missing.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Token acquisition failed.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Template could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Chat-completion request failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A blocking call could not run.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result type alias using [`AzureChatError`].
pub type Result<T> = std::result::Result<T, AzureChatError>;

/// Configuration errors raised while building a client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Every required key that was absent or empty.
    #[error("Missing required secrets: [{}]", .0.join(", "))]
    MissingSecrets(Vec<&'static str>),
}

impl ConfigError {
    /// Keys reported as missing.
    #[must_use]
    pub fn missing_keys(&self) -> &[&'static str] {
        match self {
            ConfigError::MissingSecrets(keys) => keys,
        }
    }
}

/// Errors from the chat-completion endpoint.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Non-success status without a structured error body.
    #[error("HTTP error: {status} - {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// API-level error with a structured body.
    #[error("API error: {message}")]
    Api {
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },

    /// The endpoint rejected the bearer token.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested retry delay.
        retry_after: Option<Duration>,
    },

    /// Deployment or route not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The endpoint cannot be turned into a request URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Response could not be interpreted.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The model refused to answer.
    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    /// Request timed out.
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Could not connect.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Other transport failure.
    #[error("Network error: {0}")]
    Network(String),
}

impl ModelError {
    /// Create an HTTP error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Get the retry-after duration if applicable.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ModelError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ModelError::Timeout(err.to_string())
        } else if err.is_connect() {
            ModelError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ModelError::http(status.as_u16(), err.to_string())
        } else {
            ModelError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secrets_message_lists_every_key() {
        let err = ConfigError::MissingSecrets(vec!["azure_tenant_id", "azure_endpoint"]);
        assert_eq!(
            err.to_string(),
            "Missing required secrets: [azure_tenant_id, azure_endpoint]"
        );
        assert_eq!(err.missing_keys(), &["azure_tenant_id", "azure_endpoint"]);
    }

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let err: AzureChatError = TemplateError::MissingVariables(vec!["name".into()]).into();
        assert_eq!(err.to_string(), "Missing template variables: [name]");

        let err: AzureChatError = ModelError::http(500, "boom").into();
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_retry_after() {
        let err = ModelError::RateLimited {
            retry_after: Some(Duration::from_secs(7)),
        };
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
        assert_eq!(ModelError::http(500, "x").retry_after(), None);
    }
}
