//! The Azure OpenAI client facade.
//!
//! [`AzureOpenAIClient`] validates configuration, builds the client-secret
//! credential and the chat model once, and exposes two single-turn helpers:
//!
//! - [`AzureOpenAIClient::chat`]: send a message verbatim
//! - [`AzureOpenAIClient::chat_with_template`]: substitute `{name}` placeholders first
//!
//! Both return the completion text with surrounding whitespace removed. Each
//! call is independent; a failed call leaves the client usable.
//!
//! # Example
//!
//! ```rust,ignore
//! use azure_chat::AzureOpenAIClient;
//!
//! let client = AzureOpenAIClient::from_env()?;
//! let answer = client
//!     .chat("What is the factory pattern?", Some("You are a software engineering expert."))
//!     .await?;
//! println!("{answer}");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use azure_chat_core::{build_messages, PromptTemplate};
use azure_chat_identity::{BearerTokenProvider, ClientSecretCredential, COGNITIVE_SERVICES_SCOPE};
use tracing::info;

use crate::config::{AzureConfig, AzureSecrets};
use crate::error::{AzureChatError, Result};
use crate::model::AzureChatModel;

/// Azure OpenAI client authenticated with a service principal.
#[derive(Debug, Clone)]
pub struct AzureOpenAIClient {
    config: AzureConfig,
    credential: Arc<ClientSecretCredential>,
    model: AzureChatModel,
}

impl AzureOpenAIClient {
    /// Build a client from explicit secrets.
    pub fn new(secrets: AzureSecrets) -> Result<Self> {
        let config = secrets.validate()?;

        let credential = Arc::new(
            ClientSecretCredential::new(
                config.tenant_id(),
                config.client_id(),
                config.client_secret(),
            )
            .with_authority_host(config.authority_host())
            .with_timeout(config.timeout()),
        );
        info!(tenant = %config.tenant_id(), "Azure credentials configured");

        let token_provider = BearerTokenProvider::new(credential.clone(), COGNITIVE_SERVICES_SCOPE);
        let model = AzureChatModel::new(
            config.endpoint(),
            config.deployment_name(),
            config.api_version(),
            token_provider,
        )
        .with_timeout(config.timeout());

        Ok(Self {
            config,
            credential,
            model,
        })
    }

    /// Build a client from a map of `azure_*` keys.
    pub fn from_map(secrets: &HashMap<String, String>) -> Result<Self> {
        Self::new(AzureSecrets::from_map(secrets))
    }

    /// Build a client from `AZURE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(AzureSecrets::from_env())
    }

    /// The validated configuration.
    pub fn config(&self) -> &AzureConfig {
        &self.config
    }

    /// The credential used to authenticate.
    pub fn credential(&self) -> &Arc<ClientSecretCredential> {
        &self.credential
    }

    /// The underlying chat model, for direct use.
    pub fn chat_model(&self) -> &AzureChatModel {
        &self.model
    }

    /// Send `message` verbatim, optionally preceded by a system instruction.
    pub async fn chat(&self, message: &str, system_message: Option<&str>) -> Result<String> {
        let messages = build_messages(message, system_message);
        let completion = self.model.invoke(&messages).await?;
        Ok(completion.text().to_string())
    }

    /// Render `template` with `variables` and send it.
    ///
    /// Nothing is sent if a placeholder has no value.
    pub async fn chat_with_template(
        &self,
        template: &str,
        variables: &HashMap<String, String>,
        system_message: Option<&str>,
    ) -> Result<String> {
        let user = PromptTemplate::parse(template)?.format(variables)?;
        self.chat(&user, system_message).await
    }

    /// Blocking version of [`chat`](Self::chat).
    ///
    /// Fails with [`AzureChatError::Runtime`] when called from async code.
    pub fn chat_sync(&self, message: &str, system_message: Option<&str>) -> Result<String> {
        block_on(self.chat(message, system_message))
    }

    /// Blocking version of [`chat_with_template`](Self::chat_with_template).
    ///
    /// Fails with [`AzureChatError::Runtime`] when called from async code.
    pub fn chat_with_template_sync(
        &self,
        template: &str,
        variables: &HashMap<String, String>,
        system_message: Option<&str>,
    ) -> Result<String> {
        block_on(self.chat_with_template(template, variables, system_message))
    }
}

fn block_on<F, T>(future: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(AzureChatError::Runtime(
            "blocking calls cannot run inside an async context; use the async methods".to_string(),
        ));
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AzureChatError::Runtime(format!("Failed to create runtime: {e}")))?;

    rt.block_on(future)
}

/// Build a client from `AZURE_*` environment variables.
pub fn create_client_from_env() -> Result<AzureOpenAIClient> {
    AzureOpenAIClient::from_env()
}

/// Build a client from a map of `azure_*` keys.
pub fn create_client_from_dict(secrets: &HashMap<String, String>) -> Result<AzureOpenAIClient> {
    AzureOpenAIClient::from_map(secrets)
}
