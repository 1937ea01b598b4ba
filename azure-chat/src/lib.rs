//! # azure-chat
//!
//! A small Azure OpenAI chat client. It authenticates a service principal
//! through the Entra ID client-credentials flow, points a chat-completion
//! client at one model deployment, and offers two helpers:
//!
//! - `chat(message, system)` sends a message as-is
//! - `chat_with_template(template, variables, system)` fills `{name}`
//!   placeholders first and refuses to send if any is missing
//!
//! ## Quick Start
//!
//! ```ignore
//! use azure_chat::prelude::*;
//! use std::collections::HashMap;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AzureOpenAIClient::from_env()?;
//!
//!     let answer = client.chat("Hello!", Some("You are concise.")).await?;
//!     println!("{answer}");
//!
//!     let mut vars = HashMap::new();
//!     vars.insert("topic".to_string(), "ownership".to_string());
//!     let answer = client.chat_with_template("Explain {topic}.", &vars, None).await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! | Map key               | Environment variable    | Required | Default               |
//! |-----------------------|-------------------------|----------|-----------------------|
//! | `azure_tenant_id`     | `AZURE_TENANT_ID`       | yes      |                       |
//! | `azure_client_id`     | `AZURE_CLIENT_ID`       | yes      |                       |
//! | `azure_client_secret` | `AZURE_CLIENT_SECRET`   | yes      |                       |
//! | `azure_endpoint`      | `AZURE_ENDPOINT`        | yes      |                       |
//! | `azure_deployment_name` | `AZURE_DEPLOYMENT_NAME` | no     | `gpt-4`               |
//! | `azure_api_version`   | `AZURE_API_VERSION`     | no       | `2024-02-15-preview`  |
//! | `azure_authority_host`| `AZURE_AUTHORITY_HOST`  | no       | `https://login.microsoftonline.com` |
//!
//! ## Logging
//!
//! The crate emits `tracing` events and never installs a subscriber.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod types;

/// Re-export of the core crate.
pub use azure_chat_core as core;
/// Re-export of the identity crate.
pub use azure_chat_identity as identity;

pub use client::{create_client_from_dict, create_client_from_env, AzureOpenAIClient};
pub use config::{AzureConfig, AzureSecrets};
pub use error::{AzureChatError, ConfigError, ModelError, Result};
pub use model::{AzureChatModel, ChatCompletion};

pub use azure_chat_core::{ChatMessage, ChatSettings, PromptTemplate, Role, TemplateError};
pub use azure_chat_identity::{AuthError, BearerTokenProvider, ClientSecretCredential, TokenCredential};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        create_client_from_dict, create_client_from_env, AzureChatError, AzureChatModel,
        AzureOpenAIClient, AzureSecrets, ChatCompletion, ChatMessage, PromptTemplate, Result,
        Role,
    };
}
