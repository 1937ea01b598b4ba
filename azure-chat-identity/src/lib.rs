//! Entra ID authentication for azure-chat.
//!
//! This crate provides the pieces needed to call Azure OpenAI with a bearer
//! token obtained through the OAuth2 client-credentials grant:
//!
//! - [`TokenCredential`]: anything that can produce an [`AccessToken`] for a set of scopes
//! - [`ClientSecretCredential`]: tenant id + client id + client secret exchange, with caching
//! - [`BearerTokenProvider`]: a credential bound to one scope, called before every request
//!
//! Note: tokens are only cached in memory by the credential. Nothing is persisted.
//!
//! ## Example
//!
//! ```rust,ignore
//! use azure_chat_identity::{BearerTokenProvider, ClientSecretCredential, COGNITIVE_SERVICES_SCOPE};
//! use std::sync::Arc;
//!
//! let credential = ClientSecretCredential::new("tenant", "client-id", "secret");
//! let provider = BearerTokenProvider::new(Arc::new(credential), COGNITIVE_SERVICES_SCOPE);
//! let token = provider.token().await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod client_secret;
mod credential;
mod error;
mod provider;

pub use client_secret::ClientSecretCredential;
pub use credential::{AccessToken, TokenCredential};
pub use error::AuthError;
pub use provider::BearerTokenProvider;

/// Resource scope for Azure Cognitive Services, including Azure OpenAI.
pub const COGNITIVE_SERVICES_SCOPE: &str = "https://cognitiveservices.azure.com/.default";

/// Public-cloud Entra ID authority.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
