//! Client configuration.
//!
//! [`AzureSecrets`] is the raw input: every field optional, filled from a
//! builder, a string map or the environment. [`AzureSecrets::validate`] turns
//! it into an immutable [`AzureConfig`], applying defaults to the optional
//! fields and reporting every missing required key in a single error.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use azure_chat_identity::DEFAULT_AUTHORITY_HOST;

use crate::error::ConfigError;

/// Map key for the tenant id.
pub const TENANT_ID_KEY: &str = "azure_tenant_id";
/// Map key for the client id.
pub const CLIENT_ID_KEY: &str = "azure_client_id";
/// Map key for the client secret.
pub const CLIENT_SECRET_KEY: &str = "azure_client_secret";
/// Map key for the service endpoint.
pub const ENDPOINT_KEY: &str = "azure_endpoint";
/// Map key for the deployment name.
pub const DEPLOYMENT_NAME_KEY: &str = "azure_deployment_name";
/// Map key for the API version.
pub const API_VERSION_KEY: &str = "azure_api_version";
/// Map key for the authority host.
pub const AUTHORITY_HOST_KEY: &str = "azure_authority_host";

/// Deployment used when none is configured.
pub const DEFAULT_DEPLOYMENT_NAME: &str = "gpt-4";
/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2024-02-15-preview";
/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Unvalidated configuration.
#[derive(Clone, Default)]
pub struct AzureSecrets {
    /// Entra ID tenant.
    pub tenant_id: Option<String>,
    /// Application (client) id.
    pub client_id: Option<String>,
    /// Client secret.
    pub client_secret: Option<String>,
    /// Azure OpenAI endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: Option<String>,
    /// Model deployment name.
    pub deployment_name: Option<String>,
    /// API version query parameter.
    pub api_version: Option<String>,
    /// Identity provider base URL.
    pub authority_host: Option<String>,
    /// Per-request timeout for chat calls.
    pub timeout: Option<Duration>,
}

impl AzureSecrets {
    /// Create empty secrets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tenant id.
    #[must_use]
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Set the client id.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the client secret.
    #[must_use]
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the deployment name.
    #[must_use]
    pub fn with_deployment_name(mut self, deployment_name: impl Into<String>) -> Self {
        self.deployment_name = Some(deployment_name.into());
        self
    }

    /// Set the API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Set the authority host.
    #[must_use]
    pub fn with_authority_host(mut self, authority_host: impl Into<String>) -> Self {
        self.authority_host = Some(authority_host.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read secrets from a map keyed by `azure_tenant_id`, `azure_client_id`,
    /// `azure_client_secret`, `azure_endpoint`, `azure_deployment_name`,
    /// `azure_api_version` and `azure_authority_host`. Other keys are ignored.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).cloned();
        Self {
            tenant_id: get(TENANT_ID_KEY),
            client_id: get(CLIENT_ID_KEY),
            client_secret: get(CLIENT_SECRET_KEY),
            endpoint: get(ENDPOINT_KEY),
            deployment_name: get(DEPLOYMENT_NAME_KEY),
            api_version: get(API_VERSION_KEY),
            authority_host: get(AUTHORITY_HOST_KEY),
            timeout: None,
        }
    }

    /// Read secrets from environment variables.
    ///
    /// Looks for:
    /// - `AZURE_TENANT_ID`
    /// - `AZURE_CLIENT_ID`
    /// - `AZURE_CLIENT_SECRET`
    /// - `AZURE_ENDPOINT`
    /// - `AZURE_DEPLOYMENT_NAME` (optional)
    /// - `AZURE_API_VERSION` (optional)
    /// - `AZURE_AUTHORITY_HOST` (optional)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read secrets through `lookup`, which maps an environment variable name
    /// to its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            tenant_id: lookup("AZURE_TENANT_ID"),
            client_id: lookup("AZURE_CLIENT_ID"),
            client_secret: lookup("AZURE_CLIENT_SECRET"),
            endpoint: lookup("AZURE_ENDPOINT"),
            deployment_name: lookup("AZURE_DEPLOYMENT_NAME"),
            api_version: lookup("AZURE_API_VERSION"),
            authority_host: lookup("AZURE_AUTHORITY_HOST"),
            timeout: None,
        }
    }

    /// Check required fields and apply defaults.
    pub fn validate(self) -> Result<AzureConfig, ConfigError> {
        let required = [
            (TENANT_ID_KEY, &self.tenant_id),
            (CLIENT_ID_KEY, &self.client_id),
            (CLIENT_SECRET_KEY, &self.client_secret),
            (ENDPOINT_KEY, &self.endpoint),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| non_empty(value).is_none())
            .map(|(key, _)| *key)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingSecrets(missing));
        }

        Ok(AzureConfig {
            tenant_id: non_empty(&self.tenant_id).unwrap_or_default(),
            client_id: non_empty(&self.client_id).unwrap_or_default(),
            client_secret: non_empty(&self.client_secret).unwrap_or_default(),
            endpoint: non_empty(&self.endpoint)
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_string(),
            deployment_name: non_empty(&self.deployment_name)
                .unwrap_or_else(|| DEFAULT_DEPLOYMENT_NAME.to_string()),
            api_version: non_empty(&self.api_version)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            authority_host: non_empty(&self.authority_host)
                .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl fmt::Debug for AzureSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureSecrets")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("deployment_name", &self.deployment_name)
            .field("api_version", &self.api_version)
            .field("authority_host", &self.authority_host)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Validated, immutable configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AzureConfig {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    endpoint: String,
    deployment_name: String,
    api_version: String,
    authority_host: String,
    timeout: Duration,
}

impl AzureConfig {
    /// Entra ID tenant.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Application (client) id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Client secret.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Endpoint without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Model deployment name.
    pub fn deployment_name(&self) -> &str {
        &self.deployment_name
    }

    /// API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Identity provider base URL.
    pub fn authority_host(&self) -> &str {
        &self.authority_host
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("deployment_name", &self.deployment_name)
            .field("api_version", &self.api_version)
            .field("authority_host", &self.authority_host)
            .field("timeout", &self.timeout)
            .finish()
    }
}
