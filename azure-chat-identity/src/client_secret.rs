//! Client-credentials token exchange against Entra ID.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration as StdDuration;
use tracing::{debug, info, warn};

use crate::credential::{AccessToken, TokenCredential};
use crate::error::AuthError;
use crate::DEFAULT_AUTHORITY_HOST;

/// Tokens are refreshed this long before they expire.
const EXPIRY_BUFFER_SECS: i64 = 300;

const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(120);

/// Authenticates a service principal with a client secret.
///
/// Tokens are cached per scope set and reused until five minutes before they
/// expire.
pub struct ClientSecretCredential {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    authority_host: String,
    client: Client,
    timeout: StdDuration,
    cache: Mutex<HashMap<String, AccessToken>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    expires_in: ExpiresIn,
}

/// Entra ID v2 returns a number; some v1-compatible endpoints return a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
    Seconds(i64),
    Text(String),
}

impl ExpiresIn {
    fn seconds(&self) -> Result<i64, AuthError> {
        match self {
            ExpiresIn::Seconds(secs) => Ok(*secs),
            ExpiresIn::Text(text) => text
                .parse()
                .map_err(|_| AuthError::InvalidResponse(format!("bad expires_in: {}", text))),
        }
    }
}

impl ClientSecretCredential {
    /// Create a credential for the public cloud.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Use a different authority host (sovereign cloud or test server).
    #[must_use]
    pub fn with_authority_host(mut self, host: impl Into<String>) -> Self {
        self.authority_host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Bound each token request to `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Tenant this credential authenticates against.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Client (application) id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The v2.0 token endpoint for this tenant.
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host, self.tenant_id
        )
    }

    fn cached(&self, key: &str) -> Option<AccessToken> {
        let cache = self.cache.lock();
        cache
            .get(key)
            .filter(|token| !token.expires_within(Duration::seconds(EXPIRY_BUFFER_SECS)))
            .cloned()
    }

    async fn request_token(&self, scope: &str) -> Result<AccessToken, AuthError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope),
        ];

        let response = self
            .client
            .post(self.token_url())
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(tenant = %self.tenant_id, status, "Token request rejected");
            return Err(AuthError::TokenRequest { status, body });
        }

        let body = response.text().await?;
        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        if let Some(kind) = parsed.token_type.as_deref() {
            if !kind.eq_ignore_ascii_case("bearer") {
                return Err(AuthError::InvalidResponse(format!(
                    "unexpected token type: {}",
                    kind
                )));
            }
        }

        let expires_on = Utc::now() + Duration::seconds(parsed.expires_in.seconds()?);
        Ok(AccessToken::new(parsed.access_token, expires_on))
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken, AuthError> {
        let scope = scopes.join(" ");

        if let Some(token) = self.cached(&scope) {
            debug!(scope = %scope, "Using cached token");
            return Ok(token);
        }

        let token = self.request_token(&scope).await?;
        info!(scope = %scope, expires_on = %token.expires_on, "Acquired access token");
        self.cache.lock().insert(scope, token.clone());
        Ok(token)
    }
}

impl fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("authority_host", &self.authority_host)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SCOPE: &str = "https://cognitiveservices.azure.com/.default";

    fn credential(server: &MockServer) -> ClientSecretCredential {
        ClientSecretCredential::new("tenant-1", "client-1", "s3cret")
            .with_authority_host(server.uri())
    }

    #[test]
    fn test_token_url() {
        let credential = ClientSecretCredential::new("tenant-1", "client-1", "s3cret");
        assert_eq!(
            credential.token_url(),
            "https://login.microsoftonline.com/tenant-1/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_authority_host_trailing_slash() {
        let credential = ClientSecretCredential::new("t", "c", "s")
            .with_authority_host("https://login.microsoftonline.us/");
        assert_eq!(
            credential.token_url(),
            "https://login.microsoftonline.us/t/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credential = ClientSecretCredential::new("t", "c", "s3cret");
        assert!(!format!("{:?}", credential).contains("s3cret"));
    }

    #[tokio::test]
    async fn test_client_credentials_exchange() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=client-1"))
            .and(body_string_contains("client_secret=s3cret"))
            .and(body_string_contains(
                "scope=https%3A%2F%2Fcognitiveservices.azure.com%2F.default",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token_type": "Bearer",
                "expires_in": 3599,
                "access_token": "tok-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = credential(&server).get_token(&[SCOPE]).await.unwrap();
        assert_eq!(token.token, "tok-1");
        assert!(token.expires_on > Utc::now());
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token_type": "Bearer",
                "expires_in": 3600,
                "access_token": "cached"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let credential = credential(&server);
        let first = credential.get_token(&[SCOPE]).await.unwrap();
        let second = credential.get_token(&[SCOPE]).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_nearly_expired_token_is_refreshed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token_type": "Bearer",
                "expires_in": "60",
                "access_token": "short-lived"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let credential = credential(&server);
        credential.get_token(&[SCOPE]).await.unwrap();
        credential.get_token(&[SCOPE]).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_exchange() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("AADSTS7000215: Invalid client secret"))
            .mount(&server)
            .await;

        let err = credential(&server).get_token(&[SCOPE]).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("AADSTS7000215"));
    }

    #[tokio::test]
    async fn test_malformed_token_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = credential(&server).get_token(&[SCOPE]).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_slow_token_endpoint_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "token_type": "Bearer",
                        "expires_in": 3599,
                        "access_token": "late"
                    }))
                    .set_delay(StdDuration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let started = std::time::Instant::now();
        let err = credential(&server)
            .with_timeout(StdDuration::from_millis(300))
            .get_token(&[SCOPE])
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Http(ref e) if e.is_timeout()));
        assert!(started.elapsed() < StdDuration::from_secs(4));
    }
}
