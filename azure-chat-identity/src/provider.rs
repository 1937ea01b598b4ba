//! Bearer token provider bound to one scope.

use std::sync::Arc;

use crate::credential::TokenCredential;
use crate::error::AuthError;

/// Calls a credential for a fixed scope and yields the raw bearer token.
///
/// The provider itself never caches: every call goes to the credential.
#[derive(Debug, Clone)]
pub struct BearerTokenProvider {
    credential: Arc<dyn TokenCredential>,
    scope: String,
}

impl BearerTokenProvider {
    /// Bind `credential` to `scope`.
    pub fn new(credential: Arc<dyn TokenCredential>, scope: impl Into<String>) -> Self {
        Self {
            credential,
            scope: scope.into(),
        }
    }

    /// The scope tokens are requested for.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The underlying credential.
    pub fn credential(&self) -> &Arc<dyn TokenCredential> {
        &self.credential
    }

    /// Fetch a bearer token.
    pub async fn token(&self) -> Result<String, AuthError> {
        let token = self.credential.get_token(&[self.scope.as_str()]).await?;
        Ok(token.token)
    }
}
