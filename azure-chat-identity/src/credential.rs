//! Token credential abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::error::AuthError;

/// A bearer token and the instant it stops being valid.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The raw token value.
    pub token: String,
    /// Expiry instant.
    pub expires_on: DateTime<Utc>,
}

impl AccessToken {
    /// Create a token.
    pub fn new(token: impl Into<String>, expires_on: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_on,
        }
    }

    /// Whether the token expires within `buffer` from now.
    #[must_use]
    pub fn expires_within(&self, buffer: Duration) -> bool {
        Utc::now() + buffer >= self.expires_on
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// Source of access tokens.
///
/// Implementations own any caching; callers ask for a token before every
/// request and must not hold on to it.
#[async_trait]
pub trait TokenCredential: Send + Sync + fmt::Debug {
    /// Get a token valid for `scopes`.
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_within() {
        let token = AccessToken::new("t", Utc::now() + Duration::minutes(3));
        assert!(token.expires_within(Duration::minutes(5)));
        assert!(!token.expires_within(Duration::minutes(1)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = AccessToken::new("super-secret", Utc::now());
        let debug = format!("{:?}", token);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
