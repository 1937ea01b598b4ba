//! Authentication errors.

/// Errors that can occur while acquiring a token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token endpoint rejected the exchange.
    #[error("Token request failed: HTTP {status}: {body}")]
    TokenRequest {
        /// HTTP status code.
        status: u16,
        /// Response body, usually an `AADSTS` error description.
        body: String,
    },

    /// The token endpoint answered with something other than a bearer token.
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    /// Transport failure, including a timed-out request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AuthError {
    /// HTTP status of a rejected token request.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::TokenRequest { status, .. } => Some(*status),
            _ => None,
        }
    }
}
