//! Generation settings.
//!
//! The client sends the same sampling parameters with every request; they are
//! constants of the client, not caller inputs.

use serde::{Deserialize, Serialize};

/// Sampling parameters attached to a chat-completion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens to generate.
    pub max_tokens: u64,
}

impl ChatSettings {
    /// Temperature used by the client.
    pub const TEMPERATURE: f64 = 0.1;
    /// Output token limit used by the client.
    pub const MAX_TOKENS: u64 = 4000;

    /// Create settings with explicit values.
    #[must_use]
    pub fn new(temperature: f64, max_tokens: u64) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::new(Self::TEMPERATURE, Self::MAX_TOKENS)
    }
}
