//! # azure-chat-core
//!
//! Core types shared by the azure-chat crates:
//!
//! - **Messages**: role-tagged chat messages
//! - **Templates**: `{name}`-style prompt templates with variable substitution
//! - **Settings**: the fixed generation parameters sent with every request
//!
//! ## Example
//!
//! ```rust
//! use azure_chat_core::{ChatMessage, PromptTemplate, Role};
//! use std::collections::HashMap;
//!
//! let template = PromptTemplate::parse("Hello {name}").unwrap();
//! let mut vars = HashMap::new();
//! vars.insert("name".to_string(), "Ada".to_string());
//!
//! let message = ChatMessage::user(template.format(&vars).unwrap());
//! assert_eq!(message.role, Role::User);
//! assert_eq!(message.content, "Hello Ada");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod messages;
pub mod settings;
pub mod template;

pub use messages::{build_messages, ChatMessage, Role};
pub use settings::ChatSettings;
pub use template::{render, PromptTemplate, TemplateError};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::messages::{build_messages, ChatMessage, Role};
    pub use crate::settings::ChatSettings;
    pub use crate::template::{PromptTemplate, TemplateError};
}
