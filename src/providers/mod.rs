mod open_ai;
mod prompt;

pub use open_ai::OpenAIProvider;
pub use prompt::{build_system_prompt, template_markers, RECIPE_ASSISTANT_PROMPT};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AssistantError;
use crate::model::{ChatMessage, Role};

/// One message of a chat-completions request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for PromptMessage {
    fn from(message: &ChatMessage) -> Self {
        Self::new(message.role, message.content.clone())
    }
}

/// Unified trait for live assistant backends
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Get the provider name (e.g., "openai")
    fn provider_name(&self) -> &str;

    /// Send the full conversation and return the assistant's reply text
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, AssistantError>;
}
