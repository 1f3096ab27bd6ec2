//! Provider handler trait

use crate::error::LlmError;
use crate::types::{ChatStream, ConversationMessage, ResolvedModel};
use async_trait::async_trait;

#[async_trait]
pub trait ApiHandler: Send + Sync {
    /// Stream a reply to `messages`.
    ///
    /// The returned stream is finite and cannot be restarted; issue a new
    /// call to retry.
    async fn create_message(
        &self,
        system_prompt: &str,
        messages: &[ConversationMessage],
    ) -> Result<ChatStream, LlmError>;

    /// Single non-streaming request for one user prompt.
    async fn complete_prompt(&self, prompt: &str) -> Result<String, LlmError>;

    /// The model and parameters the next request would use.
    fn get_model(&self) -> ResolvedModel;
}
