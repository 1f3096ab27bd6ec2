//! Core types shared across the adapter.

pub mod message;
pub mod model;
pub mod stream;

pub use message::{ContentPart, ConversationMessage, ImageSource, MessageContent, Role};
pub use model::{
    EffectiveParams, ModelInfo, ModelOverrides, PromptCache, ReasoningEffort, ResolvedModel,
    ThinkingConfig,
};
pub use stream::{ChatStream, StreamEvent, UsageSummary};
