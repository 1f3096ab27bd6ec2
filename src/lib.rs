//! # siumai-openrouter
//!
//! OpenRouter provider adapter: resolves model parameters, shapes chat
//! completion requests (prompt-cache markers, R1-style input for reasoning
//! models, routing directives) and normalizes the SSE response into a
//! stream of text, reasoning and usage events.
//!
#![deny(unsafe_code)]

//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use siumai_openrouter::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handler = OpenRouterHandler::new(
//!         OpenRouterConfig::from_env()?.with_model("anthropic/claude-3.7-sonnet"),
//!     )?;
//!
//!     let mut stream = handler
//!         .create_message("You are terse.", &[ConversationMessage::user("Hi!")])
//!         .await?;
//!     while let Some(event) = stream.next().await {
//!         if let StreamEvent::Text { text } = event? {
//!             print!("{text}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The crate only emits `tracing` events; install a subscriber in the
//! application to see them.

pub mod config;
pub mod error;
pub mod handler;
pub mod params;
pub mod registry;
pub mod streaming;
pub mod traits;
pub mod transformers;
pub mod transport;
pub mod types;

pub use config::{HttpConfig, OpenRouterConfig};
pub use error::{LlmError, UpstreamError};
pub use handler::OpenRouterHandler;
pub use traits::{ApiHandler, ModelListingCapability};
pub use types::{ChatStream, ConversationMessage, ModelInfo, ResolvedModel, StreamEvent};

/// Commonly used items
pub mod prelude {
    pub use crate::config::{HttpConfig, OpenRouterConfig};
    pub use crate::error::LlmError;
    pub use crate::handler::OpenRouterHandler;
    pub use crate::registry::{ListedModelRegistry, ModelRegistry, StaticModelRegistry};
    pub use crate::traits::{ApiHandler, ModelListingCapability};
    pub use crate::types::{
        ChatStream, ContentPart, ConversationMessage, MessageContent, ModelInfo, ModelOverrides,
        ReasoningEffort, ResolvedModel, Role, StreamEvent, UsageSummary,
    };
}
