//! Normalized streaming events.

use crate::error::LlmError;
use futures::Stream;
use std::pin::Pin;

/// One event of a normalized response stream.
///
/// `Usage` appears at most once and is always last.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Incremental visible output.
    Text { text: String },
    /// Incremental reasoning trace, kept apart from visible output.
    Reasoning { text: String },
    /// Token accounting for the whole call.
    Usage(UsageSummary),
}

impl StreamEvent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn reasoning(text: impl Into<String>) -> Self {
        Self::Reasoning { text: text.into() }
    }
}

/// Usage totals reported on the terminal chunk.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UsageSummary {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub reasoning_tokens: Option<u32>,
    pub cache_read_tokens: Option<u32>,
    /// USD, as billed by OpenRouter. Zero when not reported.
    pub total_cost: f64,
}

/// A finite, non-restartable stream of normalized events.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>;
