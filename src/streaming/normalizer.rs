//! Stream Normalizer
//!
//! Turns raw OpenRouter chunks into [`StreamEvent`]s. One normalizer per
//! call; it owns the response accumulator and the last-seen usage slot.

use crate::error::{LlmError, UpstreamError, surface, surface_in_band};
use crate::transport::ChunkStream;
use crate::types::{ChatStream, StreamEvent, UsageSummary};
use futures::StreamExt;
use serde_json::Value;

use super::chunk::{ChatCompletionChunk, ChunkUsage};

/// Lifecycle of a single streamed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizerState {
    Streaming,
    Done,
    Failed,
}

/// Single-pass chunk processor.
#[derive(Debug)]
pub struct StreamNormalizer {
    state: NormalizerState,
    full_response: String,
    last_usage: Option<ChunkUsage>,
}

impl Default for StreamNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamNormalizer {
    pub fn new() -> Self {
        Self {
            state: NormalizerState::Streaming,
            full_response: String::new(),
            last_usage: None,
        }
    }

    pub fn state(&self) -> NormalizerState {
        self.state
    }

    /// Visible text received so far.
    pub fn full_response(&self) -> &str {
        &self.full_response
    }

    /// Process one chunk, returning the events it produces.
    ///
    /// An in-band `error` object fails the stream before anything else on
    /// the chunk is looked at.
    pub fn process_chunk(&mut self, chunk: Value) -> Result<Vec<StreamEvent>, LlmError> {
        if self.state != NormalizerState::Streaming {
            return Err(LlmError::StreamError(format!(
                "chunk received after stream ended ({:?})",
                self.state
            )));
        }

        if let Some(error) = chunk.get("error") {
            self.state = NormalizerState::Failed;
            return Err(surface_in_band(UpstreamError::from_error_object(error)));
        }

        let chunk: ChatCompletionChunk = match serde_json::from_value(chunk) {
            Ok(chunk) => chunk,
            Err(e) => return Err(self.fail(UpstreamError::from(e))),
        };

        tracing::trace!(
            id = ?chunk.id,
            has_usage = chunk.usage.is_some(),
            "OpenRouter chunk"
        );

        let mut events = Vec::new();
        if let Some(delta) = chunk.delta() {
            if let Some(reasoning) = delta.reasoning.as_deref().filter(|r| !r.is_empty()) {
                events.push(StreamEvent::reasoning(reasoning));
            }
            if let Some(content) = delta.content.as_deref().filter(|c| !c.is_empty()) {
                self.full_response.push_str(content);
                events.push(StreamEvent::text(content));
            }
        }

        if let Some(usage) = chunk.usage {
            self.last_usage = Some(usage);
        }

        Ok(events)
    }

    /// Mark the stream failed and translate the upstream error.
    pub fn fail(&mut self, error: UpstreamError) -> LlmError {
        self.state = NormalizerState::Failed;
        surface(error)
    }

    /// Upstream exhausted: returns the single trailing usage event, if any.
    pub fn finish(&mut self) -> Option<StreamEvent> {
        if self.state != NormalizerState::Streaming {
            return None;
        }
        self.state = NormalizerState::Done;

        tracing::debug!(
            usage = self.last_usage.is_some(),
            response_len = self.full_response.len(),
            "OpenRouter stream finished"
        );

        self.last_usage.take().map(|usage| {
            StreamEvent::Usage(UsageSummary {
                input_tokens: usage.prompt_tokens.unwrap_or_default(),
                output_tokens: usage.completion_tokens.unwrap_or_default(),
                reasoning_tokens: usage
                    .completion_tokens_details
                    .and_then(|d| d.reasoning_tokens),
                cache_read_tokens: usage.prompt_tokens_details.and_then(|d| d.cached_tokens),
                total_cost: usage.cost.unwrap_or_default(),
            })
        })
    }
}

/// Normalize a raw chunk stream.
///
/// The chunk stream is moved into the returned stream, so dropping the
/// result early drops the upstream connection with it.
pub fn normalize(mut chunks: ChunkStream) -> ChatStream {
    let stream = async_stream::stream! {
        let mut normalizer = StreamNormalizer::new();

        while let Some(item) = chunks.next().await {
            let events = match item {
                Ok(chunk) => normalizer.process_chunk(chunk),
                Err(e) => Err(normalizer.fail(e)),
            };
            match events {
                Ok(events) => {
                    for event in events {
                        yield Ok(event);
                    }
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }

        if let Some(usage) = normalizer.finish() {
            yield Ok(usage);
        }
    };

    Box::pin(stream)
}
