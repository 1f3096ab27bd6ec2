//! Streaming
//!
//! Wire chunk types and the normalizer that maps them onto [`StreamEvent`].
//!
//! [`StreamEvent`]: crate::types::StreamEvent

pub mod chunk;
pub mod normalizer;

pub use chunk::{ChatCompletionChunk, ChunkChoice, ChunkDelta, ChunkUsage};
pub use normalizer::{NormalizerState, StreamNormalizer, normalize};
