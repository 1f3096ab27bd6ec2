//! Transport
//!
//! The outbound seam: something that can send a [`WireRequest`] and hand
//! back raw JSON, either as a chunk stream or as a single response body.
//! Errors stay untranslated here; the handler decides how to surface them.

pub mod http;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;

use crate::error::UpstreamError;
use crate::transformers::WireRequest;

pub use http::HttpTransport;

/// Raw streamed chunks, one JSON object per SSE `data:` payload.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Value, UpstreamError>> + Send>>;

/// Chat completion client used by the handler.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Issue a streaming request. Dropping the returned stream must release
    /// the underlying connection.
    async fn stream_chat(&self, request: &WireRequest) -> Result<ChunkStream, UpstreamError>;

    /// Issue a non-streaming request and return the response body.
    async fn chat(&self, request: &WireRequest) -> Result<Value, UpstreamError>;

    /// Fetch the `/models` listing.
    async fn list_models(&self) -> Result<Value, UpstreamError>;
}
