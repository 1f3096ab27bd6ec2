//! Shared test doubles: an in-memory transport that records requests and
//! reports when its chunk stream has been released.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use siumai_openrouter::error::UpstreamError;
use siumai_openrouter::transformers::WireRequest;
use siumai_openrouter::transport::{ChatTransport, ChunkStream};

/// Flips its flag when dropped.
struct ReleaseGuard(Arc<AtomicBool>);

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockTransport {
    chunks: Vec<Result<Value, UpstreamError>>,
    /// Keep the stream open after the scripted chunks, like a live connection.
    hang_after_chunks: bool,
    stream_error: Option<UpstreamError>,
    response: Option<Value>,
    listing: Option<Value>,
    released: Arc<AtomicBool>,
    requests: Mutex<Vec<WireRequest>>,
}

impl MockTransport {
    pub fn streaming(chunks: Vec<Value>) -> Self {
        Self {
            chunks: chunks.into_iter().map(Ok).collect(),
            ..Default::default()
        }
    }

    pub fn streaming_results(chunks: Vec<Result<Value, UpstreamError>>) -> Self {
        Self {
            chunks,
            ..Default::default()
        }
    }

    pub fn failing(error: UpstreamError) -> Self {
        Self {
            stream_error: Some(error),
            ..Default::default()
        }
    }

    pub fn responding(body: Value) -> Self {
        Self {
            response: Some(body),
            ..Default::default()
        }
    }

    pub fn listing(body: Value) -> Self {
        Self {
            listing: Some(body),
            ..Default::default()
        }
    }

    pub fn hang_after_chunks(mut self) -> Self {
        self.hang_after_chunks = true;
        self
    }

    pub fn released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<WireRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request_json(&self) -> Value {
        let requests = self.requests();
        serde_json::to_value(requests.last().expect("no request recorded")).unwrap()
    }

    fn record(&self, request: &WireRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn stream_chat(&self, request: &WireRequest) -> Result<ChunkStream, UpstreamError> {
        self.record(request);
        if let Some(error) = &self.stream_error {
            return Err(error.clone());
        }

        let guard = ReleaseGuard(self.released.clone());
        let chunks = self.chunks.clone();
        let hang = self.hang_after_chunks;
        let stream = async_stream::stream! {
            let _guard = guard;
            for chunk in chunks {
                yield chunk;
            }
            if hang {
                futures::future::pending::<()>().await;
            }
        };
        Ok(Box::pin(stream))
    }

    async fn chat(&self, request: &WireRequest) -> Result<Value, UpstreamError> {
        self.record(request);
        Ok(self
            .response
            .clone()
            .unwrap_or_else(|| json!({"choices": []})))
    }

    async fn list_models(&self) -> Result<Value, UpstreamError> {
        Ok(self.listing.clone().unwrap_or_else(|| json!({"data": []})))
    }
}

pub fn content_chunk(text: &str) -> Value {
    json!({"choices": [{"index": 0, "delta": {"content": text}}]})
}

pub fn usage_chunk(prompt: u32, completion: u32, cost: f64) -> Value {
    json!({
        "choices": [],
        "usage": {"prompt_tokens": prompt, "completion_tokens": completion, "cost": cost}
    })
}

/// `metadata.raw` as Google-backed routes send it on 429s.
pub fn retry_metadata_raw(delay: &str) -> String {
    json!({
        "error": {
            "code": 429,
            "status": "RESOURCE_EXHAUSTED",
            "details": [
                {"@type": "type.googleapis.com/google.rpc.QuotaFailure"},
                {"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": delay}
            ]
        }
    })
    .to_string()
}
