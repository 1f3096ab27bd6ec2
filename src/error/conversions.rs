//! Type Conversions for LlmError and UpstreamError
//!
//! This module contains From trait implementations for converting
//! common error types into the adapter's error types.

use super::types::{LlmError, UpstreamError};

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        let code = err.status().map(|s| i64::from(s.as_u16()));
        Self {
            code,
            message: Some(err.to_string()),
            ..Default::default()
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        Self::from_message(format!("Failed to decode OpenRouter chunk: {err}"))
    }
}
