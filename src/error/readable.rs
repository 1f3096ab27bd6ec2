//! Readable error translation
//!
//! Turns an [`UpstreamError`] into the single message a caller gets to see.
//! Rate limits get special treatment: Google-backed routes tuck a
//! `RetryInfo.retryDelay` into `error.metadata.raw`, which we surface as a
//! retry hint when it can be found.

use super::types::{LlmError, UpstreamError};
use serde_json::Value;

/// Produce a human-readable message for an upstream failure. Never panics.
pub fn readable_message(error: &UpstreamError) -> String {
    if error.is_rate_limited() {
        return match retry_delay(error) {
            Some(delay) => format!("Rate limit exceeded, try again in {delay}."),
            None => format!("Rate limit exceeded, try again later.\n{error}"),
        };
    }

    format!("OpenRouter API Error: {error}")
}

/// Extract the retry delay from `metadata.raw`, if any.
///
/// The raw payload is another provider's JSON error body encoded as a string.
/// Any parse failure means "no hint".
pub fn retry_delay(error: &UpstreamError) -> Option<String> {
    let raw = error.metadata_raw.as_deref()?;
    let parsed: Value = serde_json::from_str(raw).ok()?;
    let details = parsed.get("error")?.get("details")?.as_array()?;

    details
        .iter()
        .filter_map(|detail| detail.get("retryDelay").and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|delay| !delay.is_empty())
        .map(str::to_string)
}

/// Convert an upstream failure into the error surfaced to callers.
pub fn surface(error: UpstreamError) -> LlmError {
    let message = readable_message(&error);
    if error.is_rate_limited() {
        LlmError::RateLimitError {
            message,
            retry_after: retry_delay(&error),
        }
    } else {
        LlmError::ApiError {
            code: error.code,
            message,
        }
    }
}

/// Convert an in-band `error` object into the error surfaced to callers.
///
/// Rate limits still go through [`surface`] so the retry hint survives.
pub fn surface_in_band(error: UpstreamError) -> LlmError {
    if error.is_rate_limited() {
        return surface(error);
    }
    let message = error
        .message
        .clone()
        .unwrap_or_else(|| error.to_string());
    LlmError::ProviderError {
        code: error.code,
        message,
    }
}
