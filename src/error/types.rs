//! Core error types
//!
//! `LlmError` is what callers of the adapter see. `UpstreamError` is the raw,
//! partially-populated shape an OpenRouter failure arrives in, before it is
//! translated into something readable.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors surfaced by the OpenRouter adapter.
///
/// Every call attempt fails with at most one of these. Nothing is retried
/// internally; the variant tells the caller whether a retry makes sense.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Missing or malformed configuration (API key, base URL, headers).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The HTTP layer failed before a response body could be read.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// A response body could not be interpreted.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// The stream broke in a way that has no upstream error attached.
    #[error("Stream error: {0}")]
    StreamError(String),

    /// The transport succeeded but the body carried an `error` object.
    #[error("OpenRouter API Error {}: {message}", code_label(.code))]
    ProviderError { code: Option<i64>, message: String },

    /// Upstream rate limiting. `message` is already human readable.
    #[error("{message}")]
    RateLimitError {
        message: String,
        retry_after: Option<String>,
    },

    /// A transport or decode failure, translated into a readable message.
    #[error("{message}")]
    ApiError { code: Option<i64>, message: String },
}

fn code_label(code: &Option<i64>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown".to_string(),
    }
}

impl LlmError {
    /// Upstream error code, when one was reported.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::ProviderError { code, .. } | Self::ApiError { code, .. } => *code,
            Self::RateLimitError { .. } => Some(RATE_LIMIT_CODE),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimitError { .. })
    }

    /// Retry hint extracted from rate-limit metadata, e.g. `"2s"`.
    pub fn retry_after(&self) -> Option<&str> {
        match self {
            Self::RateLimitError { retry_after, .. } => retry_after.as_deref(),
            _ => None,
        }
    }
}

/// The "too many requests" code OpenRouter reports for rate limiting.
pub const RATE_LIMIT_CODE: i64 = 429;

/// A failure as reported by OpenRouter or the transport underneath it.
///
/// All fields are optional: upstream providers attach wildly different
/// amounts of detail, and some attach none at all. Construction never fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamError {
    /// Numeric error code (HTTP status or in-band `error.code`).
    pub code: Option<i64>,
    /// Human readable message, if any.
    pub message: Option<String>,
    /// `error.metadata.raw`: the upstream provider's own error body, as a JSON string.
    pub metadata_raw: Option<String>,
    /// Full response body, kept for diagnostics.
    pub body: Option<Value>,
}

impl UpstreamError {
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Build from an in-band `{ "code": .., "message": .., "metadata": {..} }` object.
    pub fn from_error_object(error: &Value) -> Self {
        if let Value::String(message) = error {
            return Self::from_message(message.clone());
        }
        let code = error.get("code").and_then(parse_code);
        let message = error
            .get("message")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let metadata_raw = error
            .get("metadata")
            .and_then(|m| m.get("raw"))
            .and_then(|raw| match raw {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            });

        Self {
            code,
            message,
            metadata_raw,
            body: Some(error.clone()),
        }
    }

    /// Build from a non-success HTTP response.
    ///
    /// OpenRouter wraps failures in `{ "error": { .. } }`; bodies that don't
    /// match keep the status as code and the raw text as message.
    pub fn from_http(status: u16, body_text: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(body_text).ok();

        if let Some(error_obj) = parsed.as_ref().and_then(|json| json.get("error")) {
            let mut err = Self::from_error_object(error_obj);
            if err.code.is_none() {
                err.code = Some(i64::from(status));
            }
            err.body = parsed.clone();
            return err;
        }

        let message = if body_text.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body_text.to_string()
        };

        Self {
            code: Some(i64::from(status)),
            message: Some(message),
            metadata_raw: None,
            body: parsed,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.code == Some(RATE_LIMIT_CODE)
    }
}

/// Codes arrive as numbers from most providers and as numeric strings from a few.
fn parse_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            return f.write_str(message);
        }
        if let Some(body) = &self.body {
            return write!(f, "{body}");
        }
        match self.code {
            Some(code) => write!(f, "error code {code}"),
            None => f.write_str("Unknown error"),
        }
    }
}

impl std::error::Error for UpstreamError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_error_display_includes_code_and_message() {
        let err = LlmError::ProviderError {
            code: Some(500),
            message: "API Error".to_string(),
        };
        assert_eq!(err.to_string(), "OpenRouter API Error 500: API Error");

        let err = LlmError::ProviderError {
            code: None,
            message: "odd".to_string(),
        };
        assert_eq!(err.to_string(), "OpenRouter API Error unknown: odd");
    }

    #[test]
    fn error_object_parsing_tolerates_missing_fields() {
        let err = UpstreamError::from_error_object(&json!({}));
        assert_eq!(err.code, None);
        assert_eq!(err.message, None);
        assert_eq!(err.metadata_raw, None);

        let err = UpstreamError::from_error_object(&json!({
            "code": "429",
            "message": "slow down",
            "metadata": { "raw": "{\"error\":{}}", "provider_name": "Google" }
        }));
        assert_eq!(err.code, Some(429));
        assert!(err.is_rate_limited());
        assert_eq!(err.metadata_raw.as_deref(), Some("{\"error\":{}}"));
    }

    #[test]
    fn non_string_metadata_raw_is_serialized() {
        let err = UpstreamError::from_error_object(&json!({
            "code": 429,
            "metadata": { "raw": { "error": { "details": [] } } }
        }));
        let raw = err.metadata_raw.expect("raw");
        let reparsed: Value = serde_json::from_str(&raw).expect("valid json");
        assert!(reparsed["error"]["details"].is_array());
    }

    #[test]
    fn http_error_uses_envelope_when_present() {
        let body = r#"{"error":{"message":"Rate limit exceeded","code":429}}"#;
        let err = UpstreamError::from_http(429, body);
        assert_eq!(err.code, Some(429));
        assert_eq!(err.message.as_deref(), Some("Rate limit exceeded"));
        assert!(err.body.is_some());

        let err = UpstreamError::from_http(502, r#"{"error":{"message":"bad gateway"}}"#);
        assert_eq!(err.code, Some(502));
    }

    #[test]
    fn http_error_falls_back_to_plain_text() {
        let err = UpstreamError::from_http(503, "upstream unavailable");
        assert_eq!(err.code, Some(503));
        assert_eq!(err.message.as_deref(), Some("upstream unavailable"));

        let err = UpstreamError::from_http(500, "   ");
        assert_eq!(err.message.as_deref(), Some("HTTP 500"));
    }

    #[test]
    fn display_falls_back_to_body_then_code() {
        let err = UpstreamError {
            body: Some(json!({"weird": true})),
            ..Default::default()
        };
        assert_eq!(err.to_string(), r#"{"weird":true}"#);

        let err = UpstreamError {
            code: Some(418),
            ..Default::default()
        };
        assert_eq!(err.to_string(), "error code 418");
        assert_eq!(UpstreamError::default().to_string(), "Unknown error");
    }

    #[test]
    fn rate_limit_accessors() {
        let err = LlmError::RateLimitError {
            message: "Rate limit exceeded, try again in 2s.".to_string(),
            retry_after: Some("2s".to_string()),
        };
        assert!(err.is_rate_limited());
        assert_eq!(err.retry_after(), Some("2s"));
        assert_eq!(err.code(), Some(429));
    }
}
