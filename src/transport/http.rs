//! reqwest-backed transport
//!
//! POSTs to `{base_url}/chat/completions` and parses the SSE response with
//! eventsource-stream.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::config::OpenRouterConfig;
use crate::error::{LlmError, UpstreamError};
use crate::transformers::WireRequest;

use super::{ChatTransport, ChunkStream};

const DONE_MARKER: &str = "[DONE]";

/// HTTP transport for the OpenRouter API
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl HttpTransport {
    /// Build a client from the configuration's HTTP settings.
    pub fn new(config: &OpenRouterConfig) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.http_config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(user_agent) = &config.http_config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let http_client = builder
            .build()
            .map_err(|e| LlmError::HttpError(format!("Failed to create HTTP client: {e}")))?;

        Self::with_http_client(config, http_client)
    }

    /// Use a caller-supplied client.
    pub fn with_http_client(
        config: &OpenRouterConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers: build_headers(config)?,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn post(&self, request: &WireRequest) -> Result<reqwest::Response, UpstreamError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            stream = request.stream,
            "sending OpenRouter request"
        );

        let response = self
            .http_client
            .post(self.chat_url())
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await?;

        check_status(response).await
    }
}

fn build_headers(config: &OpenRouterConfig) -> Result<HeaderMap, LlmError> {
    let mut headers = HeaderMap::new();

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
        .map_err(|e| LlmError::ConfigurationError(format!("Invalid API key: {e}")))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    for (name, value) in [("http-referer", &config.app_referer), ("x-title", &config.app_title)] {
        if let Some(value) = value {
            let value = HeaderValue::from_str(value).map_err(|e| {
                LlmError::ConfigurationError(format!("Invalid {name} header: {e}"))
            })?;
            headers.insert(name, value);
        }
    }

    for (name, value) in &config.custom_headers {
        headers.insert(name.clone(), value.clone());
    }

    Ok(headers)
}

/// Non-success statuses become an [`UpstreamError`] built from the body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(UpstreamError::from_http(status.as_u16(), &body))
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn stream_chat(&self, request: &WireRequest) -> Result<ChunkStream, UpstreamError> {
        let response = self.post(request).await?;
        let mut events = response.bytes_stream().eventsource();

        let stream = async_stream::stream! {
            while let Some(event) = events.next().await {
                let event = match event {
                    Ok(event) => event,
                    Err(e) => {
                        yield Err(UpstreamError::from_message(format!("SSE stream error: {e}")));
                        return;
                    }
                };

                let data = event.data.trim();
                if data.is_empty() || data == DONE_MARKER {
                    continue;
                }

                match serde_json::from_str::<Value>(data) {
                    Ok(chunk) => {
                        yield Ok(chunk);
                    }
                    Err(e) => {
                        yield Err(UpstreamError::from(e));
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }

    async fn chat(&self, request: &WireRequest) -> Result<Value, UpstreamError> {
        let response = self.post(request).await?;
        Ok(response.json::<Value>().await?)
    }

    async fn list_models(&self) -> Result<Value, UpstreamError> {
        let response = self
            .http_client
            .get(format!("{}/models", self.base_url))
            .headers(self.headers.clone())
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_carry_auth_and_attribution() {
        let config = OpenRouterConfig::new("sk-or-test")
            .with_app("https://example.com", "Example App")
            .with_header("X-Extra", "1")
            .unwrap();
        let headers = build_headers(&config).unwrap();

        assert_eq!(
            headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer sk-or-test")
        );
        assert!(headers.get(AUTHORIZATION).is_some_and(|v| v.is_sensitive()));
        assert_eq!(
            headers.get("HTTP-Referer").and_then(|v| v.to_str().ok()),
            Some("https://example.com")
        );
        assert_eq!(
            headers.get("X-Title").and_then(|v| v.to_str().ok()),
            Some("Example App")
        );
        assert!(headers.contains_key("X-Extra"));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = OpenRouterConfig::new("k").with_base_url("http://localhost:1234/api/v1/");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.chat_url(), "http://localhost:1234/api/v1/chat/completions");
    }
}
