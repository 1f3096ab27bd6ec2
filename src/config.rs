//! OpenRouter Configuration
//!
//! Connection settings plus the knobs that shape requests: model choice,
//! user overrides, prompt caching, middle-out and provider routing.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::LlmError;
use crate::transformers::RequestOptions;
use crate::types::{ModelInfo, ModelOverrides, ReasoningEffort};

/// Default OpenRouter API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const BASE_URL_ENV: &str = "OPENROUTER_BASE_URL";

/// HTTP client settings. Only the HTTP transport reads these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpConfig {
    /// Whole-request timeout. Long streams need a generous value or none.
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

/// Configuration for the OpenRouter handler
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// API key for authentication
    pub api_key: SecretString,
    /// Base URL, without the trailing `/chat/completions`
    pub base_url: String,
    /// Requested model id; `None` means the registry default
    pub model_id: Option<String>,
    /// Capability record to trust instead of the registry entry
    pub model_info: Option<ModelInfo>,
    /// User overrides for token limits, temperature and reasoning effort
    pub overrides: ModelOverrides,
    /// Turns on caching for models where it is optional
    pub prompt_caching_enabled: bool,
    /// Send the `middle-out` transform (on by default)
    pub use_middle_out_transform: bool,
    /// Preferred upstream provider; `[default]` leaves routing to OpenRouter
    pub specific_provider: Option<String>,
    pub http_config: HttpConfig,
    /// `HTTP-Referer` attribution header
    pub app_referer: Option<String>,
    /// `X-Title` attribution header
    pub app_title: Option<String>,
    /// Extra headers sent with every request
    pub custom_headers: HeaderMap,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: SecretString::from(String::new()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model_id: None,
            model_info: None,
            overrides: ModelOverrides::default(),
            prompt_caching_enabled: false,
            use_middle_out_transform: true,
            specific_provider: None,
            http_config: HttpConfig::default(),
            app_referer: None,
            app_title: None,
            custom_headers: HeaderMap::new(),
        }
    }
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            ..Default::default()
        }
    }

    /// Build from `OPENROUTER_API_KEY` / `OPENROUTER_BASE_URL`.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let api_key = lookup(API_KEY_ENV)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::ConfigurationError(format!("{API_KEY_ENV} is not set")))?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.base_url = base_url;
        }
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = SecretString::from(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_model_info(mut self, info: ModelInfo) -> Self {
        self.model_info = Some(info);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.overrides.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_max_thinking_tokens(mut self, budget: u32) -> Self {
        self.overrides.max_thinking_tokens = Some(budget);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.overrides.temperature = Some(temperature);
        self
    }

    pub fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.overrides.reasoning_effort = Some(effort);
        self
    }

    pub fn with_prompt_caching(mut self, enabled: bool) -> Self {
        self.prompt_caching_enabled = enabled;
        self
    }

    pub fn with_middle_out_transform(mut self, enabled: bool) -> Self {
        self.use_middle_out_transform = enabled;
        self
    }

    pub fn with_specific_provider(mut self, provider: impl Into<String>) -> Self {
        self.specific_provider = Some(provider.into());
        self
    }

    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.timeout = Some(timeout);
        self
    }

    /// Set the OpenRouter app attribution headers.
    pub fn with_app(mut self, referer: impl Into<String>, title: impl Into<String>) -> Self {
        self.app_referer = Some(referer.into());
        self.app_title = Some(title.into());
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self, LlmError> {
        let header_name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid header name: {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid header value: {e}")))?;

        self.custom_headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Request-shaping switches for the request builder.
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            prompt_caching_enabled: self.prompt_caching_enabled,
            use_middle_out_transform: self.use_middle_out_transform,
            specific_provider: self.specific_provider.clone(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(LlmError::ConfigurationError(
                "API key cannot be empty".to_string(),
            ));
        }

        if self.base_url.is_empty() {
            return Err(LlmError::ConfigurationError(
                "Base URL cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(LlmError::ConfigurationError(
                "Base URL must start with http:// or https://".to_string(),
            ));
        }

        if let Some(temperature) = self.overrides.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(LlmError::ConfigurationError(format!(
                "Temperature must be between 0.0 and 2.0, got {temperature}"
            )));
        }

        for value in [&self.app_referer, &self.app_title].into_iter().flatten() {
            HeaderValue::from_str(value).map_err(|e| {
                LlmError::ConfigurationError(format!("Invalid attribution header: {e}"))
            })?;
        }

        Ok(())
    }
}
