//! OpenRouter handler
//!
//! Wires the resolver, request builder, transport and stream normalizer
//! together behind [`ApiHandler`].

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::config::OpenRouterConfig;
use crate::error::{LlmError, UpstreamError, surface, surface_in_band};
use crate::params::resolve;
use crate::registry::{ListedModelRegistry, ModelRegistry, StaticModelRegistry};
use crate::streaming::normalize;
use crate::traits::{ApiHandler, ModelListingCapability};
use crate::transformers::{
    DefaultMessageConverter, MessageConverter, build_chat_request, build_completion_request,
};
use crate::transport::{ChatTransport, HttpTransport};
use crate::types::{ChatStream, ConversationMessage, ResolvedModel};

/// OpenRouter provider handler
pub struct OpenRouterHandler {
    config: OpenRouterConfig,
    transport: Arc<dyn ChatTransport>,
    /// Swappable so a shared handler can pick up a refreshed listing.
    registry: RwLock<Arc<dyn ModelRegistry>>,
    converter: Arc<dyn MessageConverter>,
}

impl std::fmt::Debug for OpenRouterHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterHandler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OpenRouterHandler {
    /// Validate the configuration and connect over HTTP.
    pub fn new(config: OpenRouterConfig) -> Result<Self, LlmError> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Use a custom transport. The configuration is taken as is.
    pub fn with_transport(config: OpenRouterConfig, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            config,
            transport,
            registry: RwLock::new(Arc::new(StaticModelRegistry)),
            converter: Arc::new(DefaultMessageConverter),
        }
    }

    pub fn with_registry(self, registry: Arc<dyn ModelRegistry>) -> Self {
        self.set_registry(registry);
        self
    }

    pub fn with_converter(mut self, converter: Arc<dyn MessageConverter>) -> Self {
        self.converter = converter;
        self
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    /// The registry currently used for model resolution.
    pub fn registry(&self) -> Arc<dyn ModelRegistry> {
        match self.registry.read() {
            Ok(registry) => registry.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_registry(&self, registry: Arc<dyn ModelRegistry>) {
        match self.registry.write() {
            Ok(mut slot) => *slot = registry,
            Err(poisoned) => *poisoned.into_inner() = registry,
        }
    }

    /// Fetch the live model listing.
    pub async fn fetch_models(&self) -> Result<ListedModelRegistry, LlmError> {
        let body = self.transport.list_models().await.map_err(surface)?;
        if let Some(error) = body.get("error") {
            return Err(surface_in_band(UpstreamError::from_error_object(error)));
        }
        let registry = ListedModelRegistry::from_listing(&body);
        tracing::debug!(models = registry.len(), "fetched OpenRouter model listing");
        Ok(registry)
    }

    /// Replace the registry with the live listing. Returns the model count.
    ///
    /// Takes `&self`: requests already in flight keep the registry they
    /// resolved against.
    pub async fn refresh_models(&self) -> Result<usize, LlmError> {
        let registry = self.fetch_models().await?;
        let count = registry.len();
        self.set_registry(Arc::new(registry));
        Ok(count)
    }
}

#[async_trait]
impl ApiHandler for OpenRouterHandler {
    async fn create_message(
        &self,
        system_prompt: &str,
        messages: &[ConversationMessage],
    ) -> Result<ChatStream, LlmError> {
        let model = self.get_model();
        let request = build_chat_request(
            system_prompt,
            messages,
            &model,
            &self.config.request_options(),
            self.converter.as_ref(),
        );

        let chunks = self.transport.stream_chat(&request).await.map_err(surface)?;
        Ok(normalize(chunks))
    }

    async fn complete_prompt(&self, prompt: &str) -> Result<String, LlmError> {
        let model = self.get_model();
        let request = build_completion_request(prompt, &model);

        let body = self.transport.chat(&request).await.map_err(surface)?;
        if let Some(error) = body.get("error") {
            return Err(surface_in_band(UpstreamError::from_error_object(error)));
        }

        Ok(body
            .pointer("/choices/0/message/content")
            .and_then(|c| c.as_str())
            .unwrap_or_default()
            .to_string())
    }

    fn get_model(&self) -> ResolvedModel {
        resolve(
            self.config.model_id.as_deref(),
            self.config.model_info.as_ref(),
            &self.config.overrides,
            self.registry().as_ref(),
        )
    }
}

#[async_trait]
impl ModelListingCapability for OpenRouterHandler {
    async fn list_models(&self) -> Result<ListedModelRegistry, LlmError> {
        self.fetch_models().await
    }
}
