//! Model Registry
//!
//! Resolves model ids to capability records. The built-in registry is a
//! static table; [`ListedModelRegistry`] is built from OpenRouter's live
//! `/models` listing. Both share the static prompt-caching sets.

pub mod models;

use crate::types::ModelInfo;
use serde_json::Value;
use std::collections::HashMap;

pub use models::{DEFAULT_MODEL_ID, default_model_info};

/// Lookup interface for model capability metadata.
pub trait ModelRegistry: Send + Sync {
    fn lookup(&self, model_id: &str) -> Option<ModelInfo>;

    fn supports_prompt_cache(&self, model_id: &str) -> bool {
        models::PROMPT_CACHING_MODELS.contains(model_id)
    }

    fn is_prompt_cache_optional(&self, model_id: &str) -> bool {
        models::OPTIONAL_PROMPT_CACHING_MODELS.contains(model_id)
    }

    fn default_model(&self) -> (String, ModelInfo) {
        (DEFAULT_MODEL_ID.to_string(), default_model_info())
    }
}

/// Registry backed by the built-in model table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticModelRegistry;

impl ModelRegistry for StaticModelRegistry {
    fn lookup(&self, model_id: &str) -> Option<ModelInfo> {
        models::BUILTIN_MODELS.get(model_id).cloned()
    }
}

/// Registry populated from OpenRouter's `/models` endpoint.
#[derive(Debug, Clone, Default)]
pub struct ListedModelRegistry {
    models: HashMap<String, ModelInfo>,
}

impl ListedModelRegistry {
    /// Parse a `/models` response body. Malformed entries are skipped.
    pub fn from_listing(body: &Value) -> Self {
        let models = body
            .get("data")
            .and_then(|d| d.as_array())
            .map(|entries| entries.iter().filter_map(parse_listed_model).collect())
            .unwrap_or_default();
        Self { models }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn model_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.models.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl ModelRegistry for ListedModelRegistry {
    fn lookup(&self, model_id: &str) -> Option<ModelInfo> {
        self.models.get(model_id).cloned()
    }
}

/// OpenRouter quotes prices per token as decimal strings.
fn parse_price(value: Option<&Value>) -> Option<f64> {
    let price = match value? {
        Value::String(s) => s.parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    Some(price * 1_000_000.0)
}

/// Parse one listing entry.
///
/// Ids the built-in table knows keep their capability flags and token
/// limits; the listing only refreshes prices, context window, modality and
/// description for them.
fn parse_listed_model(entry: &Value) -> Option<(String, ModelInfo)> {
    let id = entry.get("id")?.as_str()?.to_string();
    let pricing = entry.get("pricing");
    let thinking = id.ends_with(":thinking");

    let max_tokens = if id.starts_with(models::anthropic::CLAUDE_3_7_SONNET) {
        Some(if thinking { 64_000 } else { 8192 })
    } else {
        entry
            .get("top_provider")
            .and_then(|p| p.get("max_completion_tokens"))
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok())
    };

    let supports_images = entry
        .get("architecture")
        .and_then(|a| a.get("modality"))
        .and_then(|m| m.as_str())
        .map(|m| m.split("->").next().unwrap_or_default().contains("image"));
    let context_window = entry
        .get("context_length")
        .and_then(|v| v.as_u64())
        .and_then(|v| u32::try_from(v).ok());
    let input_price = parse_price(pricing.and_then(|p| p.get("prompt")));
    let output_price = parse_price(pricing.and_then(|p| p.get("completion")));
    let cache_writes_price = parse_price(pricing.and_then(|p| p.get("input_cache_write")));
    let cache_reads_price = parse_price(pricing.and_then(|p| p.get("input_cache_read")));
    let description = entry
        .get("description")
        .and_then(|d| d.as_str())
        .map(str::to_string);

    let info = match models::BUILTIN_MODELS.get(id.as_str()) {
        Some(builtin) => ModelInfo {
            max_tokens: builtin.max_tokens.or(max_tokens),
            context_window: context_window.unwrap_or(builtin.context_window),
            supports_images: supports_images.unwrap_or(builtin.supports_images),
            input_price: input_price.or(builtin.input_price),
            output_price: output_price.or(builtin.output_price),
            cache_writes_price: cache_writes_price.or(builtin.cache_writes_price),
            cache_reads_price: cache_reads_price.or(builtin.cache_reads_price),
            description: description.or_else(|| builtin.description.clone()),
            ..builtin.clone()
        },
        None => ModelInfo {
            max_tokens,
            context_window: context_window.unwrap_or_default(),
            supports_images: supports_images.unwrap_or_default(),
            supports_prompt_cache: models::PROMPT_CACHING_MODELS.contains(id.as_str()),
            is_prompt_cache_optional: models::OPTIONAL_PROMPT_CACHING_MODELS
                .contains(id.as_str()),
            input_price,
            output_price,
            cache_writes_price,
            cache_reads_price,
            thinking,
            supports_reasoning_effort: false,
            description,
        },
    };

    Some((id, info))
}
