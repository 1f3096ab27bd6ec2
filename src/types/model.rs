//! Model capability metadata and the per-request parameters derived from it.

use serde::{Deserialize, Serialize};

/// Capability record for a model reachable through OpenRouter.
///
/// Prices are USD per million tokens.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub context_window: u32,
    #[serde(default)]
    pub supports_images: bool,
    #[serde(default)]
    pub supports_prompt_cache: bool,
    #[serde(default)]
    pub is_prompt_cache_optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_writes_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_reads_price: Option<f64>,
    /// Model accepts an extended-thinking budget.
    #[serde(default)]
    pub thinking: bool,
    #[serde(default)]
    pub supports_reasoning_effort: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Reasoning effort tier for models that accept one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    High,
    Medium,
    Low,
}

impl std::str::FromStr for ReasoningEffort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown reasoning effort: {other}")),
        }
    }
}

/// Extended-thinking directive, serialized as `{"type":"enabled","budget_tokens":N}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ThinkingConfig {
    Enabled { budget_tokens: u32 },
}

impl ThinkingConfig {
    pub fn budget_tokens(&self) -> u32 {
        match self {
            Self::Enabled { budget_tokens } => *budget_tokens,
        }
    }
}

/// Prompt caching support for the resolved model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PromptCache {
    pub supported: bool,
    /// Supported, but only used when caching is switched on in configuration.
    pub optional: bool,
}

impl PromptCache {
    /// Whether cache markers should be attached to this request.
    pub fn is_enabled(&self, caching_enabled: bool) -> bool {
        self.supported && (!self.optional || caching_enabled)
    }
}

/// Generation parameters computed fresh for every request.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveParams {
    pub max_tokens: Option<u32>,
    pub thinking: Option<ThinkingConfig>,
    pub temperature: f64,
    pub reasoning_effort: Option<ReasoningEffort>,
    pub top_p: Option<f64>,
    pub prompt_cache: PromptCache,
}

/// User-supplied overrides applied on top of registry defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelOverrides {
    /// Only honored when thinking is engaged. Raised to at least 1025 so
    /// the thinking budget stays below it.
    pub max_tokens: Option<u32>,
    /// Only honored when thinking is engaged.
    pub max_thinking_tokens: Option<u32>,
    /// Ignored when thinking is engaged (thinking pins temperature to 1.0).
    pub temperature: Option<f64>,
    pub reasoning_effort: Option<ReasoningEffort>,
}

/// The outcome of model resolution: what `get_model()` reports.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModel {
    pub id: String,
    pub info: ModelInfo,
    pub params: EffectiveParams,
}
