//! OpenRouter Model Definitions
//!
//! Model id constants, the built-in capability table, and the prompt-caching
//! membership sets.

use crate::types::ModelInfo;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Anthropic models via `OpenRouter`
pub mod anthropic {
    pub const CLAUDE_3_7_SONNET: &str = "anthropic/claude-3.7-sonnet";
    pub const CLAUDE_3_7_SONNET_BETA: &str = "anthropic/claude-3.7-sonnet:beta";
    pub const CLAUDE_3_7_SONNET_THINKING: &str = "anthropic/claude-3.7-sonnet:thinking";
    pub const CLAUDE_3_5_SONNET: &str = "anthropic/claude-3.5-sonnet";
    pub const CLAUDE_3_5_SONNET_BETA: &str = "anthropic/claude-3.5-sonnet:beta";
    pub const CLAUDE_3_5_SONNET_20240620: &str = "anthropic/claude-3.5-sonnet-20240620";
    pub const CLAUDE_3_5_SONNET_20240620_BETA: &str = "anthropic/claude-3.5-sonnet-20240620:beta";
    pub const CLAUDE_3_5_HAIKU: &str = "anthropic/claude-3.5-haiku";
    pub const CLAUDE_3_5_HAIKU_BETA: &str = "anthropic/claude-3.5-haiku:beta";
    pub const CLAUDE_3_5_HAIKU_20241022: &str = "anthropic/claude-3.5-haiku-20241022";
    pub const CLAUDE_3_5_HAIKU_20241022_BETA: &str = "anthropic/claude-3.5-haiku-20241022:beta";
    pub const CLAUDE_3_OPUS: &str = "anthropic/claude-3-opus";
    pub const CLAUDE_3_OPUS_BETA: &str = "anthropic/claude-3-opus:beta";
    pub const CLAUDE_3_SONNET: &str = "anthropic/claude-3-sonnet";
    pub const CLAUDE_3_SONNET_BETA: &str = "anthropic/claude-3-sonnet:beta";
    pub const CLAUDE_3_HAIKU: &str = "anthropic/claude-3-haiku";
    pub const CLAUDE_3_HAIKU_BETA: &str = "anthropic/claude-3-haiku:beta";
}

/// Google models via `OpenRouter`
pub mod google {
    pub const GEMINI_2_5_PRO_PREVIEW: &str = "google/gemini-2.5-pro-preview-03-25";
    pub const GEMINI_2_0_FLASH_001: &str = "google/gemini-2.0-flash-001";
    pub const GEMINI_FLASH_1_5: &str = "google/gemini-flash-1.5";
    pub const GEMINI_FLASH_1_5_8B: &str = "google/gemini-flash-1.5-8b";
}

/// OpenAI models via `OpenRouter`
pub mod openai {
    pub const GPT_4O: &str = "openai/gpt-4o";
    pub const GPT_4O_MINI: &str = "openai/gpt-4o-mini";
    pub const O3_MINI: &str = "openai/o3-mini";
}

/// DeepSeek models via `OpenRouter`
pub mod deepseek {
    pub const DEEPSEEK_CHAT: &str = "deepseek/deepseek-chat";
    pub const DEEPSEEK_R1: &str = "deepseek/deepseek-r1";
    pub const DEEPSEEK_R1_DISTILL_LLAMA_70B: &str = "deepseek/deepseek-r1-distill-llama-70b";
}

/// Perplexity models via `OpenRouter`
pub mod perplexity {
    pub const SONAR_REASONING: &str = "perplexity/sonar-reasoning";
}

/// Model used when none is configured, or when the configured one is unknown.
pub const DEFAULT_MODEL_ID: &str = anthropic::CLAUDE_3_7_SONNET;

/// Capability record of [`DEFAULT_MODEL_ID`].
pub fn default_model_info() -> ModelInfo {
    ModelInfo {
        max_tokens: Some(8192),
        context_window: 200_000,
        supports_images: true,
        supports_prompt_cache: true,
        is_prompt_cache_optional: false,
        input_price: Some(3.0),
        output_price: Some(15.0),
        cache_writes_price: Some(3.75),
        cache_reads_price: Some(0.3),
        thinking: false,
        supports_reasoning_effort: false,
        description: Some(
            "Claude 3.7 Sonnet is an advanced large language model with improved reasoning, coding, and problem-solving capabilities.".to_string(),
        ),
    }
}

/// Models that accept `cache_control` markers.
pub static PROMPT_CACHING_MODELS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        anthropic::CLAUDE_3_HAIKU,
        anthropic::CLAUDE_3_HAIKU_BETA,
        anthropic::CLAUDE_3_OPUS,
        anthropic::CLAUDE_3_OPUS_BETA,
        anthropic::CLAUDE_3_SONNET,
        anthropic::CLAUDE_3_SONNET_BETA,
        anthropic::CLAUDE_3_5_HAIKU,
        anthropic::CLAUDE_3_5_HAIKU_BETA,
        anthropic::CLAUDE_3_5_HAIKU_20241022,
        anthropic::CLAUDE_3_5_HAIKU_20241022_BETA,
        anthropic::CLAUDE_3_5_SONNET,
        anthropic::CLAUDE_3_5_SONNET_BETA,
        anthropic::CLAUDE_3_5_SONNET_20240620,
        anthropic::CLAUDE_3_5_SONNET_20240620_BETA,
        anthropic::CLAUDE_3_7_SONNET,
        anthropic::CLAUDE_3_7_SONNET_BETA,
        anthropic::CLAUDE_3_7_SONNET_THINKING,
        google::GEMINI_2_5_PRO_PREVIEW,
        google::GEMINI_2_0_FLASH_001,
        google::GEMINI_FLASH_1_5,
        google::GEMINI_FLASH_1_5_8B,
    ])
});

/// Caching-capable models where caching must be switched on explicitly.
pub static OPTIONAL_PROMPT_CACHING_MODELS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        google::GEMINI_2_5_PRO_PREVIEW,
        google::GEMINI_2_0_FLASH_001,
        google::GEMINI_FLASH_1_5,
        google::GEMINI_FLASH_1_5_8B,
    ])
});

fn anthropic_info(max_tokens: u32, input: f64, output: f64) -> ModelInfo {
    ModelInfo {
        max_tokens: Some(max_tokens),
        context_window: 200_000,
        supports_images: true,
        supports_prompt_cache: true,
        input_price: Some(input),
        output_price: Some(output),
        cache_writes_price: Some(input * 1.25),
        cache_reads_price: Some(input * 0.1),
        ..Default::default()
    }
}

/// Built-in capability table.
pub static BUILTIN_MODELS: Lazy<HashMap<&'static str, ModelInfo>> = Lazy::new(|| {
    let mut models = HashMap::new();

    models.insert(anthropic::CLAUDE_3_7_SONNET, default_model_info());
    models.insert(anthropic::CLAUDE_3_7_SONNET_BETA, default_model_info());
    models.insert(
        anthropic::CLAUDE_3_7_SONNET_THINKING,
        ModelInfo {
            max_tokens: Some(64_000),
            thinking: true,
            ..default_model_info()
        },
    );
    for id in [
        anthropic::CLAUDE_3_5_SONNET,
        anthropic::CLAUDE_3_5_SONNET_BETA,
        anthropic::CLAUDE_3_5_SONNET_20240620,
        anthropic::CLAUDE_3_5_SONNET_20240620_BETA,
    ] {
        models.insert(id, anthropic_info(8192, 3.0, 15.0));
    }
    for id in [
        anthropic::CLAUDE_3_5_HAIKU,
        anthropic::CLAUDE_3_5_HAIKU_BETA,
        anthropic::CLAUDE_3_5_HAIKU_20241022,
        anthropic::CLAUDE_3_5_HAIKU_20241022_BETA,
    ] {
        models.insert(
            id,
            ModelInfo {
                supports_images: false,
                ..anthropic_info(8192, 0.8, 4.0)
            },
        );
    }
    models.insert(anthropic::CLAUDE_3_OPUS, anthropic_info(4096, 15.0, 75.0));
    models.insert(anthropic::CLAUDE_3_OPUS_BETA, anthropic_info(4096, 15.0, 75.0));
    models.insert(anthropic::CLAUDE_3_SONNET, anthropic_info(4096, 3.0, 15.0));
    models.insert(anthropic::CLAUDE_3_SONNET_BETA, anthropic_info(4096, 3.0, 15.0));
    models.insert(anthropic::CLAUDE_3_HAIKU, anthropic_info(4096, 0.25, 1.25));
    models.insert(anthropic::CLAUDE_3_HAIKU_BETA, anthropic_info(4096, 0.25, 1.25));

    models.insert(
        google::GEMINI_2_5_PRO_PREVIEW,
        ModelInfo {
            max_tokens: Some(65_535),
            context_window: 1_048_576,
            supports_images: true,
            supports_prompt_cache: true,
            is_prompt_cache_optional: true,
            input_price: Some(1.25),
            output_price: Some(10.0),
            ..Default::default()
        },
    );
    models.insert(
        google::GEMINI_2_0_FLASH_001,
        ModelInfo {
            max_tokens: Some(8192),
            context_window: 1_048_576,
            supports_images: true,
            supports_prompt_cache: true,
            is_prompt_cache_optional: true,
            input_price: Some(0.1),
            output_price: Some(0.4),
            ..Default::default()
        },
    );
    for (id, input, output) in [
        (google::GEMINI_FLASH_1_5, 0.075, 0.3),
        (google::GEMINI_FLASH_1_5_8B, 0.0375, 0.15),
    ] {
        models.insert(
            id,
            ModelInfo {
                max_tokens: Some(8192),
                context_window: 1_000_000,
                supports_images: true,
                supports_prompt_cache: true,
                is_prompt_cache_optional: true,
                input_price: Some(input),
                output_price: Some(output),
                ..Default::default()
            },
        );
    }

    models.insert(
        openai::GPT_4O,
        ModelInfo {
            max_tokens: Some(16_384),
            context_window: 128_000,
            supports_images: true,
            input_price: Some(2.5),
            output_price: Some(10.0),
            ..Default::default()
        },
    );
    models.insert(
        openai::GPT_4O_MINI,
        ModelInfo {
            max_tokens: Some(16_384),
            context_window: 128_000,
            supports_images: true,
            input_price: Some(0.15),
            output_price: Some(0.6),
            ..Default::default()
        },
    );
    models.insert(
        openai::O3_MINI,
        ModelInfo {
            max_tokens: Some(100_000),
            context_window: 200_000,
            supports_reasoning_effort: true,
            input_price: Some(1.1),
            output_price: Some(4.4),
            ..Default::default()
        },
    );

    models.insert(
        deepseek::DEEPSEEK_CHAT,
        ModelInfo {
            max_tokens: Some(8192),
            context_window: 64_000,
            input_price: Some(0.27),
            output_price: Some(1.1),
            ..Default::default()
        },
    );
    models.insert(
        deepseek::DEEPSEEK_R1,
        ModelInfo {
            max_tokens: Some(8192),
            context_window: 163_840,
            input_price: Some(0.55),
            output_price: Some(2.19),
            ..Default::default()
        },
    );
    models.insert(
        deepseek::DEEPSEEK_R1_DISTILL_LLAMA_70B,
        ModelInfo {
            max_tokens: Some(8192),
            context_window: 131_072,
            input_price: Some(0.23),
            output_price: Some(0.69),
            ..Default::default()
        },
    );
    models.insert(
        perplexity::SONAR_REASONING,
        ModelInfo {
            max_tokens: Some(8192),
            context_window: 127_000,
            input_price: Some(1.0),
            output_price: Some(5.0),
            ..Default::default()
        },
    );

    models
});

/// All built-in model ids, sorted.
pub fn all_models() -> Vec<String> {
    let mut ids: Vec<String> = BUILTIN_MODELS.keys().map(|id| id.to_string()).collect();
    ids.sort();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_builtin() {
        assert_eq!(
            BUILTIN_MODELS.get(DEFAULT_MODEL_ID),
            Some(&default_model_info())
        );
    }

    #[test]
    fn all_models_lists_every_builtin_sorted() {
        let ids = all_models();
        assert_eq!(ids.len(), BUILTIN_MODELS.len());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids.iter().any(|id| id == DEFAULT_MODEL_ID));
        assert!(ids.iter().any(|id| id == openai::O3_MINI));
    }

    #[test]
    fn optional_caching_is_subset_of_caching() {
        for id in OPTIONAL_PROMPT_CACHING_MODELS.iter() {
            assert!(PROMPT_CACHING_MODELS.contains(id), "{id} missing");
        }
    }

    #[test]
    fn builtin_cache_flags_match_sets() {
        for (id, info) in BUILTIN_MODELS.iter() {
            assert_eq!(
                info.supports_prompt_cache,
                PROMPT_CACHING_MODELS.contains(id),
                "{id}"
            );
            assert_eq!(
                info.is_prompt_cache_optional,
                OPTIONAL_PROMPT_CACHING_MODELS.contains(id),
                "{id}"
            );
        }
    }

    #[test]
    fn only_thinking_variant_declares_thinking() {
        let thinking: Vec<_> = BUILTIN_MODELS
            .iter()
            .filter(|(_, info)| info.thinking)
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(thinking, vec![anthropic::CLAUDE_3_7_SONNET_THINKING]);
    }
}
