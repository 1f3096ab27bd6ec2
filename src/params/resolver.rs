//! Model Resolver
//!
//! Computes the effective generation parameters for one request from the
//! requested model id, an optional capability override, user overrides and
//! the registry. Pure: no I/O, no failure modes.

use crate::registry::ModelRegistry;
use crate::types::{EffectiveParams, ModelInfo, ModelOverrides, PromptCache, ResolvedModel, ThinkingConfig};

/// Default temperature for reasoning-family models.
pub const REASONING_DEFAULT_TEMPERATURE: f64 = 0.6;
/// `top_p` sent to reasoning-family models.
pub const REASONING_TOP_P: f64 = 0.95;
/// Thinking mode requires this exact temperature upstream.
pub const THINKING_TEMPERATURE: f64 = 1.0;
/// Smallest thinking budget the upstream accepts.
pub const MIN_THINKING_BUDGET_TOKENS: u32 = 1024;
/// Share of `max_tokens` the thinking budget may take.
const THINKING_BUDGET_RATIO: f64 = 0.8;

const REASONING_FAMILY_PREFIXES: &[&str] = &["deepseek/deepseek-r1"];
const REASONING_FAMILY_IDS: &[&str] = &["perplexity/sonar-reasoning"];

/// Reasoning-family models reject system messages and want R1-style input.
pub fn is_reasoning_family(model_id: &str) -> bool {
    REASONING_FAMILY_PREFIXES
        .iter()
        .any(|prefix| model_id.starts_with(prefix))
        || REASONING_FAMILY_IDS.contains(&model_id)
}

/// Resolve the model and its effective parameters.
///
/// Without an id the registry default is used. An id the registry doesn't
/// know falls back to the default as well, unless the caller supplied the
/// capability record for it.
pub fn resolve(
    model_id: Option<&str>,
    info_override: Option<&ModelInfo>,
    overrides: &ModelOverrides,
    registry: &dyn ModelRegistry,
) -> ResolvedModel {
    let (id, info) = match (model_id, info_override) {
        (Some(id), Some(info)) => (id.to_string(), info.clone()),
        (Some(id), None) => match registry.lookup(id) {
            Some(info) => (id.to_string(), info),
            None => {
                tracing::debug!(model = %id, "unknown OpenRouter model, using default");
                registry.default_model()
            }
        },
        (None, Some(info)) => (registry.default_model().0, info.clone()),
        (None, None) => registry.default_model(),
    };

    let params = effective_params(&id, &info, overrides, registry);

    tracing::debug!(
        model = %id,
        max_tokens = ?params.max_tokens,
        thinking = params.thinking.is_some(),
        prompt_cache = params.prompt_cache.supported,
        "resolved OpenRouter model"
    );

    ResolvedModel { id, info, params }
}

fn effective_params(
    id: &str,
    info: &ModelInfo,
    overrides: &ModelOverrides,
    registry: &dyn ModelRegistry,
) -> EffectiveParams {
    let reasoning_family = is_reasoning_family(id);
    let default_temperature = if reasoning_family {
        REASONING_DEFAULT_TEMPERATURE
    } else {
        0.0
    };

    let thinking_engaged =
        info.thinking && info.max_tokens.is_some_and(|max| max > MIN_THINKING_BUDGET_TOKENS);

    let (max_tokens, thinking, temperature) = if thinking_engaged {
        // The upstream rejects a budget that is not below max_tokens.
        let max_tokens = overrides
            .max_tokens
            .or(info.max_tokens)
            .unwrap_or_default()
            .max(MIN_THINKING_BUDGET_TOKENS + 1);
        let ceiling = (f64::from(max_tokens) * THINKING_BUDGET_RATIO).floor() as u32;
        let budget_tokens = overrides
            .max_thinking_tokens
            .unwrap_or(ceiling)
            .min(ceiling)
            .max(MIN_THINKING_BUDGET_TOKENS);
        (
            Some(max_tokens),
            Some(ThinkingConfig::Enabled { budget_tokens }),
            THINKING_TEMPERATURE,
        )
    } else {
        (
            info.max_tokens,
            None,
            overrides.temperature.unwrap_or(default_temperature),
        )
    };

    EffectiveParams {
        max_tokens,
        thinking,
        temperature,
        reasoning_effort: info
            .supports_reasoning_effort
            .then_some(overrides.reasoning_effort)
            .flatten(),
        top_p: reasoning_family.then_some(REASONING_TOP_P),
        prompt_cache: PromptCache {
            supported: registry.supports_prompt_cache(id),
            optional: registry.is_prompt_cache_optional(id),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::models::{anthropic, deepseek, google, openai, perplexity};
    use crate::registry::{DEFAULT_MODEL_ID, StaticModelRegistry, default_model_info};
    use crate::types::ReasoningEffort;

    fn resolve_id(id: Option<&str>, overrides: ModelOverrides) -> ResolvedModel {
        resolve(id, None, &overrides, &StaticModelRegistry)
    }

    #[test]
    fn missing_model_uses_default() {
        let model = resolve_id(None, ModelOverrides::default());
        assert_eq!(model.id, DEFAULT_MODEL_ID);
        assert_eq!(model.info, default_model_info());
        assert_eq!(model.params.temperature, 0.0);
        assert_eq!(model.params.top_p, None);
        assert!(model.params.prompt_cache.supported);
        assert!(!model.params.prompt_cache.optional);
    }

    #[test]
    fn unknown_model_falls_back_deterministically() {
        let a = resolve_id(Some("acme/does-not-exist"), ModelOverrides::default());
        let b = resolve_id(Some("acme/also-missing"), ModelOverrides::default());
        assert_eq!(a.id, DEFAULT_MODEL_ID);
        assert_eq!(a, b);
    }

    #[test]
    fn info_override_is_trusted_for_unknown_ids() {
        let info = ModelInfo {
            max_tokens: Some(2048),
            context_window: 32_000,
            ..Default::default()
        };
        let model = resolve(
            Some("acme/custom"),
            Some(&info),
            &ModelOverrides::default(),
            &StaticModelRegistry,
        );
        assert_eq!(model.id, "acme/custom");
        assert_eq!(model.params.max_tokens, Some(2048));
        assert!(!model.params.prompt_cache.supported);
    }

    #[test]
    fn reasoning_family_detection() {
        assert!(is_reasoning_family(deepseek::DEEPSEEK_R1));
        assert!(is_reasoning_family(deepseek::DEEPSEEK_R1_DISTILL_LLAMA_70B));
        assert!(is_reasoning_family("deepseek/deepseek-r1:free"));
        assert!(is_reasoning_family(perplexity::SONAR_REASONING));
        assert!(!is_reasoning_family("perplexity/sonar-reasoning-pro"));
        assert!(!is_reasoning_family(deepseek::DEEPSEEK_CHAT));
        assert!(!is_reasoning_family(anthropic::CLAUDE_3_7_SONNET));
    }

    #[test]
    fn reasoning_family_defaults() {
        let model = resolve_id(Some(deepseek::DEEPSEEK_R1), ModelOverrides::default());
        assert_eq!(model.params.temperature, REASONING_DEFAULT_TEMPERATURE);
        assert_eq!(model.params.top_p, Some(REASONING_TOP_P));
        assert_eq!(model.params.thinking, None);
    }

    #[test]
    fn non_thinking_model_ignores_token_overrides() {
        let overrides = ModelOverrides {
            max_tokens: Some(1234),
            max_thinking_tokens: Some(999),
            ..Default::default()
        };
        let model = resolve_id(Some(anthropic::CLAUDE_3_5_SONNET), overrides);
        assert_eq!(model.params.max_tokens, Some(8192));
        assert_eq!(model.params.thinking, None);
    }

    #[test]
    fn thinking_model_applies_overrides() {
        let overrides = ModelOverrides {
            max_tokens: Some(32_000),
            max_thinking_tokens: Some(16_000),
            temperature: Some(0.2),
            ..Default::default()
        };
        let model = resolve_id(Some(anthropic::CLAUDE_3_7_SONNET_THINKING), overrides);
        assert_eq!(model.params.max_tokens, Some(32_000));
        assert_eq!(
            model.params.thinking,
            Some(ThinkingConfig::Enabled {
                budget_tokens: 16_000
            })
        );
        assert_eq!(model.params.temperature, THINKING_TEMPERATURE);
    }

    #[test]
    fn thinking_budget_defaults_and_clamps() {
        let model = resolve_id(
            Some(anthropic::CLAUDE_3_7_SONNET_THINKING),
            ModelOverrides::default(),
        );
        assert_eq!(model.params.max_tokens, Some(64_000));
        assert_eq!(model.params.thinking.map(|t| t.budget_tokens()), Some(51_200));

        let model = resolve_id(
            Some(anthropic::CLAUDE_3_7_SONNET_THINKING),
            ModelOverrides {
                max_tokens: Some(10_000),
                max_thinking_tokens: Some(50_000),
                ..Default::default()
            },
        );
        assert_eq!(model.params.thinking.map(|t| t.budget_tokens()), Some(8_000));

        let model = resolve_id(
            Some(anthropic::CLAUDE_3_7_SONNET_THINKING),
            ModelOverrides {
                max_thinking_tokens: Some(10),
                ..Default::default()
            },
        );
        assert_eq!(
            model.params.thinking.map(|t| t.budget_tokens()),
            Some(MIN_THINKING_BUDGET_TOKENS)
        );
    }

    #[test]
    fn small_max_tokens_override_stays_above_budget() {
        let model = resolve_id(
            Some(anthropic::CLAUDE_3_7_SONNET_THINKING),
            ModelOverrides {
                max_tokens: Some(512),
                ..Default::default()
            },
        );
        let budget = model.params.thinking.map(|t| t.budget_tokens());
        assert_eq!(model.params.max_tokens, Some(MIN_THINKING_BUDGET_TOKENS + 1));
        assert_eq!(budget, Some(MIN_THINKING_BUDGET_TOKENS));

        let model = resolve_id(
            Some(anthropic::CLAUDE_3_7_SONNET_THINKING),
            ModelOverrides {
                max_tokens: Some(1200),
                ..Default::default()
            },
        );
        assert_eq!(model.params.max_tokens, Some(1200));
        assert!(model.params.thinking.is_some_and(|t| t.budget_tokens() < 1200));
    }

    #[test]
    fn thinking_requires_max_tokens_above_threshold() {
        let info = ModelInfo {
            max_tokens: Some(MIN_THINKING_BUDGET_TOKENS),
            thinking: true,
            ..Default::default()
        };
        let model = resolve(
            Some("acme/tiny-thinker"),
            Some(&info),
            &ModelOverrides {
                max_tokens: Some(50_000),
                ..Default::default()
            },
            &StaticModelRegistry,
        );
        assert_eq!(model.params.thinking, None);
        assert_eq!(model.params.max_tokens, Some(MIN_THINKING_BUDGET_TOKENS));
    }

    #[test]
    fn temperature_override_for_regular_models() {
        let model = resolve_id(
            Some(openai::GPT_4O),
            ModelOverrides {
                temperature: Some(0.7),
                ..Default::default()
            },
        );
        assert_eq!(model.params.temperature, 0.7);
    }

    #[test]
    fn reasoning_effort_only_when_supported() {
        let overrides = ModelOverrides {
            reasoning_effort: Some(ReasoningEffort::High),
            ..Default::default()
        };
        let o3 = resolve_id(Some(openai::O3_MINI), overrides);
        assert_eq!(o3.params.reasoning_effort, Some(ReasoningEffort::High));

        let gpt = resolve_id(Some(openai::GPT_4O), overrides);
        assert_eq!(gpt.params.reasoning_effort, None);
    }

    #[test]
    fn optional_prompt_cache_models() {
        let model = resolve_id(Some(google::GEMINI_2_0_FLASH_001), ModelOverrides::default());
        assert!(model.params.prompt_cache.supported);
        assert!(model.params.prompt_cache.optional);
    }
}
