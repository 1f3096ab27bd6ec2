//! Request Builder
//!
//! Assembles the outbound chat completion request: message translation,
//! the reasoning-family quirk, prompt-cache markers and OpenRouter's
//! optional routing/transform/reasoning directives. Pure transform.

use crate::params::is_reasoning_family;
use crate::types::{ConversationMessage, ResolvedModel};

use super::messages::MessageConverter;
use super::wire::{
    CacheControl, ProviderRouting, ReasoningDirective, StreamOptions, UsageAccounting, WireContent,
    WireContentPart, WireMessage, WireRequest, WireRole,
};

/// Provider preference that means "let OpenRouter decide".
pub const DEFAULT_PROVIDER_NAME: &str = "[default]";

/// OpenRouter's context-compression transform.
pub const MIDDLE_OUT_TRANSFORM: &str = "middle-out";

/// Placeholder text part used when a cached user turn has no text of its own.
const CACHE_PLACEHOLDER_TEXT: &str = "...";

/// How many trailing user turns receive a cache marker.
const CACHED_USER_TURNS: usize = 2;

/// Request-shaping switches taken from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub prompt_caching_enabled: bool,
    pub use_middle_out_transform: bool,
    pub specific_provider: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            prompt_caching_enabled: false,
            use_middle_out_transform: true,
            specific_provider: None,
        }
    }
}

impl RequestOptions {
    fn provider_routing(&self) -> Option<ProviderRouting> {
        self.specific_provider
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != DEFAULT_PROVIDER_NAME)
            .map(|name| ProviderRouting {
                order: vec![name.to_string()],
            })
    }
}

/// Build the streaming chat request for `create_message`.
pub fn build_chat_request(
    system_prompt: &str,
    messages: &[ConversationMessage],
    model: &ResolvedModel,
    options: &RequestOptions,
    converter: &dyn MessageConverter,
) -> WireRequest {
    let mut wire_messages = if is_reasoning_family(&model.id) {
        let mut merged = Vec::with_capacity(messages.len() + 1);
        merged.push(ConversationMessage::user(system_prompt));
        merged.extend_from_slice(messages);
        converter.to_reasoning_format(&merged)
    } else {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(WireMessage::text(WireRole::System, system_prompt));
        wire.extend(converter.to_standard(messages));
        wire
    };

    let params = &model.params;
    let cache_enabled = params
        .prompt_cache
        .is_enabled(options.prompt_caching_enabled);
    if cache_enabled {
        wire_messages = apply_prompt_cache(wire_messages, system_prompt);
    }

    tracing::debug!(
        model = %model.id,
        messages = wire_messages.len(),
        cache = cache_enabled,
        "built OpenRouter chat request"
    );

    WireRequest {
        model: model.id.clone(),
        messages: wire_messages,
        max_tokens: params.max_tokens,
        temperature: Some(params.temperature),
        thinking: params.thinking,
        top_p: params.top_p,
        stream: true,
        stream_options: Some(StreamOptions {
            include_usage: true,
        }),
        usage: Some(UsageAccounting { include: true }),
        provider: options.provider_routing(),
        transforms: options
            .use_middle_out_transform
            .then(|| vec![MIDDLE_OUT_TRANSFORM.to_string()]),
        reasoning: params
            .reasoning_effort
            .map(|effort| ReasoningDirective { effort }),
    }
}

/// Build the non-streaming single-prompt request for `complete_prompt`.
pub fn build_completion_request(prompt: &str, model: &ResolvedModel) -> WireRequest {
    WireRequest {
        model: model.id.clone(),
        messages: vec![WireMessage::text(WireRole::User, prompt)],
        max_tokens: model.params.max_tokens,
        temperature: Some(model.params.temperature),
        thinking: model.params.thinking,
        top_p: None,
        stream: false,
        stream_options: None,
        usage: None,
        provider: None,
        transforms: None,
        reasoning: None,
    }
}

/// Attach `cache_control` markers.
///
/// The system message becomes a single cached text part. The last two user
/// messages get a marker on their last text part (a `...` part is appended
/// when there is none). Callers append one user turn per request, so this
/// keeps the cache boundary anchored across consecutive turns.
pub fn apply_prompt_cache(messages: Vec<WireMessage>, system_prompt: &str) -> Vec<WireMessage> {
    let user_positions: Vec<usize> = messages
        .iter()
        .enumerate()
        .filter(|(_, m)| m.role == WireRole::User)
        .map(|(i, _)| i)
        .collect();
    let cached_users = &user_positions[user_positions.len().saturating_sub(CACHED_USER_TURNS)..];

    messages
        .into_iter()
        .enumerate()
        .map(|(index, message)| {
            if index == 0 && message.role == WireRole::System {
                WireMessage::new(
                    WireRole::System,
                    WireContent::Parts(vec![WireContentPart::cached_text(system_prompt)]),
                )
            } else if cached_users.contains(&index) {
                mark_last_text_part(message)
            } else {
                message
            }
        })
        .collect()
}

fn mark_last_text_part(mut message: WireMessage) -> WireMessage {
    let mut parts = match message.content.take() {
        Some(WireContent::Text(text)) => vec![WireContentPart::text(text)],
        Some(WireContent::Parts(parts)) => parts,
        None => Vec::new(),
    };

    let last_text = parts
        .iter()
        .rposition(|part| matches!(part, WireContentPart::Text { .. }));
    let index = match last_text {
        Some(index) => index,
        None => {
            parts.push(WireContentPart::text(CACHE_PLACEHOLDER_TEXT));
            parts.len() - 1
        }
    };

    if let Some(WireContentPart::Text { cache_control, .. }) = parts.get_mut(index) {
        *cache_control = Some(CacheControl::ephemeral());
    }

    message.content = Some(WireContent::Parts(parts));
    message
}
