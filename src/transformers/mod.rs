//! Transformers layer
//!
//! Outbound request shaping: wire types, message translation and the
//! request builder. Everything here is a pure transform over owned data.

pub mod messages;
pub mod request;
pub mod wire;

pub use messages::{
    DefaultMessageConverter, MessageConverter, convert_to_r1_format, convert_to_standard_messages,
};
pub use request::{
    DEFAULT_PROVIDER_NAME, MIDDLE_OUT_TRANSFORM, RequestOptions, apply_prompt_cache,
    build_chat_request, build_completion_request,
};
pub use wire::{
    CacheControl, ProviderRouting, ReasoningDirective, StreamOptions, UsageAccounting,
    WireContent, WireContentPart, WireMessage, WireRequest, WireRole,
};
