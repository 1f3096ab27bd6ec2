//! Message translation
//!
//! Converts Anthropic-style conversation messages into OpenAI-style wire
//! messages. Two flavors exist: the standard one, and the R1 flavor for
//! reasoning models, which only knows `user`/`assistant` roles and wants
//! consecutive same-role turns merged.

use crate::types::{ContentPart, ConversationMessage, MessageContent, Role};

use super::wire::{WireContent, WireContentPart, WireFunctionCall, WireMessage, WireRole, WireToolCall};

/// Translation collaborator used by the request builder.
pub trait MessageConverter: Send + Sync {
    /// Standard OpenAI-style translation.
    fn to_standard(&self, messages: &[ConversationMessage]) -> Vec<WireMessage>;

    /// R1-style translation: no system role, same-role turns merged.
    fn to_reasoning_format(&self, messages: &[ConversationMessage]) -> Vec<WireMessage>;
}

/// The built-in converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessageConverter;

impl MessageConverter for DefaultMessageConverter {
    fn to_standard(&self, messages: &[ConversationMessage]) -> Vec<WireMessage> {
        convert_to_standard_messages(messages)
    }

    fn to_reasoning_format(&self, messages: &[ConversationMessage]) -> Vec<WireMessage> {
        convert_to_r1_format(messages)
    }
}

fn wire_role(role: Role) -> WireRole {
    match role {
        Role::System => WireRole::System,
        Role::User => WireRole::User,
        Role::Assistant => WireRole::Assistant,
    }
}

/// Translate messages into standard OpenAI chat messages.
///
/// User turns may fan out into several wire messages: tool results become
/// `tool` messages first, then any remaining parts (plus images carried by
/// tool results) follow as one user message.
pub fn convert_to_standard_messages(messages: &[ConversationMessage]) -> Vec<WireMessage> {
    let mut out = Vec::with_capacity(messages.len());

    for message in messages {
        let parts = match &message.content {
            MessageContent::Text(text) => {
                out.push(WireMessage::text(wire_role(message.role), text.clone()));
                continue;
            }
            MessageContent::Parts(parts) => parts,
        };

        match message.role {
            Role::Assistant => out.push(assistant_message(parts)),
            Role::User | Role::System => {
                let mut forwarded_images = Vec::new();
                for part in parts {
                    if let ContentPart::ToolResult {
                        tool_use_id,
                        content,
                        ..
                    } = part
                    {
                        let (text, images) = tool_result_content(content.as_ref());
                        forwarded_images.extend(images);
                        out.push(WireMessage {
                            role: WireRole::Tool,
                            content: Some(WireContent::Text(text)),
                            tool_calls: None,
                            tool_call_id: Some(tool_use_id.clone()),
                        });
                    }
                }

                let mut wire_parts: Vec<WireContentPart> =
                    parts.iter().filter_map(simple_part).collect();
                wire_parts.extend(forwarded_images);
                if !wire_parts.is_empty() {
                    out.push(WireMessage::new(
                        wire_role(message.role),
                        WireContent::Parts(wire_parts),
                    ));
                }
            }
        }
    }

    out
}

/// Text and image parts map one-to-one; tool parts are handled elsewhere.
fn simple_part(part: &ContentPart) -> Option<WireContentPart> {
    match part {
        ContentPart::Text { text } => Some(WireContentPart::text(text.clone())),
        ContentPart::Image { source } => Some(WireContentPart::image_url(source.data_url())),
        ContentPart::ToolUse { .. } | ContentPart::ToolResult { .. } => None,
    }
}

fn assistant_message(parts: &[ContentPart]) -> WireMessage {
    let text = parts
        .iter()
        .filter_map(|part| match part {
            ContentPart::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n");

    let tool_calls: Vec<WireToolCall> = parts
        .iter()
        .filter_map(|part| match part {
            ContentPart::ToolUse { id, name, input } => Some(WireToolCall {
                id: id.clone(),
                call_type: "function".to_string(),
                function: WireFunctionCall {
                    name: name.clone(),
                    arguments: input.to_string(),
                },
            }),
            _ => None,
        })
        .collect();

    WireMessage {
        role: WireRole::Assistant,
        content: (!text.is_empty()).then_some(WireContent::Text(text)),
        tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
        tool_call_id: None,
    }
}

/// Tool messages are text only; images ride along on the next user message.
fn tool_result_content(content: Option<&MessageContent>) -> (String, Vec<WireContentPart>) {
    match content {
        None => (String::new(), Vec::new()),
        Some(MessageContent::Text(text)) => (text.clone(), Vec::new()),
        Some(MessageContent::Parts(parts)) => {
            let mut texts = Vec::new();
            let mut images = Vec::new();
            for part in parts {
                match part {
                    ContentPart::Text { text } => texts.push(text.clone()),
                    ContentPart::Image { source } => {
                        texts.push("(see following user message for image)".to_string());
                        images.push(WireContentPart::image_url(source.data_url()));
                    }
                    _ => {}
                }
            }
            (texts.join("\n"), images)
        }
    }
}

/// Translate messages into the R1 format.
///
/// Every non-assistant turn becomes `user`; consecutive turns with the same
/// role are merged (text joined by newlines, or parts concatenated once
/// images are involved).
pub fn convert_to_r1_format(messages: &[ConversationMessage]) -> Vec<WireMessage> {
    let mut merged: Vec<WireMessage> = Vec::with_capacity(messages.len());

    for message in messages {
        let role = match message.role {
            Role::Assistant => WireRole::Assistant,
            Role::User | Role::System => WireRole::User,
        };
        let content = r1_content(&message.content);

        match merged.last_mut() {
            Some(last) if last.role == role => {
                let previous = last.content.take();
                last.content = Some(merge_content(previous, content));
            }
            _ => merged.push(WireMessage::new(role, content)),
        }
    }

    merged
}

fn r1_content(content: &MessageContent) -> WireContent {
    let parts = match content {
        MessageContent::Text(text) => return WireContent::Text(text.clone()),
        MessageContent::Parts(parts) => parts,
    };

    let mut texts = Vec::new();
    let mut images = Vec::new();
    for part in parts {
        match part {
            ContentPart::Text { text } => texts.push(text.as_str()),
            ContentPart::Image { source } => {
                images.push(WireContentPart::image_url(source.data_url()))
            }
            _ => {}
        }
    }

    if images.is_empty() {
        return WireContent::Text(texts.join("\n"));
    }

    let mut wire_parts = Vec::with_capacity(images.len() + 1);
    if !texts.is_empty() {
        wire_parts.push(WireContentPart::text(texts.join("\n")));
    }
    wire_parts.extend(images);
    WireContent::Parts(wire_parts)
}

fn merge_content(previous: Option<WireContent>, next: WireContent) -> WireContent {
    match (previous, next) {
        (Some(WireContent::Text(prev)), WireContent::Text(next)) => {
            WireContent::Text(format!("{prev}\n{next}"))
        }
        (previous, next) => {
            let mut parts = match previous {
                Some(WireContent::Parts(parts)) => parts,
                Some(WireContent::Text(text)) => vec![WireContentPart::text(text)],
                None => vec![WireContentPart::text(String::new())],
            };
            match next {
                WireContent::Parts(next) => parts.extend(next),
                WireContent::Text(text) => parts.push(WireContentPart::text(text)),
            }
            WireContent::Parts(parts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn standard_text_messages_pass_through() {
        let messages = vec![
            ConversationMessage::user("hello"),
            ConversationMessage::assistant("hi there"),
        ];
        let wire = convert_to_standard_messages(&messages);
        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!([
                { "role": "user", "content": "hello" },
                { "role": "assistant", "content": "hi there" }
            ])
        );
    }

    #[test]
    fn standard_tool_round_trip_shapes() {
        let messages = vec![
            ConversationMessage::assistant(vec![
                ContentPart::text("let me check"),
                ContentPart::ToolUse {
                    id: "call_1".into(),
                    name: "read_file".into(),
                    input: json!({"path": "a.rs"}),
                },
            ]),
            ConversationMessage::user(vec![
                ContentPart::ToolResult {
                    tool_use_id: "call_1".into(),
                    content: Some(MessageContent::Parts(vec![
                        ContentPart::text("fn main() {}"),
                        ContentPart::image("image/png", "QUJD"),
                    ])),
                    is_error: None,
                },
                ContentPart::text("thanks"),
            ]),
        ];

        let wire = serde_json::to_value(convert_to_standard_messages(&messages)).unwrap();
        assert_eq!(
            wire,
            json!([
                {
                    "role": "assistant",
                    "content": "let me check",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "read_file", "arguments": "{\"path\":\"a.rs\"}" }
                    }]
                },
                {
                    "role": "tool",
                    "tool_call_id": "call_1",
                    "content": "fn main() {}\n(see following user message for image)"
                },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": "thanks" },
                        { "type": "image_url", "image_url": { "url": "data:image/png;base64,QUJD" } }
                    ]
                }
            ])
        );
    }

    #[test]
    fn assistant_tool_only_turn_has_no_content() {
        let messages = vec![ConversationMessage::assistant(vec![ContentPart::ToolUse {
            id: "t".into(),
            name: "noop".into(),
            input: json!({}),
        }])];
        let wire = convert_to_standard_messages(&messages);
        assert_eq!(wire[0].content, None);
        assert_eq!(wire[0].tool_calls.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn r1_merges_system_into_first_user_turn() {
        let messages = vec![
            ConversationMessage::user("You are helpful."),
            ConversationMessage::user("What is 2+2?"),
            ConversationMessage::assistant("4"),
            ConversationMessage::assistant("Anything else?"),
        ];
        let wire = serde_json::to_value(convert_to_r1_format(&messages)).unwrap();
        assert_eq!(
            wire,
            json!([
                { "role": "user", "content": "You are helpful.\nWhat is 2+2?" },
                { "role": "assistant", "content": "4\nAnything else?" }
            ])
        );
    }

    #[test]
    fn r1_switches_to_parts_when_images_are_present() {
        let messages = vec![
            ConversationMessage::user("system prompt"),
            ConversationMessage::user(vec![
                ContentPart::text("what is this?"),
                ContentPart::image("image/jpeg", "Zm9v"),
            ]),
        ];
        let wire = serde_json::to_value(convert_to_r1_format(&messages)).unwrap();
        assert_eq!(
            wire,
            json!([{
                "role": "user",
                "content": [
                    { "type": "text", "text": "system prompt" },
                    { "type": "text", "text": "what is this?" },
                    { "type": "image_url", "image_url": { "url": "data:image/jpeg;base64,Zm9v" } }
                ]
            }])
        );
    }

    #[test]
    fn r1_never_emits_system_role() {
        let messages = vec![
            ConversationMessage::system("sys"),
            ConversationMessage::assistant("a"),
        ];
        let wire = convert_to_r1_format(&messages);
        assert!(wire.iter().all(|m| m.role != WireRole::System));
    }
}
