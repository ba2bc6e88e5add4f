//! Wire shapes for the OpenAI-compatible chat completions API.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatConversation, ChatRole, SYSTEM_PROMPT};

#[derive(Debug, Serialize)]
pub(super) struct CompletionRequestDto<'a> {
    pub model: &'a str,
    pub messages: Vec<MessageDto<'a>>,
}

#[derive(Debug, Serialize)]
pub(super) struct MessageDto<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> CompletionRequestDto<'a> {
    /// System prompt first, then the member's conversation in order.
    pub(super) fn new(model: &'a str, conversation: &'a ChatConversation) -> Self {
        let system = MessageDto {
            role: "system",
            content: SYSTEM_PROMPT,
        };
        let messages = std::iter::once(system)
            .chain(conversation.messages().iter().map(|message| MessageDto {
                role: match message.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                },
                content: message.content.as_str(),
            }))
            .collect();
        Self { model, messages }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CompletionResponseDto {
    #[serde(default)]
    choices: Vec<ChoiceDto>,
}

#[derive(Debug, Deserialize)]
struct ChoiceDto {
    message: Option<ChoiceMessageDto>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessageDto {
    content: Option<String>,
}

impl CompletionResponseDto {
    /// Content of the first choice, if any.
    pub(super) fn into_reply(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
    }
}
