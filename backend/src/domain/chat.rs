//! Assistant chat conversations forwarded to a completion gateway.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Instructions prepended to every conversation.
pub const SYSTEM_PROMPT: &str = "You are HackTrack AI, a professional and friendly hackathon \
preparation assistant. You help users with:
- Summarizing hackathon brochures
- Creating preparation plans and checklists
- Suggesting project ideas based on hackathon themes
- Study schedule planning
- Productivity coaching and tips
- General hackathon advice

Be concise, actionable, and encouraging. Use emojis sparingly for personality.";

/// Reply used when the gateway answers without content.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't generate a response.";

/// Maximum messages accepted per request.
pub const CHAT_MAX_MESSAGES: usize = 50;
/// Maximum characters per message.
pub const CHAT_MESSAGE_MAX: usize = 8000;

/// Author of a chat message supplied by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The member.
    User,
    /// An earlier assistant reply.
    Assistant,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    /// Author.
    pub role: ChatRole,
    /// Text.
    pub content: String,
}

/// Conversation validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatValidationError {
    /// No messages were supplied.
    #[error("messages must not be empty")]
    Empty,
    /// More than [`CHAT_MAX_MESSAGES`] were supplied.
    #[error("at most {max} messages are accepted")]
    TooMany {
        /// Maximum permitted count.
        max: usize,
    },
    /// A message had blank content.
    #[error("message {index} must not be empty")]
    BlankMessage {
        /// Position in the request.
        index: usize,
    },
    /// A message exceeded [`CHAT_MESSAGE_MAX`].
    #[error("message {index} must be at most {max} characters")]
    MessageTooLong {
        /// Position in the request.
        index: usize,
        /// Maximum permitted length.
        max: usize,
    },
}

/// Validated conversation ready for the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConversation(Vec<ChatMessage>);

impl ChatConversation {
    /// Validate client-supplied messages.
    pub fn new(messages: Vec<ChatMessage>) -> Result<Self, ChatValidationError> {
        if messages.is_empty() {
            return Err(ChatValidationError::Empty);
        }
        if messages.len() > CHAT_MAX_MESSAGES {
            return Err(ChatValidationError::TooMany {
                max: CHAT_MAX_MESSAGES,
            });
        }
        for (index, message) in messages.iter().enumerate() {
            if message.content.trim().is_empty() {
                return Err(ChatValidationError::BlankMessage { index });
            }
            if message.content.chars().count() > CHAT_MESSAGE_MAX {
                return Err(ChatValidationError::MessageTooLong {
                    index,
                    max: CHAT_MESSAGE_MAX,
                });
            }
        }
        Ok(Self(messages))
    }

    /// Messages in order.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }
}

/// Pick the reply text, falling back when the gateway returned none.
///
/// # Examples
/// ```
/// use hacktrack::domain::{reply_or_fallback, FALLBACK_REPLY};
///
/// assert_eq!(reply_or_fallback(Some("hi".to_owned())), "hi");
/// assert_eq!(reply_or_fallback(Some(String::new())), FALLBACK_REPLY);
/// ```
#[must_use]
pub fn reply_or_fallback(reply: Option<String>) -> String {
    reply
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| FALLBACK_REPLY.to_owned())
}
