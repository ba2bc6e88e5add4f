//! Driving port for the assistant chat.

use async_trait::async_trait;

use crate::domain::{ChatConversation, Error};

/// Chat use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCommand: Send + Sync {
    /// Reply to the conversation.
    async fn reply(&self, conversation: ChatConversation) -> Result<String, Error>;
}
