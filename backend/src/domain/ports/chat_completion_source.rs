//! Port for the upstream chat completion gateway.

use async_trait::async_trait;

use crate::domain::ChatConversation;

use super::define_port_error;

define_port_error! {
    /// Errors raised by chat completion adapters.
    pub enum ChatCompletionError {
        /// No gateway URL or API key was configured.
        NotConfigured => "chat gateway is not configured",
        /// The request could not be delivered or timed out.
        Transport { message: String } => "chat gateway transport failed: {message}",
        /// The gateway answered with a non-success status.
        Status { status: u16, message: String } =>
            "chat gateway returned status {status}: {message}",
        /// The gateway payload could not be decoded.
        Decode { message: String } => "chat gateway payload invalid: {message}",
    }
}

/// Sends a conversation (with the system prompt) to a completion model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompletionSource: Send + Sync {
    /// Return the first completion text, or `None` when the payload had none.
    async fn complete(
        &self,
        conversation: &ChatConversation,
    ) -> Result<Option<String>, ChatCompletionError>;
}

/// Source used when no gateway is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredChatSource;

#[async_trait]
impl ChatCompletionSource for UnconfiguredChatSource {
    async fn complete(
        &self,
        _conversation: &ChatConversation,
    ) -> Result<Option<String>, ChatCompletionError> {
        Err(ChatCompletionError::NotConfigured)
    }
}
