//! Assistant chat service over a completion source.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{ChatCommand, ChatCompletionError, ChatCompletionSource};
use crate::domain::{ChatConversation, Error, reply_or_fallback};

/// Service implementing [`ChatCommand`].
#[derive(Clone)]
pub struct ChatService<S: ?Sized> {
    source: Arc<S>,
}

impl<S: ?Sized> ChatService<S> {
    /// Create a service over a completion source.
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S> ChatCommand for ChatService<S>
where
    S: ChatCompletionSource + ?Sized,
{
    async fn reply(&self, conversation: ChatConversation) -> Result<String, Error> {
        match self.source.complete(&conversation).await {
            Ok(reply) => Ok(reply_or_fallback(reply)),
            Err(ChatCompletionError::NotConfigured) => {
                Err(Error::service_unavailable("chat assistant is not configured"))
            }
            Err(err) => {
                warn!(error = %err, "chat completion failed");
                Err(Error::service_unavailable("chat assistant is unavailable"))
            }
        }
    }
}
