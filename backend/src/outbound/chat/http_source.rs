//! Reqwest-backed chat completion adapter.
//!
//! Owns transport details only: request serialisation, bearer auth, timeout
//! and status mapping, and decoding of the first completion choice.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{CompletionRequestDto, CompletionResponseDto};
use crate::domain::ChatConversation;
use crate::domain::ports::{ChatCompletionError, ChatCompletionSource};

/// Model used when none is configured.
pub const DEFAULT_CHAT_MODEL: &str = "google/gemini-3-flash-preview";

/// Chat source posting to one OpenAI-compatible completions endpoint.
pub struct ChatHttpSource {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl ChatHttpSource {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl ChatCompletionSource for ChatHttpSource {
    async fn complete(
        &self,
        conversation: &ChatConversation,
    ) -> Result<Option<String>, ChatCompletionError> {
        let payload = CompletionRequestDto::new(&self.model, conversation);
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_reply(body.as_ref())
    }
}

fn parse_reply(body: &[u8]) -> Result<Option<String>, ChatCompletionError> {
    let decoded: CompletionResponseDto = serde_json::from_slice(body).map_err(|error| {
        ChatCompletionError::decode(format!("invalid completion payload: {error}"))
    })?;
    Ok(decoded.into_reply())
}

fn map_transport_error(error: reqwest::Error) -> ChatCompletionError {
    ChatCompletionError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ChatCompletionError {
    ChatCompletionError::status(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
