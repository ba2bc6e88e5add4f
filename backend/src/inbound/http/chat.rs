//! Assistant chat proxy.
//!
//! ```text
//! POST /api/v1/chat {"messages":[{"role":"user","content":"Plan my week"}]}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{ChatConversation, ChatMessage, ChatValidationError, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::gate::authorise;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Client route backing the chat endpoint.
pub const CHAT_ROUTE: &str = "/dashboard/chat";

/// Body for `POST /api/v1/chat`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Assistant reply.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
}

fn map_chat_validation_error(err: &ChatValidationError) -> Error {
    let (code, index) = match err {
        ChatValidationError::Empty => ("missing_field", None),
        ChatValidationError::TooMany { .. } => ("too_many", None),
        ChatValidationError::BlankMessage { index } => ("missing_field", Some(*index)),
        ChatValidationError::MessageTooLong { index, .. } => ("too_long", Some(*index)),
    };
    let mut details = json!({ "field": "messages", "code": code });
    if let Some(index) = index {
        details["index"] = json!(index);
    }
    Error::invalid_request(err.to_string()).with_details(details)
}

/// Forward a conversation to the assistant and return its reply.
#[utoipa::path(
    post,
    path = "/api/v1/chat",
    request_body = ChatBody,
    responses(
        (status = 200, description = "Assistant reply", body = ChatReply),
        (status = 400, description = "Invalid conversation", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Profile completion required", body = Error),
        (status = 503, description = "Assistant unavailable", body = Error)
    ),
    tags = ["chat"],
    operation_id = "chat"
)]
#[post("/chat")]
pub async fn chat(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ChatBody>,
) -> ApiResult<web::Json<ChatReply>> {
    authorise(&state, &session, CHAT_ROUTE).await?;
    let conversation = ChatConversation::new(payload.into_inner().messages)
        .map_err(|err| map_chat_validation_error(&err))?;
    let reply = state.chat.reply(conversation).await?;
    Ok(web::Json(ChatReply { reply }))
}
