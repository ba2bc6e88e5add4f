//! Public access request submission.
//!
//! ```text
//! POST /api/v1/access-requests {"name":"Alice","email":"alice@x.com","reason":"Team lead"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{AccessRequest, AccessRequestValidationError, Error, NewAccessRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, identity_error};

/// Request body for `POST /api/v1/access-requests`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequestBody {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl TryFrom<AccessRequestBody> for NewAccessRequest {
    type Error = AccessRequestValidationError;

    fn try_from(value: AccessRequestBody) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.email, value.reason.as_deref())
    }
}

pub(crate) fn map_access_request_validation_error(err: &AccessRequestValidationError) -> Error {
    match err {
        AccessRequestValidationError::Identity(identity) => identity_error(identity),
        AccessRequestValidationError::ReasonTooLong { .. } => {
            field_error(FieldName::new("reason"), "too_long", err.to_string())
        }
    }
}

/// Ask for an account. No session required.
#[utoipa::path(
    post,
    path = "/api/v1/access-requests",
    request_body = AccessRequestBody,
    responses(
        (status = 201, description = "Request recorded", body = AccessRequest),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["access-requests"],
    operation_id = "submitAccessRequest",
    security([])
)]
#[post("/access-requests")]
pub async fn submit_access_request(
    state: web::Data<HttpState>,
    payload: web::Json<AccessRequestBody>,
) -> ApiResult<HttpResponse> {
    let request = NewAccessRequest::try_from(payload.into_inner())
        .map_err(|err| map_access_request_validation_error(&err))?;
    let stored = state.access_requests.submit(request).await?;
    info!(request_id = %stored.id, "access request submitted");
    Ok(HttpResponse::Created().json(stored))
}
