//! Event calendar endpoints.
//!
//! ```text
//! GET    /api/v1/events
//! POST   /api/v1/events {"title":"HackX","eventDate":"2026-05-01","visibility":"shared"}
//! POST   /api/v1/events/{id}/approve
//! DELETE /api/v1/events/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Event, EventDraft, EventId, EventValidationError, Visibility};
use crate::inbound::http::ApiResult;
use crate::inbound::http::gate::authorise;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, parse_uuid};

/// Client route backing the event endpoints.
pub const EVENTS_ROUTE: &str = "/dashboard/events";

/// Body for `POST /api/v1/events`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_date: String,
    #[serde(default)]
    pub visibility: Option<Visibility>,
}

impl TryFrom<EventBody> for EventDraft {
    type Error = EventValidationError;

    fn try_from(value: EventBody) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.title,
            value.description.as_deref(),
            &value.event_date,
            value.visibility,
        )
    }
}

fn map_event_validation_error(err: &EventValidationError) -> Error {
    field_error(FieldName::new(err.field()), err.code(), err.to_string())
}

fn event_id(raw: &str) -> Result<EventId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(EventId::from_uuid)
}

/// Events visible to the caller, soonest first.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    responses(
        (status = 200, description = "Visible events", body = [Event]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Profile completion required", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["events"],
    operation_id = "listEvents"
)]
#[get("/events")]
pub async fn list_events(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Event>>> {
    let current = authorise(&state, &session, EVENTS_ROUTE).await?;
    let events = state.events.list(&current.user_id).await?;
    Ok(web::Json(events))
}

/// Submit an event. Member submissions await approval.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = EventBody,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid field", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Profile completion required", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<EventBody>,
) -> ApiResult<HttpResponse> {
    let current = authorise(&state, &session, EVENTS_ROUTE).await?;
    let draft = EventDraft::try_from(payload.into_inner())
        .map_err(|err| map_event_validation_error(&err))?;
    let event = state.events.create(&current.user_id, draft).await?;
    Ok(HttpResponse::Created().json(event))
}

/// Approve a pending event and notify its creator.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/approve",
    params(("id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Event approved", body = Event),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Unknown event", body = Error),
        (status = 409, description = "Already approved", body = Error)
    ),
    tags = ["events"],
    operation_id = "approveEvent"
)]
#[post("/events/{id}/approve")]
pub async fn approve_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Event>> {
    let actor = session.require_user_id()?;
    let id = event_id(&path.into_inner())?;
    let event = state.events.approve(&actor, &id).await?;
    Ok(web::Json(event))
}

/// Delete an event as its creator or an admin.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "Event identifier")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the creator", body = Error),
        (status = 404, description = "Unknown event", body = Error)
    ),
    tags = ["events"],
    operation_id = "deleteEvent"
)]
#[delete("/events/{id}")]
pub async fn delete_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let current = authorise(&state, &session, EVENTS_ROUTE).await?;
    let id = event_id(&path.into_inner())?;
    state.events.delete(&current.user_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
