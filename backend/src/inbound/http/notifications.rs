//! Notification feed endpoints.
//!
//! ```text
//! GET  /api/v1/notifications?limit=20
//! POST /api/v1/notifications/{id}/read
//! POST /api/v1/notifications/read-all
//! ```
//!
//! The feed backs the dashboard bell, so it follows the `/dashboard` guard.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{DASHBOARD_PATH, Error, NotificationFeed, NotificationId, feed_limit};
use crate::inbound::http::ApiResult;
use crate::inbound::http::gate::authorise;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Query for `GET /api/v1/notifications`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct FeedQuery {
    /// Page size; defaults to 50 and is clamped to 1..=100.
    pub limit: Option<u32>,
}

/// Result of `POST /api/v1/notifications/read-all`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

/// Newest notifications with unread counts.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(FeedQuery),
    responses(
        (status = 200, description = "Feed", body = NotificationFeed),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Profile completion required", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<FeedQuery>,
) -> ApiResult<web::Json<NotificationFeed>> {
    let current = authorise(&state, &session, DASHBOARD_PATH).await?;
    let limit = feed_limit(query.into_inner().limit);
    let feed = state.notifications.feed(&current.user_id, limit).await?;
    Ok(web::Json(feed))
}

/// Mark one of the caller's notifications read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification identifier")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Not one of the caller's notifications", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let current = authorise(&state, &session, DASHBOARD_PATH).await?;
    let id = NotificationId::from_uuid(parse_uuid(&path.into_inner(), FieldName::new("id"))?);
    state.notifications.mark_read(&current.user_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mark every notification of the caller read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    responses(
        (status = 200, description = "Notifications updated", body = MarkAllReadResponse),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markAllNotificationsRead"
)]
#[post("/notifications/read-all")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MarkAllReadResponse>> {
    let current = authorise(&state, &session, DASHBOARD_PATH).await?;
    let updated = state.notifications.mark_all_read(&current.user_id).await?;
    Ok(web::Json(MarkAllReadResponse { updated }))
}
