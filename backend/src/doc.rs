//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint mounted under `/api/v1` plus the
//! health probes, the domain and DTO schemas they reference, and the session
//! cookie security scheme. Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AccessRequest, AccessRequestId, AccessRequestStatus, Account, ChatMessage, ChatRole, Decision,
    DecisionOutcome, EmailAddress, Error, ErrorCode, Event, EventId, FullName, Notification,
    NotificationFeed, NotificationId, Profile, Role, RoleSet, RouteRequirement, Task, TaskId,
    TaskPriority, Visibility,
};
use crate::inbound::http::access_requests::AccessRequestBody;
use crate::inbound::http::admin::{
    ApproveUserBody, ApproveUserResponse, DecisionBody, DecisionResponse,
};
use crate::inbound::http::auth::{LoginRequest, NavigationResponse, SessionResponse};
use crate::inbound::http::chat::{ChatBody, ChatReply};
use crate::inbound::http::events::EventBody;
use crate::inbound::http::notifications::MarkAllReadResponse;
use crate::inbound::http::profile::CompleteProfileBody;
use crate::inbound::http::tasks::{NewTaskBody, TaskPatchBody};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "HackTrack API",
        description = "Invite-only hackathon tracker: access requests, approvals, events, tasks and notifications.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::auth::navigate,
        crate::inbound::http::access_requests::submit_access_request,
        crate::inbound::http::admin::list_access_requests,
        crate::inbound::http::admin::decide_access_request,
        crate::inbound::http::admin::approve_user,
        crate::inbound::http::profile::get_profile,
        crate::inbound::http::profile::complete_profile,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::approve_event,
        crate::inbound::http::events::delete_event,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::notifications::mark_all_read,
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::update_task,
        crate::inbound::http::tasks::delete_task,
        crate::inbound::http::chat::chat,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Account,
        EmailAddress,
        FullName,
        Role,
        RoleSet,
        Profile,
        AccessRequest,
        AccessRequestId,
        AccessRequestStatus,
        DecisionOutcome,
        Decision,
        RouteRequirement,
        Event,
        EventId,
        Visibility,
        Notification,
        NotificationId,
        NotificationFeed,
        Task,
        TaskId,
        TaskPriority,
        ChatMessage,
        ChatRole,
        LoginRequest,
        SessionResponse,
        NavigationResponse,
        AccessRequestBody,
        DecisionBody,
        DecisionResponse,
        ApproveUserBody,
        ApproveUserResponse,
        CompleteProfileBody,
        EventBody,
        MarkAllReadResponse,
        NewTaskBody,
        TaskPatchBody,
        ChatBody,
        ChatReply,
    )),
    tags(
        (name = "auth", description = "Sign-in, session and navigation decisions"),
        (name = "access-requests", description = "Public access request submission"),
        (name = "admin", description = "Access request review and account provisioning"),
        (name = "profile", description = "Profile retrieval and one-time completion"),
        (name = "events", description = "Hackathon events and approval"),
        (name = "notifications", description = "Per-user notification feed"),
        (name = "tasks", description = "Personal task list"),
        (name = "chat", description = "Assistant chat proxy"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
