//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed HackTrack entities (accounts, access
//! requests, profiles, roles, events, notifications, tasks) plus the
//! services that implement the driving ports in [`ports`]. Types stay
//! transport agnostic; inbound adapters map [`Error`] to HTTP.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - decide / route_requirement: the route authorisation decision.
//! - AuthContext / AuthContexts: sign-out-guarded session state per login.
//! - `*Service`: domain services wired by the server.

pub mod access_request;
mod access_request_service;
pub mod auth;
pub mod auth_context;
pub mod authorization;
pub mod chat;
mod chat_service;
pub mod credential;
pub mod error;
pub mod event;
mod event_service;
pub mod notification;
mod notification_service;
pub mod password;
pub mod ports;
pub mod profile;
mod profile_service;
pub mod role;
pub(crate) mod service_support;
mod session_service;
pub mod task;
mod task_service;
pub mod trace_id;
pub mod user;

pub use self::access_request::{
    AccessRequest, AccessRequestId, AccessRequestStatus, AccessRequestValidationError,
    DecisionOutcome, NewAccessRequest, REASON_MAX, StatusTransition, UnknownAccessRequestStatus,
};
pub use self::access_request_service::AccessRequestService;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::auth_context::{AuthContext, AuthContexts, RestoreOutcome, RestoreTicket};
pub use self::authorization::{
    ADMIN_PATH, AuthenticatedSession, COMPLETE_PROFILE_PATH, DASHBOARD_PATH, Decision, LOGIN_PATH,
    RouteRequirement, SessionState, decide, normalise_path, route_requirement,
};
pub use self::chat::{
    CHAT_MAX_MESSAGES, CHAT_MESSAGE_MAX, ChatConversation, ChatMessage, ChatRole,
    ChatValidationError, FALLBACK_REPLY, SYSTEM_PROMPT, reply_or_fallback,
};
pub use self::chat_service::ChatService;
#[cfg(test)]
pub use self::credential::MockCredentialGenerator;
pub use self::credential::{
    CREDENTIAL_PREFIX, CREDENTIAL_RANDOM_LEN, CREDENTIAL_SUFFIX, CredentialGenerator,
    OsCredentialGenerator, TemporaryCredential,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::event::{
    EVENT_DESCRIPTION_MAX, EVENT_TITLE_MAX, Event, EventDraft, EventId, EventValidationError,
    UnknownVisibility, Visibility, approved_message, submitted_message,
};
pub use self::event_service::EventService;
pub use self::notification::{
    DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT, Notification, NotificationFeed, NotificationId,
    feed_limit,
};
pub use self::notification_service::NotificationService;
pub use self::password::{PasswordDigest, PasswordHashError, hash_password, verify_password};
pub use self::profile::{PROFILE_FIELD_MAX, Profile, ProfileCompletion, ProfileValidationError};
pub use self::profile_service::ProfileService;
pub use self::role::{Role, RoleSet, UnknownRole};
pub use self::session_service::SessionService;
pub use self::task::{
    TASK_TITLE_MAX, Task, TaskId, TaskPatch, TaskPriority, TaskValidationError,
    UnknownTaskPriority, task_title,
};
pub use self::task_service::TaskService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Account, EMAIL_MAX, EmailAddress, FULL_NAME_MAX, FullName, IdentityValidationError, UserId,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use hacktrack::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
