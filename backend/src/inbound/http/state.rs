//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::AuthContexts;
use crate::domain::ports::{
    AccessRequestsCommand, ChatCommand, EventsCommand, LoginService, NotificationsCommand,
    ProfileCommand, SessionQuery, TasksCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub sessions: Arc<dyn SessionQuery>,
    pub access_requests: Arc<dyn AccessRequestsCommand>,
    pub profiles: Arc<dyn ProfileCommand>,
    pub events: Arc<dyn EventsCommand>,
    pub notifications: Arc<dyn NotificationsCommand>,
    pub tasks: Arc<dyn TasksCommand>,
    pub chat: Arc<dyn ChatCommand>,
    pub auth_contexts: Arc<AuthContexts>,
}
