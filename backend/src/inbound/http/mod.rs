//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every API handler is registered by [`configure_api`] beneath the
//! `/api/v1` scope. Health probes sit outside that scope.

use actix_web::web;

pub mod access_requests;
pub mod admin;
pub mod auth;
pub mod chat;
pub mod error;
pub mod events;
pub(crate) mod gate;
pub mod health;
pub mod notifications;
pub mod profile;
pub mod session;
pub mod session_config;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register the `/api/v1` handlers on `cfg`.
///
/// ```no_run
/// use actix_web::{App, web};
/// use hacktrack::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .service(auth::login)
        .service(auth::logout)
        .service(auth::current_session)
        .service(auth::navigate)
        .service(access_requests::submit_access_request)
        .service(admin::list_access_requests)
        .service(admin::decide_access_request)
        .service(admin::approve_user)
        .service(profile::get_profile)
        .service(profile::complete_profile)
        .service(events::list_events)
        .service(events::create_event)
        .service(events::approve_event)
        .service(events::delete_event)
        .service(notifications::list_notifications)
        .service(notifications::mark_all_read)
        .service(notifications::mark_read)
        .service(tasks::list_tasks)
        .service(tasks::create_task)
        .service(tasks::update_task)
        .service(tasks::delete_task)
        .service(chat::chat);
}
