//! Login, logout and auth context HTTP handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"alice@x.com","password":"HT-abcd1234!"}
//! POST /api/v1/logout
//! GET  /api/v1/session
//! GET  /api/v1/navigation?path=/dashboard/tasks
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::SessionSnapshot;
use crate::domain::{
    Decision, Error, LoginCredentials, LoginValidationError, Role, RouteRequirement, SessionState,
    decide, normalise_path, route_requirement,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::gate::{restore, sign_out};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error};

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyEmail => ("email", "missing_field"),
        LoginValidationError::InvalidEmail => ("email", "invalid_email"),
        LoginValidationError::EmptyPassword => ("password", "missing_field"),
    };
    field_error(FieldName::new(field), code, err.to_string())
}

/// Auth context snapshot returned by `GET /api/v1/session`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub profile_completed: bool,
    pub roles: Vec<Role>,
    pub is_admin: bool,
}

impl SessionResponse {
    fn anonymous() -> Self {
        Self {
            authenticated: false,
            user_id: None,
            email: None,
            full_name: None,
            profile_completed: false,
            roles: Vec::new(),
            is_admin: false,
        }
    }
}

/// Authenticate a member and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    info!(user_id = %user_id, "member signed in");
    let restored = restore(&state, &session).await?;
    Ok(web::Json(session_response(restored.snapshot)))
}

/// Tear down the session. Requests of this login still restoring their
/// session are answered as anonymous.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session cleared"),
        (status = 500, description = "Session cookie unreadable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    sign_out(&state, &session)?;
    Ok(HttpResponse::NoContent().finish())
}

fn session_response(snapshot: Option<SessionSnapshot>) -> SessionResponse {
    let Some(snapshot) = snapshot else {
        return SessionResponse::anonymous();
    };
    let roles: Vec<Role> = snapshot.session.roles.iter().collect();
    SessionResponse {
        authenticated: true,
        user_id: Some(snapshot.account.id.to_string()),
        email: Some(snapshot.account.email.as_ref().to_owned()),
        full_name: Some(snapshot.account.full_name.as_ref().to_owned()),
        profile_completed: snapshot.session.profile_completed,
        is_admin: snapshot.session.roles.is_admin(),
        roles,
    }
}

/// Current auth context snapshot.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Auth context", body = SessionResponse),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "getSession",
    security([])
)]
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionResponse>> {
    let restored = restore(&state, &session).await?;
    Ok(web::Json(session_response(restored.snapshot)))
}

/// Query for `GET /api/v1/navigation`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct NavigationQuery {
    /// Client route being navigated to.
    pub path: String,
}

/// Routing decision for a client route.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigationResponse {
    pub path: String,
    pub requirement: RouteRequirement,
    pub decision: Decision,
}

/// Evaluate the route guard for a client path.
#[utoipa::path(
    get,
    path = "/api/v1/navigation",
    params(NavigationQuery),
    responses(
        (status = 200, description = "Routing decision", body = NavigationResponse),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["auth"],
    operation_id = "navigate",
    security([])
)]
#[get("/navigation")]
pub async fn navigate(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NavigationQuery>,
) -> ApiResult<web::Json<NavigationResponse>> {
    let raw = query.into_inner().path;
    if !raw.starts_with('/') {
        return Err(field_error(
            FieldName::new("path"),
            "invalid_path",
            "path must start with /",
        ));
    }
    let restored = restore(&state, &session).await?;
    let path = normalise_path(&raw).to_owned();
    let requirement = route_requirement(&path);
    let decision = decide(&restored.state, &path, requirement);
    if let (SessionState::Authenticated(current), Decision::Redirect(target)) =
        (&restored.state, &decision)
    {
        tracing::debug!(user_id = %current.user_id, %path, %target, "navigation redirected");
    }
    Ok(web::Json(NavigationResponse {
        path,
        requirement,
        decision,
    }))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
