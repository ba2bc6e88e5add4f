//! Route gating for feature endpoints.
//!
//! Each request restores the [`AuthContext`](crate::domain::AuthContext)
//! shared by its login and asks [`decide`] whether the client route backing
//! the endpoint may render. A logout landing while the restore is in flight
//! leaves the request anonymous. A redirect becomes an error carrying
//! `details.redirect`: `401` when the target is the login page, `403`
//! otherwise.

use serde_json::json;

use crate::domain::ports::SessionSnapshot;
use crate::domain::{
    AuthenticatedSession, COMPLETE_PROFILE_PATH, DASHBOARD_PATH, Decision, Error, LOGIN_PATH,
    RestoreOutcome, SessionState, UserId, decide, route_requirement,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Session state as seen by one request.
pub(crate) struct RestoredSession {
    pub state: SessionState,
    pub snapshot: Option<SessionSnapshot>,
}

impl RestoredSession {
    fn anonymous() -> Self {
        Self {
            state: SessionState::Anonymous,
            snapshot: None,
        }
    }
}

fn signed_in(session: &SessionContext) -> Result<Option<(UserId, uuid::Uuid)>, Error> {
    let Some(user_id) = session.user_id()? else {
        return Ok(None);
    };
    match session.login_key()? {
        Some(key) => Ok(Some((user_id, key))),
        None => {
            tracing::info!(user_id = %user_id, "session cookie lacks a login key; purging");
            session.purge();
            Ok(None)
        }
    }
}

/// Restore the auth context for the session's user.
///
/// A cookie naming an account that no longer exists is purged, as is one
/// whose login was signed out while the restore was running.
pub(crate) async fn restore(
    state: &HttpState,
    session: &SessionContext,
) -> Result<RestoredSession, Error> {
    let Some((user_id, key)) = signed_in(session)? else {
        return Ok(RestoredSession::anonymous());
    };
    let context = state.auth_contexts.acquire(key);
    let ticket = context.begin_restore();
    let loaded = state.sessions.load(&user_id).await;
    let outcome = loaded.as_ref().ok().map(|snapshot| {
        context.complete_restore(
            ticket,
            snapshot.as_ref().map(|snapshot| snapshot.session.clone()),
        )
    });
    let current = context.state();
    state.auth_contexts.release(key, context);

    let snapshot = loaded?;
    if outcome == Some(RestoreOutcome::Stale) {
        tracing::info!(user_id = %user_id, "login signed out during restore; discarding");
        session.purge();
        return Ok(RestoredSession::anonymous());
    }
    if snapshot.is_none() {
        tracing::info!(user_id = %user_id, "session names a missing account; purging");
        session.purge();
        return Ok(RestoredSession::anonymous());
    }
    Ok(RestoredSession {
        state: current,
        snapshot,
    })
}

/// Tear down the login behind this cookie and expire it.
pub(crate) fn sign_out(state: &HttpState, session: &SessionContext) -> Result<(), Error> {
    if let Some(key) = session.login_key()? {
        state.auth_contexts.sign_out(key);
    }
    session.purge();
    Ok(())
}

/// Error answered for a redirect decision.
pub(crate) fn redirect_error(target: &str) -> Error {
    let details = json!({ "redirect": target });
    match target {
        LOGIN_PATH => Error::unauthorized("login required").with_details(details),
        COMPLETE_PROFILE_PATH => {
            Error::forbidden("profile completion required").with_details(details)
        }
        DASHBOARD_PATH => Error::forbidden("admin role required").with_details(details),
        _ => Error::forbidden("access denied").with_details(details),
    }
}

/// Require that the client route `path` renders for this session.
pub(crate) async fn authorise(
    state: &HttpState,
    session: &SessionContext,
    path: &str,
) -> Result<AuthenticatedSession, Error> {
    let restored = restore(state, session).await?;
    match decide(&restored.state, path, route_requirement(path)) {
        Decision::Render => match restored.state {
            SessionState::Authenticated(session) => Ok(session),
            SessionState::Anonymous | SessionState::Loading => Err(redirect_error(LOGIN_PATH)),
        },
        Decision::Redirect(target) => Err(redirect_error(&target)),
        Decision::Loading => Err(Error::service_unavailable("session is still loading")),
    }
}
