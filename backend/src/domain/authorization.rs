//! Route authorization decisions.
//!
//! [`decide`] is a pure function over the session state, the requested path
//! and the route's requirement. The client re-evaluates it on every
//! navigation; the HTTP adapter reuses it to gate feature endpoints.
//!
//! Rules, in priority order:
//! 1. a session that is still loading renders a placeholder;
//! 2. a protected route without a session goes to `/login`;
//! 3. an incomplete profile goes to the completion page (unless already there);
//! 4. an admin route without the admin role goes to `/dashboard`;
//! 5. anything else renders.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{RoleSet, UserId};

/// Sign-in page.
pub const LOGIN_PATH: &str = "/login";
/// Member landing page.
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Onboarding page reachable with an incomplete profile.
pub const COMPLETE_PROFILE_PATH: &str = "/dashboard/complete-profile";
/// Admin console.
pub const ADMIN_PATH: &str = "/dashboard/admin";

/// Access level a route demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RouteRequirement {
    /// Anyone.
    Public,
    /// Any signed-in member.
    Authenticated,
    /// Signed-in member holding the admin role.
    Admin,
}

impl RouteRequirement {
    const fn needs_session(self) -> bool {
        matches!(self, Self::Authenticated | Self::Admin)
    }
}

/// What the decision function knows about the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The auth context has not finished restoring.
    Loading,
    /// No session.
    Anonymous,
    /// Restored session.
    Authenticated(AuthenticatedSession),
}

/// Snapshot of a restored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    /// Session owner.
    pub user_id: UserId,
    /// Gate flag loaded from the profile store.
    pub profile_completed: bool,
    /// Roles loaded from the role store.
    pub roles: RoleSet,
}

/// Outcome of a routing decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "action", content = "target", rename_all = "lowercase")]
pub enum Decision {
    /// Show the requested page.
    Render,
    /// Show a loading placeholder; never redirect while loading.
    Loading,
    /// Navigate to the given path instead.
    Redirect(String),
}

impl Decision {
    fn redirect(target: &str) -> Self {
        Self::Redirect(target.to_owned())
    }
}

/// Decide how to treat a navigation to `path`.
///
/// # Examples
/// ```
/// use hacktrack::domain::{decide, Decision, RouteRequirement, SessionState};
///
/// let decision = decide(&SessionState::Anonymous, "/dashboard/tasks", RouteRequirement::Authenticated);
/// assert_eq!(decision, Decision::Redirect("/login".to_owned()));
/// ```
#[must_use]
pub fn decide(session: &SessionState, path: &str, requirement: RouteRequirement) -> Decision {
    let session = match session {
        SessionState::Loading => return Decision::Loading,
        SessionState::Anonymous if requirement.needs_session() => {
            return Decision::redirect(LOGIN_PATH);
        }
        SessionState::Anonymous => return Decision::Render,
        SessionState::Authenticated(session) => session,
    };
    if !session.profile_completed && normalise_path(path) != COMPLETE_PROFILE_PATH {
        return Decision::redirect(COMPLETE_PROFILE_PATH);
    }
    if requirement == RouteRequirement::Admin && !session.roles.is_admin() {
        return Decision::redirect(DASHBOARD_PATH);
    }
    Decision::Render
}

/// Requirement attached to a client route.
///
/// `/dashboard/admin` needs admin, everything else under `/dashboard` needs
/// a session, and every other path is public.
///
/// # Examples
/// ```
/// use hacktrack::domain::{route_requirement, RouteRequirement};
///
/// assert_eq!(route_requirement("/dashboard/admin"), RouteRequirement::Admin);
/// assert_eq!(route_requirement("/dashboard/tasks"), RouteRequirement::Authenticated);
/// assert_eq!(route_requirement("/request-access"), RouteRequirement::Public);
/// ```
#[must_use]
pub fn route_requirement(path: &str) -> RouteRequirement {
    let path = normalise_path(path);
    if is_under(path, ADMIN_PATH) {
        RouteRequirement::Admin
    } else if is_under(path, DASHBOARD_PATH) {
        RouteRequirement::Authenticated
    } else {
        RouteRequirement::Public
    }
}

/// Strip a query string, fragment and trailing slashes.
#[must_use]
pub fn normalise_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = path.get(..end).unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

fn is_under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::Role;
    use rstest::rstest;

    fn member(profile_completed: bool, admin: bool) -> SessionState {
        let mut roles: RoleSet = [Role::User].into_iter().collect();
        if admin {
            roles.insert(Role::Admin);
        }
        SessionState::Authenticated(AuthenticatedSession {
            user_id: UserId::random(),
            profile_completed,
            roles,
        })
    }

    #[rstest]
    #[case(RouteRequirement::Public)]
    #[case(RouteRequirement::Authenticated)]
    #[case(RouteRequirement::Admin)]
    fn loading_never_redirects(#[case] requirement: RouteRequirement) {
        assert_eq!(
            decide(&SessionState::Loading, "/dashboard", requirement),
            Decision::Loading
        );
    }

    #[rstest]
    #[case("/dashboard", RouteRequirement::Authenticated)]
    #[case("/dashboard/admin", RouteRequirement::Admin)]
    fn anonymous_protected_routes_go_to_login(
        #[case] path: &str,
        #[case] requirement: RouteRequirement,
    ) {
        assert_eq!(
            decide(&SessionState::Anonymous, path, requirement),
            Decision::Redirect(LOGIN_PATH.to_owned())
        );
    }

    #[rstest]
    fn anonymous_public_route_renders() {
        assert_eq!(
            decide(&SessionState::Anonymous, "/", RouteRequirement::Public),
            Decision::Render
        );
    }

    #[rstest]
    #[case("/dashboard")]
    #[case("/dashboard/tasks")]
    #[case("/dashboard/admin")]
    #[case("/dashboard/events")]
    #[case("/")]
    #[case("/login")]
    fn incomplete_profile_is_funnelled_to_completion(#[case] path: &str) {
        let decision = decide(&member(false, true), path, route_requirement(path));
        assert_eq!(decision, Decision::Redirect(COMPLETE_PROFILE_PATH.to_owned()));
    }

    #[rstest]
    fn incomplete_profile_may_open_completion_page() {
        assert_eq!(
            decide(
                &member(false, false),
                COMPLETE_PROFILE_PATH,
                RouteRequirement::Authenticated
            ),
            Decision::Render
        );
    }

    #[rstest]
    #[case("/dashboard")]
    #[case("/dashboard/tasks")]
    #[case(COMPLETE_PROFILE_PATH)]
    fn completed_profile_is_never_sent_to_completion(#[case] path: &str) {
        assert_eq!(
            decide(&member(true, false), path, route_requirement(path)),
            Decision::Render
        );
    }

    #[rstest]
    #[case(false, Decision::Redirect(DASHBOARD_PATH.to_owned()))]
    #[case(true, Decision::Render)]
    fn admin_route_requires_admin_role(#[case] admin: bool, #[case] expected: Decision) {
        assert_eq!(
            decide(&member(true, admin), ADMIN_PATH, RouteRequirement::Admin),
            expected
        );
    }

    #[rstest]
    #[case("/", RouteRequirement::Public)]
    #[case("/login", RouteRequirement::Public)]
    #[case("/request-access", RouteRequirement::Public)]
    #[case("/reset-password", RouteRequirement::Public)]
    #[case("/dashboard", RouteRequirement::Authenticated)]
    #[case("/dashboard/", RouteRequirement::Authenticated)]
    #[case("/dashboard/upload", RouteRequirement::Authenticated)]
    #[case("/dashboard/calendar?month=3", RouteRequirement::Authenticated)]
    #[case("/dashboard/admin", RouteRequirement::Admin)]
    #[case("/dashboard/admin/", RouteRequirement::Admin)]
    #[case("/dashboardx", RouteRequirement::Public)]
    #[case("/unknown", RouteRequirement::Public)]
    fn route_table(#[case] path: &str, #[case] expected: RouteRequirement) {
        assert_eq!(route_requirement(path), expected);
    }

    #[rstest]
    fn decision_serialises_with_action_tag() {
        let json = serde_json::to_value(Decision::Redirect("/login".to_owned())).expect("json");
        assert_eq!(json, serde_json::json!({"action": "redirect", "target": "/login"}));
        let json = serde_json::to_value(Decision::Render).expect("json");
        assert_eq!(json, serde_json::json!({"action": "render"}));
    }
}
