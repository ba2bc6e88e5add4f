//! Tests for login, logout, session and navigation handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::*;
use crate::domain::ports::SessionQuery;
use crate::domain::{AuthContexts, ErrorCode, UserId};
use crate::inbound::http::test_utils::{
    MEMBER_PASSWORD, Member, body_json, login_cookie, memory_state, seed_member, test_app,
};
use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[actix_web::test]
async fn login_returns_snapshot_and_cookie() {
    let (state, store) = memory_state();
    seed_member(&store, "admin@hacktrack.dev", Member::ADMIN).await;
    let app = test::init_service(test_app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": "Admin@HackTrack.dev", "password": MEMBER_PASSWORD}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(
        res.response()
            .cookies()
            .any(|cookie| cookie.name() == "session")
    );
    let body = body_json(res).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["email"], "admin@hacktrack.dev");
    assert_eq!(body["isAdmin"], true);
    assert_eq!(body["profileCompleted"], true);
}

#[rstest]
#[case::wrong_password("bob@hacktrack.dev", "nope")]
#[case::unknown_email("ghost@hacktrack.dev", MEMBER_PASSWORD)]
#[actix_web::test]
async fn bad_credentials_share_one_answer(#[case] email: &str, #[case] password: &str) {
    let (state, store) = memory_state();
    seed_member(&store, "bob@hacktrack.dev", Member::ONBOARDED).await;
    let app = test::init_service(test_app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": email, "password": password}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let err: Error = test::read_body_json(res).await;
    assert_eq!(err.message(), crate::domain::ports::INVALID_CREDENTIALS);
}

#[rstest]
#[actix_web::test]
async fn blank_password_is_a_validation_error() {
    let (state, _) = memory_state();
    let app = test::init_service(test_app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": "a@x.com", "password": ""}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Error = test::read_body_json(res).await;
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().expect("details")["field"], "password");
}

#[rstest]
#[actix_web::test]
async fn session_is_anonymous_without_cookie() {
    let (state, _) = memory_state();
    let app = test::init_service(test_app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/session").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["roles"], json!([]));
}

/// Session lookups that, once armed, sign out every login being restored
/// before answering.
struct LogoutDuringRestore {
    inner: Arc<dyn SessionQuery>,
    contexts: Arc<AuthContexts>,
    armed: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl SessionQuery for LogoutDuringRestore {
    async fn load(&self, user_id: &UserId) -> Result<Option<SessionSnapshot>, Error> {
        if self.armed.load(Ordering::SeqCst) {
            for key in self.contexts.in_flight() {
                self.contexts.sign_out(key);
            }
        }
        self.inner.load(user_id).await
    }
}

#[rstest]
#[actix_web::test]
async fn logout_during_restore_discards_the_session() {
    let (mut state, store) = memory_state();
    seed_member(&store, "dana@hacktrack.dev", Member::ONBOARDED).await;
    let armed = Arc::new(AtomicBool::new(false));
    state.sessions = Arc::new(LogoutDuringRestore {
        inner: state.sessions.clone(),
        contexts: state.auth_contexts.clone(),
        armed: armed.clone(),
    });
    let contexts = state.auth_contexts.clone();
    let app = test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "dana@hacktrack.dev").await;
    armed.store(true, Ordering::SeqCst);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/session")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let removal = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("removal cookie");
    assert_eq!(removal.value(), "");
    let body = body_json(res).await;
    assert_eq!(body["authenticated"], false);
    assert!(contexts.in_flight().is_empty());

    let gated = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tasks")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(gated.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn logout_clears_the_session() {
    let (state, store) = memory_state();
    seed_member(&store, "carol@hacktrack.dev", Member::ONBOARDED).await;
    let app = test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "carol@hacktrack.dev").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let removal = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("removal cookie");
    assert_eq!(removal.value(), "");
}

#[rstest]
#[case::member_on_tasks(Member::ONBOARDED, "/dashboard/tasks", json!({"action": "render"}))]
#[case::new_member_on_tasks(
    Member::NEW,
    "/dashboard/tasks",
    json!({"action": "redirect", "target": "/dashboard/complete-profile"})
)]
#[case::new_member_on_gate(Member::NEW, "/dashboard/complete-profile/", json!({"action": "render"}))]
#[case::member_on_admin(
    Member::ONBOARDED,
    "/dashboard/admin",
    json!({"action": "redirect", "target": "/dashboard"})
)]
#[case::admin_on_admin(Member::ADMIN, "/dashboard/admin", json!({"action": "render"}))]
#[actix_web::test]
async fn navigation_follows_the_route_guard(
    #[case] member: Member,
    #[case] path: &str,
    #[case] expected: serde_json::Value,
) {
    let (state, store) = memory_state();
    seed_member(&store, "dana@hacktrack.dev", member).await;
    let app = test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "dana@hacktrack.dev").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/navigation?path={path}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["decision"], expected);
}

#[rstest]
#[actix_web::test]
async fn anonymous_navigation_to_dashboard_redirects_to_login() {
    let (state, _) = memory_state();
    let app = test::init_service(test_app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/navigation?path=/dashboard")
            .to_request(),
    )
    .await;

    let body = body_json(res).await;
    assert_eq!(body["requirement"], "authenticated");
    assert_eq!(body["decision"]["target"], "/login");
}

#[rstest]
#[actix_web::test]
async fn relative_navigation_path_is_rejected() {
    let (state, _) = memory_state();
    let app = test::init_service(test_app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/navigation?path=dashboard")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
