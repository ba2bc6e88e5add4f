//! Admin access-request review and direct provisioning.
//!
//! ```text
//! GET  /api/v1/admin/access-requests?status=pending
//! POST /api/v1/admin/access-requests/{id}/decision {"decision":"approved"}
//! POST /api/v1/admin/approve-user {"email":"bob@x.com","name":"Bob"}
//! ```
//!
//! Handlers gate on the admin dashboard route, so an admin who has not
//! completed their profile is held at the completion page like everyone
//! else. The domain services still check the admin role on every call.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    ADMIN_PATH, AccessRequest, AccessRequestId, AccessRequestStatus, DecisionOutcome,
    EmailAddress, Error, FullName,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::gate::authorise;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, identity_error, invalid_value_error, parse_uuid};

/// Query for `GET /api/v1/admin/access-requests`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AccessRequestListQuery {
    /// Restrict to one status.
    pub status: Option<String>,
}

fn parse_status(raw: Option<String>) -> Result<Option<AccessRequestStatus>, Error> {
    raw.map(|value| {
        value
            .parse::<AccessRequestStatus>()
            .map_err(|_| invalid_value_error(FieldName::new("status"), &value))
    })
    .transpose()
}

/// List access requests, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/access-requests",
    params(AccessRequestListQuery),
    responses(
        (status = 200, description = "Access requests", body = [AccessRequest]),
        (status = 400, description = "Invalid status filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin role or completed profile required", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listAccessRequests"
)]
#[get("/admin/access-requests")]
pub async fn list_access_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AccessRequestListQuery>,
) -> ApiResult<web::Json<Vec<AccessRequest>>> {
    let actor = authorise(&state, &session, ADMIN_PATH).await?.user_id;
    let status = parse_status(query.into_inner().status)?;
    let requests = state.access_requests.list(&actor, status).await?;
    Ok(web::Json(requests))
}

/// Body for `POST /api/v1/admin/access-requests/{id}/decision`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionBody {
    /// Approve or reject.
    pub decision: DecisionOutcome,
}

/// Decision result. `tempPassword` is only present after an approval and is
/// shown to the admin exactly once.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    /// The request after the decision.
    pub request: AccessRequest,
    /// One-time credential for the new account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_password: Option<String>,
}

/// Approve or reject a pending access request, or settle one whose earlier
/// approval was interrupted.
#[utoipa::path(
    post,
    path = "/api/v1/admin/access-requests/{id}/decision",
    params(("id" = String, Path, description = "Access request identifier")),
    request_body = DecisionBody,
    responses(
        (status = 200, description = "Decision recorded", body = DecisionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin role or completed profile required", body = Error),
        (status = 404, description = "Unknown request", body = Error),
        (status = 409, description = "Already decided or email taken", body = Error),
        (status = 503, description = "Provisioning failed", body = Error)
    ),
    tags = ["admin"],
    operation_id = "decideAccessRequest"
)]
#[post("/admin/access-requests/{id}/decision")]
pub async fn decide_access_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<DecisionBody>,
) -> ApiResult<web::Json<DecisionResponse>> {
    let actor = authorise(&state, &session, ADMIN_PATH).await?.user_id;
    let id = AccessRequestId::from_uuid(parse_uuid(&path.into_inner(), FieldName::new("id"))?);
    let outcome = payload.into_inner().decision;
    let receipt = state.access_requests.decide(&actor, &id, outcome).await?;
    info!(request_id = %id, admin = %actor, ?outcome, "access request decided");
    Ok(web::Json(DecisionResponse {
        request: receipt.request,
        temp_password: receipt
            .temporary_password
            .map(|credential| credential.expose().to_owned()),
    }))
}

/// Body for `POST /api/v1/admin/approve-user`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveUserBody {
    /// Login email for the new account.
    pub email: String,
    /// Display name.
    pub name: String,
}

/// Direct provisioning result.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveUserResponse {
    /// Always `true`; failures answer with the error envelope.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Identifier of the new account.
    pub user_id: String,
    /// One-time credential for the new account.
    pub temp_password: String,
}

/// Provision an account without an access request.
#[utoipa::path(
    post,
    path = "/api/v1/admin/approve-user",
    request_body = ApproveUserBody,
    responses(
        (status = 200, description = "Account provisioned", body = ApproveUserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin role or completed profile required", body = Error),
        (status = 409, description = "Email taken", body = Error),
        (status = 503, description = "Provisioning failed", body = Error)
    ),
    tags = ["admin"],
    operation_id = "approveUser"
)]
#[post("/admin/approve-user")]
pub async fn approve_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ApproveUserBody>,
) -> ApiResult<web::Json<ApproveUserResponse>> {
    let actor = authorise(&state, &session, ADMIN_PATH).await?.user_id;
    let body = payload.into_inner();
    let email = EmailAddress::new(&body.email).map_err(|err| identity_error(&err))?;
    let full_name = FullName::new(&body.name).map_err(|err| identity_error(&err))?;
    let provisioned = state
        .access_requests
        .provision(&actor, email, full_name)
        .await?;
    Ok(web::Json(ApproveUserResponse {
        success: true,
        message: format!("account created for {}", provisioned.account.email),
        user_id: provisioned.account.id.to_string(),
        temp_password: provisioned.temporary_password.expose().to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{AccessRequestRepository, AccountRepository};
    use crate::inbound::http::test_utils::{
        Member, body_json, login_cookie, memory_state, seed_member, test_app,
    };
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::json;

    async fn submit(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        email: &str,
    ) -> String {
        let res = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/api/v1/access-requests")
                .set_json(json!({"name": "Alice", "email": email, "reason": "Team lead"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        body_json(res).await["id"]
            .as_str()
            .expect("id")
            .to_owned()
    }

    #[rstest]
    #[actix_web::test]
    async fn approval_provisions_an_account_with_a_temporary_password() {
        let (state, store) = memory_state();
        seed_member(&store, "admin@hacktrack.dev", Member::ADMIN).await;
        let app = test::init_service(test_app(state)).await;
        let id = submit(&app, "alice@x.com").await;
        let cookie = login_cookie(&app, "admin@hacktrack.dev").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/admin/access-requests/{id}/decision"))
                .cookie(cookie.clone())
                .set_json(json!({"decision": "approved"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["request"]["status"], "approved");
        let temp = body["tempPassword"].as_str().expect("temp password");
        assert!(temp.starts_with("HT-") && temp.ends_with('!'));

        let email = EmailAddress::new("alice@x.com").expect("email");
        assert!(
            store
                .find_credentials(&email)
                .await
                .expect("lookup")
                .is_some()
        );

        let again = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/admin/access-requests/{id}/decision"))
                .cookie(cookie)
                .set_json(json!({"decision": "rejected"}))
                .to_request(),
        )
        .await;
        assert_eq!(again.status(), StatusCode::CONFLICT);
    }

    #[rstest]
    #[actix_web::test]
    async fn rejection_has_no_temporary_password() {
        let (state, store) = memory_state();
        seed_member(&store, "admin@hacktrack.dev", Member::ADMIN).await;
        let app = test::init_service(test_app(state)).await;
        let id = submit(&app, "mallory@x.com").await;
        let cookie = login_cookie(&app, "admin@hacktrack.dev").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/admin/access-requests/{id}/decision"))
                .cookie(cookie)
                .set_json(json!({"decision": "rejected"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["request"]["status"], "rejected");
        assert!(body.get("tempPassword").is_none());
        let stored = AccessRequestRepository::list(store.as_ref(), None)
            .await
            .expect("list");
        assert!(stored.iter().all(|r| r.decided_by.is_some()));
    }

    #[rstest]
    #[actix_web::test]
    async fn members_cannot_list_requests() {
        let (state, store) = memory_state();
        seed_member(&store, "bob@hacktrack.dev", Member::ONBOARDED).await;
        let app = test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app, "bob@hacktrack.dev").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/admin/access-requests")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn member_decision_is_forbidden_and_leaves_the_request_pending() {
        let (state, store) = memory_state();
        seed_member(&store, "bob@hacktrack.dev", Member::ONBOARDED).await;
        let app = test::init_service(test_app(state)).await;
        let id = submit(&app, "alice@x.com").await;
        let cookie = login_cookie(&app, "bob@hacktrack.dev").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/admin/access-requests/{id}/decision"))
                .cookie(cookie)
                .set_json(json!({"decision": "approved"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let request_id =
            AccessRequestId::from_uuid(uuid::Uuid::parse_str(&id).expect("request id"));
        let stored = AccessRequestRepository::find(store.as_ref(), &request_id)
            .await
            .expect("find")
            .expect("stored request");
        assert_eq!(stored.status, AccessRequestStatus::Pending);
        assert!(stored.decided_by.is_none());
        let email = EmailAddress::new("alice@x.com").expect("email");
        assert!(
            store
                .find_credentials(&email)
                .await
                .expect("lookup")
                .is_none()
        );
    }

    #[rstest]
    #[case::list("/api/v1/admin/access-requests", None)]
    #[case::decide(
        "/api/v1/admin/access-requests/3fa85f64-5717-4562-b3fc-2c963f66afa6/decision",
        Some(json!({"decision": "approved"}))
    )]
    #[case::provision(
        "/api/v1/admin/approve-user",
        Some(json!({"email": "erin@x.com", "name": "Erin"}))
    )]
    #[actix_web::test]
    async fn admins_must_complete_their_profile_first(
        #[case] uri: &str,
        #[case] body: Option<serde_json::Value>,
    ) {
        let (state, store) = memory_state();
        seed_member(
            &store,
            "newadmin@hacktrack.dev",
            Member {
                profile_completed: false,
                admin: true,
            },
        )
        .await;
        let app = test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app, "newadmin@hacktrack.dev").await;

        let request = match body {
            Some(body) => test::TestRequest::post().uri(uri).set_json(body),
            None => test::TestRequest::get().uri(uri),
        };
        let res = test::call_service(&app, request.cookie(cookie).to_request()).await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let err: Error = test::read_body_json(res).await;
        assert_eq!(
            err.details().expect("details")["redirect"],
            crate::domain::COMPLETE_PROFILE_PATH
        );
        let email = EmailAddress::new("erin@x.com").expect("email");
        assert!(
            store
                .find_credentials(&email)
                .await
                .expect("lookup")
                .is_none()
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn anonymous_callers_must_log_in() {
        let (state, _) = memory_state();
        let app = test::init_service(test_app(state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/admin/access-requests")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn status_filter_is_validated_and_applied() {
        let (state, store) = memory_state();
        seed_member(&store, "admin@hacktrack.dev", Member::ADMIN).await;
        let app = test::init_service(test_app(state)).await;
        submit(&app, "alice@x.com").await;
        let cookie = login_cookie(&app, "admin@hacktrack.dev").await;

        let bad = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/admin/access-requests?status=archived")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        let err: Error = test::read_body_json(bad).await;
        assert_eq!(err.details().expect("details")["value"], "archived");

        let pending = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/admin/access-requests?status=pending")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = body_json(pending).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_request_id_names_the_field() {
        let (state, store) = memory_state();
        seed_member(&store, "admin@hacktrack.dev", Member::ADMIN).await;
        let app = test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app, "admin@hacktrack.dev").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/admin/access-requests/not-a-uuid/decision")
                .cookie(cookie)
                .set_json(json!({"decision": "approved"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err: Error = test::read_body_json(res).await;
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["field"], "id");
    }

    #[rstest]
    #[actix_web::test]
    async fn direct_provisioning_rejects_taken_email() {
        let (state, store) = memory_state();
        seed_member(&store, "admin@hacktrack.dev", Member::ADMIN).await;
        seed_member(&store, "bob@x.com", Member::ONBOARDED).await;
        let app = test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app, "admin@hacktrack.dev").await;

        let created = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/admin/approve-user")
                .cookie(cookie.clone())
                .set_json(json!({"email": "erin@x.com", "name": "Erin"}))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::OK);
        let body = body_json(created).await;
        assert_eq!(body["success"], true);
        assert!(body["tempPassword"].as_str().is_some());

        let taken = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/admin/approve-user")
                .cookie(cookie)
                .set_json(json!({"email": "BOB@x.com", "name": "Bob"}))
                .to_request(),
        )
        .await;
        assert_eq!(taken.status(), StatusCode::CONFLICT);
    }
}
