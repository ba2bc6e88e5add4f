//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case::invalid(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case::unauthorized(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case::forbidden(Error::forbidden("admin role required"), StatusCode::FORBIDDEN)]
#[case::not_found(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case::conflict(Error::conflict("already decided"), StatusCode::CONFLICT)]
#[case::unavailable(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case::internal(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn decode_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id is valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should be absent"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialises")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("pool exhausted at db-3")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let payload = decode_response(
        error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn redirect_details_survive_the_response(expected_trace_id: String) {
    let error = Error::forbidden("profile completion required")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"redirect": "/dashboard/complete-profile"}));

    let payload = decode_response(
        error,
        StatusCode::FORBIDDEN,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(payload.code(), ErrorCode::Forbidden);
    assert_eq!(
        payload.details(),
        Some(&json!({"redirect": "/dashboard/complete-profile"}))
    );
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::invalid_request("bad").with_details(json!({"field": "email"}));

    let payload = decode_response(error, StatusCode::BAD_REQUEST, None).await;
    assert_eq!(payload.message(), "bad");
    assert_eq!(payload.trace_id(), None);
}

#[rstest]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}

#[derive(Debug, serde::Deserialize)]
struct CountBody {
    count: u32,
}

async fn echo_count(body: actix_web::web::Json<CountBody>) -> HttpResponse {
    HttpResponse::Ok().body(body.count.to_string())
}

async fn echo_count_query(query: actix_web::web::Query<CountBody>) -> HttpResponse {
    HttpResponse::Ok().body(query.count.to_string())
}

#[rstest]
#[case::not_json("{", "request body is not valid JSON for this endpoint")]
#[case::wrong_shape(r#"{"count": "many"}"#, "request body is not valid JSON for this endpoint")]
#[actix_web::test]
async fn malformed_bodies_use_the_error_envelope(#[case] body: &str, #[case] message: &str) {
    use actix_web::{App, test, web};

    let app = test::init_service(
        App::new()
            .app_data(json_config())
            .route("/", web::post().to(echo_count)),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/")
        .insert_header(("content-type", "application/json"))
        .set_payload(body.to_owned())
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Error = test::read_body_json(res).await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.message(), message);
    assert_eq!(payload.details(), Some(&json!({"code": "malformed_body"})));
}

#[rstest]
#[actix_web::test]
async fn malformed_queries_use_the_error_envelope() {
    use actix_web::{App, test, web};

    let app = test::init_service(
        App::new()
            .app_data(query_config())
            .route("/", web::get().to(echo_count_query)),
    )
    .await;
    let res = test::call_service(&app, test::TestRequest::get().uri("/?count=x").to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Error = test::read_body_json(res).await;
    assert_eq!(payload.details(), Some(&json!({"code": "malformed_query"})));
}
