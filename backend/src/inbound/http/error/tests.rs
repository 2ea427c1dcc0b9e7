//! Tests for HTTP error rendering.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::{Value, json};

async fn body_json(response: HttpResponse) -> Value {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialisation succeeds")
}

#[rstest]
#[case(StatusClass::BadRequest, StatusCode::BAD_REQUEST)]
#[case(StatusClass::Unauthorized, StatusCode::UNAUTHORIZED)]
#[case(StatusClass::Forbidden, StatusCode::FORBIDDEN)]
#[case(StatusClass::NotFound, StatusCode::NOT_FOUND)]
#[case(StatusClass::Conflict, StatusCode::CONFLICT)]
#[case(StatusClass::Internal, StatusCode::INTERNAL_SERVER_ERROR)]
fn every_class_has_one_status(#[case] class: StatusClass, #[case] expected: StatusCode) {
    assert_eq!(status_for(class), expected);
    assert_eq!(
        ResponseError::status_code(&Error::new(class, "x")),
        expected
    );
}

#[rstest]
#[actix_web::test]
async fn structured_errors_render_code_and_message() {
    let error = Error::not_found("post 42 not found");

    let response = render_error(&error);

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({"error": {"code": "NOT_FOUND", "message": "post 42 not found"}})
    );
}

#[rstest]
#[actix_web::test]
async fn validation_details_are_listed() {
    let error = Error::validation(vec![
        FieldIssue::new("price", "must be ≥ 0"),
        FieldIssue::new("title", "required"),
    ]);

    let body = body_json(render_error(&error)).await;

    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Request validation failed");
    assert_eq!(
        body["error"]["details"],
        json!([
            {"field": "price", "message": "must be ≥ 0"},
            {"field": "title", "message": "required"}
        ])
    );
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("db password rejected for user root")
        .with_detail("dsn", "postgres://root:hunter2@db");

    let response = render_error(&error);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({"error": {"code": "INTERNAL_ERROR", "message": "Internal server error"}})
    );
}

#[rstest]
#[actix_web::test]
async fn internal_errors_with_custom_codes_are_still_redacted() {
    let code = ErrorCode::new("STORE_CORRUPTED").expect("valid code");
    let error = Error::internal("checksum mismatch").with_code(code);

    let body = body_json(ResponseError::error_response(&error)).await;

    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
}

#[rstest]
#[actix_web::test]
async fn fallback_body_is_a_valid_envelope() {
    let response = fallback_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorEnvelope =
        serde_json::from_value(body_json(response).await).expect("envelope shape");
    assert_eq!(body.error.code, "INTERNAL_ERROR");
    assert_eq!(body.error.message, INTERNAL_MESSAGE);
    assert!(body.error.details.is_empty());
}
