//! Handler-level tests for the posts API against mocked driving ports.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test};
use chrono::{TimeZone, Utc};
use pagination::{BoundedList, PaginationGuard, Paginated};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{FIXTURE_MEMBER_ID, MockPostCommand, MockPostQuery};
use crate::domain::{Error, ErrorCode, Role, Session, UserId};
use crate::inbound::http::routes::api;
use crate::inbound::http::test_utils::{login_cookie, state_with, test_session_middleware};

const POST_ID: &str = "6f1c3e9a-2b4d-4c8e-9f10-112233445566";

fn member() -> Session {
    Session::new(UserId::new(FIXTURE_MEMBER_ID).expect("fixture id"), Role::Member)
}

fn sample_post() -> Post {
    let id: PostId = POST_ID.parse().expect("post id");
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("timestamp");
    Post::draft(
        id,
        member().user_id(),
        NewPost {
            title: "Hello".to_owned(),
            body: "First post".to_owned(),
            category: Category::General,
        },
        now,
    )
}

fn posts_app(
    query: MockPostQuery,
    command: MockPostCommand,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state_with(Arc::new(query), Arc::new(command))))
        .wrap(test_session_middleware())
        .configure(api)
}

async fn member_cookie<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    login_cookie(app, "ada", "lovelace").await
}

async fn send<S>(app: &S, request: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[actix_web::test]
async fn create_returns_the_draft_in_a_data_envelope() {
    let mut command = MockPostCommand::new();
    command
        .expect_create()
        .withf(|session, input| {
            *session == member() && input.title == "Hello" && input.category == Category::General
        })
        .times(1)
        .returning(|_, _| Ok(sample_post()));
    let app = test::init_service(posts_app(MockPostQuery::new(), command)).await;
    let cookie = member_cookie(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(cookie)
            .set_json(json!({"title": "Hello", "body": "First post", "category": "general"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], POST_ID);
    assert_eq!(body["data"]["ownerId"], FIXTURE_MEMBER_ID);
    assert_eq!(body["data"]["category"], "general");
    assert!(body["data"].get("publishedAt").is_none());
}

#[rstest]
#[case(test::TestRequest::get().uri("/api/v1/posts"))]
#[case(test::TestRequest::post().uri("/api/v1/posts"))]
#[case(test::TestRequest::get().uri("/api/v1/posts/not-even-a-uuid"))]
#[case(test::TestRequest::post().uri(&format!("/api/v1/posts/{POST_ID}/publish")))]
#[case(test::TestRequest::delete().uri(&format!("/api/v1/posts/{POST_ID}")))]
#[actix_web::test]
async fn anonymous_callers_never_reach_the_ports(#[case] request: test::TestRequest) {
    let app = test::init_service(posts_app(MockPostQuery::new(), MockPostCommand::new())).await;

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[actix_web::test]
async fn empty_create_bodies_list_every_required_field() {
    let mut command = MockPostCommand::new();
    command.expect_create().never();
    let app = test::init_service(posts_app(MockPostQuery::new(), command)).await;
    let cookie = member_cookie(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post().uri("/api/v1/posts").cookie(cookie),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"]["details"],
        json!([
            {"field": "body", "message": "required"},
            {"field": "category", "message": "required"},
            {"field": "title", "message": "required"}
        ])
    );
}

#[rstest]
#[case(json!({"title": "", "body": "b", "category": "general"}), "title", "has an invalid length")]
#[case(
    json!({"title": "x".repeat(TITLE_MAX + 1), "body": "b", "category": "general"}),
    "title",
    "has an invalid length"
)]
#[case(
    json!({"title": "t", "body": "b", "category": "gossip"}),
    "category",
    "must be one of: announcement, engineering, community, general"
)]
#[case(json!({"title": "   ", "body": "b", "category": "general"}), "title", "must not be blank")]
#[case(json!({"title": "t", "body": "\n\t ", "category": "general"}), "body", "must not be blank")]
#[actix_web::test]
async fn constraint_failures_name_the_field(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] message: &str,
) {
    let mut command = MockPostCommand::new();
    command.expect_create().never();
    let app = test::init_service(posts_app(MockPostQuery::new(), command)).await;
    let cookie = member_cookie(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(cookie)
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"], json!([{"field": field, "message": message}]));
}

#[actix_web::test]
async fn wrongly_typed_fields_do_not_hide_missing_ones() {
    let mut command = MockPostCommand::new();
    command.expect_create().never();
    let app = test::init_service(posts_app(MockPostQuery::new(), command)).await;
    let cookie = member_cookie(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(cookie)
            .set_json(json!({"title": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["details"],
        json!([
            {"field": "body", "message": "required"},
            {"field": "category", "message": "required"},
            {"field": "title", "message": "is malformed: invalid type: integer `5`, expected a string"}
        ])
    );
}

#[actix_web::test]
async fn blank_patch_titles_are_rejected() {
    let mut command = MockPostCommand::new();
    command.expect_update().never();
    let app = test::init_service(posts_app(MockPostQuery::new(), command)).await;
    let cookie = member_cookie(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/posts/{POST_ID}"))
            .cookie(cookie)
            .set_json(json!({"title": "  "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["details"],
        json!([{"field": "title", "message": "must not be blank"}])
    );
}

#[actix_web::test]
async fn malformed_post_ids_are_rejected_before_the_service() {
    let mut query = MockPostQuery::new();
    query.expect_get().never();
    let app = test::init_service(posts_app(query, MockPostCommand::new())).await;
    let cookie = member_cookie(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/posts/not-even-a-uuid")
            .cookie(cookie),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["details"],
        json!([{"field": "post_id", "message": "must be a UUID"}])
    );
}

#[actix_web::test]
async fn list_forwards_raw_page_requests_and_renders_metadata() {
    let mut query = MockPostQuery::new();
    query
        .expect_list()
        .withf(|_, request| *request == PageRequest::new(Some(2), Some(500)))
        .times(1)
        .returning(|_, request| {
            let window = PaginationGuard::default().window(&request);
            Ok(Paginated::new(vec![sample_post()], window, 101))
        });
    let app = test::init_service(posts_app(query, MockPostCommand::new())).await;
    let cookie = member_cookie(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/posts?page=2&limit=500")
            .cookie(cookie),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["pagination"],
        json!({"page": 2, "limit": 100, "total": 101, "totalPages": 2})
    );
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn non_numeric_page_values_are_validation_errors() {
    let mut query = MockPostQuery::new();
    query.expect_list().never();
    let app = test::init_service(posts_app(query, MockPostCommand::new())).await;
    let cookie = member_cookie(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/posts?page=two")
            .cookie(cookie),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "page");
}

#[rstest]
#[case(Error::forbidden("only the author may publish"), StatusCode::FORBIDDEN, "FORBIDDEN")]
#[case(
    Error::conflict("post already published")
        .with_code(ErrorCode::new("ALREADY_PUBLISHED").expect("code")),
    StatusCode::CONFLICT,
    "ALREADY_PUBLISHED"
)]
#[case(Error::not_found("post not found"), StatusCode::NOT_FOUND, "NOT_FOUND")]
#[actix_web::test]
async fn service_errors_keep_status_and_code(
    #[case] error: Error,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let mut command = MockPostCommand::new();
    command
        .expect_publish()
        .times(1)
        .returning(move |_, _| Err(error.clone()));
    let app = test::init_service(posts_app(MockPostQuery::new(), command)).await;
    let cookie = member_cookie(&app).await;

    let (actual, body) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/posts/{POST_ID}/publish"))
            .cookie(cookie),
    )
    .await;

    assert_eq!(actual, status);
    assert_eq!(body["error"]["code"], code);
}

#[actix_web::test]
async fn patch_passes_only_supplied_fields() {
    let mut command = MockPostCommand::new();
    command
        .expect_update()
        .withf(|_, id, changes| {
            id.to_string() == POST_ID
                && changes.title.is_none()
                && changes.body.as_deref() == Some("Edited")
                && changes.category == Some(Category::Engineering)
        })
        .times(1)
        .returning(|_, _, _| Ok(sample_post()));
    let app = test::init_service(posts_app(MockPostQuery::new(), command)).await;
    let cookie = member_cookie(&app).await;

    let (status, _) = send(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/posts/{POST_ID}"))
            .cookie(cookie)
            .set_json(json!({"body": "Edited", "category": "engineering"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn delete_answers_no_content() {
    let mut command = MockPostCommand::new();
    command.expect_delete().times(1).returning(|_, _| Ok(()));
    let app = test::init_service(posts_app(MockPostQuery::new(), command)).await;
    let cookie = member_cookie(&app).await;

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/posts/{POST_ID}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(response).await.is_empty());
}

#[actix_web::test]
async fn categories_are_public() {
    let mut query = MockPostQuery::new();
    query.expect_categories().times(1).returning(|| {
        BoundedList::new(Category::ALL.to_vec(), 100).map_err(|e| Error::internal(e.to_string()))
    });
    let app = test::init_service(posts_app(query, MockPostCommand::new())).await;

    let (status, body) = send(&app, test::TestRequest::get().uri("/api/v1/categories")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0], json!({"slug": "announcement", "label": "Announcements"}));
    assert_eq!(body["data"].as_array().map(Vec::len), Some(Category::ALL.len()));
}

#[actix_web::test]
async fn unexpected_port_failures_are_redacted() {
    let mut query = MockPostQuery::new();
    query
        .expect_get()
        .returning(|_, _| Err(Error::internal("pool exhausted at 10.0.0.3")));
    let app = test::init_service(posts_app(query, MockPostCommand::new())).await;
    let cookie = member_cookie(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{POST_ID}"))
            .cookie(cookie),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": {"code": "INTERNAL_ERROR", "message": "Internal server error"}})
    );
}
