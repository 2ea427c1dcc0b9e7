//! Login and logout handlers.
//!
//! ```text
//! POST /api/v1/login  {"username":"admin","password":"password"}
//! POST /api/v1/logout
//! ```
//!
//! Credential checks live behind the `LoginService` port; this module only
//! maps the request shape and stores the resolved principal in the cookie.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::domain::{ApiResult, FieldIssue, IdentityValidationError, LoginCredentials, Session};
use crate::inbound::http::responses::{no_content, ok};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{Shape, validate_body};
use crate::validated;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Account name.
    #[validate(required(message = "required"), length(min = 1, message = "must not be empty"))]
    #[schema(value_type = String, example = "admin")]
    pub username: Option<String>,
    /// Account password.
    #[validate(required(message = "required"), length(min = 1, message = "must not be empty"))]
    #[schema(value_type = String, example = "password")]
    pub password: Option<String>,
}

impl Shape for LoginRequest {
    type Output = LoginCredentials;

    fn into_valid(self) -> Result<LoginCredentials, Vec<FieldIssue>> {
        let username = self.username.unwrap_or_default();
        let password = self.password.unwrap_or_default();
        LoginCredentials::try_from_parts(&username, &password).map_err(|err| {
            let field = match err {
                IdentityValidationError::EmptyPassword => "password",
                _ => "username",
            };
            vec![FieldIssue::new(field, "must not be empty")]
        })
    }
}

/// Principal established by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Authenticated user id.
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub user_id: String,
    /// Role granted to the session.
    #[schema(example = "admin")]
    pub role: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            user_id: session.user_id().to_string(),
            role: session.role().as_str().to_owned(),
        }
    }
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 500, description = "Internal server error", body = crate::inbound::http::error::ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let credentials = validated!(validate_body::<LoginRequest>(&body));
    let principal = state.login.authenticate(&credentials).await?;
    session.persist(&principal)?;
    info!(user_id = %principal.user_id(), role = principal.role().as_str(), "session established");
    Ok(ok(SessionResponse::from(principal)))
}

/// Forget the current session. Succeeds for anonymous callers too.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    no_content()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{
        FIXTURE_ADMIN_ID, FIXTURE_MEMBER_ID, MockLoginService, MockPostCommand, MockPostQuery,
    };
    use crate::domain::{Error, Role, UserId};
    use crate::inbound::http::boundary::boundary;
    use crate::inbound::http::test_utils::{state_with, test_session_middleware};

    fn auth_app(
        state: HttpState,
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
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .route("/api/v1/login", web::post().to(boundary(login)))
            .route("/api/v1/logout", web::post().to(boundary(logout)))
    }

    fn fixture_state() -> HttpState {
        state_with(Arc::new(MockPostQuery::new()), Arc::new(MockPostCommand::new()))
    }

    async fn post_login(state: HttpState, body: Value) -> (StatusCode, Value) {
        let app = test::init_service(auth_app(state)).await;
        let request = test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(body)
            .to_request();
        let response = test::call_service(&app, request).await;
        let status = response.status();
        (status, test::read_body_json(response).await)
    }

    #[rstest]
    #[case("admin", "password", FIXTURE_ADMIN_ID, "admin")]
    #[case("ada", "lovelace", FIXTURE_MEMBER_ID, "member")]
    #[actix_web::test]
    async fn fixture_accounts_log_in(
        #[case] username: &str,
        #[case] password: &str,
        #[case] user_id: &str,
        #[case] role: &str,
    ) {
        let (status, body) = post_login(
            fixture_state(),
            json!({"username": username, "password": password}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": {"userId": user_id, "role": role}}));
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorised() {
        let (status, body) =
            post_login(fixture_state(), json!({"username": "admin", "password": "nope"})).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[actix_web::test]
    async fn missing_fields_are_listed_without_calling_the_port() {
        let mut login = MockLoginService::new();
        login.expect_authenticate().never();
        let state = HttpState::new(
            Arc::new(login),
            Arc::new(MockPostQuery::new()),
            Arc::new(MockPostCommand::new()),
        );

        let (status, body) = post_login(state, json!({"username": "   "})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["error"]["details"],
            json!([{"field": "password", "message": "required"}])
        );
    }

    #[actix_web::test]
    async fn blank_usernames_are_rejected_after_trimming() {
        let (status, body) =
            post_login(fixture_state(), json!({"username": "  ", "password": "pw"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["details"],
            json!([{"field": "username", "message": "must not be empty"}])
        );
    }

    #[actix_web::test]
    async fn port_failures_are_redacted() {
        let mut login = MockLoginService::new();
        login
            .expect_authenticate()
            .returning(|_| Err(Error::internal("user table unreachable")));
        let state = HttpState::new(
            Arc::new(login),
            Arc::new(MockPostQuery::new()),
            Arc::new(MockPostCommand::new()),
        );

        let (status, body) =
            post_login(state, json!({"username": "admin", "password": "password"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Internal server error");
    }

    #[actix_web::test]
    async fn logout_succeeds_without_a_session() {
        let app = test::init_service(auth_app(fixture_state())).await;
        let response = test::call_service(
            &app,
            test::TestRequest::post().uri("/api/v1/logout").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[rstest]
    #[::core::prelude::v1::test]
    fn session_responses_use_wire_names() {
        let user_id = UserId::new(FIXTURE_MEMBER_ID).expect("fixture id");
        let response = SessionResponse::from(Session::new(user_id, Role::Member));
        assert_eq!(response.role, "member");
        assert_eq!(response.user_id, FIXTURE_MEMBER_ID);
    }
}
