//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;

use crate::domain::ports::{FixtureLoginService, PostCommand, PostQuery};
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler state backed by the fixture login service and the given post ports.
pub fn state_with(posts: Arc<dyn PostQuery>, posts_command: Arc<dyn PostCommand>) -> HttpState {
    HttpState::new(Arc::new(FixtureLoginService), posts, posts_command)
}

/// Log in through `POST /api/v1/login` and return the session cookie.
pub async fn login_cookie<S>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({ "username": username, "password": password }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(
        response.status().is_success(),
        "login failed: {}",
        response.status()
    );
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
