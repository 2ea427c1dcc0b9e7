//! Session helpers: phase one of authorisation.
//!
//! Wraps the actix cookie session so handlers deal only in domain
//! [`Session`] values. Resource-level checks happen later, in services.

use actix_session::Session as CookieSession;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Role, Session, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype exposing domain-level session operations.
#[derive(Clone)]
pub struct SessionContext(CookieSession);

impl SessionContext {
    /// Wrap the underlying actix session.
    pub fn new(session: CookieSession) -> Self {
        Self(session)
    }

    /// Persist an authenticated principal, rotating the session id.
    pub fn persist(&self, session: &Session) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, session.user_id().to_string())
            .and_then(|()| self.0.insert(ROLE_KEY, session.role().as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Forget the current principal.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Current principal, if the cookie carries a valid one.
    ///
    /// Malformed values are logged and treated as absent.
    pub fn session(&self) -> Result<Option<Session>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let (Some(raw_id), Some(raw_role)) = (read(USER_ID_KEY)?, read(ROLE_KEY)?) else {
            return Ok(None);
        };
        let user_id = match UserId::new(&raw_id) {
            Ok(id) => id,
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                return Ok(None);
            }
        };
        let role = match raw_role.parse::<Role>() {
            Ok(role) => role,
            Err(error) => {
                warn!(%error, "invalid role in session cookie");
                return Ok(None);
            }
        };
        Ok(Some(Session::new(user_id, role)))
    }

    /// Require a principal or fail with `UNAUTHORIZED`.
    pub fn require_session(&self) -> Result<Session, Error> {
        self.session()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = CookieSession::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
