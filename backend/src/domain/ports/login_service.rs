//! Driving port for login.
//!
//! Inbound adapters call it to turn credentials into a [`Session`] without
//! knowing how accounts are stored.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Role, Session, UserId};

/// Authentication use case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the resolved session.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Session, Error>;
}

/// Fixed development accounts.
///
/// - `admin` / `password`: admin role
/// - `ada` / `lovelace`: member role
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

/// User id of the fixture admin account.
pub const FIXTURE_ADMIN_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
/// User id of the fixture member account.
pub const FIXTURE_MEMBER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Session, Error> {
        let (id, role) = match (credentials.username(), credentials.password()) {
            ("admin", "password") => (FIXTURE_ADMIN_ID, Role::Admin),
            ("ada", "lovelace") => (FIXTURE_MEMBER_ID, Role::Member),
            _ => return Err(Error::unauthorized("invalid credentials")),
        };
        let user_id = UserId::new(id)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
        Ok(Session::new(user_id, role))
    }
}
