//! Principal identity: user ids, roles, resolved sessions, and credentials.
//!
//! A [`Session`] is resolved once per request by the inbound adapter's
//! optimistic check and handed to services by value. Services use it for
//! ownership and role decisions but never re-derive it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Errors raised while parsing identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// The user id is not a canonical UUID.
    #[error("user id must be a valid UUID")]
    InvalidUserId,
    /// The role name is not recognised.
    #[error("unknown role '{0}'")]
    UnknownRole(String),
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a user id from its hyphenated UUID form.
    ///
    /// # Examples
    /// ```
    /// use crud_backend::domain::UserId;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
    /// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// assert!(UserId::new(" not-a-uuid").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let raw = raw.as_ref();
        if raw.trim() != raw {
            return Err(IdentityValidationError::InvalidUserId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| IdentityValidationError::InvalidUserId)
    }

    /// Generate a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

/// Coarse role claim carried by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular account.
    Member,
    /// Moderation account allowed to manage other users' content.
    Admin,
}

impl Role {
    /// Stable text form stored in session cookies.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = IdentityValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            other => Err(IdentityValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Authenticated principal for the lifetime of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    role: Role,
}

impl Session {
    /// Bind a principal to its role claim.
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Principal identifier.
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Role claim.
    pub const fn role(&self) -> Role {
        self.role
    }
}

/// Login credentials after shape checks.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty; surrounding whitespace is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Build credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, IdentityValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(IdentityValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(IdentityValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for account lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password as supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
