//! Domain primitives, services, and ports.
//!
//! Nothing in this module knows about HTTP. Services return
//! [`Error`] values carrying a [`StatusClass`]; the inbound adapter decides
//! how a class is rendered on the wire.
//!
//! Public surface:
//! - `Error`, `ErrorCode`, `FieldIssue`, `StatusClass`: structured errors.
//! - `Session`, `Role`, `UserId`, `LoginCredentials`: resolved principals.
//! - `Post`, `NewPost`, `PostChanges`, `Category`: the posts feature.
//! - `PostService`: implements the `PostQuery` and `PostCommand` ports.

pub mod error;
pub mod identity;
pub mod ports;
pub mod post;
mod post_service;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError, FieldIssue, StatusClass};
pub use self::identity::{IdentityValidationError, LoginCredentials, Role, Session, UserId};
pub use self::post::{
    BODY_MAX, Category, NewPost, Post, PostChanges, PostId, PostVisibility, TITLE_MAX,
};
pub use self::post_service::{ALREADY_PUBLISHED, CONTENT_REJECTED, DUPLICATE_TITLE, PostService};
pub use self::trace_id::TraceId;

/// Convenient result alias for service and handler code.
///
/// # Examples
/// ```
/// use crud_backend::domain::{ApiResult, Error};
///
/// fn load() -> ApiResult<u32> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(load().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
