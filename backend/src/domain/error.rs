//! Domain-level error taxonomy.
//!
//! These errors are transport agnostic. Services, repositories, and adapters
//! raise them to express intent (`not_found`, `forbidden`, ...); the HTTP
//! boundary adapter is the only place that turns them into wire responses.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of failure classes. Each class maps to exactly one transport
/// status in the inbound adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusClass {
    /// The request is malformed or fails validation.
    BadRequest,
    /// No authenticated principal is attached to the request.
    Unauthorized,
    /// The principal is known but may not perform this action.
    Forbidden,
    /// The requested resource does not exist (or is hidden from the caller).
    NotFound,
    /// The request conflicts with the current state of the resource.
    Conflict,
    /// An unexpected failure inside the service.
    Internal,
}

impl StatusClass {
    /// Code used when a call site does not choose its own.
    pub const fn default_code(self) -> ErrorCode {
        match self {
            Self::BadRequest => ErrorCode::BAD_REQUEST,
            Self::Unauthorized => ErrorCode::UNAUTHORIZED,
            Self::Forbidden => ErrorCode::FORBIDDEN,
            Self::NotFound => ErrorCode::NOT_FOUND,
            Self::Conflict => ErrorCode::CONFLICT,
            Self::Internal => ErrorCode::INTERNAL_ERROR,
        }
    }
}

/// Validation failures for [`ErrorCode`] and [`Error`] construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// Error messages must carry some text.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// Error codes must carry some text.
    #[error("error code must not be empty")]
    EmptyCode,
    /// Error codes are upper snake case identifiers.
    #[error("error code '{0}' must be upper snake case")]
    MalformedCode(String),
}

/// Stable machine-readable error code such as `NOT_FOUND` or
/// `ALREADY_PUBLISHED`.
///
/// ## Invariants
/// - non-empty
/// - matches `[A-Z][A-Z0-9_]*`
///
/// # Examples
/// ```
/// use crud_backend::domain::ErrorCode;
///
/// let code = ErrorCode::new("ALREADY_PUBLISHED").unwrap();
/// assert_eq!(code.as_str(), "ALREADY_PUBLISHED");
/// assert!(ErrorCode::new("already-published").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ErrorCode(Cow<'static, str>);

impl ErrorCode {
    /// Generic malformed request.
    pub const BAD_REQUEST: Self = Self(Cow::Borrowed("BAD_REQUEST"));
    /// Input failed shape validation.
    pub const VALIDATION_ERROR: Self = Self(Cow::Borrowed("VALIDATION_ERROR"));
    /// Missing or invalid session.
    pub const UNAUTHORIZED: Self = Self(Cow::Borrowed("UNAUTHORIZED"));
    /// Authorisation rule violated.
    pub const FORBIDDEN: Self = Self(Cow::Borrowed("FORBIDDEN"));
    /// Resource missing.
    pub const NOT_FOUND: Self = Self(Cow::Borrowed("NOT_FOUND"));
    /// State conflict.
    pub const CONFLICT: Self = Self(Cow::Borrowed("CONFLICT"));
    /// Unexpected failure.
    pub const INTERNAL_ERROR: Self = Self(Cow::Borrowed("INTERNAL_ERROR"));

    /// Validate and build a code from caller input.
    pub fn new(code: impl Into<Cow<'static, str>>) -> Result<Self, ErrorValidationError> {
        let code = code.into();
        let mut chars = code.chars();
        match chars.next() {
            None => Err(ErrorValidationError::EmptyCode),
            Some(first)
                if first.is_ascii_uppercase()
                    && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_') =>
            {
                Ok(Self(code))
            }
            Some(_) => Err(ErrorValidationError::MalformedCode(code.into_owned())),
        }
    }

    /// Build a code from a literal known to be well formed.
    ///
    /// Crate-internal so feature modules can declare `const` codes; caller
    /// input goes through [`ErrorCode::new`].
    pub(crate) const fn from_static(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }

    /// Borrow the code as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ErrorCode {
    type Error = ErrorValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ErrorCode> for String {
    fn from(value: ErrorCode) -> Self {
        value.0.into_owned()
    }
}

/// A single failing input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Field name as it appears in the request.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldIssue {
    /// Pair a field with the reason it was rejected.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Structured domain error.
///
/// Built once at the point a rule is violated and never mutated afterwards;
/// the builder methods consume `self`.
///
/// ## Invariants
/// - `message` is non-empty once trimmed.
/// - `code` is a valid [`ErrorCode`].
///
/// # Examples
/// ```
/// use crud_backend::domain::{Error, ErrorCode, StatusClass};
///
/// let err = Error::conflict("post is already published")
///     .with_code(ErrorCode::new("ALREADY_PUBLISHED").unwrap());
/// assert_eq!(err.status(), StatusClass::Conflict);
/// assert_eq!(err.code().as_str(), "ALREADY_PUBLISHED");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    status: StatusClass,
    code: ErrorCode,
    message: String,
    details: Vec<FieldIssue>,
}

impl Error {
    /// Create an error of `status` with its default code.
    ///
    /// Blank messages are replaced with the code text so constructors stay
    /// infallible; use [`Error::try_new`] to reject them instead.
    pub fn new(status: StatusClass, message: impl Into<String>) -> Self {
        let code = status.default_code();
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.to_string()
        } else {
            message
        };
        Self {
            status,
            code,
            message,
            details: Vec::new(),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        status: StatusClass,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::new(status, message))
    }

    /// Failure class, which decides the transport status.
    pub fn status(&self) -> StatusClass {
        self.status
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Field-level details, empty when the error is not field specific.
    pub fn details(&self) -> &[FieldIssue] {
        &self.details
    }

    /// Replace the default code with a call-site specific one.
    #[must_use]
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    /// Attach field-level details.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldIssue>) -> Self {
        self.details = details;
        self
    }

    /// Append a single field issue.
    #[must_use]
    pub fn with_detail(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.details.push(FieldIssue::new(field, message));
        self
    }

    /// Convenience constructor for [`StatusClass::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusClass::BadRequest, message)
    }

    /// Bad request carrying every failing field, coded `VALIDATION_ERROR`.
    pub fn validation(details: Vec<FieldIssue>) -> Self {
        Self::new(StatusClass::BadRequest, "Request validation failed")
            .with_code(ErrorCode::VALIDATION_ERROR)
            .with_details(details)
    }

    /// Convenience constructor for [`StatusClass::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusClass::Unauthorized, message)
    }

    /// Convenience constructor for [`StatusClass::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusClass::Forbidden, message)
    }

    /// Convenience constructor for [`StatusClass::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusClass::NotFound, message)
    }

    /// Convenience constructor for [`StatusClass::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusClass::Conflict, message)
    }

    /// Convenience constructor for [`StatusClass::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusClass::Internal, message)
    }
}
