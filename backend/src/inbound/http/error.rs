//! HTTP rendering for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while giving every
//! failure, wherever it is raised, the same JSON envelope:
//!
//! ```json
//! { "error": { "code": "NOT_FOUND", "message": "post not found", "details": [] } }
//! ```
//!
//! `details` is omitted when empty. Internal errors are logged here and
//! replaced by a fixed message before anything reaches the client.

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{Error, ErrorCode, FieldIssue, StatusClass, TraceId};

/// Message returned for every redacted failure.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Pre-serialised envelope used when the regular envelope cannot be encoded.
pub(crate) const FALLBACK_BODY: &str =
    r#"{"error":{"code":"INTERNAL_ERROR","message":"Internal server error"}}"#;

/// Wire form of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorEnvelope {
    /// The failure being reported.
    pub error: ErrorBody,
}

/// Body of [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Stable upper snake case code, e.g. `VALIDATION_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,
    /// Human-readable message.
    #[schema(example = "Request validation failed")]
    pub message: String,
    /// Field-level issues; omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schema(value_type = Vec<crate::inbound::http::schemas::FieldIssueSchema>)]
    pub details: Vec<FieldIssue>,
}

impl ErrorBody {
    fn redacted() -> Self {
        Self {
            code: ErrorCode::INTERNAL_ERROR.to_string(),
            message: INTERNAL_MESSAGE.to_owned(),
            details: Vec::new(),
        }
    }
}

impl From<&Error> for ErrorBody {
    fn from(error: &Error) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.message().to_owned(),
            details: error.details().to_vec(),
        }
    }
}

/// Transport status for a failure class.
pub(crate) fn status_for(status: StatusClass) -> StatusCode {
    match status {
        StatusClass::BadRequest => StatusCode::BAD_REQUEST,
        StatusClass::Unauthorized => StatusCode::UNAUTHORIZED,
        StatusClass::Forbidden => StatusCode::FORBIDDEN,
        StatusClass::NotFound => StatusCode::NOT_FOUND,
        StatusClass::Conflict => StatusCode::CONFLICT,
        StatusClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client-visible body for `error`, logging and redacting internal errors.
pub(crate) fn client_body(error: &Error) -> ErrorBody {
    if error.status() == StatusClass::Internal {
        error!(
            trace_id = TraceId::current().map(display),
            code = %error.code(),
            message = error.message(),
            details = ?error.details(),
            "internal error redacted at boundary"
        );
        ErrorBody::redacted()
    } else {
        ErrorBody::from(error)
    }
}

/// Render `error` as the standard envelope with its mapped status.
pub fn render_error(error: &Error) -> HttpResponse {
    let envelope = ErrorEnvelope {
        error: client_body(error),
    };
    encode(status_for(error.status()), &envelope)
}

/// Generic 500 envelope for failures that were already logged by the caller.
pub(crate) fn redacted_response() -> HttpResponse {
    let envelope = ErrorEnvelope {
        error: ErrorBody::redacted(),
    };
    encode(StatusCode::INTERNAL_SERVER_ERROR, &envelope)
}

fn encode(status: StatusCode, envelope: &ErrorEnvelope) -> HttpResponse {
    match serde_json::to_vec(envelope) {
        Ok(bytes) => HttpResponse::build(status)
            .content_type(ContentType::json())
            .body(bytes),
        Err(err) => {
            error!(
                trace_id = TraceId::current().map(display),
                error = %err,
                "failed to encode error envelope"
            );
            fallback_response()
        }
    }
}

/// Static 500 envelope that needs no serialisation.
pub(crate) fn fallback_response() -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type(ContentType::json())
        .body(FALLBACK_BODY)
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.status())
    }

    fn error_response(&self) -> HttpResponse {
        render_error(self)
    }
}

#[cfg(test)]
mod tests;
