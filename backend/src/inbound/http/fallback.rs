//! Envelopes for requests that never reach a handler.
//!
//! Unknown paths are routed to [`not_found`] through the boundary. Failures
//! actix raises itself, such as an oversized body or a method a resource does
//! not serve, are rewritten by [`framework_errors`] into the standard error
//! envelope. Responses that already carry JSON pass through untouched.

use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpRequest, HttpResponse};
use tracing::debug;

use crate::domain::{ApiResult, Error};
use crate::inbound::http::error::render_error;

/// Statuses actix produces on its own with a plain-text or empty body.
const FRAMEWORK_STATUSES: [StatusCode; 5] = [
    StatusCode::BAD_REQUEST,
    StatusCode::NOT_FOUND,
    StatusCode::METHOD_NOT_ALLOWED,
    StatusCode::PAYLOAD_TOO_LARGE,
    StatusCode::UNSUPPORTED_MEDIA_TYPE,
];

/// Default service: no route matched the request.
pub async fn not_found(request: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!(
        "no route for {} {}",
        request.method(),
        request.path()
    )))
}

/// Middleware rendering framework-generated client errors as envelopes.
pub fn framework_errors<B: 'static>() -> ErrorHandlers<B> {
    FRAMEWORK_STATUSES
        .into_iter()
        .fold(ErrorHandlers::new(), |handlers, status| {
            handlers.handler(status, envelope::<B>)
        })
}

fn envelope<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    if carries_json(&res) {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }
    let error = framework_error(res.status());
    debug!(status = %res.status(), path = res.request().path(), "framework error enveloped");
    let (request, _) = res.into_parts();
    let rendered = ServiceResponse::new(request, render_error(&error)).map_into_right_body();
    Ok(ErrorHandlerResponse::Response(rendered))
}

fn carries_json<B>(res: &ServiceResponse<B>) -> bool {
    res.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

fn framework_error(status: StatusCode) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::not_found("resource not found"),
        StatusCode::METHOD_NOT_ALLOWED => Error::bad_request("method not allowed"),
        StatusCode::PAYLOAD_TOO_LARGE => Error::bad_request("request body is too large"),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => Error::bad_request("unsupported content type"),
        _ => Error::bad_request("request could not be read"),
    }
}
