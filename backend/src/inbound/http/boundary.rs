//! Boundary error adapter.
//!
//! Every route handler is registered through [`boundary`], which settles the
//! handler's outcome into an `HttpResponse`:
//!
//! - successful responses pass through untouched;
//! - structured domain errors render the standard envelope with their
//!   mapped status;
//! - anything else (an `eyre::Report` that does not wrap a domain error, a
//!   framework error, or a panic) is logged with the request trace id and
//!   rendered as a redacted 500.
//!
//! Wrapping is idempotent: a wrapped handler already returns a settled
//! `HttpResponse`, which passes through a second wrapper unchanged.
//!
//! ```
//! use actix_web::{App, HttpResponse, web};
//! use crud_backend::domain::{ApiResult, Error};
//! use crud_backend::inbound::http::boundary::boundary;
//!
//! async fn missing() -> ApiResult<HttpResponse> {
//!     Err(Error::not_found("nothing here"))
//! }
//!
//! let _app = App::new().route("/missing", web::get().to(boundary(missing)));
//! ```

use std::any::Any;
use std::panic::AssertUnwindSafe;

use actix_web::{Handler, HttpResponse};
use color_eyre::eyre::{Report, eyre};
use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use tracing::error;

use crate::domain::{Error, TraceId};
use crate::inbound::http::error::{redacted_response, render_error};

/// Failure produced by a handler.
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    /// A domain error raised deliberately by some layer.
    #[error(transparent)]
    Structured(Error),
    /// Anything nobody anticipated. Never shown to clients.
    #[error("{0:#}")]
    Unexpected(Report),
}

impl Fault {
    /// Wrap any standard error as an unexpected failure.
    pub fn unexpected<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Report::new(error).into()
    }

    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|msg| (*msg).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_owned());
        Self::Unexpected(eyre!("handler panicked: {message}"))
    }

    /// Render the failure as an HTTP response.
    pub fn into_response(self) -> HttpResponse {
        match self {
            Self::Structured(error) => render_error(&error),
            Self::Unexpected(report) => {
                error!(
                    trace_id = TraceId::current().map(display),
                    error = ?report,
                    "unexpected failure redacted at boundary"
                );
                redacted_response()
            }
        }
    }
}

impl From<Error> for Fault {
    fn from(error: Error) -> Self {
        Self::Structured(error)
    }
}

impl From<Report> for Fault {
    fn from(report: Report) -> Self {
        match report.downcast::<Error>() {
            Ok(error) => Self::Structured(error),
            Err(report) => Self::Unexpected(report),
        }
    }
}

impl From<actix_web::Error> for Fault {
    fn from(error: actix_web::Error) -> Self {
        // actix errors are not `Send`, so keep only their description.
        Self::Unexpected(eyre!("framework error: {error}"))
    }
}

/// Handler outcomes the boundary knows how to settle.
pub trait Settle {
    /// Turn the outcome into a final response.
    fn settle(self) -> HttpResponse;
}

impl Settle for HttpResponse {
    fn settle(self) -> HttpResponse {
        self
    }
}

impl<E> Settle for Result<HttpResponse, E>
where
    E: Into<Fault>,
{
    fn settle(self) -> HttpResponse {
        match self {
            Ok(response) => response,
            Err(fault) => fault.into().into_response(),
        }
    }
}

/// Handler wrapper produced by [`boundary`].
#[derive(Clone)]
pub struct Boundary<F> {
    handler: F,
}

/// Wrap `handler` so every outcome, including a panic, becomes a response.
pub fn boundary<F>(handler: F) -> Boundary<F> {
    Boundary { handler }
}

impl<F, Args> Handler<Args> for Boundary<F>
where
    F: Handler<Args>,
    F::Future: 'static,
    F::Output: Settle + 'static,
    Args: 'static,
{
    type Output = HttpResponse;
    type Future = LocalBoxFuture<'static, HttpResponse>;

    fn call(&self, args: Args) -> Self::Future {
        let fut = self.handler.call(args);
        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(outcome) => outcome.settle(),
                Err(payload) => Fault::from_panic(payload).into_response(),
            }
        })
    }
}
