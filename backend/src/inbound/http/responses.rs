//! Success envelopes shared by every handler.
//!
//! ```text
//! 200 {"data": ...}
//! 201 {"data": ...}
//! 204 (no body)
//! 200 {"data": [...], "pagination": {"page", "limit", "total", "totalPages"}}
//! ```

use actix_web::HttpResponse;
use pagination::{PageMeta, Paginated};
use serde::{Deserialize, Serialize};

/// Single-resource envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    /// The payload.
    pub data: T,
}

/// List envelope with page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Page metadata.
    pub pagination: PageMeta,
}

/// `200 {"data": data}`.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(DataEnvelope { data })
}

/// `201 {"data": data}`.
pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(DataEnvelope { data })
}

/// `204` with an empty body.
pub fn no_content() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// `200` list envelope built from a guarded page.
pub fn paginated<T: Serialize>(page: Paginated<T>) -> HttpResponse {
    let (data, pagination) = page.into_parts();
    HttpResponse::Ok().json(PageEnvelope { data, pagination })
}
