//! OpenAPI schema definitions for domain and envelope types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; the
//! wrappers here mirror their wire shape inside the inbound adapter.

use pagination::PageMeta;
use utoipa::ToSchema;

use crate::inbound::http::posts::{CategoryResponse, PostResponse};

/// OpenAPI schema for [`crate::domain::FieldIssue`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FieldIssue)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FieldIssueSchema {
    /// Name of the offending field, or `body` / `path` / `query`.
    #[schema(example = "title")]
    field: String,
    /// What is wrong with it.
    #[schema(example = "required")]
    message: String,
}

/// OpenAPI schema for [`pagination::PageMeta`].
#[derive(ToSchema)]
#[schema(as = pagination::PageMeta)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageMetaSchema {
    /// One-based page served.
    page: u32,
    /// Effective page size.
    limit: u32,
    /// Total items across pages.
    total: u64,
    /// Number of pages.
    #[schema(rename = "totalPages")]
    total_pages: u64,
}

/// `{"data": Post}`.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PostEnvelopeSchema {
    /// The post.
    data: PostResponse,
}

/// `{"data": [Post], "pagination": PageMeta}`.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PostPageSchema {
    /// Posts on this page.
    data: Vec<PostResponse>,
    /// Page metadata.
    #[schema(value_type = PageMetaSchema)]
    pagination: PageMeta,
}

/// `{"data": [Category]}`.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CategoryListSchema {
    /// Every category.
    data: Vec<CategoryResponse>,
}
