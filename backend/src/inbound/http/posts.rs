//! Posts API handlers.
//!
//! ```text
//! GET    /api/v1/posts?page=1&limit=20
//! POST   /api/v1/posts                      {"title","body","category"}
//! GET    /api/v1/posts/{post_id}
//! PATCH  /api/v1/posts/{post_id}            {"title"?,"body"?,"category"?}
//! DELETE /api/v1/posts/{post_id}
//! POST   /api/v1/posts/{post_id}/publish
//! GET    /api/v1/categories
//! ```
//!
//! Handlers run the session check, validate every request part, call one
//! driving port method, and shape the response. Ownership and role rules
//! are applied by the service behind the port.

use std::borrow::Cow;

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{DateTime, Utc};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::{
    ApiResult, BODY_MAX, Category, FieldIssue, NewPost, Post, PostChanges, PostId, TITLE_MAX,
};
use crate::inbound::http::responses::{created, no_content, ok, paginated};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    Shape, required, uuid_format, validate_body, validate_params, validate_search_params,
};
use crate::validated;

/// [`TITLE_MAX`] as the `u64` the `validator` length rule expects.
const TITLE_MAX_U64: u64 = TITLE_MAX as u64;
/// [`BODY_MAX`] as the `u64` the `validator` length rule expects.
const BODY_MAX_U64: u64 = BODY_MAX as u64;

fn known_category(value: &str) -> Result<(), ValidationError> {
    value.parse::<Category>().map(drop).map_err(|_| {
        let slugs: Vec<&str> = Category::ALL.iter().map(|c| c.slug()).collect();
        let mut failure = ValidationError::new("category");
        failure.message = Some(Cow::Owned(format!("must be one of: {}", slugs.join(", "))));
        failure
    })
}

/// Rejects whitespace-only text. Empty text is left to the length rule.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.trim().is_empty() {
        let mut failure = ValidationError::new("blank");
        failure.message = Some(Cow::Borrowed("must not be blank"));
        return Err(failure);
    }
    Ok(())
}

fn parse_category(raw: Option<&str>) -> Result<Option<Category>, Vec<FieldIssue>> {
    raw.map(str::parse::<Category>)
        .transpose()
        .map_err(|err| vec![FieldIssue::new("category", err)])
}

/// Body of `POST /api/v1/posts`.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreatePostRequest {
    /// Post title, unique per author.
    #[validate(
        required(message = "required"),
        length(min = 1, max = TITLE_MAX_U64),
        custom(function = "not_blank")
    )]
    #[schema(value_type = String, example = "Release notes")]
    pub title: Option<String>,
    /// Markdown body.
    #[validate(
        required(message = "required"),
        length(min = 1, max = BODY_MAX_U64),
        custom(function = "not_blank")
    )]
    #[schema(value_type = String)]
    pub body: Option<String>,
    /// Category slug from `GET /api/v1/categories`.
    #[validate(required(message = "required"), custom(function = "known_category"))]
    #[schema(value_type = String, example = "engineering")]
    pub category: Option<String>,
}

impl Shape for CreatePostRequest {
    type Output = NewPost;

    fn into_valid(self) -> Result<NewPost, Vec<FieldIssue>> {
        let mut issues = Vec::new();
        let title = required("title", self.title, &mut issues);
        let body = required("body", self.body, &mut issues);
        let category = match parse_category(self.category.as_deref()) {
            Ok(category) => required("category", category, &mut issues),
            Err(rejected) => {
                issues.extend(rejected);
                None
            }
        };
        match (title, body, category) {
            (Some(title), Some(body), Some(category)) => Ok(NewPost {
                title,
                body,
                category,
            }),
            _ => Err(issues),
        }
    }
}

/// Body of `PATCH /api/v1/posts/{post_id}`. Absent fields stay unchanged.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdatePostRequest {
    /// Replacement title.
    #[validate(length(min = 1, max = TITLE_MAX_U64), custom(function = "not_blank"))]
    pub title: Option<String>,
    /// Replacement body.
    #[validate(length(min = 1, max = BODY_MAX_U64), custom(function = "not_blank"))]
    pub body: Option<String>,
    /// Replacement category slug.
    #[validate(custom(function = "known_category"))]
    pub category: Option<String>,
}

impl Shape for UpdatePostRequest {
    type Output = PostChanges;

    fn into_valid(self) -> Result<PostChanges, Vec<FieldIssue>> {
        let category = parse_category(self.category.as_deref())?;
        Ok(PostChanges {
            title: self.title,
            body: self.body,
            category,
        })
    }
}

/// Path segment naming one post.
#[derive(Debug, Deserialize, Validate)]
pub struct PostPath {
    #[validate(required(message = "required"), custom(function = "uuid_format"))]
    post_id: Option<String>,
}

impl Shape for PostPath {
    type Output = PostId;

    fn into_valid(self) -> Result<PostId, Vec<FieldIssue>> {
        self.post_id
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| vec![FieldIssue::new("post_id", "must be a UUID")])
    }
}

/// Query string for `GET /api/v1/posts`. Out-of-range values are clamped
/// by the service's pagination guard rather than rejected.
#[derive(Debug, Deserialize, Validate, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// One-based page number.
    pub page: Option<i64>,
    /// Requested page size.
    pub limit: Option<i64>,
}

impl Shape for PageQuery {
    type Output = PageRequest;

    fn into_valid(self) -> Result<PageRequest, Vec<FieldIssue>> {
        Ok(PageRequest::new(self.page, self.limit))
    }
}

/// Wire representation of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// Post identifier.
    #[schema(example = "6f1c3e9a-2b4d-4c8e-9f10-112233445566")]
    pub id: String,
    /// Author's user id.
    pub owner_id: String,
    /// Title.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// Category slug.
    #[schema(example = "engineering")]
    pub category: String,
    /// Publication time; absent for drafts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub published_at: Option<DateTime<Utc>>,
    /// Creation time.
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id().to_string(),
            owner_id: post.owner_id().to_string(),
            title: post.title().to_owned(),
            body: post.body().to_owned(),
            category: post.category().slug().to_owned(),
            published_at: post.published_at(),
            created_at: post.created_at(),
            updated_at: post.updated_at(),
        }
    }
}

/// Wire representation of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    /// Stable slug.
    pub slug: String,
    /// Display label.
    pub label: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            slug: category.slug().to_owned(),
            label: category.label().to_owned(),
        }
    }
}

/// List posts visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of posts", body = crate::inbound::http::schemas::PostPageSchema),
        (status = 400, description = "Invalid query", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::error::ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
pub async fn list_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    let principal = session.require_session()?;
    let page_request = validated!(validate_search_params::<PageQuery>(&request));
    let page = state.posts.list(principal, page_request).await?;
    Ok(paginated(page.map(PostResponse::from)))
}

/// Create a draft owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Draft created", body = crate::inbound::http::schemas::PostEnvelopeSchema),
        (status = 400, description = "Invalid post or rejected content", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 409, description = "Duplicate title", body = crate::inbound::http::error::ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let principal = session.require_session()?;
    let input = validated!(validate_body::<CreatePostRequest>(&body));
    let post = state.posts_command.create(principal, input).await?;
    Ok(created(PostResponse::from(post)))
}

/// Fetch one post.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}",
    params(("post_id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "The post", body = crate::inbound::http::schemas::PostEnvelopeSchema),
        (status = 400, description = "Malformed id", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 404, description = "Not found", body = crate::inbound::http::error::ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
pub async fn get_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    let principal = session.require_session()?;
    let id = validated!(validate_params::<PostPath>(&request));
    let post = state.posts.get(principal, id).await?;
    Ok(ok(PostResponse::from(post)))
}

/// Edit a post.
#[utoipa::path(
    patch,
    path = "/api/v1/posts/{post_id}",
    params(("post_id" = String, Path, description = "Post identifier")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = crate::inbound::http::schemas::PostEnvelopeSchema),
        (status = 400, description = "Invalid changes", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 403, description = "Not the author", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 404, description = "Not found", body = crate::inbound::http::error::ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
pub async fn update_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let principal = session.require_session()?;
    let id = validated!(validate_params::<PostPath>(&request));
    let changes = validated!(validate_body::<UpdatePostRequest>(&body));
    let post = state.posts_command.update(principal, id, changes).await?;
    Ok(ok(PostResponse::from(post)))
}

/// Publish a draft.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/publish",
    params(("post_id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Published post", body = crate::inbound::http::schemas::PostEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 403, description = "Not the author", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 404, description = "Not found", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 409, description = "Already published", body = crate::inbound::http::error::ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "publishPost"
)]
pub async fn publish_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    let principal = session.require_session()?;
    let id = validated!(validate_params::<PostPath>(&request));
    let post = state.posts_command.publish(principal, id).await?;
    Ok(ok(PostResponse::from(post)))
}

/// Delete a post.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{post_id}",
    params(("post_id" = String, Path, description = "Post identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 403, description = "Not permitted", body = crate::inbound::http::error::ErrorEnvelope),
        (status = 404, description = "Not found", body = crate::inbound::http::error::ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    let principal = session.require_session()?;
    let id = validated!(validate_params::<PostPath>(&request));
    state.posts_command.delete(principal, id).await?;
    Ok(no_content())
}

/// Static category reference list. Public.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Categories", body = crate::inbound::http::schemas::CategoryListSchema)
    ),
    tags = ["posts"],
    operation_id = "listCategories",
    security([])
)]
pub async fn list_categories(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let categories = state.posts.categories().await?;
    let data: Vec<CategoryResponse> = categories
        .into_items()
        .into_iter()
        .map(CategoryResponse::from)
        .collect();
    Ok(ok(data))
}

#[cfg(test)]
mod tests;
