//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer, the
//! envelope and DTO schemas, and the session cookie security scheme. The
//! document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::auth::{LoginRequest, SessionResponse};
use crate::inbound::http::error::{ErrorBody, ErrorEnvelope};
use crate::inbound::http::posts::{
    CategoryResponse, CreatePostRequest, PostResponse, UpdatePostRequest,
};
use crate::inbound::http::schemas::{
    CategoryListSchema, FieldIssueSchema, PageMetaSchema, PostEnvelopeSchema, PostPageSchema,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "CRUD backend API",
        description = "Session-authenticated posts API with a uniform error envelope."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::publish_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::list_categories,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorEnvelope,
        ErrorBody,
        FieldIssueSchema,
        LoginRequest,
        SessionResponse,
        CreatePostRequest,
        UpdatePostRequest,
        PostResponse,
        CategoryResponse,
        PageMetaSchema,
        PostEnvelopeSchema,
        PostPageSchema,
        CategoryListSchema,
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "posts", description = "Posts and their reference data"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
