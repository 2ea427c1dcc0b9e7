//! Route registration.
//!
//! Every handler is registered through [`boundary`], so no entry point can
//! leak an unhandled failure to the client.

use actix_web::web;

use crate::inbound::http::boundary::boundary;
use crate::inbound::http::{auth, health, posts};

/// Register the versioned JSON API under `/api/v1`.
pub fn api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/login", web::post().to(boundary(auth::login)))
            .route("/logout", web::post().to(boundary(auth::logout)))
            .route("/categories", web::get().to(boundary(posts::list_categories)))
            .service(
                web::resource("/posts")
                    .route(web::get().to(boundary(posts::list_posts)))
                    .route(web::post().to(boundary(posts::create_post))),
            )
            .service(
                web::resource("/posts/{post_id}")
                    .route(web::get().to(boundary(posts::get_post)))
                    .route(web::patch().to(boundary(posts::update_post)))
                    .route(web::delete().to(boundary(posts::delete_post))),
            )
            .route(
                "/posts/{post_id}/publish",
                web::post().to(boundary(posts::publish_post)),
            ),
    );
}

/// Register liveness and readiness probes.
pub fn probes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health/ready", web::get().to(boundary(health::ready)))
        .route("/health/live", web::get().to(boundary(health::live)));
}
