//! Server construction and middleware wiring.
//!
//! Request path, outermost first: the optional Prometheus layer (feature
//! `metrics`) counts requests and answers `/metrics`, [`Trace`] scopes a
//! trace id, the cookie session resolves phase-one auth state, framework
//! rejections are rewritten into error envelopes, and the routes registered
//! by [`api`] and [`probes`] run behind the boundary adapter. Unmatched paths
//! fall through to the boundary-wrapped not-found handler.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;
#[cfg(feature = "metrics")]
pub(crate) use metrics::{build_metrics, initialize_metrics};

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::body::MessageBody;
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use crud_backend::Trace;
#[cfg(debug_assertions)]
use crud_backend::doc::ApiDoc;
use crud_backend::inbound::http::boundary::boundary;
use crud_backend::inbound::http::fallback::{framework_errors, not_found};
use crud_backend::inbound::http::health::HealthState;
use crud_backend::inbound::http::routes::{api, probes};
use crud_backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Per-worker inputs for [`build_app`]. Cloned into every worker.
#[derive(Clone)]
struct Wiring {
    health: web::Data<HealthState>,
    http: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
}

/// Private, HTTP-only cookie session expiring after two hours.
fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

fn build_app(
    wiring: Wiring,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let Wiring {
        health,
        http,
        key,
        cookie_secure,
    } = wiring;

    let app = App::new()
        .app_data(health)
        .app_data(http)
        .wrap(framework_errors())
        .wrap(session_middleware(key, cookie_secure))
        .wrap(Trace)
        .configure(api)
        .configure(probes)
        .default_service(web::to(boundary(not_found)));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server and mark the service ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when wiring adapters, binding the socket,
/// or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let wiring = Wiring {
        health: health_state.clone(),
        http: web::Data::new(build_http_state(&config)?),
        key: config.key,
        cookie_secure: config.cookie_secure,
    };

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(config.prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(wiring.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    info!(bind_addr = %config.bind_addr, "server ready");
    Ok(server)
}
