//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::Key;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use crud_backend::settings::{ModerationTarget, RuntimeSettings};
use pagination::PaginationGuard;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) guard: PaginationGuard,
    pub(crate) moderation: Option<ModerationTarget>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration with default pagination bounds and
    /// the fixture moderation gateway.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            bind_addr,
            guard: PaginationGuard::default(),
            moderation: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Replace the pagination guard used by every listing.
    #[must_use]
    pub fn with_guard(mut self, guard: PaginationGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Route moderation through a remote endpoint.
    #[must_use]
    pub fn with_moderation(mut self, target: Option<ModerationTarget>) -> Self {
        self.moderation = target;
        self
    }

    /// Record request metrics and serve them on `/metrics`.
    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

impl From<RuntimeSettings> for ServerConfig {
    fn from(settings: RuntimeSettings) -> Self {
        let RuntimeSettings {
            bind_addr,
            guard,
            key,
            cookie_secure,
            moderation,
        } = settings;
        Self::new(key, cookie_secure, bind_addr)
            .with_guard(guard)
            .with_moderation(moderation)
    }
}
