//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, PostCommand, PostQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential checks for `POST /login`.
    pub login: Arc<dyn LoginService>,
    /// Read-side post use cases.
    pub posts: Arc<dyn PostQuery>,
    /// Write-side post use cases.
    pub posts_command: Arc<dyn PostCommand>,
}

impl HttpState {
    /// Construct state from its driving ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use crud_backend::domain::PostService;
    /// use crud_backend::domain::ports::{FixtureLoginService, FixtureModerationGateway};
    /// use crud_backend::inbound::http::state::HttpState;
    /// use crud_backend::outbound::persistence::InMemoryPostRepository;
    /// use pagination::PaginationGuard;
    ///
    /// let service = Arc::new(PostService::new(
    ///     Arc::new(InMemoryPostRepository::new()),
    ///     Arc::new(FixtureModerationGateway),
    ///     PaginationGuard::default(),
    /// ));
    /// let state = HttpState::new(Arc::new(FixtureLoginService), service.clone(), service);
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        posts: Arc<dyn PostQuery>,
        posts_command: Arc<dyn PostCommand>,
    ) -> Self {
        Self {
            login,
            posts,
            posts_command,
        }
    }
}
