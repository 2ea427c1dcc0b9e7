//! Wiring of driven adapters into the driving ports handlers use.

use std::sync::Arc;

use crud_backend::domain::PostService;
use crud_backend::domain::ports::{FixtureLoginService, FixtureModerationGateway, ModerationGateway};
use crud_backend::inbound::http::state::HttpState;
use crud_backend::outbound::moderation::HttpModerationGateway;
use crud_backend::outbound::persistence::InMemoryPostRepository;
use pagination::PaginationGuard;
use tracing::info;

use super::ServerConfig;

fn state_with_moderation<M>(moderation: Arc<M>, guard: PaginationGuard) -> HttpState
where
    M: ModerationGateway + 'static,
{
    let service = Arc::new(PostService::new(
        Arc::new(InMemoryPostRepository::new()),
        moderation,
        guard,
    ));
    HttpState::new(Arc::new(FixtureLoginService), service.clone(), service)
}

/// Build handler state from the server configuration.
///
/// # Errors
/// Returns [`std::io::Error`] when the moderation HTTP client cannot be
/// constructed.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    match &config.moderation {
        Some(target) => {
            let gateway = HttpModerationGateway::new(target.url.clone(), target.timeout)
                .map_err(|e| std::io::Error::other(format!("moderation client: {e}")))?;
            info!(url = %target.url, "using remote moderation gateway");
            Ok(state_with_moderation(Arc::new(gateway), config.guard))
        }
        None => {
            info!("using fixture moderation gateway");
            Ok(state_with_moderation(
                Arc::new(FixtureModerationGateway),
                config.guard,
            ))
        }
    }
}
