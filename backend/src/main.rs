//! Backend entry-point: loads settings, wires adapters, and serves HTTP.

mod server;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use crud_backend::inbound::http::health::HealthState;
use crud_backend::settings::Settings;
use server::{ServerConfig, create_server};
#[cfg(feature = "metrics")]
use server::{build_metrics, initialize_metrics};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load().wrap_err("loading configuration")?;
    let runtime = settings.resolve().wrap_err("validating configuration")?;
    let config = ServerConfig::from(runtime);
    #[cfg(feature = "metrics")]
    let config =
        config.with_metrics(initialize_metrics(|| build_metrics(prometheus::Registry::new())));
    info!(
        bind_addr = %config.bind_addr(),
        "starting server"
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("starting server")?;
    server.await.wrap_err("server terminated")?;
    Ok(())
}
