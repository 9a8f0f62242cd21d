//! Backend entry-point: loads settings, wires ports and serves pages and the JSON API.

mod server;

use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use portal_backend::inbound::http::session_config::fingerprint::key_fingerprint;
use portal_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use portal_backend::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let data_service = settings.data_service().map_err(std::io::Error::other)?;

    let session = session_settings_from_env(
        &mockable::DefaultEnv::new(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        %bind_addr,
        "session key loaded"
    );

    let config = ServerConfig::new(session, bind_addr).with_data_service(data_service);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::make_metrics());

    create_server(config)?.await
}
