//! Backend entry point: load settings, wire the profile store, serve HTTP.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use activities_backend::inbound::http::health::HealthState;
use activities_backend::inbound::http::session_config::{BuildMode, session_settings_from_process};
use server::{ServerConfig, ServerSettings, build_profile_store, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let session = session_settings_from_process(BuildMode::current())
        .map_err(std::io::Error::other)?;
    let profile_store = build_profile_store(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(session, bind_addr, profile_store),
    )?;
    info!(%bind_addr, "listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result
}
