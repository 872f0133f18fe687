use claims_chat::chat::spawn_sweeper;
use claims_chat::config::get_configuration;
use claims_chat::startup::{build_router, build_state};
use dotenvy::dotenv;
use service_core::observability::init_tracing;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("claims-chat", &configuration.telemetry)?;

    claims_chat::services::metrics::init_metrics();

    let state = build_state(&configuration);

    let idle_minutes = configuration.server.session_idle_minutes.max(1);
    spawn_sweeper(
        state.chats.clone(),
        Duration::from_secs(idle_minutes as u64 * 60),
    );

    let app = build_router(state, idle_minutes);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting claims-chat on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
