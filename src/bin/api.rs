use std::net::SocketAddr;

use anyhow::Result;
use titlecraft::{
    app_state::AppState, config::Config, middleware::RateLimit, routes, service::TitleService,
    telemetry,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    telemetry::init_tracing(config.log_format(), "info,tower_http=debug");
    info!(?config, "configuration loaded");

    let service = TitleService::from_config(&config)?;
    let rate_limit = match config.rate_limit_per_minute() {
        0 => None,
        per_minute => Some(RateLimit::per_minute(per_minute)),
    };

    let app = routes::router(AppState::new(service), rate_limit);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
