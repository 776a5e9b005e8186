use std::net::SocketAddr;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinema_system::{
    build_router,
    config::{Config, LogFormat},
    services::{heartbeat, seed},
    AppState,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let registry = tracing_subscriber::registry().with(EnvFilter::new(&config.app.rust_log));
    match config.app.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }

    info!("Starting cinema system");

    let state = AppState::new(config.clone()).await?;

    if config.app.seed_defaults {
        seed::seed_defaults(&state.repos, &state.users).await?;
    }
    tokio::fs::create_dir_all(&config.upload.posters_dir).await?;

    // Warmup cache в фоне
    let state_for_bg = state.clone();
    tokio::spawn(async move {
        state_for_bg.cache.warmup_cache().await;
    });

    let _heartbeat = heartbeat::spawn_heartbeat(Duration::from_secs(config.app.heartbeat_interval_secs));

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {:?}", e);
    }
}
